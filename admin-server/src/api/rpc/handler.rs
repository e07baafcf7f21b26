//! Backend RPC Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::core::ServerState;
use crate::db::repository::offer;
use crate::utils::{AppError, AppResult};
use shared::models::OfferAnalyticsResponse;
use shared::response::ApiResponse;

#[derive(Debug, serde::Deserialize)]
pub struct CollectionExistsQuery {
    pub name: String,
}

/// Map the API's logical collection names onto physical table names;
/// anything else is checked against sqlite_master as-is.
fn table_for(name: &str) -> &str {
    match name {
        "sessions" => "session",
        "franchises" => "franchise",
        "guests" => "guest",
        "offers" => "offer",
        "menu_items" | "menu-items" => "menu_item",
        other => other,
    }
}

/// GET /api/rpc/collection-exists?name=... - 集合是否存在
///
/// 查 sqlite_master；未知名字返回 false 而不是错误。
pub async fn collection_exists(
    State(state): State<ServerState>,
    Query(query): Query<CollectionExistsQuery>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
    )
    .bind(table_for(&query.name))
    .fetch_one(&state.pool)
    .await
    .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(ApiResponse::ok(count > 0)))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferAnalyticsRequest {
    pub offer_ids: Vec<i64>,
}

/// POST /api/rpc/offer-analytics - 批量优惠投放统计
///
/// 返回每个优惠的 sent/viewed/redeemed 计数加汇总。
pub async fn offer_analytics(
    State(state): State<ServerState>,
    Json(payload): Json<OfferAnalyticsRequest>,
) -> AppResult<Json<ApiResponse<OfferAnalyticsResponse>>> {
    if payload.offer_ids.is_empty() {
        return Err(AppError::validation("offerIds must not be empty"));
    }
    if payload.offer_ids.len() > 200 {
        return Err(AppError::validation(
            "offerIds is limited to 200 ids per call",
        ));
    }

    let analytics = offer::analytics(&state.pool, &payload.offer_ids).await?;
    Ok(Json(ApiResponse::ok(analytics)))
}
