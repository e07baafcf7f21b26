//! Guest API Handlers
//!
//! 响应附带派生的 guestType 字段 (视访问历史计算，不落库)。

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::guest::{self, GuestListFilter};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, time};
use shared::models::{Guest, GuestCreate, GuestUpdate};
use shared::response::ApiResponse;

const RESOURCE: &str = "guests";

/// Guest enriched with the derived segment
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestView {
    #[serde(flatten)]
    pub guest: Guest,
    pub guest_type: &'static str,
}

fn to_view(guest: Guest, today: chrono::NaiveDate) -> GuestView {
    let guest_type = guest.guest_type(today).as_str();
    GuestView { guest, guest_type }
}

/// List query params
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub franchise_id: Option<i64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

/// GET /api/guests - 获取客户列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<GuestView>>>> {
    let filter = GuestListFilter {
        franchise_id: query.franchise_id,
        search: query.search.as_deref(),
        order_by: query.sort_by.as_deref(),
        descending: query.sort_dir.as_deref() == Some("desc"),
    };
    let today = state.business_today();
    let guests = guest::find_all(&state.pool, &filter).await?;
    let views = guests.into_iter().map(|g| to_view(g, today)).collect();
    Ok(Json(ApiResponse::ok(views)))
}

/// GET /api/guests/{id} - 获取单个客户
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<GuestView>>> {
    let guest = guest::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Guest {id}")))?;
    Ok(Json(ApiResponse::ok(to_view(guest, state.business_today()))))
}

/// POST /api/guests - 创建客户 (201)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<GuestCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<GuestView>>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let guest = guest::create(&state.pool, payload).await?;
    let id = guest.id.to_string();

    state.broadcast_sync(RESOURCE, "created", &id, Some(&guest));

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(to_view(guest, state.business_today()))),
    ))
}

/// PUT /api/guests/{id} - 更新客户
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<GuestUpdate>,
) -> AppResult<Json<ApiResponse<GuestView>>> {
    if let Some(name) = payload.name.as_deref() {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    let guest = guest::update(&state.pool, id, payload).await?;
    let id_str = id.to_string();

    state.broadcast_sync(RESOURCE, "updated", &id_str, Some(&guest));

    Ok(Json(ApiResponse::ok(to_view(guest, state.business_today()))))
}

/// DELETE /api/guests/{id} - 删除客户（软删除）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let result = guest::delete(&state.pool, id).await?;
    let id_str = id.to_string();

    if result {
        state.broadcast_sync::<()>(RESOURCE, "deleted", &id_str, None);
    }

    Ok(Json(ApiResponse::ok(result)))
}

/// Visit payload; date defaults to the business today
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitPayload {
    pub visit_date: Option<String>,
}

/// POST /api/guests/{id}/visits - 记录到访
pub async fn record_visit(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<VisitPayload>,
) -> AppResult<Json<ApiResponse<GuestView>>> {
    let visit_date = match payload.visit_date {
        Some(date) => {
            time::parse_date(&date)?;
            date
        }
        None => state.business_today().format("%Y-%m-%d").to_string(),
    };

    guest::record_visit(&state.pool, id, &visit_date).await?;
    let guest = guest::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Guest {id}")))?;
    let id_str = id.to_string();

    state.broadcast_sync(RESOURCE, "updated", &id_str, Some(&guest));

    Ok(Json(ApiResponse::ok(to_view(guest, state.business_today()))))
}

/// Loyalty adjustment payload
#[derive(Debug, serde::Deserialize)]
pub struct LoyaltyPayload {
    /// Positive to earn, negative to burn
    pub delta: i64,
}

/// POST /api/guests/{id}/loyalty - 调整积分余额
pub async fn adjust_loyalty(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<LoyaltyPayload>,
) -> AppResult<Json<ApiResponse<i64>>> {
    let balance = guest::adjust_loyalty(&state.pool, id, payload.delta).await?;
    let id_str = id.to_string();

    state.broadcast_sync(RESOURCE, "updated", &id_str, Some(&balance));

    Ok(Json(ApiResponse::ok(balance)))
}
