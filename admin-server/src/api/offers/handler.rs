//! Offer API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::offer::{self, OfferListFilter};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{DiscountType, Offer, OfferCreate, OfferEventType, OfferUpdate};
use shared::response::ApiResponse;

const RESOURCE: &str = "offers";

/// List query params
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Offer type; "all" means unrestricted
    pub offer_type: Option<String>,
    #[serde(default)]
    pub active_only: bool,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

/// GET /api/offers - 获取优惠列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Offer>>>> {
    let offer_type = shared::query::normalize_choice(query.offer_type.as_deref());
    let filter = OfferListFilter {
        offer_type: offer_type.as_deref(),
        active_only: query.active_only,
        search: query.search.as_deref(),
        order_by: query.sort_by.as_deref(),
        descending: query.sort_dir.as_deref() == Some("desc"),
    };
    let offers = offer::find_all(&state.pool, &filter).await?;
    Ok(Json(ApiResponse::ok(offers)))
}

/// GET /api/offers/{id} - 获取单个优惠
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Offer>>> {
    let offer = offer::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Offer {id}")))?;
    Ok(Json(ApiResponse::ok(offer)))
}

fn validate_discount(discount_type: DiscountType, value: f64) -> AppResult<()> {
    if value <= 0.0 {
        return Err(AppError::validation("discountValue must be positive"));
    }
    if discount_type == DiscountType::Percentage && value > 100.0 {
        return Err(AppError::validation(
            "Percentage discount cannot exceed 100",
        ));
    }
    Ok(())
}

/// POST /api/offers - 创建优惠 (201)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OfferCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Offer>>)> {
    validate_required_text(&payload.code, "code", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_discount(payload.discount_type, payload.discount_value)?;
    if let (Some(from), Some(until)) = (payload.valid_from, payload.valid_until)
        && from > until
    {
        return Err(AppError::validation("validFrom is after validUntil"));
    }

    let offer = offer::create(&state.pool, payload).await?;
    let id = offer.id.to_string();

    state.broadcast_sync(RESOURCE, "created", &id, Some(&offer));

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(offer))))
}

/// PUT /api/offers/{id} - 更新优惠
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OfferUpdate>,
) -> AppResult<Json<ApiResponse<Offer>>> {
    if let Some(name) = payload.name.as_deref() {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let (Some(discount_type), Some(value)) = (payload.discount_type, payload.discount_value) {
        validate_discount(discount_type, value)?;
    }

    let offer = offer::update(&state.pool, id, payload).await?;
    let id_str = id.to_string();

    state.broadcast_sync(RESOURCE, "updated", &id_str, Some(&offer));

    Ok(Json(ApiResponse::ok(offer)))
}

/// DELETE /api/offers/{id} - 下线优惠（软删除）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let result = offer::delete(&state.pool, id).await?;
    let id_str = id.to_string();

    if result {
        state.broadcast_sync::<()>(RESOURCE, "deleted", &id_str, None);
    }

    Ok(Json(ApiResponse::ok(result)))
}

/// Event payload
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub event_type: OfferEventType,
    pub channel: Option<String>,
}

/// POST /api/offers/{id}/events - 记录投放/兑换事件
pub async fn record_event(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<EventPayload>,
) -> AppResult<Json<ApiResponse<bool>>> {
    offer::record_event(&state.pool, id, payload.event_type, payload.channel.as_deref()).await?;

    // Redemptions change the offer row itself
    if payload.event_type == OfferEventType::Redeemed
        && let Some(offer) = offer::find_by_id(&state.pool, id).await?
    {
        state.broadcast_sync(RESOURCE, "updated", &id.to_string(), Some(&offer));
    }

    Ok(Json(ApiResponse::ok(true)))
}
