//! Franchise API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::franchise;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{Franchise, FranchiseCreate, FranchiseUpdate};
use shared::response::ApiResponse;

const RESOURCE: &str = "franchises";

/// GET /api/franchises - 获取所有门店
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<Franchise>>>> {
    let franchises = franchise::find_all(&state.pool).await?;
    Ok(Json(ApiResponse::ok(franchises)))
}

/// GET /api/franchises/{id} - 获取单个门店
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Franchise>>> {
    let franchise = franchise::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Franchise {id}")))?;
    Ok(Json(ApiResponse::ok(franchise)))
}

/// POST /api/franchises - 创建门店 (201)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FranchiseCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Franchise>>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.code, "code", MAX_SHORT_TEXT_LEN)?;
    if payload.timezone.parse::<chrono_tz::Tz>().is_err() {
        return Err(AppError::validation(format!(
            "Unknown timezone: {}",
            payload.timezone
        )));
    }

    let franchise = franchise::create(&state.pool, payload).await?;
    let id = franchise.id.to_string();

    state.broadcast_sync(RESOURCE, "created", &id, Some(&franchise));

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(franchise))))
}

/// PUT /api/franchises/{id} - 更新门店
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<FranchiseUpdate>,
) -> AppResult<Json<ApiResponse<Franchise>>> {
    if let Some(name) = payload.name.as_deref() {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(tz) = payload.timezone.as_deref()
        && tz.parse::<chrono_tz::Tz>().is_err()
    {
        return Err(AppError::validation(format!("Unknown timezone: {tz}")));
    }

    let franchise = franchise::update(&state.pool, id, payload).await?;
    let id_str = id.to_string();

    state.broadcast_sync(RESOURCE, "updated", &id_str, Some(&franchise));

    Ok(Json(ApiResponse::ok(franchise)))
}

/// DELETE /api/franchises/{id} - 删除门店（软删除）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let result = franchise::delete(&state.pool, id).await?;
    let id_str = id.to_string();

    if result {
        state.broadcast_sync::<()>(RESOURCE, "deleted", &id_str, None);
    }

    Ok(Json(ApiResponse::ok(result)))
}
