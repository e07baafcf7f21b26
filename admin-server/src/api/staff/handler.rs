//! Staff API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::staff::{self, StaffListFilter};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{Staff, StaffCreate, StaffUpdate};
use shared::response::ApiResponse;

const RESOURCE: &str = "staff";

/// List query params
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub franchise_id: Option<i64>,
    /// Status; "all" means unrestricted
    pub status: Option<String>,
    /// Department; "all" means unrestricted
    pub department: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

/// GET /api/staff - 获取员工列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Staff>>>> {
    let status = shared::query::normalize_choice(query.status.as_deref());
    let department = shared::query::normalize_choice(query.department.as_deref());
    let filter = StaffListFilter {
        franchise_id: query.franchise_id,
        status: status.as_deref(),
        department: department.as_deref(),
        search: query.search.as_deref(),
        order_by: query.sort_by.as_deref(),
        descending: query.sort_dir.as_deref() == Some("desc"),
    };
    let members = staff::find_all(&state.pool, &filter).await?;
    Ok(Json(ApiResponse::ok(members)))
}

/// GET /api/staff/{id} - 获取单个员工
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Staff>>> {
    let member = staff::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff {id}")))?;
    Ok(Json(ApiResponse::ok(member)))
}

/// POST /api/staff - 创建员工 (201)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StaffCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Staff>>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.designation, "designation", MAX_SHORT_TEXT_LEN)?;

    let member = staff::create(&state.pool, payload).await?;
    let id = member.id.to_string();

    state.broadcast_sync(RESOURCE, "created", &id, Some(&member));

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(member))))
}

/// PUT /api/staff/{id} - 更新员工
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StaffUpdate>,
) -> AppResult<Json<ApiResponse<Staff>>> {
    if let Some(name) = payload.name.as_deref() {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(designation) = payload.designation.as_deref() {
        validate_required_text(designation, "designation", MAX_SHORT_TEXT_LEN)?;
    }

    let member = staff::update(&state.pool, id, payload).await?;
    let id_str = id.to_string();

    state.broadcast_sync(RESOURCE, "updated", &id_str, Some(&member));

    Ok(Json(ApiResponse::ok(member)))
}

/// DELETE /api/staff/{id} - 员工离职（置为 inactive）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let result = staff::delete(&state.pool, id).await?;
    let id_str = id.to_string();

    if result {
        state.broadcast_sync::<()>(RESOURCE, "deleted", &id_str, None);
    }

    Ok(Json(ApiResponse::ok(result)))
}
