//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::menu_item::{self, MenuItemListFilter};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{
    MenuItem, MenuItemCreate, MenuItemSessions, MenuItemUpdate, MenuItemWithSessions,
};
use shared::response::ApiResponse;

const RESOURCE: &str = "menu_items";

/// List query params
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub franchise_id: Option<i64>,
    /// Category; "all" means unrestricted
    pub category: Option<String>,
    /// Restrict to items served in this session
    pub session_id: Option<i64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

/// GET /api/menu-items - 获取菜单列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<MenuItem>>>> {
    let category = shared::query::normalize_choice(query.category.as_deref());
    let filter = MenuItemListFilter {
        franchise_id: query.franchise_id,
        category: category.as_deref(),
        session_id: query.session_id,
        search: query.search.as_deref(),
        order_by: query.sort_by.as_deref(),
        descending: query.sort_dir.as_deref() == Some("desc"),
    };
    let items = menu_item::find_all(&state.pool, &filter).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// GET /api/menu-items/{id} - 获取单个菜品（含关联场次）
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<MenuItemWithSessions>>> {
    let item = menu_item::find_with_sessions(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {id}")))?;
    Ok(Json(ApiResponse::ok(item)))
}

/// POST /api/menu-items - 创建菜品 (201)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<MenuItemWithSessions>>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    if payload.price < 0.0 {
        return Err(AppError::validation("price must not be negative"));
    }

    let item = menu_item::create(&state.pool, payload).await?;
    let id = item.item.id.to_string();

    state.broadcast_sync(RESOURCE, "created", &id, Some(&item));

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(item))))
}

/// PUT /api/menu-items/{id} - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    if let Some(name) = payload.name.as_deref() {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(price) = payload.price
        && price < 0.0
    {
        return Err(AppError::validation("price must not be negative"));
    }

    let item = menu_item::update(&state.pool, id, payload).await?;
    let id_str = id.to_string();

    state.broadcast_sync(RESOURCE, "updated", &id_str, Some(&item));

    Ok(Json(ApiResponse::ok(item)))
}

/// DELETE /api/menu-items/{id} - 下架菜品（软删除）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let result = menu_item::delete(&state.pool, id).await?;
    let id_str = id.to_string();

    if result {
        state.broadcast_sync::<()>(RESOURCE, "deleted", &id_str, None);
    }

    Ok(Json(ApiResponse::ok(result)))
}

/// PUT /api/menu-items/{id}/sessions - 重设菜品的场次关联
pub async fn set_sessions(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemSessions>,
) -> AppResult<Json<ApiResponse<Vec<i64>>>> {
    // Reject unknown items before touching the join table
    menu_item::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {id}")))?;

    let session_ids = menu_item::set_sessions(&state.pool, id, &payload.session_ids).await?;
    let id_str = id.to_string();

    state.broadcast_sync(RESOURCE, "updated", &id_str, Some(&session_ids));

    Ok(Json(ApiResponse::ok(session_ids)))
}
