//! Sync API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::SyncStatus;
use shared::response::ApiResponse;

/// GET /api/sync/status - 资源版本快照
///
/// 客户端重连后比较 epoch 与各资源版本，决定哪些集合需要重取。
pub async fn status(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<SyncStatus>>> {
    let status = SyncStatus {
        epoch: state.epoch.to_string(),
        versions: state.resource_versions.snapshot(),
    };
    Ok(Json(ApiResponse::ok(status)))
}
