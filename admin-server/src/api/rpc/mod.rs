//! Backend RPC 模块
//!
//! 两个简单的 request/response 函数：
//! - collection-exists: 集合是否存在
//! - offer-analytics: 批量优惠投放统计

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/rpc", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/collection-exists", get(handler::collection_exists))
        .route("/offer-analytics", post(handler::offer_analytics))
}
