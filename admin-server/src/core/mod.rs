//! 核心模块
//!
//! - [`Config`] - 环境变量配置
//! - [`ServerState`] - 服务状态与 broadcast_sync
//! - [`Server`] - HTTP 服务器生命周期

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::{Server, build_app, build_router};
pub use state::{ResourceVersions, ServerState};
