//! Saffron Admin Server - 连锁餐饮运营管理后台
//!
//! # 架构概述
//!
//! 本模块是管理后台的主入口，提供以下核心功能：
//!
//! - **HTTP API** (`api`): RESTful CRUD + RPC 接口，统一响应信封
//! - **数据库** (`db`): 嵌入式 SQLite 存储 (sqlx, WAL)
//! - **消息总线** (`services/message_bus`): 资源变更广播
//! - **资源版本** (`core/state`): broadcast_sync 版本递增
//!
//! # 模块结构
//!
//! ```text
//! admin-server/src/
//! ├── core/          # 配置、状态、服务器生命周期
//! ├── services/      # 消息总线
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 错误、日志、时间、校验
//! └── db/            # 数据库层 (查询构造 + repository)
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState, build_app, build_router};
pub use crate::services::MessageBusService;
pub use crate::utils::{AppError, AppResult};
pub use shared::message::{BusMessage, EventType};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    let log_dir = config.log_dir();
    init_logger_with_file(Some(&config.log_level), log_dir.to_str());
}
