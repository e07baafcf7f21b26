use std::sync::Arc;

use dashmap::DashMap;
use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::services::MessageBusService;
use crate::utils::AppError;
use shared::message::{BusMessage, SyncPayload};

/// 资源版本管理器
///
/// 使用 DashMap 实现无锁并发的版本号管理。
/// 每种资源类型维护独立的版本号，支持原子递增。
///
/// broadcast_sync 时自动生成递增的版本号，
/// 客户端可以通过版本号判断数据新旧。
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    /// 创建空的版本管理器
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// 递增指定资源的版本号并返回新值
    ///
    /// 如果资源不存在，从 0 开始递增（返回 1）
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 获取指定资源的当前版本号
    ///
    /// 如果资源不存在，返回 0
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }

    /// 所有资源的版本快照 (sync status 接口)
    pub fn snapshot(&self) -> std::collections::HashMap<String, u64> {
        self.versions
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect()
    }
}

/// 服务器状态 - 持有所有服务的共享引用
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | message_bus | MessageBusService | 消息总线服务 |
/// | resource_versions | Arc<ResourceVersions> | 资源版本管理 |
/// | epoch | Arc<str> | 实例 epoch (启动时生成) |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 消息总线服务
    pub message_bus: MessageBusService,
    /// 资源版本管理器
    pub resource_versions: Arc<ResourceVersions>,
    /// 实例 epoch，客户端据此检测服务器重启
    pub epoch: Arc<str>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/saffron.db)
    /// 3. 消息总线
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("saffron.db");
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self::with_pool(config.clone(), db.pool))
    }

    /// 以现有连接池构造 (测试用)
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        Self {
            message_bus: MessageBusService::new(config.bus_capacity),
            config,
            pool,
            resource_versions: Arc::new(ResourceVersions::new()),
            epoch: uuid::Uuid::new_v4().to_string().into(),
        }
    }

    /// 业务时区的今天
    pub fn business_today(&self) -> chrono::NaiveDate {
        crate::utils::time::business_today(self.config.business_timezone)
    }

    /// 广播同步消息
    ///
    /// 向所有连接的客户端广播资源变更通知。
    /// 版本号由 ResourceVersions 自动递增管理。
    ///
    /// # 参数
    /// - `resource`: 资源类型 (如 "sessions", "guests", "offers")
    /// - `action`: 变更类型 ("created", "updated", "deleted", "deactivated")
    /// - `id`: 资源 ID
    /// - `data`: 资源数据 (deleted 时为 None)
    pub fn broadcast_sync<T: serde::Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) {
        let version = self.resource_versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        self.message_bus.publish(BusMessage::sync(&payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_versions_increment() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("sessions"), 0);
        assert_eq!(versions.increment("sessions"), 1);
        assert_eq!(versions.increment("sessions"), 2);
        assert_eq!(versions.increment("guests"), 1);
        assert_eq!(versions.get("sessions"), 2);
        let snap = versions.snapshot();
        assert_eq!(snap["sessions"], 2);
        assert_eq!(snap["guests"], 1);
    }
}
