use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== Notification Level ====================

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// 普通信息
    Info,
    /// 警告
    Warning,
    /// 错误
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// 用户可见通知 (对应前端 toast)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl NotificationPayload {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }
}

// ==================== Sync ====================

/// 资源变更同步信号
///
/// 服务端每次成功变更后广播；只携带"变了什么"的元信息，
/// 客户端收到后按集合全量重取，不做增量合并。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    /// 资源类型 ("sessions", "guests", "offers", ...)
    pub resource: String,
    /// 单调递增版本号 (ResourceVersions 管理)
    pub version: u64,
    /// 变更类型 ("created", "updated", "deleted", "deactivated")
    pub action: String,
    /// 资源 ID
    pub id: String,
    /// 变更后的资源数据 (deleted 时为 None)
    pub data: Option<serde_json::Value>,
}
