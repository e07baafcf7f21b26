//! 消息总线消息类型定义
//!
//! 这些类型在 admin-server 和 clients 之间共享，用于进程内广播通信。
//! 服务端在每次资源变更后发布 Sync 消息；客户端据此触发全量重取。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

pub mod payload;
pub use payload::*;

/// 协议版本号
pub const PROTOCOL_VERSION: u16 = 1;

/// 消息总线事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// 系统通知
    Notification = 0,
    /// 同步信号 (资源变更)
    Sync = 1,
}

impl TryFrom<u8> for EventType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventType::Notification),
            1 => Ok(EventType::Sync),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Notification => write!(f, "notification"),
            EventType::Sync => write!(f, "sync"),
        }
    }
}

/// 消息总线消息体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub request_id: Uuid,
    pub event_type: EventType,
    /// 发布者标识 (可选)
    pub source: Option<String>,
    /// 目标客户端 (None = 广播)
    pub target: Option<String>,
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(event_type: EventType, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            event_type,
            source: None,
            target: None,
            payload,
        }
    }

    /// 设置目标客户端
    pub fn with_target(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());
        self
    }

    /// 创建同步消息
    ///
    /// # Panics
    ///
    /// `SyncPayload` 序列化不会失败；失败即为编程错误。
    pub fn sync(payload: &SyncPayload) -> Self {
        Self::new(
            EventType::Sync,
            serde_json::to_vec(payload).expect("Failed to serialize sync payload"),
        )
    }

    /// 创建通知消息
    pub fn notification(payload: &NotificationPayload) -> Self {
        Self::new(
            EventType::Notification,
            serde_json::to_vec(payload).expect("Failed to serialize notification payload"),
        )
    }

    /// 解析 payload 为具体类型
    pub fn decode_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_message_round_trip() {
        let payload = SyncPayload {
            resource: "sessions".to_string(),
            version: 3,
            action: "updated".to_string(),
            id: "42".to_string(),
            data: None,
        };
        let msg = BusMessage::sync(&payload);
        assert_eq!(msg.event_type, EventType::Sync);
        let decoded: SyncPayload = msg.decode_payload().unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_event_type_from_u8() {
        assert_eq!(EventType::try_from(1u8), Ok(EventType::Sync));
        assert!(EventType::try_from(9u8).is_err());
    }
}
