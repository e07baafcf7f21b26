//! 消息总线服务
//!
//! 封装 tokio broadcast channel，向所有已连接客户端推送
//! 资源变更 (Sync) 与通知 (Notification) 消息。
//!
//! 广播通道语义：慢消费者 lag 时丢弃最旧消息而不是阻塞发布方；
//! 同步客户端把任何收到的变更信号当作"需要全量重取"，因此丢失
//! 个别消息不影响最终一致。

use shared::message::BusMessage;
use tokio::sync::broadcast;

/// 消息总线服务
#[derive(Clone, Debug)]
pub struct MessageBusService {
    sender: broadcast::Sender<BusMessage>,
}

impl MessageBusService {
    /// 创建消息总线服务
    pub fn new(channel_capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(channel_capacity);
        Self { sender }
    }

    /// 发布消息；没有订阅者时静默丢弃
    pub fn publish(&self, message: BusMessage) {
        let receivers = self.sender.receiver_count();
        if receivers == 0 {
            tracing::trace!(event = %message.event_type, "No subscribers, dropping bus message");
            return;
        }
        // send 仅在无接收者时失败，上面已检查；竞态下的失败可忽略
        let _ = self.sender.send(message);
    }

    /// 订阅消息流
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.sender.subscribe()
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for MessageBusService {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::{EventType, SyncPayload};

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = MessageBusService::new(16);
        let mut rx = bus.subscribe();

        let payload = SyncPayload {
            resource: "sessions".to_string(),
            version: 1,
            action: "created".to_string(),
            id: "1".to_string(),
            data: None,
        };
        bus.publish(BusMessage::sync(&payload));

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.event_type, EventType::Sync);
        let decoded: SyncPayload = msg.decode_payload().unwrap();
        assert_eq!(decoded.resource, "sessions");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let bus = MessageBusService::new(16);
        let payload = SyncPayload {
            resource: "sessions".to_string(),
            version: 1,
            action: "created".to_string(),
            id: "1".to_string(),
            data: None,
        };
        // Must not panic or error
        bus.publish(BusMessage::sync(&payload));
        assert_eq!(bus.subscriber_count(), 0);
    }
}
