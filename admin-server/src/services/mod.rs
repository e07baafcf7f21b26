//! 服务模块
//!
//! - [`MessageBusService`] - 进程内广播消息总线

pub mod message_bus;

pub use message_bus::MessageBusService;
