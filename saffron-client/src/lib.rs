//! Saffron Client - dashboard data layer for the admin server
//!
//! Provides the pieces the operations dashboard builds on:
//! - [`HttpClient`] - typed REST calls against the admin server API
//! - [`sync`] - real-time sync client (change signal → full refetch)
//! - [`store`] - local persisted mock booking store
//! - [`reports`] - report generation service with a capped history log

pub mod config;
pub mod error;
pub mod http;
pub mod reports;
pub mod store;
pub mod sync;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use reports::ReportService;
pub use store::BookingStore;
pub use sync::{CollectionFetcher, HttpCollectionFetcher, SyncState, SyncSubscription};

// Re-export shared types for convenience
pub use shared::message::{BusMessage, EventType, NotificationPayload, SyncPayload};
pub use shared::models;
pub use shared::query;
pub use shared::report;
