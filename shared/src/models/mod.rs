//! Data models
//!
//! Shared between admin-server and clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (snowflake-style), except Booking IDs which are
//! caller-supplied display strings owned by the local booking store.
//!
//! Column names are snake_case (SQLite); the serialized view model is
//! camelCase. The serde/FromRow derives on each struct are that
//! normalization boundary: optional columns default when absent, and
//! conversion is pure in both directions.

pub mod booking;
pub mod franchise;
pub mod guest;
pub mod menu_item;
pub mod offer;
pub mod session;
pub mod staff;
pub mod sync;

// Re-exports
pub use booking::*;
pub use franchise::*;
pub use guest::*;
pub use menu_item::*;
pub use offer::*;
pub use session::*;
pub use staff::*;
pub use sync::*;
