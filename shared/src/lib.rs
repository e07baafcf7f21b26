//! Shared types for the Saffron franchise operations platform
//!
//! Common types used across the admin server and client crates:
//! entity models, message bus types, response envelopes, and the
//! pure filter/sort/report engines consumed on both sides.

pub mod message;
pub mod models;
pub mod query;
pub mod report;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Message bus re-exports (for convenient access)
pub use message::{BusMessage, EventType};
