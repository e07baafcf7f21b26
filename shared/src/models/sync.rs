//! Sync Status Model
//!
//! Served by `GET /api/sync/status`; a reconnecting client compares the
//! epoch and per-resource versions against what it last saw to decide
//! which collections to refetch.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of the server's sync state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Server instance epoch (UUID minted at startup).
    /// A changed epoch means the server restarted and all versions reset.
    pub epoch: String,
    /// Current version per resource type ("sessions" → 42)
    pub versions: HashMap<String, u64>,
}
