//! Franchise Model
//!
//! Every other entity belongs to exactly one franchise (franchise_id
//! foreign key). There are no cross-entity cycles.

use serde::{Deserialize, Serialize};

/// Franchise entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Franchise {
    pub id: i64,
    pub name: String,
    /// Short display code ("SFR-BLR-01")
    pub code: String,
    pub city: Option<String>,
    /// IANA timezone name used for business-date boundaries
    pub timezone: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create franchise payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FranchiseCreate {
    pub name: String,
    pub code: String,
    pub city: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

/// Update franchise payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FranchiseUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
    pub city: Option<String>,
    pub timezone: Option<String>,
    pub is_active: Option<bool>,
}
