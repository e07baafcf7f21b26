//! Staff Model (员工管理)

use serde::{Deserialize, Serialize};

/// Staff status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum StaffStatus {
    #[default]
    Active,
    Inactive,
    OnLeave,
    Training,
}

impl StaffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::OnLeave => "on_leave",
            Self::Training => "training",
        }
    }
}

/// Staff entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Staff {
    pub id: i64,
    pub franchise_id: i64,
    pub name: String,
    pub designation: String,
    pub department: Option<String>,
    /// Dashboard access level ("admin", "manager", "viewer")
    pub access_level: String,
    #[serde(default)]
    pub status: StaffStatus,
    pub has_telegram_access: bool,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create staff payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffCreate {
    pub franchise_id: i64,
    pub name: String,
    pub designation: String,
    pub department: Option<String>,
    #[serde(default = "default_access_level")]
    pub access_level: String,
    #[serde(default)]
    pub status: StaffStatus,
    #[serde(default)]
    pub has_telegram_access: bool,
    pub phone: Option<String>,
    pub email: Option<String>,
}

fn default_access_level() -> String {
    "viewer".to_string()
}

/// Update staff payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub access_level: Option<String>,
    pub status: Option<StaffStatus>,
    pub has_telegram_access: Option<bool>,
    pub phone: Option<String>,
    pub email: Option<String>,
}
