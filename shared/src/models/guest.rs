//! Guest Model (客户档案)
//!
//! The guest segment (`GuestType`) is derived from visit history at read
//! time, never stored: there are no persisted segment transitions.

use serde::{Deserialize, Serialize};

/// Derived guest segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuestType {
    New,
    Regular,
    #[serde(rename = "VIP")]
    Vip,
    #[serde(rename = "High Potential")]
    HighPotential,
    Inactive,
}

impl GuestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Regular => "Regular",
            Self::Vip => "VIP",
            Self::HighPotential => "High Potential",
            Self::Inactive => "Inactive",
        }
    }
}

/// Guest entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Guest {
    pub id: i64,
    /// Display code shown in the dashboard ("G-0001")
    pub guest_code: String,
    pub franchise_id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub visit_count: i64,
    pub loyalty_points: i64,
    #[cfg_attr(feature = "db", sqlx(json))]
    #[serde(default)]
    pub preferences: Vec<String>,
    pub upcoming_bookings: i64,
    /// Last completed visit (YYYY-MM-DD)
    pub last_visit_date: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Guest {
    /// Derive the guest segment from visit history.
    ///
    /// Thresholds:
    /// - 0 visits, or no recorded visit yet → New
    /// - 10+ visits → VIP
    /// - last visit more than 180 days before `today` → Inactive
    /// - 3..=9 visits → Regular
    /// - 1..=2 visits within the window → High Potential
    pub fn guest_type(&self, today: chrono::NaiveDate) -> GuestType {
        if self.visit_count == 0 {
            return GuestType::New;
        }
        if self.visit_count >= 10 {
            return GuestType::Vip;
        }
        let lapsed = self
            .last_visit_date
            .as_deref()
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(|d| (today - d).num_days() > 180)
            // No parseable last visit but visits on record: treat as lapsed
            .unwrap_or(true);
        if lapsed {
            return GuestType::Inactive;
        }
        if self.visit_count >= 3 {
            GuestType::Regular
        } else {
            GuestType::HighPotential
        }
    }
}

/// Create guest payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestCreate {
    pub franchise_id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
}

/// Update guest payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GuestUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub preferences: Option<Vec<String>>,
    pub upcoming_bookings: Option<i64>,
    pub is_active: Option<bool>,
}
