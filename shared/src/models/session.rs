//! Dining Session Model (餐段管理)
//!
//! A session is one bookable service window (lunch, dinner, a special
//! event). Recurring sessions carry a recurrence type instead of a fixed
//! date. Sessions are soft-deactivated with a reason, never hard-deleted.

use serde::{Deserialize, Serialize};

/// Session type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum SessionType {
    Breakfast,
    Brunch,
    Lunch,
    HighTea,
    Dinner,
    SpecialEvent,
}

impl SessionType {
    /// Lowercase wire name, as used by categorical filters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Brunch => "brunch",
            Self::Lunch => "lunch",
            Self::HighTea => "high_tea",
            Self::Dinner => "dinner",
            Self::SpecialEvent => "special_event",
        }
    }
}

/// Recurrence type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum RecurrenceType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

/// Session entity
///
/// Invariant note: `booked_count <= max_capacity` is NOT enforced here or
/// at the data-entry boundary. Overbooking is accepted as observed business
/// behavior pending product confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Session {
    pub id: i64,
    pub franchise_id: i64,
    pub name: String,
    pub session_type: SessionType,
    /// Calendar date (YYYY-MM-DD); None for recurring sessions
    pub date: Option<String>,
    /// Start time (HH:MM)
    pub start_time: String,
    /// End time (HH:MM)
    pub end_time: Option<String>,
    pub duration_minutes: Option<i64>,
    pub max_capacity: i64,
    pub booked_count: i64,
    pub is_active: bool,
    /// Required when deactivating; None while active
    pub deactivation_reason: Option<String>,

    // -- Special-date fields (only set for special_event sessions) --
    pub special_name: Option<String>,
    pub special_pricing: Option<f64>,
    #[cfg_attr(feature = "db", sqlx(json(nullable)))]
    #[serde(default)]
    pub special_addons: Option<Vec<String>>,
    pub special_conditions: Option<String>,

    #[serde(default)]
    pub recurrence_type: RecurrenceType,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create session payload
///
/// `name`, `session_type` and (for non-recurring sessions) `date` +
/// `start_time` are required; the handler rejects before any DB write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreate {
    pub franchise_id: i64,
    pub name: String,
    pub session_type: SessionType,
    pub date: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub duration_minutes: Option<i64>,
    #[serde(default = "default_capacity")]
    pub max_capacity: i64,
    pub special_name: Option<String>,
    pub special_pricing: Option<f64>,
    pub special_addons: Option<Vec<String>>,
    pub special_conditions: Option<String>,
    #[serde(default)]
    pub recurrence_type: RecurrenceType,
}

fn default_capacity() -> i64 {
    50
}

/// Update session payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    pub name: Option<String>,
    pub session_type: Option<SessionType>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration_minutes: Option<i64>,
    pub max_capacity: Option<i64>,
    pub booked_count: Option<i64>,
    pub special_name: Option<String>,
    pub special_pricing: Option<f64>,
    pub special_addons: Option<Vec<String>>,
    pub special_conditions: Option<String>,
    pub recurrence_type: Option<RecurrenceType>,
}

/// Soft-deactivate payload (PATCH /api/sessions/{id}/deactivate)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDeactivate {
    /// Non-empty reason is required
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_serializes_camel_case() {
        let session = Session {
            id: 1,
            franchise_id: 2,
            name: "Weekend Dinner".to_string(),
            session_type: SessionType::Dinner,
            date: Some("2026-08-01".to_string()),
            start_time: "19:00".to_string(),
            end_time: Some("22:30".to_string()),
            duration_minutes: Some(210),
            max_capacity: 80,
            booked_count: 12,
            is_active: true,
            deactivation_reason: None,
            special_name: None,
            special_pricing: None,
            special_addons: None,
            special_conditions: None,
            recurrence_type: RecurrenceType::Weekly,
            created_at: 0,
            updated_at: 0,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["sessionType"], "dinner");
        assert_eq!(json["maxCapacity"], 80);
        assert_eq!(json["recurrenceType"], "weekly");
        assert!(json.get("session_type").is_none());
    }

    #[test]
    fn test_create_defaults_apply_on_missing_fields() {
        // Missing optionals must not fail deserialization
        let payload: SessionCreate = serde_json::from_str(
            r#"{"franchiseId": 7, "name": "Lunch", "sessionType": "lunch", "startTime": "12:00"}"#,
        )
        .unwrap();
        assert_eq!(payload.max_capacity, 50);
        assert_eq!(payload.recurrence_type, RecurrenceType::None);
        assert!(payload.date.is_none());
    }
}
