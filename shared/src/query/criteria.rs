//! Filter criteria types
//!
//! The dashboard sends `"all"` for unrestricted categorical filters;
//! constructors normalize that sentinel to `None` so the filter functions
//! only ever see real constraints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{BookingStatus, PaymentStatus, SessionType, StaffStatus};

/// Normalize a categorical selection: `None` / `""` / `"all"` → `None`
pub fn normalize_choice(value: Option<&str>) -> Option<String> {
    match value {
        None => None,
        Some(v) if v.trim().is_empty() || v.trim().eq_ignore_ascii_case("all") => None,
        Some(v) => Some(v.trim().to_string()),
    }
}

/// Inclusive date-range bounds over `%Y-%m-%d` fields
///
/// An absent bound is unbounded on that side. An item whose date field
/// does not parse matches NO bounded range (it is excluded as soon as
/// either bound is set). Explicit behavior, covered by tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateBounds {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateBounds {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Both bounds absent: every item matches
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Check a raw `%Y-%m-%d` field against the bounds
    pub fn matches(&self, date_field: &str) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Ok(date) = NaiveDate::parse_from_str(date_field, "%Y-%m-%d") else {
            // Malformed dates match neither bound
            return false;
        };
        if let Some(from) = self.from
            && date < from
        {
            return false;
        }
        if let Some(to) = self.to
            && date > to
        {
            return false;
        }
        true
    }
}

/// Booking list criteria
#[derive(Debug, Clone, Default)]
pub struct BookingCriteria {
    /// Free-text term; empty means no search restriction
    pub search: String,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub session_id: Option<i64>,
    pub date: DateBounds,
}

impl BookingCriteria {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            ..Self::default()
        }
    }
}

/// Guest list criteria
///
/// `guest_type` filters on the derived segment, so the criteria carry the
/// reference date the derivation runs against.
#[derive(Debug, Clone)]
pub struct GuestCriteria {
    pub search: String,
    pub guest_type: Option<crate::models::GuestType>,
    pub franchise_id: Option<i64>,
    /// "today" for segment derivation
    pub reference_date: NaiveDate,
}

impl GuestCriteria {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            search: String::new(),
            guest_type: None,
            franchise_id: None,
            reference_date,
        }
    }
}

/// Staff list criteria
#[derive(Debug, Clone, Default)]
pub struct StaffCriteria {
    pub search: String,
    pub status: Option<StaffStatus>,
    pub department: Option<String>,
    pub franchise_id: Option<i64>,
}

/// Session list criteria
#[derive(Debug, Clone, Default)]
pub struct SessionCriteria {
    pub search: String,
    pub session_type: Option<SessionType>,
    pub franchise_id: Option<i64>,
    /// Some(true) = active only, Some(false) = deactivated only
    pub is_active: Option<bool>,
    pub date: DateBounds,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_choice_all_sentinel() {
        assert_eq!(normalize_choice(None), None);
        assert_eq!(normalize_choice(Some("all")), None);
        assert_eq!(normalize_choice(Some("ALL")), None);
        assert_eq!(normalize_choice(Some("  ")), None);
        assert_eq!(
            normalize_choice(Some("confirmed")),
            Some("confirmed".to_string())
        );
    }

    #[test]
    fn test_date_bounds_inclusive() {
        let bounds = DateBounds::new(
            NaiveDate::from_ymd_opt(2026, 8, 1),
            NaiveDate::from_ymd_opt(2026, 8, 31),
        );
        assert!(bounds.matches("2026-08-01"));
        assert!(bounds.matches("2026-08-31"));
        assert!(!bounds.matches("2026-07-31"));
        assert!(!bounds.matches("2026-09-01"));
    }

    #[test]
    fn test_date_bounds_half_open() {
        let from_only = DateBounds::new(NaiveDate::from_ymd_opt(2026, 8, 1), None);
        assert!(from_only.matches("2099-01-01"));
        assert!(!from_only.matches("2020-01-01"));
    }

    #[test]
    fn test_malformed_date_excluded_when_bounded() {
        let bounds = DateBounds::new(NaiveDate::from_ymd_opt(2026, 8, 1), None);
        assert!(!bounds.matches("not-a-date"));
        assert!(!bounds.matches("06/08/2026"));
        // ...but matches the unbounded range
        assert!(DateBounds::default().matches("not-a-date"));
    }
}
