//! Filter engine
//!
//! One pure function per entity. Criteria compose with logical AND; there
//! is deliberately no OR and no negation. Free-text search is a
//! case-insensitive substring match over a fixed per-entity field
//! whitelist; an empty term is the identity.

use crate::models::{Booking, Guest, Session, Staff};

use super::criteria::{BookingCriteria, GuestCriteria, SessionCriteria, StaffCriteria};

/// Case-insensitive substring match
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Search term normalized for matching; None when the term is empty
fn active_term(search: &str) -> Option<String> {
    let trimmed = search.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Filter bookings
///
/// Search whitelist: id, guest name, session name, status, email, phone.
pub fn filter_bookings(items: &[Booking], criteria: &BookingCriteria) -> Vec<Booking> {
    let term = active_term(&criteria.search);
    items
        .iter()
        .filter(|b| {
            if let Some(term) = &term {
                let hit = contains_ci(&b.id, term)
                    || contains_ci(&b.guest_name, term)
                    || contains_ci(&b.session_name, term)
                    || contains_ci(b.status.as_str(), term)
                    || b.email.as_deref().is_some_and(|e| contains_ci(e, term))
                    || b.phone.as_deref().is_some_and(|p| contains_ci(p, term));
                if !hit {
                    return false;
                }
            }
            if let Some(status) = criteria.status
                && b.status != status
            {
                return false;
            }
            if let Some(payment) = criteria.payment_status
                && b.payment_status != payment
            {
                return false;
            }
            if let Some(session_id) = criteria.session_id
                && b.session_id != session_id
            {
                return false;
            }
            criteria.date.matches(&b.booking_date)
        })
        .cloned()
        .collect()
}

/// Filter guests
///
/// Search whitelist: guest code, name, phone, email. The guest-type
/// filter runs against the segment derived at `criteria.reference_date`.
pub fn filter_guests(items: &[Guest], criteria: &GuestCriteria) -> Vec<Guest> {
    let term = active_term(&criteria.search);
    items
        .iter()
        .filter(|g| {
            if let Some(term) = &term {
                let hit = contains_ci(&g.guest_code, term)
                    || contains_ci(&g.name, term)
                    || g.phone.as_deref().is_some_and(|p| contains_ci(p, term))
                    || g.email.as_deref().is_some_and(|e| contains_ci(e, term));
                if !hit {
                    return false;
                }
            }
            if let Some(wanted) = criteria.guest_type
                && g.guest_type(criteria.reference_date) != wanted
            {
                return false;
            }
            if let Some(franchise_id) = criteria.franchise_id
                && g.franchise_id != franchise_id
            {
                return false;
            }
            true
        })
        .cloned()
        .collect()
}

/// Filter staff
///
/// Search whitelist: name, designation, department.
pub fn filter_staff(items: &[Staff], criteria: &StaffCriteria) -> Vec<Staff> {
    let term = active_term(&criteria.search);
    items
        .iter()
        .filter(|s| {
            if let Some(term) = &term {
                let hit = contains_ci(&s.name, term)
                    || contains_ci(&s.designation, term)
                    || s.department
                        .as_deref()
                        .is_some_and(|d| contains_ci(d, term));
                if !hit {
                    return false;
                }
            }
            if let Some(status) = criteria.status
                && s.status != status
            {
                return false;
            }
            if let Some(department) = &criteria.department
                && s.department.as_deref() != Some(department.as_str())
            {
                return false;
            }
            if let Some(franchise_id) = criteria.franchise_id
                && s.franchise_id != franchise_id
            {
                return false;
            }
            true
        })
        .cloned()
        .collect()
}

/// Filter sessions
///
/// Search whitelist: name, session type. Recurring sessions (no date)
/// match any date range; they occur inside every window.
pub fn filter_sessions(items: &[Session], criteria: &SessionCriteria) -> Vec<Session> {
    let term = active_term(&criteria.search);
    items
        .iter()
        .filter(|s| {
            if let Some(term) = &term {
                let hit =
                    contains_ci(&s.name, term) || contains_ci(s.session_type.as_str(), term);
                if !hit {
                    return false;
                }
            }
            if let Some(session_type) = criteria.session_type
                && s.session_type != session_type
            {
                return false;
            }
            if let Some(franchise_id) = criteria.franchise_id
                && s.franchise_id != franchise_id
            {
                return false;
            }
            if let Some(is_active) = criteria.is_active
                && s.is_active != is_active
            {
                return false;
            }
            match &s.date {
                Some(date) => criteria.date.matches(date),
                None => true,
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, PaymentStatus};
    use crate::query::criteria::DateBounds;
    use chrono::NaiveDate;

    fn booking(id: &str, guest: &str, date: &str, status: BookingStatus) -> Booking {
        Booking {
            id: id.to_string(),
            guest_name: guest.to_string(),
            guest_type: None,
            session_id: 1,
            session_name: "Dinner".to_string(),
            booking_date: date.to_string(),
            status,
            payment_status: PaymentStatus::Pending,
            veg_count: 2,
            non_veg_count: 0,
            total_amount: 0.0,
            reminder_sent: false,
            reminder_count: 0,
            phone: Some("+91-98000-11111".to_string()),
            email: Some("guest@example.in".to_string()),
        }
    }

    fn fixture() -> Vec<Booking> {
        vec![
            booking("BK-1", "Asha Rao", "2026-08-06", BookingStatus::Confirmed),
            booking("BK-2", "Vikram Shah", "2026-08-05", BookingStatus::Pending),
            booking("BK-3", "Meera Iyer", "2026-08-06", BookingStatus::Cancelled),
        ]
    }

    #[test]
    fn test_empty_search_is_identity() {
        let items = fixture();
        let out = filter_bookings(&items, &BookingCriteria::default());
        assert_eq!(out.len(), items.len());
        for (a, b) in items.iter().zip(out.iter()) {
            assert_eq!(a.id, b.id);
        }
    }

    #[test]
    fn test_search_matches_whitelisted_fields_only() {
        let items = fixture();
        // Guest name, case-insensitive
        let out = filter_bookings(&items, &BookingCriteria::search("asha"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "BK-1");
        // Booking id
        let out = filter_bookings(&items, &BookingCriteria::search("bk-2"));
        assert_eq!(out.len(), 1);
        // Status text
        let out = filter_bookings(&items, &BookingCriteria::search("cancel"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "BK-3");
        // No hit
        let out = filter_bookings(&items, &BookingCriteria::search("zzz"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_criteria_compose_with_and() {
        let items = fixture();
        let criteria = BookingCriteria {
            search: String::new(),
            status: Some(BookingStatus::Confirmed),
            payment_status: None,
            session_id: None,
            date: DateBounds::new(
                NaiveDate::from_ymd_opt(2026, 8, 6),
                NaiveDate::from_ymd_opt(2026, 8, 6),
            ),
        };
        let out = filter_bookings(&items, &criteria);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "BK-1");
    }

    #[test]
    fn test_malformed_booking_date_excluded_when_range_set() {
        let mut items = fixture();
        items[0].booking_date = "garbage".to_string();
        let criteria = BookingCriteria {
            date: DateBounds::new(NaiveDate::from_ymd_opt(2020, 1, 1), None),
            ..Default::default()
        };
        let out = filter_bookings(&items, &criteria);
        assert!(out.iter().all(|b| b.id != "BK-1"));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_input_not_mutated() {
        let items = fixture();
        let before = items.clone();
        let _ = filter_bookings(&items, &BookingCriteria::search("asha"));
        for (a, b) in items.iter().zip(before.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.status, b.status);
        }
    }

    #[test]
    fn test_guest_type_filter_uses_derived_segment() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let guests = vec![
            Guest {
                id: 1,
                guest_code: "G-0001".to_string(),
                franchise_id: 1,
                name: "Ravi".to_string(),
                phone: None,
                email: None,
                visit_count: 12,
                loyalty_points: 900,
                preferences: vec![],
                upcoming_bookings: 1,
                last_visit_date: Some("2026-08-01".to_string()),
                is_active: true,
                created_at: 0,
                updated_at: 0,
            },
            Guest {
                id: 2,
                guest_code: "G-0002".to_string(),
                franchise_id: 1,
                name: "Divya".to_string(),
                phone: None,
                email: None,
                visit_count: 0,
                loyalty_points: 0,
                preferences: vec![],
                upcoming_bookings: 0,
                last_visit_date: None,
                is_active: true,
                created_at: 0,
                updated_at: 0,
            },
        ];
        let criteria = GuestCriteria {
            guest_type: Some(crate::models::GuestType::Vip),
            ..GuestCriteria::new(today)
        };
        let out = filter_guests(&guests, &criteria);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
    }
}
