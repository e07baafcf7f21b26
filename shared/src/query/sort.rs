//! Sort engine
//!
//! A closed set of typed comparators per entity. Unknown column names are
//! rejected with [`SortError::UnknownColumn`] rather than falling back to
//! untyped property comparison. `column = None` selects the default
//! ordering: date descending (newest first) for date-bearing collections,
//! name ascending otherwise.
//!
//! The underlying `slice::sort_by` is stable, so equal keys keep their
//! relative input order.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::models::{Booking, Guest, Session, Staff};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(&self, ord: Ordering) -> Ordering {
        match self {
            Self::Asc => ord,
            Self::Desc => ord.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(SortError::UnknownDirection(other.to_string())),
        }
    }
}

/// Sort errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    #[error("Unknown sort column: {0}")]
    UnknownColumn(String),
    #[error("Unknown sort direction: {0}")]
    UnknownDirection(String),
}

/// `%Y-%m-%d` parsed for ordering; malformed dates sort before all valid
/// ones (and therefore last in the default descending order)
fn date_key(field: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(field, "%Y-%m-%d").ok()
}

fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

// ==================== Bookings ====================

/// Sortable booking columns (camelCase wire names)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingSortColumn {
    BookingDate,
    GuestName,
    SessionName,
    Status,
    TotalAmount,
    Covers,
}

impl FromStr for BookingSortColumn {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bookingDate" => Ok(Self::BookingDate),
            "guestName" => Ok(Self::GuestName),
            "sessionName" => Ok(Self::SessionName),
            "status" => Ok(Self::Status),
            "totalAmount" => Ok(Self::TotalAmount),
            "covers" => Ok(Self::Covers),
            other => Err(SortError::UnknownColumn(other.to_string())),
        }
    }
}

/// Sort bookings by a named column, or by date descending when
/// `column` is `None` (the defined default, not an error case).
pub fn sort_bookings(
    items: &[Booking],
    column: Option<&str>,
    direction: SortDirection,
) -> Result<Vec<Booking>, SortError> {
    let mut out = items.to_vec();
    let Some(column) = column else {
        out.sort_by(|a, b| date_key(&b.booking_date).cmp(&date_key(&a.booking_date)));
        return Ok(out);
    };
    let column = BookingSortColumn::from_str(column)?;
    out.sort_by(|a, b| {
        let ord = match column {
            BookingSortColumn::BookingDate => {
                date_key(&a.booking_date).cmp(&date_key(&b.booking_date))
            }
            BookingSortColumn::GuestName => cmp_ci(&a.guest_name, &b.guest_name),
            BookingSortColumn::SessionName => cmp_ci(&a.session_name, &b.session_name),
            BookingSortColumn::Status => a.status.as_str().cmp(b.status.as_str()),
            BookingSortColumn::TotalAmount => a.total_amount.total_cmp(&b.total_amount),
            BookingSortColumn::Covers => a.covers().cmp(&b.covers()),
        };
        direction.apply(ord)
    });
    Ok(out)
}

// ==================== Sessions ====================

/// Sortable session columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSortColumn {
    Date,
    Name,
    StartTime,
    MaxCapacity,
    BookedCount,
}

impl FromStr for SessionSortColumn {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Self::Date),
            "name" => Ok(Self::Name),
            "startTime" => Ok(Self::StartTime),
            "maxCapacity" => Ok(Self::MaxCapacity),
            "bookedCount" => Ok(Self::BookedCount),
            other => Err(SortError::UnknownColumn(other.to_string())),
        }
    }
}

/// Sort sessions; default (None) is date descending, dateless recurring
/// sessions last.
pub fn sort_sessions(
    items: &[Session],
    column: Option<&str>,
    direction: SortDirection,
) -> Result<Vec<Session>, SortError> {
    let session_date = |s: &Session| s.date.as_deref().and_then(date_key);
    let mut out = items.to_vec();
    let Some(column) = column else {
        out.sort_by(|a, b| session_date(b).cmp(&session_date(a)));
        return Ok(out);
    };
    let column = SessionSortColumn::from_str(column)?;
    out.sort_by(|a, b| {
        let ord = match column {
            SessionSortColumn::Date => session_date(a).cmp(&session_date(b)),
            SessionSortColumn::Name => cmp_ci(&a.name, &b.name),
            SessionSortColumn::StartTime => a.start_time.cmp(&b.start_time),
            SessionSortColumn::MaxCapacity => a.max_capacity.cmp(&b.max_capacity),
            SessionSortColumn::BookedCount => a.booked_count.cmp(&b.booked_count),
        };
        direction.apply(ord)
    });
    Ok(out)
}

// ==================== Guests ====================

/// Sortable guest columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestSortColumn {
    Name,
    VisitCount,
    LoyaltyPoints,
    LastVisitDate,
}

impl FromStr for GuestSortColumn {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "visitCount" => Ok(Self::VisitCount),
            "loyaltyPoints" => Ok(Self::LoyaltyPoints),
            "lastVisitDate" => Ok(Self::LastVisitDate),
            other => Err(SortError::UnknownColumn(other.to_string())),
        }
    }
}

/// Sort guests; default (None) is name ascending.
pub fn sort_guests(
    items: &[Guest],
    column: Option<&str>,
    direction: SortDirection,
) -> Result<Vec<Guest>, SortError> {
    let mut out = items.to_vec();
    let Some(column) = column else {
        out.sort_by(|a, b| cmp_ci(&a.name, &b.name));
        return Ok(out);
    };
    let column = GuestSortColumn::from_str(column)?;
    out.sort_by(|a, b| {
        let ord = match column {
            GuestSortColumn::Name => cmp_ci(&a.name, &b.name),
            GuestSortColumn::VisitCount => a.visit_count.cmp(&b.visit_count),
            GuestSortColumn::LoyaltyPoints => a.loyalty_points.cmp(&b.loyalty_points),
            GuestSortColumn::LastVisitDate => {
                let key = |g: &Guest| g.last_visit_date.as_deref().and_then(date_key);
                key(a).cmp(&key(b))
            }
        };
        direction.apply(ord)
    });
    Ok(out)
}

// ==================== Staff ====================

/// Sortable staff columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffSortColumn {
    Name,
    Designation,
    Status,
}

impl FromStr for StaffSortColumn {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "designation" => Ok(Self::Designation),
            "status" => Ok(Self::Status),
            other => Err(SortError::UnknownColumn(other.to_string())),
        }
    }
}

/// Sort staff; default (None) is name ascending.
pub fn sort_staff(
    items: &[Staff],
    column: Option<&str>,
    direction: SortDirection,
) -> Result<Vec<Staff>, SortError> {
    let mut out = items.to_vec();
    let Some(column) = column else {
        out.sort_by(|a, b| cmp_ci(&a.name, &b.name));
        return Ok(out);
    };
    let column = StaffSortColumn::from_str(column)?;
    out.sort_by(|a, b| {
        let ord = match column {
            StaffSortColumn::Name => cmp_ci(&a.name, &b.name),
            StaffSortColumn::Designation => cmp_ci(&a.designation, &b.designation),
            StaffSortColumn::Status => a.status.as_str().cmp(b.status.as_str()),
        };
        direction.apply(ord)
    });
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, PaymentStatus};

    fn booking(id: &str, guest: &str, date: &str, amount: f64) -> Booking {
        Booking {
            id: id.to_string(),
            guest_name: guest.to_string(),
            guest_type: None,
            session_id: 1,
            session_name: "Dinner".to_string(),
            booking_date: date.to_string(),
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
            veg_count: 0,
            non_veg_count: 0,
            total_amount: amount,
            reminder_sent: false,
            reminder_count: 0,
            phone: None,
            email: None,
        }
    }

    #[test]
    fn test_default_sort_is_date_desc() {
        let items = vec![
            booking("BK-1", "A", "2026-08-04", 0.0),
            booking("BK-2", "B", "2026-08-06", 0.0),
            booking("BK-3", "C", "2026-08-05", 0.0),
        ];
        let out = sort_bookings(&items, None, SortDirection::Asc).unwrap();
        let ids: Vec<_> = out.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["BK-2", "BK-3", "BK-1"]);
    }

    #[test]
    fn test_default_sort_ties_preserve_input_order() {
        let items = vec![
            booking("BK-1", "A", "2026-08-06", 0.0),
            booking("BK-2", "B", "2026-08-06", 0.0),
            booking("BK-3", "C", "2026-08-06", 0.0),
        ];
        let out = sort_bookings(&items, None, SortDirection::Asc).unwrap();
        let ids: Vec<_> = out.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["BK-1", "BK-2", "BK-3"]);
    }

    #[test]
    fn test_asc_then_desc_reverses_unique_keys() {
        let items = vec![
            booking("BK-1", "Meera", "2026-08-04", 0.0),
            booking("BK-2", "Asha", "2026-08-06", 0.0),
            booking("BK-3", "Vikram", "2026-08-05", 0.0),
        ];
        let asc = sort_bookings(&items, Some("guestName"), SortDirection::Asc).unwrap();
        let desc = sort_bookings(&asc, Some("guestName"), SortDirection::Desc).unwrap();
        let asc_ids: Vec<_> = asc.iter().map(|b| b.id.as_str()).collect();
        let mut desc_ids: Vec<_> = desc.iter().map(|b| b.id.as_str()).collect();
        desc_ids.reverse();
        assert_eq!(asc_ids, desc_ids);
    }

    #[test]
    fn test_unknown_column_rejected() {
        let items = vec![booking("BK-1", "A", "2026-08-04", 0.0)];
        let err = sort_bookings(&items, Some("guest_name"), SortDirection::Asc).unwrap_err();
        assert_eq!(err, SortError::UnknownColumn("guest_name".to_string()));
    }

    #[test]
    fn test_numeric_column_sorts_as_number() {
        let items = vec![
            booking("BK-1", "A", "2026-08-04", 900.0),
            booking("BK-2", "B", "2026-08-04", 80.0),
            booking("BK-3", "C", "2026-08-04", 100.0),
        ];
        let out = sort_bookings(&items, Some("totalAmount"), SortDirection::Asc).unwrap();
        let ids: Vec<_> = out.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["BK-2", "BK-3", "BK-1"]);
    }

    #[test]
    fn test_malformed_date_sorts_last_in_default_order() {
        let items = vec![
            booking("BK-1", "A", "oops", 0.0),
            booking("BK-2", "B", "2026-08-06", 0.0),
        ];
        let out = sort_bookings(&items, None, SortDirection::Asc).unwrap();
        assert_eq!(out.last().unwrap().id, "BK-1");
    }
}
