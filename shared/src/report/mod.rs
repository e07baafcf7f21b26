//! Report engine
//!
//! Pure aggregation over booking/session slices. Each report type is one
//! arm of a closed dispatch; date ranges are named presets resolved
//! against a supplied "today" (so generation is deterministic and
//! testable), or explicit custom bounds.
//!
//! Persistence of the history log lives in the client's report service;
//! this module only defines the entry shape and the cap policy.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Booking, BookingStatus, Session};
use crate::query::criteria::DateBounds;

/// History log cap: oldest entries drop first once exceeded
pub const MAX_REPORT_HISTORY: usize = 50;

/// Report type: a closed enumeration, one aggregation per variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Sales,
    Bookings,
    Occupancy,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Bookings => "bookings",
            Self::Occupancy => "occupancy",
        }
    }
}

impl FromStr for ReportType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales" => Ok(Self::Sales),
            "bookings" => Ok(Self::Bookings),
            "occupancy" => Ok(Self::Occupancy),
            other => Err(ReportError::UnknownReportType(other.to_string())),
        }
    }
}

/// Report errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("Unknown report type: {0}")]
    UnknownReportType(String),
    #[error("Unknown date range preset: {0}")]
    UnknownPreset(String),
    #[error("Custom range requires startDate and endDate")]
    MissingCustomBounds,
}

/// Date range selection: a named preset, or explicit custom bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    /// Just today
    Today,
    /// The trailing 7 days including today
    Week,
    /// The trailing 30 days including today
    Month,
    /// Explicit inclusive bounds
    Custom { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    /// Parse the wire form: preset name, or "custom" with explicit bounds
    pub fn parse(
        range: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, ReportError> {
        match range {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "custom" => match (start, end) {
                (Some(start), Some(end)) => Ok(Self::Custom { start, end }),
                _ => Err(ReportError::MissingCustomBounds),
            },
            other => Err(ReportError::UnknownPreset(other.to_string())),
        }
    }

    /// Resolve to concrete inclusive bounds at call time
    pub fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Today => (today, today),
            Self::Week => (today - Duration::days(6), today),
            Self::Month => (today - Duration::days(29), today),
            Self::Custom { start, end } => (*start, *end),
        }
    }

    /// Label used in history entries ("today", "2026-08-01..2026-08-06")
    pub fn label(&self) -> String {
        match self {
            Self::Today => "today".to_string(),
            Self::Week => "week".to_string(),
            Self::Month => "month".to_string(),
            Self::Custom { start, end } => format!("{start}..{end}"),
        }
    }
}

/// Report request
#[derive(Debug, Clone)]
pub struct ReportFilters {
    pub report_type: ReportType,
    pub range: DateRange,
    pub franchise_id: Option<i64>,
}

/// Per-day sales aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRow {
    pub date: String,
    /// Revenue over non-cancelled bookings
    pub revenue: f64,
    pub bookings: i64,
}

/// Per-day bookings aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsRow {
    pub date: String,
    pub total: i64,
    pub confirmed: i64,
    pub cancelled: i64,
    pub covers: i64,
}

/// Per-session occupancy aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyRow {
    pub session_id: i64,
    pub session_name: String,
    pub booked_count: i64,
    pub max_capacity: i64,
    /// booked / capacity in percent; 0 for zero-capacity sessions
    pub occupancy_pct: f64,
}

/// Generated rows, shaped per report type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportRows {
    Sales(Vec<SalesRow>),
    Bookings(Vec<BookingsRow>),
    Occupancy(Vec<OccupancyRow>),
}

impl ReportRows {
    pub fn len(&self) -> usize {
        match self {
            Self::Sales(rows) => rows.len(),
            Self::Bookings(rows) => rows.len(),
            Self::Occupancy(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A generated report with its resolved bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReport {
    pub report_type: ReportType,
    pub start_date: String,
    pub end_date: String,
    pub rows: ReportRows,
}

/// Generate a report over the supplied record sets.
///
/// Bookings with malformed dates fall outside every bounded range and are
/// never aggregated (same rule as the filter engine). Recurring sessions
/// (no date) always count for occupancy.
pub fn generate(
    filters: &ReportFilters,
    bookings: &[Booking],
    sessions: &[Session],
    today: NaiveDate,
) -> GeneratedReport {
    let (start, end) = filters.range.resolve(today);
    let bounds = DateBounds::new(Some(start), Some(end));

    let in_range: Vec<&Booking> = bookings
        .iter()
        .filter(|b| bounds.matches(&b.booking_date))
        .collect();

    let rows = match filters.report_type {
        ReportType::Sales => ReportRows::Sales(sales_rows(&in_range)),
        ReportType::Bookings => ReportRows::Bookings(bookings_rows(&in_range)),
        ReportType::Occupancy => {
            ReportRows::Occupancy(occupancy_rows(sessions, &bounds, filters.franchise_id))
        }
    };

    GeneratedReport {
        report_type: filters.report_type,
        start_date: start.format("%Y-%m-%d").to_string(),
        end_date: end.format("%Y-%m-%d").to_string(),
        rows,
    }
}

fn sales_rows(bookings: &[&Booking]) -> Vec<SalesRow> {
    let mut by_day: BTreeMap<String, SalesRow> = BTreeMap::new();
    for booking in bookings {
        if booking.status == BookingStatus::Cancelled {
            continue;
        }
        let row = by_day
            .entry(booking.booking_date.clone())
            .or_insert_with(|| SalesRow {
                date: booking.booking_date.clone(),
                revenue: 0.0,
                bookings: 0,
            });
        row.revenue += booking.total_amount;
        row.bookings += 1;
    }
    by_day.into_values().collect()
}

fn bookings_rows(bookings: &[&Booking]) -> Vec<BookingsRow> {
    let mut by_day: BTreeMap<String, BookingsRow> = BTreeMap::new();
    for booking in bookings {
        let row = by_day
            .entry(booking.booking_date.clone())
            .or_insert_with(|| BookingsRow {
                date: booking.booking_date.clone(),
                total: 0,
                confirmed: 0,
                cancelled: 0,
                covers: 0,
            });
        row.total += 1;
        match booking.status {
            BookingStatus::Confirmed => row.confirmed += 1,
            BookingStatus::Cancelled => row.cancelled += 1,
            BookingStatus::Pending => {}
        }
        row.covers += booking.covers();
    }
    by_day.into_values().collect()
}

fn occupancy_rows(
    sessions: &[Session],
    bounds: &DateBounds,
    franchise_id: Option<i64>,
) -> Vec<OccupancyRow> {
    sessions
        .iter()
        .filter(|s| s.is_active)
        .filter(|s| franchise_id.is_none_or(|id| s.franchise_id == id))
        .filter(|s| match &s.date {
            Some(date) => bounds.matches(date),
            None => true,
        })
        .map(|s| OccupancyRow {
            session_id: s.id,
            session_name: s.name.clone(),
            booked_count: s.booked_count,
            max_capacity: s.max_capacity,
            occupancy_pct: if s.max_capacity > 0 {
                (s.booked_count as f64 / s.max_capacity as f64) * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

// ==================== Export ====================

/// Export target format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Convert already-generated rows into the target format.
///
/// Pure formatting; no new aggregation happens here.
pub fn export(report: &GeneratedReport, format: ExportFormat) -> String {
    match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
        }
        ExportFormat::Csv => export_csv(report),
    }
}

fn export_csv(report: &GeneratedReport) -> String {
    let mut lines = Vec::new();
    match &report.rows {
        ReportRows::Sales(rows) => {
            lines.push("date,revenue,bookings".to_string());
            for r in rows {
                lines.push(format!("{},{:.2},{}", r.date, r.revenue, r.bookings));
            }
        }
        ReportRows::Bookings(rows) => {
            lines.push("date,total,confirmed,cancelled,covers".to_string());
            for r in rows {
                lines.push(format!(
                    "{},{},{},{},{}",
                    r.date, r.total, r.confirmed, r.cancelled, r.covers
                ));
            }
        }
        ReportRows::Occupancy(rows) => {
            lines.push("session_id,session_name,booked,capacity,occupancy_pct".to_string());
            for r in rows {
                lines.push(format!(
                    "{},{},{},{},{:.1}",
                    r.session_id, r.session_name, r.booked_count, r.max_capacity, r.occupancy_pct
                ));
            }
        }
    }
    lines.join("\n")
}

// ==================== History ====================

/// What a history entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportAction {
    Generated,
    Exported,
}

/// One line of the report-history log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHistoryEntry {
    pub report_type: ReportType,
    pub range_label: String,
    pub action: ReportAction,
    pub row_count: i64,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentStatus;

    fn booking(id: &str, date: &str, status: BookingStatus, amount: f64) -> Booking {
        Booking {
            id: id.to_string(),
            guest_name: "Guest".to_string(),
            guest_type: None,
            session_id: 1,
            session_name: "Dinner".to_string(),
            booking_date: date.to_string(),
            status,
            payment_status: PaymentStatus::Paid,
            veg_count: 2,
            non_veg_count: 1,
            total_amount: amount,
            reminder_sent: false,
            reminder_count: 0,
            phone: None,
            email: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    /// Fixture from the dashboard acceptance scenario: 5 bookings,
    /// 3 today and 2 yesterday.
    fn fixture() -> Vec<Booking> {
        vec![
            booking("BK-1", "2026-08-06", BookingStatus::Confirmed, 1200.0),
            booking("BK-2", "2026-08-06", BookingStatus::Pending, 800.0),
            booking("BK-3", "2026-08-06", BookingStatus::Cancelled, 500.0),
            booking("BK-4", "2026-08-05", BookingStatus::Confirmed, 950.0),
            booking("BK-5", "2026-08-05", BookingStatus::Confirmed, 700.0),
        ]
    }

    #[test]
    fn test_bookings_today_counts_only_today() {
        let filters = ReportFilters {
            report_type: ReportType::Bookings,
            range: DateRange::Today,
            franchise_id: None,
        };
        let report = generate(&filters, &fixture(), &[], today());
        let ReportRows::Bookings(rows) = &report.rows else {
            panic!("expected bookings rows");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "2026-08-06");
        assert_eq!(rows[0].total, 3);
        assert_eq!(rows[0].confirmed, 1);
        assert_eq!(rows[0].cancelled, 1);
        assert_eq!(rows[0].covers, 9);
    }

    #[test]
    fn test_sales_excludes_cancelled() {
        let filters = ReportFilters {
            report_type: ReportType::Sales,
            range: DateRange::Week,
            franchise_id: None,
        };
        let report = generate(&filters, &fixture(), &[], today());
        let ReportRows::Sales(rows) = &report.rows else {
            panic!("expected sales rows");
        };
        // Two days, ordered ascending by date
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2026-08-05");
        assert_eq!(rows[0].revenue, 1650.0);
        assert_eq!(rows[1].date, "2026-08-06");
        // BK-3 cancelled: 1200 + 800 only
        assert_eq!(rows[1].revenue, 2000.0);
        assert_eq!(rows[1].bookings, 2);
    }

    #[test]
    fn test_preset_resolution() {
        let t = today();
        assert_eq!(DateRange::Today.resolve(t), (t, t));
        let (start, end) = DateRange::Week.resolve(t);
        assert_eq!(end, t);
        assert_eq!((end - start).num_days(), 6);
        let custom = DateRange::parse(
            "custom",
            NaiveDate::from_ymd_opt(2026, 1, 1),
            NaiveDate::from_ymd_opt(2026, 1, 31),
        )
        .unwrap();
        assert_eq!(custom.label(), "2026-01-01..2026-01-31");
    }

    #[test]
    fn test_custom_without_bounds_rejected() {
        let err = DateRange::parse("custom", None, None).unwrap_err();
        assert_eq!(err, ReportError::MissingCustomBounds);
        let err = DateRange::parse("quarter", None, None).unwrap_err();
        assert_eq!(err, ReportError::UnknownPreset("quarter".to_string()));
    }

    #[test]
    fn test_occupancy_rate() {
        let session = Session {
            id: 9,
            franchise_id: 1,
            name: "Dinner".to_string(),
            session_type: crate::models::SessionType::Dinner,
            date: Some("2026-08-06".to_string()),
            start_time: "19:00".to_string(),
            end_time: None,
            duration_minutes: None,
            max_capacity: 80,
            booked_count: 20,
            is_active: true,
            deactivation_reason: None,
            special_name: None,
            special_pricing: None,
            special_addons: None,
            special_conditions: None,
            recurrence_type: crate::models::RecurrenceType::None,
            created_at: 0,
            updated_at: 0,
        };
        let filters = ReportFilters {
            report_type: ReportType::Occupancy,
            range: DateRange::Today,
            franchise_id: None,
        };
        let report = generate(&filters, &[], &[session], today());
        let ReportRows::Occupancy(rows) = &report.rows else {
            panic!("expected occupancy rows");
        };
        assert_eq!(rows[0].occupancy_pct, 25.0);
    }

    #[test]
    fn test_csv_export_is_pure_formatting() {
        let filters = ReportFilters {
            report_type: ReportType::Bookings,
            range: DateRange::Today,
            franchise_id: None,
        };
        let report = generate(&filters, &fixture(), &[], today());
        let csv = export(&report, ExportFormat::Csv);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("date,total,confirmed,cancelled,covers"));
        assert_eq!(lines.next(), Some("2026-08-06,3,1,1,9"));
        assert_eq!(lines.next(), None);
    }
}
