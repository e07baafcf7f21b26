//! Booking Model
//!
//! Bookings live in the client-side booking store, not in a server
//! collection. IDs are caller-supplied display strings ("BK-1024").
//! There is no status state machine: any status is reachable from any
//! other via the action buttons, matching dashboard behavior.

use serde::{Deserialize, Serialize};

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Partial,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Partial => "partial",
            Self::Refunded => "refunded",
        }
    }
}

/// Upcoming booking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub guest_name: String,
    /// Derived guest segment at booking time ("New", "VIP", ...)
    pub guest_type: Option<String>,
    pub session_id: i64,
    pub session_name: String,
    /// Booking date (YYYY-MM-DD)
    pub booking_date: String,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub veg_count: i64,
    #[serde(default)]
    pub non_veg_count: i64,
    /// Billable amount for the booking (deposits / prepaid covers)
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub reminder_sent: bool,
    #[serde(default)]
    pub reminder_count: i64,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Booking {
    /// Total covers for the booking
    pub fn covers(&self) -> i64 {
        self.veg_count + self.non_veg_count
    }
}

/// Patch applied by the booking store's update operation (merge by id)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    pub guest_name: Option<String>,
    pub guest_type: Option<String>,
    pub session_id: Option<i64>,
    pub session_name: Option<String>,
    pub booking_date: Option<String>,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub veg_count: Option<i64>,
    pub non_veg_count: Option<i64>,
    pub total_amount: Option<f64>,
    pub reminder_sent: Option<bool>,
    pub reminder_count: Option<i64>,
    pub phone: Option<String>,
    pub email: Option<String>,
}
