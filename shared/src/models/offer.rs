//! Offer Model (优惠活动)
//!
//! Offers target guest segments and franchise lists, and are delivered
//! over one or more channels (sms / whatsapp / telegram / email).

use serde::{Deserialize, Serialize};

/// Discount type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum DiscountType {
    Percentage,
    FixedAmount,
}

/// Offer entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Offer {
    pub id: i64,
    /// Redemption code ("FEST20")
    pub code: String,
    pub name: String,
    /// Campaign bucket ("festival", "weekday", "winback")
    pub offer_type: String,
    pub discount_type: DiscountType,
    /// Percentage: 20 = 20%; fixed: 250.0 = ₹250
    pub discount_value: f64,
    /// Validity window start (Unix millis)
    pub valid_from: Option<i64>,
    /// Validity window end (Unix millis)
    pub valid_until: Option<i64>,
    pub max_redemptions: Option<i64>,
    pub redemption_count: i64,
    /// Targeted guest segments ("VIP", "New", ...)
    #[cfg_attr(feature = "db", sqlx(json))]
    #[serde(default)]
    pub guest_segments: Vec<String>,
    /// Targeted franchises; empty list means all
    #[cfg_attr(feature = "db", sqlx(json))]
    #[serde(default)]
    pub franchise_ids: Vec<i64>,
    /// Delivery channels
    #[cfg_attr(feature = "db", sqlx(json))]
    #[serde(default)]
    pub channels: Vec<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create offer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferCreate {
    pub code: String,
    pub name: String,
    pub offer_type: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
    pub max_redemptions: Option<i64>,
    #[serde(default)]
    pub guest_segments: Vec<String>,
    #[serde(default)]
    pub franchise_ids: Vec<i64>,
    #[serde(default)]
    pub channels: Vec<String>,
}

/// Update offer payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OfferUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    pub offer_type: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<f64>,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
    pub max_redemptions: Option<i64>,
    pub guest_segments: Option<Vec<String>>,
    pub franchise_ids: Option<Vec<i64>>,
    pub channels: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Delivery/engagement event kind tracked per offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OfferEventType {
    Sent,
    Viewed,
    Redeemed,
}

/// Per-offer analytics counters (offer-analytics RPC)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OfferAnalytics {
    pub offer_id: i64,
    pub sent: i64,
    pub viewed: i64,
    pub redeemed: i64,
}

/// Aggregate summary across the requested offers
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OfferAnalyticsSummary {
    pub total_sent: i64,
    pub total_viewed: i64,
    pub total_redeemed: i64,
    /// redeemed / sent, 0.0 when nothing was sent
    pub redemption_rate: f64,
}

/// Offer-analytics RPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferAnalyticsResponse {
    pub per_offer: Vec<OfferAnalytics>,
    pub summary: OfferAnalyticsSummary,
}
