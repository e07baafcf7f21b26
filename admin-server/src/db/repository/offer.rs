//! Offer Repository

use super::{RepoError, RepoResult};
use crate::db::query::QueryBuilder;
use shared::models::{
    Offer, OfferAnalytics, OfferAnalyticsResponse, OfferAnalyticsSummary, OfferCreate,
    OfferEventType, OfferUpdate,
};
use sqlx::SqlitePool;

const OFFER_SELECT: &str = "SELECT id, code, name, offer_type, discount_type, discount_value, valid_from, valid_until, max_redemptions, redemption_count, guest_segments, franchise_ids, channels, is_active, created_at, updated_at FROM offer";

const SORTABLE: &[&str] = &["name", "code", "valid_until", "redemption_count", "created_at"];

#[derive(Debug, Default)]
pub struct OfferListFilter<'a> {
    pub offer_type: Option<&'a str>,
    pub active_only: bool,
    pub search: Option<&'a str>,
    pub order_by: Option<&'a str>,
    pub descending: bool,
}

fn to_json(value: &impl serde::Serialize) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

pub async fn find_all(pool: &SqlitePool, filter: &OfferListFilter<'_>) -> RepoResult<Vec<Offer>> {
    let mut qb = QueryBuilder::new();
    if let Some(offer_type) = filter.offer_type {
        qb.add_eq_text("offer_type", offer_type);
    }
    if filter.active_only {
        qb.add_condition("is_active = 1");
    }
    if let Some(search) = filter.search
        && !search.trim().is_empty()
    {
        qb.add_search_condition(&["code", "name", "offer_type"], search.trim());
    }
    match filter.order_by {
        Some(column) => qb.order_by(column, filter.descending, SORTABLE),
        None => qb.order_by("created_at", true, SORTABLE),
    };

    let sql = format!("{OFFER_SELECT}{}", qb.build_suffix());
    let query = sqlx::query_as::<_, Offer>(&sql);
    let rows = qb.apply_bindings_as(query).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Offer>> {
    let sql = format!("{OFFER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Offer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: OfferCreate) -> RepoResult<Offer> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO offer (id, code, name, offer_type, discount_type, discount_value, valid_from, valid_until, max_redemptions, redemption_count, guest_segments, franchise_ids, channels, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.code)
    .bind(&data.name)
    .bind(&data.offer_type)
    .bind(data.discount_type)
    .bind(data.discount_value)
    .bind(data.valid_from)
    .bind(data.valid_until)
    .bind(data.max_redemptions)
    .bind(to_json(&data.guest_segments))
    .bind(to_json(&data.franchise_ids))
    .bind(to_json(&data.channels))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepoError::Conflict(format!("Offer code {} already exists", data.code))
        }
        _ => RepoError::from(e),
    })?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create offer".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: OfferUpdate) -> RepoResult<Offer> {
    let now = shared::util::now_millis();
    let guest_segments = data.guest_segments.as_ref().map(|v| to_json(v));
    let franchise_ids = data.franchise_ids.as_ref().map(|v| to_json(v));
    let channels = data.channels.as_ref().map(|v| to_json(v));
    let rows = sqlx::query(
        "UPDATE offer SET code = COALESCE(?, code), name = COALESCE(?, name), offer_type = COALESCE(?, offer_type), discount_type = COALESCE(?, discount_type), discount_value = COALESCE(?, discount_value), valid_from = COALESCE(?, valid_from), valid_until = COALESCE(?, valid_until), max_redemptions = COALESCE(?, max_redemptions), guest_segments = COALESCE(?, guest_segments), franchise_ids = COALESCE(?, franchise_ids), channels = COALESCE(?, channels), is_active = COALESCE(?, is_active), updated_at = ? WHERE id = ?",
    )
    .bind(&data.code)
    .bind(&data.name)
    .bind(&data.offer_type)
    .bind(data.discount_type)
    .bind(data.discount_value)
    .bind(data.valid_from)
    .bind(data.valid_until)
    .bind(data.max_redemptions)
    .bind(&guest_segments)
    .bind(&franchise_ids)
    .bind(&channels)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Offer {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Offer {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE offer SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Record a delivery/engagement event; redeemed events also bump the
/// offer's redemption counter
pub async fn record_event(
    pool: &SqlitePool,
    offer_id: i64,
    event_type: OfferEventType,
    channel: Option<&str>,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "INSERT INTO offer_event (offer_id, event_type, channel, created_at) SELECT id, ?, ?, ? FROM offer WHERE id = ?",
    )
    .bind(event_type)
    .bind(channel)
    .bind(now)
    .bind(offer_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Offer {offer_id} not found")));
    }
    if event_type == OfferEventType::Redeemed {
        sqlx::query(
            "UPDATE offer SET redemption_count = redemption_count + 1, updated_at = ? WHERE id = ?",
        )
        .bind(now)
        .bind(offer_id)
        .execute(pool)
        .await?;
    }
    Ok(())
}

/// Per-event-type counter row used by the analytics aggregation
#[derive(Debug, sqlx::FromRow)]
struct EventCount {
    offer_id: i64,
    event_type: String,
    count: i64,
}

/// Compute per-offer sent/viewed/redeemed counters plus an aggregate
/// summary for the requested offer IDs. IDs with no events still get a
/// zeroed row.
pub async fn analytics(pool: &SqlitePool, offer_ids: &[i64]) -> RepoResult<OfferAnalyticsResponse> {
    let mut per_offer: Vec<OfferAnalytics> = offer_ids
        .iter()
        .map(|id| OfferAnalytics {
            offer_id: *id,
            ..Default::default()
        })
        .collect();

    if !offer_ids.is_empty() {
        let mut qb = QueryBuilder::new();
        qb.add_in_i64("offer_id", offer_ids);
        let sql = format!(
            "SELECT offer_id, event_type, COUNT(*) as count FROM offer_event{} GROUP BY offer_id, event_type",
            qb.build_where_clause()
        );
        let query = sqlx::query_as::<_, EventCount>(&sql);
        let counts = qb.apply_bindings_as(query).fetch_all(pool).await?;

        for row in counts {
            if let Some(entry) = per_offer.iter_mut().find(|a| a.offer_id == row.offer_id) {
                match row.event_type.as_str() {
                    "sent" => entry.sent = row.count,
                    "viewed" => entry.viewed = row.count,
                    "redeemed" => entry.redeemed = row.count,
                    other => {
                        tracing::warn!(event_type = other, "Ignoring unknown offer event type")
                    }
                }
            }
        }
    }

    let total_sent: i64 = per_offer.iter().map(|a| a.sent).sum();
    let total_viewed: i64 = per_offer.iter().map(|a| a.viewed).sum();
    let total_redeemed: i64 = per_offer.iter().map(|a| a.redeemed).sum();
    let summary = OfferAnalyticsSummary {
        total_sent,
        total_viewed,
        total_redeemed,
        redemption_rate: if total_sent > 0 {
            total_redeemed as f64 / total_sent as f64
        } else {
            0.0
        },
    };

    Ok(OfferAnalyticsResponse { per_offer, summary })
}
