//! Session Repository

use super::{RepoError, RepoResult};
use crate::db::query::QueryBuilder;
use shared::models::{Session, SessionCreate, SessionUpdate};
use sqlx::SqlitePool;

const SESSION_SELECT: &str = "SELECT id, franchise_id, name, session_type, date, start_time, end_time, duration_minutes, max_capacity, booked_count, is_active, deactivation_reason, special_name, special_pricing, special_addons, special_conditions, recurrence_type, created_at, updated_at FROM session";

/// ORDER BY whitelist for list queries
const SORTABLE: &[&str] = &["date", "name", "start_time", "max_capacity", "created_at"];

/// List filter arguments (all optional, AND-combined)
#[derive(Debug, Default)]
pub struct SessionListFilter<'a> {
    pub franchise_id: Option<i64>,
    pub session_type: Option<&'a str>,
    pub active_only: bool,
    pub date_from: Option<&'a str>,
    pub date_to: Option<&'a str>,
    pub search: Option<&'a str>,
    pub order_by: Option<&'a str>,
    pub descending: bool,
}

pub async fn find_all(pool: &SqlitePool, filter: &SessionListFilter<'_>) -> RepoResult<Vec<Session>> {
    let mut qb = QueryBuilder::new();
    if let Some(franchise_id) = filter.franchise_id {
        qb.add_eq_i64("franchise_id", franchise_id);
    }
    if let Some(session_type) = filter.session_type {
        qb.add_eq_text("session_type", session_type);
    }
    if filter.active_only {
        qb.add_condition("is_active = 1");
    }
    qb.add_date_range("date", filter.date_from, filter.date_to);
    if let Some(search) = filter.search
        && !search.trim().is_empty()
    {
        qb.add_search_condition(&["name", "session_type"], search.trim());
    }
    // Default ordering: newest date first
    match filter.order_by {
        Some(column) => qb.order_by(column, filter.descending, SORTABLE),
        None => qb.order_by("date", true, SORTABLE),
    };

    let sql = format!("{SESSION_SELECT}{}", qb.build_suffix());
    let query = sqlx::query_as::<_, Session>(&sql);
    let rows = qb.apply_bindings_as(query).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Session>> {
    let sql = format!("{SESSION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Session>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: SessionCreate) -> RepoResult<Session> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let special_addons = data
        .special_addons
        .as_ref()
        .map(|a| serde_json::to_string(a).unwrap_or_else(|_| "[]".to_string()));
    sqlx::query(
        "INSERT INTO session (id, franchise_id, name, session_type, date, start_time, end_time, duration_minutes, max_capacity, booked_count, is_active, special_name, special_pricing, special_addons, special_conditions, recurrence_type, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 1, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.franchise_id)
    .bind(&data.name)
    .bind(data.session_type)
    .bind(&data.date)
    .bind(&data.start_time)
    .bind(&data.end_time)
    .bind(data.duration_minutes)
    .bind(data.max_capacity)
    .bind(&data.special_name)
    .bind(data.special_pricing)
    .bind(&special_addons)
    .bind(&data.special_conditions)
    .bind(data.recurrence_type)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create session".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: SessionUpdate) -> RepoResult<Session> {
    let now = shared::util::now_millis();
    let special_addons = data
        .special_addons
        .as_ref()
        .map(|a| serde_json::to_string(a).unwrap_or_else(|_| "[]".to_string()));
    let rows = sqlx::query(
        "UPDATE session SET name = COALESCE(?, name), session_type = COALESCE(?, session_type), date = COALESCE(?, date), start_time = COALESCE(?, start_time), end_time = COALESCE(?, end_time), duration_minutes = COALESCE(?, duration_minutes), max_capacity = COALESCE(?, max_capacity), booked_count = COALESCE(?, booked_count), special_name = COALESCE(?, special_name), special_pricing = COALESCE(?, special_pricing), special_addons = COALESCE(?, special_addons), special_conditions = COALESCE(?, special_conditions), recurrence_type = COALESCE(?, recurrence_type), updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(data.session_type)
    .bind(&data.date)
    .bind(&data.start_time)
    .bind(&data.end_time)
    .bind(data.duration_minutes)
    .bind(data.max_capacity)
    .bind(data.booked_count)
    .bind(&data.special_name)
    .bind(data.special_pricing)
    .bind(&special_addons)
    .bind(&data.special_conditions)
    .bind(data.recurrence_type)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Session {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Session {id} not found")))
}

/// Soft-deactivate with a reason; returns false if already inactive or absent
pub async fn deactivate(pool: &SqlitePool, id: i64, reason: &str) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE session SET is_active = 0, deactivation_reason = ?, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(reason)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Adjust booked_count by a delta (positive or negative).
///
/// Floor is zero; there is no ceiling at max_capacity (overbooking
/// allowed, pending product confirmation).
pub async fn adjust_booked_count(pool: &SqlitePool, id: i64, delta: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE session SET booked_count = MAX(0, booked_count + ?), updated_at = ? WHERE id = ?",
    )
    .bind(delta)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Session {id} not found")));
    }
    Ok(())
}
