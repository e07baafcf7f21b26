//! Guest Repository

use super::{RepoError, RepoResult};
use crate::db::query::QueryBuilder;
use shared::models::{Guest, GuestCreate, GuestUpdate};
use sqlx::SqlitePool;

const GUEST_SELECT: &str = "SELECT id, guest_code, franchise_id, name, phone, email, visit_count, loyalty_points, preferences, upcoming_bookings, last_visit_date, is_active, created_at, updated_at FROM guest";

const SORTABLE: &[&str] = &["name", "visit_count", "loyalty_points", "last_visit_date", "created_at"];

#[derive(Debug, Default)]
pub struct GuestListFilter<'a> {
    pub franchise_id: Option<i64>,
    pub search: Option<&'a str>,
    pub order_by: Option<&'a str>,
    pub descending: bool,
}

pub async fn find_all(pool: &SqlitePool, filter: &GuestListFilter<'_>) -> RepoResult<Vec<Guest>> {
    let mut qb = QueryBuilder::new();
    qb.add_condition("is_active = 1");
    if let Some(franchise_id) = filter.franchise_id {
        qb.add_eq_i64("franchise_id", franchise_id);
    }
    if let Some(search) = filter.search
        && !search.trim().is_empty()
    {
        qb.add_search_condition(&["guest_code", "name", "phone", "email"], search.trim());
    }
    match filter.order_by {
        Some(column) => qb.order_by(column, filter.descending, SORTABLE),
        None => qb.order_by("created_at", true, SORTABLE),
    };

    let sql = format!("{GUEST_SELECT}{}", qb.build_suffix());
    let query = sqlx::query_as::<_, Guest>(&sql);
    let rows = qb.apply_bindings_as(query).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Guest>> {
    let sql = format!("{GUEST_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Guest>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Next display code: "G-" + zero-padded sequence
async fn next_guest_code(pool: &SqlitePool) -> RepoResult<String> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM guest")
        .fetch_one(pool)
        .await?;
    Ok(format!("G-{:04}", count + 1))
}

pub async fn create(pool: &SqlitePool, data: GuestCreate) -> RepoResult<Guest> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let guest_code = next_guest_code(pool).await?;
    let preferences =
        serde_json::to_string(&data.preferences).unwrap_or_else(|_| "[]".to_string());
    sqlx::query(
        "INSERT INTO guest (id, guest_code, franchise_id, name, phone, email, visit_count, loyalty_points, preferences, upcoming_bookings, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 0, 0, ?, 0, 1, ?, ?)",
    )
    .bind(id)
    .bind(&guest_code)
    .bind(data.franchise_id)
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&preferences)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create guest".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: GuestUpdate) -> RepoResult<Guest> {
    let now = shared::util::now_millis();
    let preferences = data
        .preferences
        .as_ref()
        .map(|p| serde_json::to_string(p).unwrap_or_else(|_| "[]".to_string()));
    let rows = sqlx::query(
        "UPDATE guest SET name = COALESCE(?, name), phone = COALESCE(?, phone), email = COALESCE(?, email), preferences = COALESCE(?, preferences), upcoming_bookings = COALESCE(?, upcoming_bookings), is_active = COALESCE(?, is_active), updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&preferences)
    .bind(data.upcoming_bookings)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Guest {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Guest {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE guest SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Record a completed visit: bumps visit_count and the last visit date
pub async fn record_visit(pool: &SqlitePool, id: i64, visit_date: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE guest SET visit_count = visit_count + 1, last_visit_date = ?, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(visit_date)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Guest {id} not found")));
    }
    Ok(())
}

/// Adjust the loyalty balance by a delta (earn or burn); floor at zero
pub async fn adjust_loyalty(pool: &SqlitePool, id: i64, delta: i64) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE guest SET loyalty_points = MAX(0, loyalty_points + ?), updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(delta)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Guest {id} not found")));
    }
    let balance: i64 = sqlx::query_scalar("SELECT loyalty_points FROM guest WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(balance)
}
