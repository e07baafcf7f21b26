//! Staff Repository

use super::{RepoError, RepoResult};
use crate::db::query::QueryBuilder;
use shared::models::{Staff, StaffCreate, StaffUpdate};
use sqlx::SqlitePool;

const STAFF_SELECT: &str = "SELECT id, franchise_id, name, designation, department, access_level, status, has_telegram_access, phone, email, created_at, updated_at FROM staff";

const SORTABLE: &[&str] = &["name", "designation", "status", "created_at"];

#[derive(Debug, Default)]
pub struct StaffListFilter<'a> {
    pub franchise_id: Option<i64>,
    pub status: Option<&'a str>,
    pub department: Option<&'a str>,
    pub search: Option<&'a str>,
    pub order_by: Option<&'a str>,
    pub descending: bool,
}

pub async fn find_all(pool: &SqlitePool, filter: &StaffListFilter<'_>) -> RepoResult<Vec<Staff>> {
    let mut qb = QueryBuilder::new();
    if let Some(franchise_id) = filter.franchise_id {
        qb.add_eq_i64("franchise_id", franchise_id);
    }
    if let Some(status) = filter.status {
        qb.add_eq_text("status", status);
    }
    if let Some(department) = filter.department {
        qb.add_eq_text("department", department);
    }
    if let Some(search) = filter.search
        && !search.trim().is_empty()
    {
        qb.add_search_condition(&["name", "designation", "department"], search.trim());
    }
    match filter.order_by {
        Some(column) => qb.order_by(column, filter.descending, SORTABLE),
        None => qb.order_by("name", false, SORTABLE),
    };

    let sql = format!("{STAFF_SELECT}{}", qb.build_suffix());
    let query = sqlx::query_as::<_, Staff>(&sql);
    let rows = qb.apply_bindings_as(query).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Staff>> {
    let sql = format!("{STAFF_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Staff>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: StaffCreate) -> RepoResult<Staff> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO staff (id, franchise_id, name, designation, department, access_level, status, has_telegram_access, phone, email, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.franchise_id)
    .bind(&data.name)
    .bind(&data.designation)
    .bind(&data.department)
    .bind(&data.access_level)
    .bind(data.status)
    .bind(data.has_telegram_access)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create staff".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: StaffUpdate) -> RepoResult<Staff> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE staff SET name = COALESCE(?, name), designation = COALESCE(?, designation), department = COALESCE(?, department), access_level = COALESCE(?, access_level), status = COALESCE(?, status), has_telegram_access = COALESCE(?, has_telegram_access), phone = COALESCE(?, phone), email = COALESCE(?, email), updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(&data.designation)
    .bind(&data.department)
    .bind(&data.access_level)
    .bind(data.status)
    .bind(data.has_telegram_access)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Staff {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Staff {id} not found")))
}

/// Mark a staff member inactive; there is no hard delete
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE staff SET status = 'inactive', updated_at = ? WHERE id = ? AND status != 'inactive'",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
