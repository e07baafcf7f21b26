//! Franchise Repository

use super::{RepoError, RepoResult};
use shared::models::{Franchise, FranchiseCreate, FranchiseUpdate};
use sqlx::SqlitePool;

const FRANCHISE_SELECT: &str = "SELECT id, name, code, city, timezone, is_active, created_at, updated_at FROM franchise";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Franchise>> {
    let sql = format!("{FRANCHISE_SELECT} WHERE is_active = 1 ORDER BY name ASC");
    let rows = sqlx::query_as::<_, Franchise>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Franchise>> {
    let sql = format!("{FRANCHISE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Franchise>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: FranchiseCreate) -> RepoResult<Franchise> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO franchise (id, name, code, city, timezone, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.code)
    .bind(&data.city)
    .bind(&data.timezone)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepoError::Conflict(format!("Franchise code {} already exists", data.code))
        }
        _ => RepoError::from(e),
    })?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create franchise".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: FranchiseUpdate) -> RepoResult<Franchise> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE franchise SET name = COALESCE(?, name), code = COALESCE(?, code), city = COALESCE(?, city), timezone = COALESCE(?, timezone), is_active = COALESCE(?, is_active), updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(&data.code)
    .bind(&data.city)
    .bind(&data.timezone)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Franchise {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Franchise {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE franchise SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
