//! Menu Item Repository
//!
//! Session associations go through the menu_session_map join table;
//! `set_sessions` replaces the full association set atomically.

use super::{RepoError, RepoResult};
use crate::db::query::QueryBuilder;
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate, MenuItemWithSessions};
use sqlx::SqlitePool;

const MENU_ITEM_SELECT: &str = "SELECT id, franchise_id, name, price, category, is_vegetarian, is_gluten_free, is_dairy_free, allergens, is_active, created_at, updated_at FROM menu_item";

const SORTABLE: &[&str] = &["name", "price", "category", "created_at"];

#[derive(Debug, Default)]
pub struct MenuItemListFilter<'a> {
    pub franchise_id: Option<i64>,
    pub category: Option<&'a str>,
    pub session_id: Option<i64>,
    pub search: Option<&'a str>,
    pub order_by: Option<&'a str>,
    pub descending: bool,
}

pub async fn find_all(
    pool: &SqlitePool,
    filter: &MenuItemListFilter<'_>,
) -> RepoResult<Vec<MenuItem>> {
    let mut qb = QueryBuilder::new();
    qb.add_condition("is_active = 1");
    if let Some(franchise_id) = filter.franchise_id {
        qb.add_eq_i64("franchise_id", franchise_id);
    }
    if let Some(category) = filter.category {
        qb.add_eq_text("category", category);
    }
    if let Some(session_id) = filter.session_id {
        qb.add_condition("id IN (SELECT menu_item_id FROM menu_session_map WHERE session_id = ?)");
        qb.bind_i64(session_id);
    }
    if let Some(search) = filter.search
        && !search.trim().is_empty()
    {
        qb.add_search_condition(&["name", "category"], search.trim());
    }
    match filter.order_by {
        Some(column) => qb.order_by(column, filter.descending, SORTABLE),
        None => qb.order_by("name", false, SORTABLE),
    };

    let sql = format!("{MENU_ITEM_SELECT}{}", qb.build_suffix());
    let query = sqlx::query_as::<_, MenuItem>(&sql);
    let rows = qb.apply_bindings_as(query).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let sql = format!("{MENU_ITEM_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Menu item plus its associated session IDs
pub async fn find_with_sessions(
    pool: &SqlitePool,
    id: i64,
) -> RepoResult<Option<MenuItemWithSessions>> {
    let Some(item) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let session_ids = session_ids_for(pool, id).await?;
    Ok(Some(MenuItemWithSessions { item, session_ids }))
}

pub async fn session_ids_for(pool: &SqlitePool, menu_item_id: i64) -> RepoResult<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        "SELECT session_id FROM menu_session_map WHERE menu_item_id = ? ORDER BY session_id",
    )
    .bind(menu_item_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> RepoResult<MenuItemWithSessions> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let allergens = serde_json::to_string(&data.allergens).unwrap_or_else(|_| "[]".to_string());
    sqlx::query(
        "INSERT INTO menu_item (id, franchise_id, name, price, category, is_vegetarian, is_gluten_free, is_dairy_free, allergens, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(data.franchise_id)
    .bind(&data.name)
    .bind(data.price)
    .bind(&data.category)
    .bind(data.is_vegetarian)
    .bind(data.is_gluten_free)
    .bind(data.is_dairy_free)
    .bind(&allergens)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    if !data.session_ids.is_empty() {
        set_sessions(pool, id, &data.session_ids).await?;
    }

    find_with_sessions(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
    let now = shared::util::now_millis();
    let allergens = data
        .allergens
        .as_ref()
        .map(|a| serde_json::to_string(a).unwrap_or_else(|_| "[]".to_string()));
    let rows = sqlx::query(
        "UPDATE menu_item SET name = COALESCE(?, name), price = COALESCE(?, price), category = COALESCE(?, category), is_vegetarian = COALESCE(?, is_vegetarian), is_gluten_free = COALESCE(?, is_gluten_free), is_dairy_free = COALESCE(?, is_dairy_free), allergens = COALESCE(?, allergens), is_active = COALESCE(?, is_active), updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(&data.category)
    .bind(data.is_vegetarian)
    .bind(data.is_gluten_free)
    .bind(data.is_dairy_free)
    .bind(&allergens)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE menu_item SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Replace the item's session associations with the supplied set
pub async fn set_sessions(
    pool: &SqlitePool,
    menu_item_id: i64,
    session_ids: &[i64],
) -> RepoResult<Vec<i64>> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM menu_session_map WHERE menu_item_id = ?")
        .bind(menu_item_id)
        .execute(&mut *tx)
        .await?;
    for session_id in session_ids {
        sqlx::query("INSERT OR IGNORE INTO menu_session_map (menu_item_id, session_id) VALUES (?, ?)")
            .bind(menu_item_id)
            .bind(session_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    session_ids_for(pool, menu_item_id).await
}
