//! Menu Item Model (菜单管理)
//!
//! Menu items associate with sessions through the `menu_session_map`
//! join table, the only many-to-many relation in the schema.

use serde::{Deserialize, Serialize};

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub franchise_id: i64,
    pub name: String,
    pub price: f64,
    /// Menu category ("Starters", "Mains", "Desserts")
    pub category: String,
    pub is_vegetarian: bool,
    pub is_gluten_free: bool,
    pub is_dairy_free: bool,
    #[cfg_attr(feature = "db", sqlx(json))]
    #[serde(default)]
    pub allergens: Vec<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Menu item with its associated session IDs (list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemWithSessions {
    #[serde(flatten)]
    pub item: MenuItem,
    pub session_ids: Vec<i64>,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemCreate {
    pub franchise_id: i64,
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default)]
    pub is_dairy_free: bool,
    #[serde(default)]
    pub allergens: Vec<String>,
    /// Sessions to associate on create
    #[serde(default)]
    pub session_ids: Vec<i64>,
}

/// Update menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub is_vegetarian: Option<bool>,
    pub is_gluten_free: Option<bool>,
    pub is_dairy_free: Option<bool>,
    pub allergens: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Replace-session-associations payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemSessions {
    pub session_ids: Vec<i64>,
}
