//! Dynamic query construction
//!
//! Builds WHERE clauses for list endpoints from optional criteria:
//! equality, LIKE search across a field list, IN lists, and range bounds,
//! always AND-combined. ORDER BY columns go through a caller-supplied
//! whitelist; nothing user-controlled is interpolated into SQL text.

use sqlx::{Sqlite, query::Query};

/// Query builder for constructing SQL queries with dynamic WHERE conditions
pub struct QueryBuilder {
    conditions: Vec<String>,
    bindings: Vec<QueryValue>,
    order_by: Option<String>,
}

#[derive(Clone)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
            bindings: Vec::new(),
            order_by: None,
        }
    }

    /// Add a raw condition (placeholders supplied by the caller)
    pub fn add_condition(&mut self, condition: &str) -> &mut Self {
        self.conditions.push(condition.to_string());
        self
    }

    /// Add a text binding
    pub fn bind_text(&mut self, value: String) -> &mut Self {
        self.bindings.push(QueryValue::Text(value));
        self
    }

    /// Add an integer binding
    pub fn bind_i64(&mut self, value: i64) -> &mut Self {
        self.bindings.push(QueryValue::Integer(value));
        self
    }

    /// Add a float binding
    pub fn bind_f64(&mut self, value: f64) -> &mut Self {
        self.bindings.push(QueryValue::Float(value));
        self
    }

    /// Equality condition on a column
    pub fn add_eq_text(&mut self, field: &str, value: &str) -> &mut Self {
        self.conditions.push(format!("{field} = ?"));
        self.bindings.push(QueryValue::Text(value.to_string()));
        self
    }

    /// Equality condition on an integer column
    pub fn add_eq_i64(&mut self, field: &str, value: i64) -> &mut Self {
        self.conditions.push(format!("{field} = ?"));
        self.bindings.push(QueryValue::Integer(value));
        self
    }

    /// Add LIKE search condition for multiple fields
    pub fn add_search_condition(&mut self, fields: &[&str], search: &str) -> &mut Self {
        let field_conditions: Vec<String> =
            fields.iter().map(|field| format!("{field} LIKE ?")).collect();

        let condition = format!("({})", field_conditions.join(" OR "));
        self.conditions.push(condition);

        // Add binding for each field
        let search_pattern = format!("%{search}%");
        for _ in fields {
            self.bindings.push(QueryValue::Text(search_pattern.clone()));
        }

        self
    }

    /// Add IN condition for integer values
    pub fn add_in_i64(&mut self, field: &str, values: &[i64]) -> &mut Self {
        let placeholders: Vec<&str> = values.iter().map(|_| "?").collect();
        let condition = format!("{field} IN ({})", placeholders.join(", "));
        self.conditions.push(condition);

        for val in values {
            self.bindings.push(QueryValue::Integer(*val));
        }

        self
    }

    /// Inclusive range condition on a TEXT date column (either bound optional)
    pub fn add_date_range(
        &mut self,
        field: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> &mut Self {
        if let Some(from) = from {
            self.conditions.push(format!("{field} >= ?"));
            self.bindings.push(QueryValue::Text(from.to_string()));
        }
        if let Some(to) = to {
            self.conditions.push(format!("{field} <= ?"));
            self.bindings.push(QueryValue::Text(to.to_string()));
        }
        self
    }

    /// ORDER BY a whitelisted column; unknown columns are ignored
    pub fn order_by(&mut self, column: &str, descending: bool, whitelist: &[&str]) -> &mut Self {
        if whitelist.contains(&column) {
            let dir = if descending { "DESC" } else { "ASC" };
            self.order_by = Some(format!(" ORDER BY {column} {dir}"));
        }
        self
    }

    /// Build WHERE clause (empty if no conditions)
    pub fn build_where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Build WHERE + ORDER BY suffix
    pub fn build_suffix(&self) -> String {
        let mut sql = self.build_where_clause();
        if let Some(order) = &self.order_by {
            sql.push_str(order);
        }
        sql
    }

    /// Apply bindings to a SQLx query
    pub fn apply_bindings<'a, 'b>(
        &'b self,
        mut query: Query<'a, Sqlite, <Sqlite as sqlx::Database>::Arguments<'a>>,
    ) -> Query<'a, Sqlite, <Sqlite as sqlx::Database>::Arguments<'a>>
    where
        'b: 'a,
    {
        for binding in &self.bindings {
            query = match binding {
                QueryValue::Text(s) => query.bind(s),
                QueryValue::Integer(i) => query.bind(i),
                QueryValue::Float(f) => query.bind(f),
            };
        }
        query
    }

    /// Apply bindings to a SQLx query_as
    pub fn apply_bindings_as<'a, 'b, T>(
        &'b self,
        mut query: sqlx::query::QueryAs<'a, Sqlite, T, <Sqlite as sqlx::Database>::Arguments<'a>>,
    ) -> sqlx::query::QueryAs<'a, Sqlite, T, <Sqlite as sqlx::Database>::Arguments<'a>>
    where
        'b: 'a,
    {
        for binding in &self.bindings {
            query = match binding {
                QueryValue::Text(s) => query.bind(s),
                QueryValue::Integer(i) => query.bind(i),
                QueryValue::Float(f) => query.bind(f),
            };
        }
        query
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder_has_no_where() {
        let qb = QueryBuilder::new();
        assert_eq!(qb.build_where_clause(), "");
    }

    #[test]
    fn test_conditions_join_with_and() {
        let mut qb = QueryBuilder::new();
        qb.add_eq_i64("franchise_id", 7)
            .add_eq_text("status", "active");
        assert_eq!(
            qb.build_where_clause(),
            " WHERE franchise_id = ? AND status = ?"
        );
    }

    #[test]
    fn test_search_condition_or_within_and() {
        let mut qb = QueryBuilder::new();
        qb.add_search_condition(&["name", "phone"], "asha");
        assert_eq!(
            qb.build_where_clause(),
            " WHERE (name LIKE ? OR phone LIKE ?)"
        );
    }

    #[test]
    fn test_order_by_whitelist_rejects_unknown() {
        let mut qb = QueryBuilder::new();
        qb.order_by("name; DROP TABLE session", true, &["name", "date"]);
        assert_eq!(qb.build_suffix(), "");
        qb.order_by("date", true, &["name", "date"]);
        assert_eq!(qb.build_suffix(), " ORDER BY date DESC");
    }

    #[test]
    fn test_date_range_bounds() {
        let mut qb = QueryBuilder::new();
        qb.add_date_range("date", Some("2026-08-01"), None);
        assert_eq!(qb.build_where_clause(), " WHERE date >= ?");
    }
}
