//! SELECT builder.

use super::{Filters, Placeholder, ToSql};
use crate::error::{SqlAgentError, SqlAgentResult};
use crate::value::SqlValue;

/// Builds `SELECT cols FROM table [WHERE ...] [ORDER BY ...] [LIMIT/OFFSET]`.
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    columns: Vec<String>,
    table: Option<String>,
    filters: Filters,
    order_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    placeholder: Placeholder,
}

impl SelectBuilder {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            table: None,
            filters: Filters::default(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            placeholder: Placeholder::default(),
        }
    }

    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn where_eq(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.filters.push_eq(column, value.into());
        self
    }

    /// Raw condition fragment using `?` markers.
    pub fn filter<I>(mut self, expr: &str, params: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SqlValue>,
    {
        self.filters.push_raw(expr, params);
        self
    }

    /// Ordering expression, e.g. `"uid DESC"`.
    pub fn order_by(mut self, expr: impl Into<String>) -> Self {
        self.order_by.push(expr.into());
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }
}

impl ToSql for SelectBuilder {
    fn to_sql(&self) -> SqlAgentResult<(String, Vec<SqlValue>)> {
        let table = self
            .table
            .as_deref()
            .ok_or_else(|| SqlAgentError::build("select requires a FROM table"))?;

        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };
        let mut sql = format!("SELECT {} FROM {}", columns, table);
        let mut params = Vec::new();
        self.filters.render(&mut sql, &mut params);

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        Ok((self.placeholder.apply(sql), params))
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_select_star() {
        let (sql, params) = SelectBuilder::new(Vec::<String>::new())
            .from("users")
            .to_sql()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users");
        assert!(params.is_empty());
    }

    #[test]
    fn test_select_full_clause_order() {
        let (sql, params) = SelectBuilder::new(["id", "name"])
            .from("users")
            .where_eq("name", "x")
            .filter("uid > ?", [10i64])
            .order_by("uid DESC")
            .limit(5)
            .offset(10)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT id, name FROM users WHERE name = ? AND uid > ? ORDER BY uid DESC LIMIT 5 OFFSET 10"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_select_dollar() {
        let (sql, _) = SelectBuilder::new(["id"])
            .from("users")
            .where_eq("name", "x")
            .placeholder(Placeholder::Dollar)
            .to_sql()
            .unwrap();
        assert_eq!(sql, "SELECT id FROM users WHERE name = $1");
    }

    #[test]
    fn test_select_requires_from() {
        assert!(SelectBuilder::new(["id"]).to_sql().is_err());
    }
}
