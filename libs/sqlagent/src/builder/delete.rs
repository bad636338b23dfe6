//! DELETE builder.
//!
//! A DELETE with no WHERE clause is a build error unless the caller opts
//! in with `allow_unfiltered`.

use super::{Filters, Placeholder, ToSql};
use crate::error::{SqlAgentError, SqlAgentResult};
use crate::value::SqlValue;

#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    table: String,
    filters: Filters,
    allow_unfiltered: bool,
    placeholder: Placeholder,
}

impl DeleteBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Filters::default(),
            allow_unfiltered: false,
            placeholder: Placeholder::default(),
        }
    }

    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
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

    /// Permit deleting every row in the table.
    pub fn allow_unfiltered(mut self) -> Self {
        self.allow_unfiltered = true;
        self
    }
}

impl ToSql for DeleteBuilder {
    fn to_sql(&self) -> SqlAgentResult<(String, Vec<SqlValue>)> {
        if self.table.is_empty() {
            return Err(SqlAgentError::build("delete requires a table"));
        }
        if self.filters.is_empty() && !self.allow_unfiltered {
            return Err(SqlAgentError::build(format!(
                "delete from {} has no WHERE clause, call allow_unfiltered to permit it",
                self.table
            )));
        }

        let mut sql = format!("DELETE FROM {}", self.table);
        let mut params = Vec::new();
        self.filters.render(&mut sql, &mut params);

        Ok((self.placeholder.apply(sql), params))
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_delete_with_where() {
        let (sql, params) = DeleteBuilder::new("users")
            .where_eq("name", "x")
            .to_sql()
            .unwrap();
        assert_eq!(sql, "DELETE FROM users WHERE name = ?");
        assert_eq!(params, vec![SqlValue::Text("x".into())]);
    }

    #[test]
    fn test_unfiltered_delete_needs_opt_in() {
        assert!(DeleteBuilder::new("users").to_sql().is_err());

        let (sql, params) = DeleteBuilder::new("users")
            .allow_unfiltered()
            .to_sql()
            .unwrap();
        assert_eq!(sql, "DELETE FROM users");
        assert!(params.is_empty());
    }
}
