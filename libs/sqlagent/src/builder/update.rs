//! UPDATE builder.

use super::{Filters, Placeholder, ToSql};
use crate::error::{SqlAgentError, SqlAgentResult};
use crate::value::SqlValue;

/// Builds `UPDATE table SET col = ?, ... [WHERE ...]`.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: String,
    sets: Vec<(String, SqlValue)>,
    filters: Filters,
    placeholder: Placeholder,
}

impl UpdateBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            sets: Vec::new(),
            filters: Filters::default(),
            placeholder: Placeholder::default(),
        }
    }

    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.sets.push((column.into(), value.into()));
        self
    }

    pub fn where_eq(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.filters.push_eq(column, value.into());
        self
    }

    /// Raw condition fragment using `?` markers, e.g. `"uid > ?"`.
    pub fn filter<I>(mut self, expr: &str, params: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SqlValue>,
    {
        self.filters.push_raw(expr, params);
        self
    }
}

impl ToSql for UpdateBuilder {
    fn to_sql(&self) -> SqlAgentResult<(String, Vec<SqlValue>)> {
        if self.table.is_empty() {
            return Err(SqlAgentError::build("update requires a table"));
        }
        if self.sets.is_empty() {
            return Err(SqlAgentError::build(format!(
                "update {} has no SET clauses",
                self.table
            )));
        }

        let mut params: Vec<SqlValue> = Vec::with_capacity(self.sets.len());
        let assignments: Vec<String> = self
            .sets
            .iter()
            .map(|(col, value)| {
                params.push(value.clone());
                format!("{} = ?", col)
            })
            .collect();

        let mut sql = format!("UPDATE {} SET {}", self.table, assignments.join(", "));
        self.filters.render(&mut sql, &mut params);

        Ok((self.placeholder.apply(sql), params))
    }
}
