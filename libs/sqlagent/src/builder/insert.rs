//! INSERT builder.

use super::{Placeholder, ToSql};
use crate::error::{SqlAgentError, SqlAgentResult};
use crate::value::SqlValue;

/// Builds `INSERT INTO table (cols...) VALUES (...), (...)`.
#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table: String,
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
    placeholder: Placeholder,
}

impl InsertBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            placeholder: Placeholder::default(),
        }
    }

    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append one row of values. Call repeatedly for multi-row inserts.
    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.rows
            .push(values.into_iter().map(Into::into).collect());
        self
    }
}

impl ToSql for InsertBuilder {
    fn to_sql(&self) -> SqlAgentResult<(String, Vec<SqlValue>)> {
        if self.table.is_empty() {
            return Err(SqlAgentError::build("insert requires a table"));
        }
        if self.rows.is_empty() {
            return Err(SqlAgentError::build("insert requires at least one row"));
        }
        if !self.columns.is_empty() {
            for row in &self.rows {
                if row.len() != self.columns.len() {
                    return Err(SqlAgentError::build(format!(
                        "insert into {}: row has {} values for {} columns",
                        self.table,
                        row.len(),
                        self.columns.len()
                    )));
                }
            }
        }

        let mut sql = format!("INSERT INTO {}", self.table);
        if !self.columns.is_empty() {
            sql.push_str(" (");
            sql.push_str(&self.columns.join(", "));
            sql.push(')');
        }
        sql.push_str(" VALUES ");

        let mut params = Vec::new();
        let tuples: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                params.extend(row.iter().cloned());
                let marks = vec!["?"; row.len()].join(", ");
                format!("({})", marks)
            })
            .collect();
        sql.push_str(&tuples.join(", "));

        Ok((self.placeholder.apply(sql), params))
    }
}
