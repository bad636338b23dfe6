//! Structured SQL builders.
//!
//! Builders are immutable fluent values: they accumulate clauses and bound
//! parameters and render to SQL text plus a parameter list only when
//! `to_sql` is called, never touching the database themselves.
//!
//! All builders accumulate with `?` placeholders; dollar-style drivers get
//! a numbering pass at render time. `??` escapes a literal question mark in
//! raw filter fragments.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use select::SelectBuilder;
pub use update::UpdateBuilder;

use crate::error::SqlAgentResult;
use crate::value::SqlValue;

/// SQL placeholder style, selected by driver kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholder {
    /// Positional `?` (mysql, sqlite).
    #[default]
    Question,
    /// Numbered `$1..$n` (postgresql).
    Dollar,
}

impl Placeholder {
    /// Apply this placeholder style to SQL rendered with `?` markers.
    pub(crate) fn apply(&self, sql: String) -> String {
        match self {
            Self::Question => sql,
            Self::Dollar => number_placeholders(&sql),
        }
    }
}

impl From<sqlagent_config::DriverKind> for Placeholder {
    fn from(kind: sqlagent_config::DriverKind) -> Self {
        match kind {
            sqlagent_config::DriverKind::Postgresql => Self::Dollar,
            _ => Self::Question,
        }
    }
}

/// A value renderable to SQL text plus its bound parameters.
pub trait ToSql {
    fn to_sql(&self) -> SqlAgentResult<(String, Vec<SqlValue>)>;
}

/// Rewrite `?` markers to `$1..$n`; `??` renders a literal `?`.
fn number_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut n = 0u32;
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '?' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'?') {
            chars.next();
            out.push('?');
        } else {
            n += 1;
            out.push('$');
            out.push_str(&n.to_string());
        }
    }
    out
}

/// WHERE clause accumulator shared by update/delete/select.
#[derive(Debug, Clone, Default)]
pub(crate) struct Filters {
    conditions: Vec<String>,
    params: Vec<SqlValue>,
}

impl Filters {
    pub(crate) fn push_eq(&mut self, column: &str, value: SqlValue) {
        self.conditions.push(format!("{} = ?", column));
        self.params.push(value);
    }

    pub(crate) fn push_raw<I>(&mut self, expr: &str, params: I)
    where
        I: IntoIterator,
        I::Item: Into<SqlValue>,
    {
        self.conditions.push(expr.to_string());
        self.params.extend(params.into_iter().map(Into::into));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Append ` WHERE a AND b` to `sql` and the bound params to `params`.
    pub(crate) fn render(&self, sql: &mut String, params: &mut Vec<SqlValue>) {
        if self.conditions.is_empty() {
            return;
        }
        sql.push_str(" WHERE ");
        sql.push_str(&self.conditions.join(" AND "));
        params.extend(self.params.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_placeholders() {
        assert_eq!(
            number_placeholders("INSERT INTO t (a, b) VALUES (?, ?)"),
            "INSERT INTO t (a, b) VALUES ($1, $2)"
        );
        assert_eq!(number_placeholders("SELECT 1"), "SELECT 1");
    }

    #[test]
    fn test_placeholder_per_driver() {
        use sqlagent_config::DriverKind;
        assert_eq!(Placeholder::from(DriverKind::Mysql), Placeholder::Question);
        assert_eq!(Placeholder::from(DriverKind::Sqlite), Placeholder::Question);
        assert_eq!(
            Placeholder::from(DriverKind::Postgresql),
            Placeholder::Dollar
        );
    }

    #[test]
    fn test_double_question_escapes() {
        assert_eq!(
            number_placeholders("SELECT data ?? 'k' FROM t WHERE id = ?"),
            "SELECT data ? 'k' FROM t WHERE id = $1"
        );
    }
}
