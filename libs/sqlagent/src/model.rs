//! Struct-to-column reflection via serde.
//!
//! Column names are the model's serde field names, so `#[serde(rename)]`
//! plays the role of a column tag. Reflection goes through serde_json,
//! whose map keeps keys sorted; the derived column order is therefore
//! deterministic and unaffected by field reordering.

use crate::builder::{InsertBuilder, UpdateBuilder};
use crate::error::{SqlAgentError, SqlAgentResult};
use crate::value::SqlValue;
use serde::Serialize;

/// Serialize `model` into sorted `(column, value)` pairs, minus `ignore`.
fn model_map<T: Serialize>(model: &T, ignore: &[&str]) -> SqlAgentResult<Vec<(String, SqlValue)>> {
    let value = serde_json::to_value(model).map_err(|e| SqlAgentError::Model(e.to_string()))?;
    let map = match value {
        serde_json::Value::Object(map) => map,
        other => {
            return Err(SqlAgentError::Model(format!(
                "model must serialize to a map of columns, got {}",
                json_kind(&other)
            )))
        },
    };

    Ok(map
        .into_iter()
        .filter(|(name, _)| !ignore.contains(&name.as_str()))
        .map(|(name, value)| (name, SqlValue::from_json(value)))
        .collect())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Column names of `model`, minus `ignore`, in sorted order.
pub fn model_columns<T: Serialize>(model: &T, ignore: &[&str]) -> SqlAgentResult<Vec<String>> {
    Ok(model_map(model, ignore)?
        .into_iter()
        .map(|(name, _)| name)
        .collect())
}

/// Insert builder for `table` with columns and values taken from `model`.
pub fn insert_model<T: Serialize>(
    table: impl Into<String>,
    model: &T,
    ignore: &[&str],
) -> SqlAgentResult<InsertBuilder> {
    let pairs = model_map(model, ignore)?;
    let (columns, values): (Vec<String>, Vec<SqlValue>) = pairs.into_iter().unzip();
    Ok(InsertBuilder::new(table).columns(columns).values(values))
}

/// Add one SET clause per field of `model` to an update builder.
pub fn update_model_columns<T: Serialize>(
    builder: UpdateBuilder,
    model: &T,
    ignore: &[&str],
) -> SqlAgentResult<UpdateBuilder> {
    let mut builder = builder;
    for (column, value) in model_map(model, ignore)? {
        builder = builder.set(column, value);
    }
    Ok(builder)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::builder::ToSql;

    #[derive(Serialize)]
    struct User {
        id: i64,
        name: String,
        uid: i64,
    }

    // Same columns as User, declared in a different order.
    #[derive(Serialize)]
    struct UserReordered {
        uid: i64,
        id: i64,
        name: String,
    }

    fn sample() -> User {
        User {
            id: 1,
            name: "testuser".into(),
            uid: 1001,
        }
    }

    #[test]
    fn test_model_columns_excludes_ignore_list() {
        let columns = model_columns(&sample(), &["id"]).unwrap();
        assert_eq!(columns, vec!["name", "uid"]);

        let all = model_columns(&sample(), &[]).unwrap();
        assert_eq!(all, vec!["id", "name", "uid"]);
    }

    #[test]
    fn test_model_columns_stable_under_field_reordering() {
        let reordered = UserReordered {
            uid: 1001,
            id: 1,
            name: "testuser".into(),
        };
        assert_eq!(
            model_columns(&sample(), &["id"]).unwrap(),
            model_columns(&reordered, &["id"]).unwrap()
        );
    }

    #[test]
    fn test_serde_rename_is_the_column_tag() {
        #[derive(Serialize)]
        struct Tagged {
            #[serde(rename = "user_name")]
            name: String,
        }
        let columns = model_columns(&Tagged { name: "x".into() }, &[]).unwrap();
        assert_eq!(columns, vec!["user_name"]);
    }

    #[test]
    fn test_insert_model_renders() {
        let (sql, params) = insert_model("users", &sample(), &["id"])
            .unwrap()
            .to_sql()
            .unwrap();
        assert_eq!(sql, "INSERT INTO users (name, uid) VALUES (?, ?)");
        assert_eq!(
            params,
            vec![SqlValue::Text("testuser".into()), SqlValue::Int(1001)]
        );
    }

    #[test]
    fn test_update_model_columns_renders() {
        let builder = update_model_columns(UpdateBuilder::new("users"), &sample(), &["id"]).unwrap();
        let (sql, params) = builder.to_sql().unwrap();
        assert_eq!(sql, "UPDATE users SET name = ?, uid = ?");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_non_map_model_is_an_error() {
        let err = model_columns(&42i64, &[]).unwrap_err();
        assert!(matches!(err, SqlAgentError::Model(_)));
    }
}
