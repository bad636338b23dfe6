//! Owned query parameter values.

/// A bound SQL parameter, owned so builders stay self-contained values.
///
/// JSON numbers become `Int` when integral, `Float` otherwise; arrays and
/// objects are carried as their JSON text.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    pub(crate) fn from_json(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::Text(s),
            other => Self::Text(other.to_string()),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(SqlValue::from_json(json!(null)), SqlValue::Null);
        assert_eq!(SqlValue::from_json(json!(true)), SqlValue::Bool(true));
        assert_eq!(SqlValue::from_json(json!(42)), SqlValue::Int(42));
        assert_eq!(SqlValue::from_json(json!(1.5)), SqlValue::Float(1.5));
        assert_eq!(
            SqlValue::from_json(json!("x")),
            SqlValue::Text("x".into())
        );
    }

    #[test]
    fn test_from_json_compound_becomes_text() {
        assert_eq!(
            SqlValue::from_json(json!([1, 2])),
            SqlValue::Text("[1,2]".into())
        );
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(SqlValue::from(Some(7i64)), SqlValue::Int(7));
        assert_eq!(SqlValue::from(Option::<i64>::None), SqlValue::Null);
    }
}
