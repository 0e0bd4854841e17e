//! Bound statements and SQL values.

use std::fmt;

/// A SQL parameter value.
///
/// The catalog only ever binds text and boolean columns, so the enum is
/// closed over those two shapes; `NULL` is a typed absence so adapters can
/// bind it with the correct wire type.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// A text value, or a text-typed NULL.
    Text(Option<String>),
    /// A boolean value, or a boolean-typed NULL.
    Bool(Option<bool>),
}

impl SqlValue {
    /// Creates a non-null text value.
    pub fn text(value: impl Into<String>) -> Self {
        SqlValue::Text(Some(value.into()))
    }

    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Text(None) | SqlValue::Bool(None))
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(Some(value))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        SqlValue::Text(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(Some(value))
    }
}

impl From<Option<bool>> for SqlValue {
    fn from(value: Option<bool>) -> Self {
        SqlValue::Bool(value)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Text(Some(s)) => write!(f, "'{}'", s),
            SqlValue::Bool(Some(b)) => write!(f, "{}", b),
            SqlValue::Text(None) | SqlValue::Bool(None) => f.write_str("NULL"),
        }
    }
}

/// A statement template paired with its bound values, ready to execute.
///
/// The SQL text always comes from the static catalog; only values are
/// parameterized, never identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    /// The parameterized statement text.
    pub sql: &'static str,
    /// Values in `$1..$n` order.
    pub params: Vec<SqlValue>,
}

impl BoundStatement {
    /// Creates a bound statement.
    pub fn new(sql: &'static str, params: Vec<SqlValue>) -> Self {
        Self { sql, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(SqlValue::from("x".to_string()), SqlValue::text("x"));
        assert_eq!(SqlValue::from(None::<String>), SqlValue::Text(None));
        assert_eq!(SqlValue::from(true), SqlValue::Bool(Some(true)));
        assert_eq!(SqlValue::from(None::<bool>), SqlValue::Bool(None));
    }

    #[test]
    fn null_detection() {
        assert!(SqlValue::Text(None).is_null());
        assert!(SqlValue::Bool(None).is_null());
        assert!(!SqlValue::text("x").is_null());
        assert!(!SqlValue::Bool(Some(false)).is_null());
    }

    #[test]
    fn display_forms() {
        assert_eq!(SqlValue::text("a").to_string(), "'a'");
        assert_eq!(SqlValue::Bool(Some(false)).to_string(), "false");
        assert_eq!(SqlValue::Text(None).to_string(), "NULL");
    }
}
