//! Positional parameter values.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A value bound to a `?` placeholder or written inline in a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum SqlValue {
    /// NULL.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// Text.
    Text(String),
}

impl SqlValue {
    /// Renders the value as an inline SQL literal, doubling single quotes.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(true) => String::from("TRUE"),
            Self::Bool(false) => String::from("FALSE"),
            Self::Int(n) => n.to_string(),
            Self::Float(x) => x.to_string(),
            Self::Text(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }

    /// Converts to the JSON representation the datastore exchanges.
    ///
    /// Non-finite floats have no JSON form and become `null`.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Int(n) => JsonValue::from(*n),
            Self::Float(x) => serde_json::Number::from_f64(*x)
                .map_or(JsonValue::Null, JsonValue::Number),
            Self::Text(s) => JsonValue::String(s.clone()),
        }
    }

    /// Converts a scalar JSON value. Arrays and objects have no parameter
    /// form and yield `None`.
    #[must_use]
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Null => Some(Self::Null),
            JsonValue::Bool(b) => Some(Self::Bool(*b)),
            JsonValue::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            JsonValue::String(s) => Some(Self::Text(s.clone())),
            JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }
}

/// Conversion into [`SqlValue`], implemented for the primitive types callers
/// pass as parameters.
pub trait ToSqlValue {
    /// Performs the conversion.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

macro_rules! int_to_sql_value {
    ($($t:ty),*) => {
        $(impl ToSqlValue for $t {
            fn to_sql_value(self) -> SqlValue {
                SqlValue::Int(i64::from(self))
            }
        })*
    };
}

int_to_sql_value!(i8, i16, i32, i64, u8, u16, u32);

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self.to_string())
    }
}

impl ToSqlValue for &String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        self.map_or(SqlValue::Null, ToSqlValue::to_sql_value)
    }
}

/// Builds a `Vec<SqlValue>` from heterogeneous parameters.
///
/// ```
/// use tally_sql::{params, SqlValue};
///
/// let p = params!["b1", 600, None::<i64>];
/// assert_eq!(p, vec![SqlValue::Text("b1".into()), SqlValue::Int(600), SqlValue::Null]);
/// ```
#[macro_export]
macro_rules! params {
    () => { ::std::vec::Vec::<$crate::SqlValue>::new() };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::ToSqlValue::to_sql_value($value)),+]
    };
}
