//! Attribute kinds and scalar values
//!
//! Inbound JSON leaves pass through unchanged, except for date/time
//! attributes which are parsed into UTC timestamps.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Display format for timestamps, e.g. `2014-05-29 08:59:39 +0000`
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Declared type of a local attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrKind {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    #[serde(alias = "datetime")]
    Time,
}

impl AttrKind {
    /// Whether values of this kind go through the date parser
    pub fn is_temporal(self) -> bool {
        matches!(self, AttrKind::Date | AttrKind::Time)
    }
}

/// A local attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Time(DateTime<Utc>),
    /// Anything else (nested arrays or objects mapped onto a scalar field)
    Json(Value),
}

impl Scalar {
    /// Convert a JSON value without coercion
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Scalar::Null,
            Value::Bool(b) => Scalar::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Scalar::Int(i),
                None => n.as_f64().map(Scalar::Float).unwrap_or(Scalar::Null),
            },
            Value::String(s) => Scalar::Text(s.clone()),
            other => Scalar::Json(other.clone()),
        }
    }

    /// Convert a JSON value for an attribute of the given kind
    ///
    /// Temporal attributes accept RFC 3339 strings; anything unparseable
    /// becomes `Null`. Every other kind passes through.
    pub fn coerce(kind: AttrKind, value: &Value) -> Self {
        if kind.is_temporal() {
            value
                .as_str()
                .and_then(parse_date)
                .map(Scalar::Time)
                .unwrap_or(Scalar::Null)
        } else {
            Scalar::from_json(value)
        }
    }

    /// Convert back to JSON for outbound payloads
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Int(i) => Value::Number((*i).into()),
            Scalar::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            Scalar::Text(s) => Value::String(s.clone()),
            Scalar::Time(t) => Value::String(t.to_rfc3339()),
            Scalar::Json(v) => v.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Scalar::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Interpret the value as a remote identity (`10` or `"10"`)
    pub fn as_identity(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            Scalar::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
            Scalar::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Int(i64::from(i))
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(t: DateTime<Utc>) -> Self {
        Scalar::Time(t)
    }
}

/// Parse a remote timestamp (`yyyy-MM-ddTHH:mm:ss+hh:mm`) into UTC
///
/// Returns `None` when the input does not match.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Identity carried by a JSON value, if any
pub fn identity_of(value: &Value) -> Option<i64> {
    Scalar::from_json(value).as_identity()
}
