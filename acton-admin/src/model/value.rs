//! Typed field values and their display form

use chrono::NaiveDateTime;
use std::fmt;

/// `DD/MM/YYYY HH:MM:SS`, used both for parsing submitted dates and for
/// rendering timestamps
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// A typed value read from the store or produced by coercion
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Boolean
    Bool(bool),
    /// Integer
    Integer(i64),
    /// Float
    Float(f64),
    /// Timestamp
    Timestamp(NaiveDateTime),
    /// Duration in whole seconds
    Duration(i64),
    /// Text
    Text(String),
    /// SQL `NULL`
    Null,
}

impl FieldValue {
    /// Whether this is SQL `NULL`
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Presentation form used by the admin page
///
/// Timestamps use [`TIMESTAMP_FORMAT`], `NULL` renders empty and durations
/// render as `1h2m3s`.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
            Self::Duration(secs) => f.write_str(&format_duration(*secs)),
            Self::Text(s) => f.write_str(s),
            Self::Null => Ok(()),
        }
    }
}

/// Render whole seconds as `1h2m3s`, omitting leading zero units
#[must_use]
pub fn format_duration(secs: i64) -> String {
    if secs == 0 {
        return "0s".to_string();
    }
    let sign = if secs < 0 { "-" } else { "" };
    let total = secs.unsigned_abs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{seconds}s")
    } else {
        format!("{sign}{seconds}s")
    }
}
