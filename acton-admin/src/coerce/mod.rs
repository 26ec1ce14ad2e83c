//! Coercion of submitted form values into typed field values
//!
//! Forms submit every value as text. The declared [`FieldKind`] of the target
//! field decides how that text is parsed:
//!
//! | kind | accepted input |
//! |---|---|
//! | `Bool` | `1 t T TRUE true True` / `0 f F FALSE false False` |
//! | `Integer`, `Duration` | base-10 signed integer |
//! | `Float` | decimal number |
//! | `Timestamp` | `DD/MM/YYYY HH:MM:SS` |
//! | `NullableTimestamp` | empty, or `DD/MM/YYYY HH:MM:SS` |
//! | `Text` | anything |
//!
//! An empty value submitted for a nullable field is stored as `NULL`
//! whatever its kind.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::error::AdminError;
use crate::model::{FieldKind, FieldValue, ResolvedModel, TIMESTAMP_FORMAT};

/// A submitted value did not fit its field
///
/// Each variant carries the naming-converted key of the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// Not a boolean
    #[error("We were expecting a boolean for the field: {field}")]
    InvalidBoolean {
        /// Naming-converted field key
        field: String,
    },

    /// Not a base-10 integer, or out of range
    #[error("We were expecting an integer for the field: {field}")]
    InvalidInteger {
        /// Naming-converted field key
        field: String,
    },

    /// Not a decimal number
    #[error("We were expecting a float for the field: {field}")]
    InvalidFloat {
        /// Naming-converted field key
        field: String,
    },

    /// Not a `DD/MM/YYYY HH:MM:SS` date
    #[error("We were expecting a date in the format: DD/MM/YYYY HH:MM:SS for the field: {field}")]
    InvalidTimestamp {
        /// Naming-converted field key
        field: String,
    },
}

impl CoercionError {
    /// Key of the offending field
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidBoolean { field }
            | Self::InvalidInteger { field }
            | Self::InvalidFloat { field }
            | Self::InvalidTimestamp { field } => field,
        }
    }
}

/// A coerced column assignment, ready for an update statement
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    /// Column to assign
    pub column: String,
    /// Declared kind of the column, used to type `NULL` binds
    pub kind: FieldKind,
    /// Typed value
    pub value: FieldValue,
}

/// Parse the canonical textual boolean forms
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Coerce a raw form value into the given kind
///
/// `key` is the naming-converted field key reported in errors.
pub fn coerce(raw: &str, kind: FieldKind, key: &str) -> Result<FieldValue, CoercionError> {
    match kind {
        FieldKind::Bool => parse_bool(raw)
            .map(FieldValue::Bool)
            .ok_or_else(|| CoercionError::InvalidBoolean { field: key.to_string() }),
        FieldKind::Integer => raw
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| CoercionError::InvalidInteger { field: key.to_string() }),
        FieldKind::Duration => raw
            .parse::<i64>()
            .map(FieldValue::Duration)
            .map_err(|_| CoercionError::InvalidInteger { field: key.to_string() }),
        FieldKind::Float => raw
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|_| CoercionError::InvalidFloat { field: key.to_string() }),
        FieldKind::Timestamp => parse_timestamp(raw, key).map(FieldValue::Timestamp),
        FieldKind::NullableTimestamp if raw.is_empty() => Ok(FieldValue::Null),
        FieldKind::NullableTimestamp => parse_timestamp(raw, key).map(FieldValue::Timestamp),
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
    }
}

fn parse_timestamp(raw: &str, key: &str) -> Result<NaiveDateTime, CoercionError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|_| CoercionError::InvalidTimestamp { field: key.to_string() })
}

/// Coerce a submitted form against a model
///
/// Pairs are processed in submission order and the first value of a repeated
/// key wins. Processing stops at the first field that is unknown or does not
/// coerce; nothing is returned for the fields before it, so a caller either
/// gets the complete change set or none of it.
pub fn coerce_form(
    model: &ResolvedModel,
    pairs: &[(String, String)],
) -> Result<Vec<Change>, AdminError> {
    let mut changes: Vec<Change> = Vec::with_capacity(pairs.len());
    let mut seen: Vec<&str> = Vec::with_capacity(pairs.len());

    for (name, raw) in pairs {
        if seen.contains(&name.as_str()) {
            continue;
        }
        seen.push(name);

        let field = model.field(name).ok_or_else(|| AdminError::UnknownField {
            collection: model.name().to_string(),
            field: name.clone(),
        })?;
        let value = if field.nullable && raw.is_empty() {
            FieldValue::Null
        } else {
            coerce(raw, field.kind, &field.column)?
        };
        tracing::trace!(column = %field.column, ?value, "Coerced form field");

        changes.push(Change {
            column: field.column.clone(),
            kind: field.kind,
            value,
        });
    }

    Ok(changes)
}
