//! Error types and error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::coerce::CoercionError;

/// Admin panel error type
///
/// Client mistakes (unknown collection, unknown field, a value that does not
/// fit its field) map to `400 Bad Request` with a message naming the problem.
/// Store and rendering failures map to `500` and are logged.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The requested collection is not a registered model
    #[error("This table doesn't exist or we don't know it exists: {0}")]
    UnknownCollection(String),

    /// A submitted field is not part of the model
    #[error("The field {field} doesn't exist on {collection}")]
    UnknownField {
        /// Registered model name
        collection: String,
        /// Submitted field name
        field: String,
    },

    /// A submitted value could not be coerced to its field's kind
    #[error(transparent)]
    InvalidFieldValue(#[from] CoercionError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AdminError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownCollection(_) | Self::UnknownField { .. } | Self::InvalidFieldValue(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Database(_) | Self::Template(_) | Self::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Admin request failed");
            return (status, "Internal server error").into_response();
        }

        tracing::debug!(error = %self, "Rejected admin request");
        (status, self.to_string()).into_response()
    }
}
