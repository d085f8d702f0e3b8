//! API error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Errors a request handler can surface to the client.
///
/// Upstream provider failures never appear here; the enrichment and Q&A flows
/// degrade instead. Storage failures arrive as [`AgaryError::Internal`].
#[derive(Debug, thiserror::Error)]
pub enum AgaryError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{context}")]
    Internal {
        context: &'static str,
        cause: anyhow::Error,
    },
}

impl AgaryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Wrap an internal failure with the client-facing summary for the operation.
    pub fn internal(context: &'static str, cause: anyhow::Error) -> Self {
        Self::Internal { context, cause }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for AgaryError {
    fn from(cause: anyhow::Error) -> Self {
        Self::internal("Internal server error", cause)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AgaryError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = match &self {
            Self::Internal { context, cause } => {
                let details = format!("{cause:#}");
                tracing::error!(context = %context, error = %details, "request failed");
                Some(details)
            }
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}
