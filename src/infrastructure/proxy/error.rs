use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::domain::errors::RequestError;
use crate::infrastructure::backend::dto::ErrorBody;

/// Failure of a relayed auth request, rendered as `{ "error": message }`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("upstream unreachable: {message}")]
    Unreachable { message: String },
}

impl ProxyError {
    /// Builds the error for a non-success upstream answer.
    #[must_use]
    pub fn from_upstream(status: u16, body: &[u8]) -> Self {
        let reason = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason());
        let (message, _) = ErrorBody::parse(body).into_parts(status, reason);
        Self::Upstream { status, message }
    }

    /// Upstream status when usable as an error status, 500 otherwise.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Upstream { status, .. } if *status >= 400 => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Upstream { message, .. } | Self::Unreachable { message } => message,
        }
    }
}

impl From<RequestError> for ProxyError {
    fn from(error: RequestError) -> Self {
        Self::Unreachable {
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "Auth proxy request failed");
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
