//! Request error taxonomy.

use std::collections::BTreeMap;

use thiserror::Error;

/// Field name to validation messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Failure of a backend request or of the local checks guarding it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum RequestError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("validation failed: {message}")]
    Validation {
        /// `None` when the form was rejected before any request was sent.
        status: Option<u16>,
        message: String,
        fields: FieldErrors,
    },

    #[error("not authenticated: {message}")]
    Auth { status: u16, message: String },

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("superseded by a newer session operation")]
    Superseded,

    #[error("unexpected error: {message}")]
    Unexpected { message: String },
}

impl RequestError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates local validation error without field details.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation {
            status: None,
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }

    /// Creates malformed response error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Classifies a non-success upstream status.
    ///
    /// 401 and 403 are auth failures, other 4xx are validation failures,
    /// 5xx are server failures.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>, fields: FieldErrors) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Auth { status, message },
            400..=499 => Self::Validation {
                status: Some(status),
                message,
                fields,
            },
            500..=599 => Self::Server { status, message },
            _ => Self::Unexpected {
                message: format!("unexpected status {status}: {message}"),
            },
        }
    }

    /// Returns upstream status, if the request reached the backend.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Validation { status, .. } => *status,
            Self::Auth { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns field-level messages of a validation failure.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }

    /// Returns whether the backend rejected the session.
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Returns whether retrying later may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Server { .. })
    }
}

impl From<validator::ValidationErrors> for RequestError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: FieldErrors = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map_or_else(|| e.code.to_string(), ToString::to_string)
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        let message = fields
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field}: {m}")))
            .collect::<Vec<_>>()
            .join("; ");

        Self::Validation {
            status: None,
            message,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(401, "auth" ; "unauthorized")]
    #[test_case(403, "auth" ; "forbidden")]
    #[test_case(400, "validation" ; "bad_request")]
    #[test_case(409, "validation" ; "conflict")]
    #[test_case(422, "validation" ; "unprocessable")]
    #[test_case(500, "server" ; "internal")]
    #[test_case(503, "server" ; "unavailable")]
    #[test_case(302, "unexpected" ; "redirect")]
    fn test_classification(status: u16, expected: &str) {
        let error = RequestError::from_status(status, "boom", FieldErrors::new());
        let kind = match error {
            RequestError::Auth { .. } => "auth",
            RequestError::Validation { .. } => "validation",
            RequestError::Server { .. } => "server",
            _ => "unexpected",
        };
        assert_eq!(kind, expected);
    }

    #[test]
    fn test_status_is_carried() {
        let error = RequestError::from_status(422, "bad", FieldErrors::new());
        assert_eq!(error.status(), Some(422));
        assert_eq!(RequestError::network("down").status(), None);
    }

    #[test]
    fn test_field_errors_only_when_present() {
        let mut fields = FieldErrors::new();
        fields.insert("email".to_string(), vec!["taken".to_string()]);

        let with_fields = RequestError::from_status(400, "bad", fields);
        let without = RequestError::invalid("bad");

        assert_eq!(with_fields.field_errors().map(BTreeMap::len), Some(1));
        assert!(without.field_errors().is_none());
    }

    #[test]
    fn test_recoverability() {
        assert!(RequestError::network("x").is_recoverable());
        assert!(RequestError::from_status(502, "x", FieldErrors::new()).is_recoverable());
        assert!(!RequestError::from_status(401, "x", FieldErrors::new()).is_recoverable());
        assert!(!RequestError::Superseded.is_recoverable());
    }
}
