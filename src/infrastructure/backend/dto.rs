//! Backend wire formats.

use serde::Deserialize;

use crate::domain::entities::User;
use crate::domain::errors::{FieldErrors, RequestError};

/// `POST /auth/login` and `GET /auth/google` success body.
#[derive(Debug, Deserialize)]
pub struct LoginResponseDto {
    /// Session token, when the backend returns it in the body as well as the cookie.
    #[serde(default)]
    pub token: Option<String>,
    pub user: User,
}

/// `GET /auth/session` success body: `{ "user": {...} }` or the bare user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SessionPayload {
    Wrapped { user: User },
    Bare(User),
}

impl SessionPayload {
    #[must_use]
    pub fn into_user(self) -> User {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => user,
        }
    }
}

/// `GET /auth/validate-existing-email` success body.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EmailCheckDto {
    Available { available: bool },
    Exists {
        #[serde(alias = "isRegistered")]
        exists: bool,
    },
    /// Bare flag answering "does this email already exist".
    Flag(bool),
}

impl EmailCheckDto {
    #[must_use]
    pub const fn is_available(&self) -> bool {
        match self {
            Self::Available { available } => *available,
            Self::Exists { exists } | Self::Flag(exists) => !*exists,
        }
    }
}

/// `GET /auth/google-signup-url` success body.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SignupUrlDto {
    Object {
        #[serde(alias = "signupUrl")]
        url: String,
    },
    Bare(String),
}

impl SignupUrlDto {
    #[must_use]
    pub fn into_url(self) -> String {
        match self {
            Self::Object { url } | Self::Bare(url) => url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageField {
    One(String),
    Many(Vec<String>),
}

/// Error body. `message` is a string or a list of field messages
/// (`"email must be an email"`).
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    message: Option<MessageField>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<FieldErrors>,
}

impl ErrorBody {
    /// Parses an error body, tolerating non-JSON payloads.
    #[must_use]
    pub fn parse(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// Returns the human-readable message and any field errors.
    #[must_use]
    pub fn into_parts(self, status: u16, reason: Option<&str>) -> (String, FieldErrors) {
        let mut fields = self.errors.unwrap_or_default();

        let message = match self.message {
            Some(MessageField::One(message)) => Some(message),
            Some(MessageField::Many(messages)) => {
                if fields.is_empty() {
                    for message in &messages {
                        if let Some((field, _)) = message.split_once(' ') {
                            fields
                                .entry(field.to_string())
                                .or_default()
                                .push(message.clone());
                        }
                    }
                }
                Some(messages.join("; "))
            }
            None => None,
        }
        .filter(|m| !m.trim().is_empty())
        .or(self.error)
        .or_else(|| reason.map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {status}"));

        (message, fields)
    }

    /// Classifies the failure for a non-success status.
    #[must_use]
    pub fn into_error(self, status: u16, reason: Option<&str>) -> RequestError {
        let (message, fields) = self.into_parts(status, reason);
        RequestError::from_status(status, message, fields)
    }
}
