//! Session token value object.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::serde_utils;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "user_auth";

/// Claims carried in the session token payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Expiry as a unix timestamp in seconds.
    pub exp: i64,
    /// Issue time as a unix timestamp in seconds.
    #[serde(default)]
    pub iat: Option<i64>,
    /// Roles granted to the subject.
    #[serde(default, deserialize_with = "serde_utils::string_or_seq")]
    pub roles: Vec<String>,
    /// Subject user id.
    #[serde(rename = "userId", default, deserialize_with = "serde_utils::opt_id_string")]
    pub user_id: Option<String>,
}

/// Server-issued signed session token.
///
/// The client never verifies the signature. Claims are decoded only to skip
/// requests that the backend would reject anyway because the token expired.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    value: String,
}

impl SessionToken {
    /// Creates token from a non-empty string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return None;
        }

        Some(Self { value })
    }

    /// Returns token as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consumes token and returns inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.value
    }

    /// Decodes the payload segment without verifying the signature.
    #[must_use]
    pub fn claims(&self) -> Option<TokenClaims> {
        let mut segments = self.value.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return None;
        };

        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Returns whether the token is expired at `now`.
    ///
    /// A token whose claims cannot be decoded counts as expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.claims()
            .is_none_or(|claims| claims.exp <= now.timestamp())
    }

    /// Returns whether the token is expired now.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns masked token for display.
    #[must_use]
    pub fn masked(&self) -> String {
        let len = self.value.len();
        if len <= 10 {
            return "*".repeat(len);
        }

        let prefix = self.value.get(..4).unwrap_or_default();
        let suffix = self.value.get(len - 4..).unwrap_or_default();
        format!("{prefix}...{suffix}")
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Builds an unsigned token carrying the given payload.
    pub fn token_with_payload(payload: &str) -> SessionToken {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload);
        SessionToken::new(format!("{header}.{body}.c2lnbmF0dXJl")).unwrap()
    }

    /// Builds a token expiring at `exp`.
    pub fn token_expiring_at(exp: i64) -> SessionToken {
        token_with_payload(&format!(
            r#"{{"exp":{exp},"iat":{},"roles":"USER","userId":"1"}}"#,
            exp - 3600
        ))
    }
}
