use thiserror::Error;

pub type LiveResult<T> = Result<T, LiveError>;

/// Live connection failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiveError {
    #[error("invalid websocket url: {url}")]
    InvalidUrl { url: String },

    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("timeout waiting for {operation}")]
    Timeout { operation: String },

    #[error("connection closed with code {code}: {reason}")]
    ConnectionClosed { code: u16, reason: String },

    #[error("not connected")]
    NotConnected,
}

impl LiveError {
    #[must_use]
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::Timeout { .. } | Self::ConnectionClosed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable() {
        assert!(LiveError::timeout("connection").is_recoverable());
        assert!(LiveError::connection_failed("refused").is_recoverable());
        assert!(!LiveError::NotConnected.is_recoverable());
        assert!(
            !LiveError::InvalidUrl {
                url: "ftp://x".to_string()
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_display() {
        let error = LiveError::ConnectionClosed {
            code: 1000,
            reason: "bye".to_string(),
        };
        assert_eq!(error.to_string(), "connection closed with code 1000: bye");
    }
}
