//! Errors surfaced by the API gateway.

use reqwest::StatusCode;
use thiserror::Error;

/// Message reported when the server could not be reached at all.
pub const CONNECTION_ERROR_MESSAGE: &str = "Unable to connect to server";

/// Failure of a single gateway call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http {
        /// Response status.
        status: StatusCode,
        /// Message extracted from the body, or the generic fallback.
        message: String,
    },
    /// The server rejected the credential; the session has been cleared.
    #[error("{message}")]
    AuthExpired {
        /// Response status.
        status: StatusCode,
        /// Message extracted from the body, or the generic fallback.
        message: String,
    },
    /// A 2xx body could not be decoded into the expected shape.
    #[error("{message}")]
    Decode {
        /// Readable message shown to the user.
        message: String,
        /// Underlying decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The request never produced a response.
    #[error("{}", CONNECTION_ERROR_MESSAGE)]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Message suitable for display next to the form that triggered it.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status of the failed response, when there was one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } | Self::AuthExpired { status, .. } => Some(*status),
            Self::Decode { .. } => None,
            Self::Transport(err) => err.status(),
        }
    }

    /// Whether this failure tore down the session.
    #[must_use]
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_displays_server_message() {
        let err = ApiError::Http {
            status: StatusCode::NOT_FOUND,
            message: "Image history not found".to_string(),
        };
        assert_eq!(err.message(), "Image history not found");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(!err.is_auth_expired());
    }

    #[test]
    fn auth_expired_is_flagged() {
        let err = ApiError::AuthExpired {
            status: StatusCode::UNAUTHORIZED,
            message: "expired token".to_string(),
        };
        assert!(err.is_auth_expired());
        assert_eq!(err.to_string(), "expired token");
    }

    #[test]
    fn decode_error_has_no_status() {
        let source = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err = ApiError::Decode {
            message: "API Error".to_string(),
            source,
        };
        assert_eq!(err.status(), None);
        assert!(std::error::Error::source(&err).is_some());
    }
}
