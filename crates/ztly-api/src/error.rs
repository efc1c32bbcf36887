use thiserror::Error;

/// Top-level error type for the `ztly-api` crate.
///
/// Covers every failure mode of the controller API surface:
/// authentication, transport, controller-reported failures, and decoding.
/// `ztly-core` wraps these with the operation and network that failed.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The controller rejected the `X-ZT1-Auth` token (HTTP 401/403).
    #[error("Invalid controller auth token")]
    InvalidAuthToken,

    /// The token could not be encoded as a header value.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// A network or member ID that cannot be used as a path segment.
    #[error("Invalid identifier: {id:?}")]
    InvalidId { id: String },

    // ── Controller ──────────────────────────────────────────────────
    /// Non-success status reported by the controller.
    #[error("Controller error (HTTP {status}): {message}")]
    Controller { status: u16, message: String },

    /// The controller is reachable but its status carries no node address,
    /// so network IDs cannot be generated.
    #[error("Controller status did not report a node address")]
    MissingAddress,

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Controller { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Controller { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` if the controller could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Controller {
            status: 503,
            message: "busy".into(),
        };
        assert!(err.is_transient());
        assert!(!err.is_not_found());
    }

    #[test]
    fn controller_404_is_not_found() {
        let err = Error::Controller {
            status: 404,
            message: "not found".into(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_transient());
    }

    #[test]
    fn auth_errors_are_permanent() {
        assert!(!Error::InvalidAuthToken.is_transient());
        assert!(!Error::MissingAddress.is_transient());
    }
}
