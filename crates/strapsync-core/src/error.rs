// ── Core error types ──
//
// User-facing errors from strapsync-core. Consumers never see raw HTTP or
// JSON failures: the `From<strapsync_api::Error>` impl translates them into
// domain variants.

use thiserror::Error;

/// Unified error type for the engine.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    // ── Selection errors ─────────────────────────────────────────────
    /// An operator-selected value cannot be used (no fields, no id, empty array).
    #[error("Invalid selection: {0}")]
    InvalidSelection(#[from] InvalidSelection),

    #[error("Nothing to transfer: {reason}")]
    NothingToTransfer { reason: String },

    // ── Transfer errors ──────────────────────────────────────────────
    #[error("Failed to publish {target}: {message}")]
    PublishFailed { target: String, message: String },

    #[error("Asset {source_id} has no destination counterpart")]
    UnmappedAsset { source_id: i64 },

    #[error("Asset transfer failed for {name}: {message}")]
    AssetFailed { name: String, message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Resource not found: {path}")]
    NotFound { path: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Local I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// A choice that does not resolve to a usable value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSelection {
    #[error("{input:?} is not a number")]
    NotANumber { input: String },

    #[error("{choice} is out of range (1-{len})")]
    OutOfRange { choice: usize, len: usize },

    #[error("there are no options to choose from")]
    NoOptions,

    #[error("{what} has no fields")]
    NoFields { what: String },

    #[error("{what} has no documentId")]
    MissingId { what: String },

    #[error("field {field:?} is not an array")]
    NotAnArray { field: String },

    #[error("field {field:?} is empty")]
    EmptyArray { field: String },

    #[error("{what} has no document")]
    MissingDocument { what: String },

    #[error("entry {entry:?} does not exist")]
    UnknownEntry { entry: String },
}

impl CoreError {
    /// Returns `true` for failures that abort before any write happened.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<strapsync_api::Error> for CoreError {
    fn from(err: strapsync_api::Error) -> Self {
        match err {
            strapsync_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            strapsync_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            strapsync_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            strapsync_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            strapsync_api::Error::Api { status: 404, message } => {
                CoreError::NotFound { path: message }
            }
            strapsync_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            strapsync_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            strapsync_api::Error::Io(e) => CoreError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_maps_to_auth_failure() {
        let err: CoreError = strapsync_api::Error::Authentication {
            message: "failed to login with email a@b.c".into(),
        }
        .into();
        assert!(err.is_auth_failure());
        assert!(err.to_string().contains("a@b.c"));
    }

    #[test]
    fn api_status_is_preserved() {
        let err: CoreError = strapsync_api::Error::Api {
            status: 400,
            message: "bad".into(),
        }
        .into();
        assert!(matches!(
            err,
            CoreError::Api {
                status: Some(400),
                ..
            }
        ));
    }
}
