//! CLI error types with miette diagnostics.
//!
//! Maps engine, config and registry errors into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use strapsync_config::{ConfigError, RegistryError};
use strapsync_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const TRANSFER: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(strapsync::connection_failed),
        help(
            "Check that the instance is running and reachable.\n\
             Self-signed certificate? Retry with --insecure (-k)."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(strapsync::timeout),
        help("Increase the timeout with --timeout or `timeout` in [defaults].")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(strapsync::auth_failed),
        help("Check the email and password of the instance: strapsync instances show <name>")
    )]
    AuthFailed { message: String },

    #[error("No password configured for instance '{instance}'")]
    #[diagnostic(
        code(strapsync::no_credentials),
        help(
            "Re-add the instance with a password, store one in the keyring,\n\
             or set STRAPSYNC_PASSWORD."
        )
    )]
    NoCredentials { instance: String },

    // ── Instances ────────────────────────────────────────────────────
    #[error("Instance '{name}' not found")]
    #[diagnostic(
        code(strapsync::instance_not_found),
        help("Run: strapsync instances list")
    )]
    InstanceNotFound { name: String },

    #[error("Instance '{name}' already exists")]
    #[diagnostic(
        code(strapsync::conflict),
        help("Pick another name or remove it first: strapsync instances remove {name}")
    )]
    DuplicateInstance { name: String },

    #[error("No saved instances")]
    #[diagnostic(
        code(strapsync::no_instances),
        help("Add one with: strapsync instances add\nConfig file: {path}")
    )]
    NoInstances { path: String },

    // ── Transfer ─────────────────────────────────────────────────────
    #[error("Invalid selection: {message}")]
    #[diagnostic(code(strapsync::invalid_selection))]
    InvalidSelection { message: String },

    #[error("Failed to publish {target}: {message}")]
    #[diagnostic(code(strapsync::publish_failed))]
    PublishFailed { target: String, message: String },

    #[error("Asset {source_id} has no destination counterpart")]
    #[diagnostic(
        code(strapsync::unmapped_asset),
        help("Drop --strict-assets (or strict_assets in [defaults]) to keep unmapped references.")
    )]
    UnmappedAsset { source_id: i64 },

    #[error("Asset transfer failed for {name}: {message}")]
    #[diagnostic(code(strapsync::asset_failed))]
    AssetFailed { name: String, message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    #[diagnostic(code(strapsync::api_error))]
    ApiError {
        status: Option<u16>,
        message: String,
    },

    // ── Validation / interaction ─────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(strapsync::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(strapsync::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(strapsync::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::InstanceNotFound { .. } | Self::NoInstances { .. } => exit_code::NOT_FOUND,
            Self::DuplicateInstance { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::InvalidSelection { .. } => exit_code::USAGE,
            Self::PublishFailed { .. } | Self::UnmappedAsset { .. } | Self::AssetFailed { .. } => {
                exit_code::TRANSFER
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout => CliError::Timeout,
            CoreError::InvalidSelection(selection) => CliError::InvalidSelection {
                message: selection.to_string(),
            },
            CoreError::NothingToTransfer { reason } => CliError::InvalidSelection {
                message: format!("nothing to transfer: {reason}"),
            },
            CoreError::PublishFailed { target, message } => {
                CliError::PublishFailed { target, message }
            }
            CoreError::UnmappedAsset { source_id } => CliError::UnmappedAsset { source_id },
            CoreError::AssetFailed { name, message } => CliError::AssetFailed { name, message },
            CoreError::Api { message, status } => CliError::ApiError { status, message },
            CoreError::NotFound { path } => CliError::ApiError {
                status: Some(404),
                message: format!("not found: {path}"),
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Io(e) => CliError::Io(e),
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { instance } => CliError::NoCredentials { instance },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

impl From<RegistryError> for CliError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::DuplicateName { name } => CliError::DuplicateInstance { name },
            RegistryError::NotFound { name } => CliError::InstanceNotFound { name },
            RegistryError::Config(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use strapsync_core::InvalidSelection;

    use super::*;

    #[test]
    fn core_errors_keep_their_exit_class() {
        let auth: CliError = CoreError::AuthenticationFailed {
            message: "bad password".into(),
        }
        .into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let selection: CliError = CoreError::from(InvalidSelection::NoOptions).into();
        assert_eq!(selection.exit_code(), exit_code::USAGE);

        let publish: CliError = CoreError::PublishFailed {
            target: "homepage".into(),
            message: "400".into(),
        }
        .into();
        assert_eq!(publish.exit_code(), exit_code::TRANSFER);
    }

    #[test]
    fn registry_errors_map_to_conflict_and_not_found() {
        let dup: CliError = RegistryError::DuplicateName {
            name: "prod".into(),
        }
        .into();
        assert_eq!(dup.exit_code(), exit_code::CONFLICT);

        let missing: CliError = RegistryError::NotFound {
            name: "ghost".into(),
        }
        .into();
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn api_error_mentions_status() {
        let err = CliError::ApiError {
            status: Some(403),
            message: "Forbidden".into(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 403): Forbidden");
    }
}
