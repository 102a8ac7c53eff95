//! Persisted configuration for strapsync.
//!
//! TOML config (global defaults plus saved instances), credential
//! resolution (env + keyring + plaintext) and translation to
//! `strapsync_core::ConnectConfig` / `TransferOptions`.

mod registry;

pub use registry::{InstanceRegistry, RegistryError};

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use strapsync_core::{
    ConnectConfig, CountHints, MappingPolicy, TlsVerification, TransferOptions,
};

/// Keyring service name for stored instance passwords.
pub const KEYRING_SERVICE: &str = "strapsync";
/// Environment variable overriding every instance password.
pub const PASSWORD_ENV: &str = "STRAPSYNC_PASSWORD";
const ENV_PREFIX: &str = "STRAPSYNC_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for instance '{instance}'")]
    NoCredentials { instance: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Saved instances, in insertion order.
    #[serde(default)]
    pub instances: Vec<Instance>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Fail on asset references without a destination counterpart.
    #[serde(default)]
    pub strict_assets: bool,

    /// Skip folder listings the backend reports as empty.
    #[serde(default)]
    pub trust_count_hints: bool,

    /// Directory for temporary asset bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            insecure: false,
            strict_assets: false,
            trust_count_hints: false,
            scratch_dir: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl Defaults {
    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            count_hints: if self.trust_count_hints {
                CountHints::Trust
            } else {
                CountHints::Verify
            },
            mapping_policy: if self.strict_assets {
                MappingPolicy::Strict
            } else {
                MappingPolicy::Lenient
            },
            scratch_dir: self.scratch_dir.clone(),
        }
    }
}

/// A saved instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Instance {
    /// Unique display name.
    pub name: String,

    /// Base URL (e.g., "https://cms.example.com").
    pub url: String,

    /// Admin account email.
    pub email: String,

    /// Password (plaintext, prefer keyring).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Override timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Instance {
    pub fn new(name: impl Into<String>, url: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            email: email.into(),
            password: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "strapsync").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("strapsync");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading / saving ────────────────────────────────────────────────

fn file_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

/// Load config from `path` and `STRAPSYNC_` env vars.
///
/// Nested keys use a double underscore: `STRAPSYNC_DEFAULTS__TIMEOUT=60`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config = file_figment(path)
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    Ok(config)
}

/// Load config from the canonical path.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Config as stored in `path`, without env overrides. Used before saving.
pub(crate) fn read_file(path: &Path) -> Result<Config, ConfigError> {
    Ok(file_figment(path).extract()?)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(instance: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{instance}/password"),
    )?)
}

/// Resolve an instance password: env var, then keyring, then plaintext.
pub fn resolve_password(instance: &Instance) -> Result<SecretString, ConfigError> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    if let Ok(entry) = keyring_entry(&instance.name) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    if let Some(ref pw) = instance.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        instance: instance.name.clone(),
    })
}

/// Store an instance password in the system keyring.
pub fn store_password(instance: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(instance)?.set_password(password)?;
    Ok(())
}

/// Remove a stored password. A missing entry is not an error.
pub fn forget_password(instance: &str) -> Result<(), ConfigError> {
    match keyring_entry(instance)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Build a `ConnectConfig` from a saved instance and global defaults.
pub fn instance_to_connect_config(
    instance: &Instance,
    defaults: &Defaults,
) -> Result<ConnectConfig, ConfigError> {
    let url: url::Url = instance.url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {}", instance.url),
    })?;
    let password = resolve_password(instance)?;

    let mut config = ConnectConfig::new(&instance.name, url, &instance.email, password);
    config.tls = if instance.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = instance.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };
    config.timeout = Duration::from_secs(instance.timeout.unwrap_or(defaults.timeout));
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[defaults]\ntimeout = 90\nstrict_assets = true\n\n\
             [[instances]]\nname = \"staging\"\nurl = \"https://staging.example.com\"\nemail = \"ops@example.com\"\n",
        )
        .unwrap();

        let cfg = read_file(&path).unwrap();
        assert_eq!(cfg.defaults.timeout, 90);
        assert!(cfg.defaults.strict_assets);
        assert!(!cfg.defaults.insecure);
        assert_eq!(cfg.instances.len(), 1);
        assert_eq!(cfg.instances[0].name, "staging");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = read_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.instances.is_empty());
    }

    #[test]
    fn transfer_options_follow_defaults() {
        let defaults = Defaults {
            strict_assets: true,
            trust_count_hints: true,
            scratch_dir: Some(PathBuf::from("/var/tmp/strapsync")),
            ..Defaults::default()
        };
        let options = defaults.transfer_options();
        assert_eq!(options.mapping_policy, MappingPolicy::Strict);
        assert_eq!(options.count_hints, CountHints::Trust);
        assert_eq!(
            options.scratch_dir.as_deref(),
            Some(Path::new("/var/tmp/strapsync"))
        );

        let lenient = Defaults::default().transfer_options();
        assert_eq!(lenient.mapping_policy, MappingPolicy::Lenient);
        assert_eq!(lenient.count_hints, CountHints::Verify);
    }

    #[test]
    fn invalid_url_is_a_validation_error() {
        let mut instance = Instance::new("broken", "not a url", "ops@example.com");
        instance.password = Some("pw".into());
        let err = instance_to_connect_config(&instance, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "url"));
    }

    #[test]
    fn saved_config_omits_unset_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            defaults: Defaults::default(),
            instances: vec![Instance::new("prod", "https://cms.example.com", "a@b.c")],
        };
        save_config_to(&path, &cfg).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("name = \"prod\""));
        assert!(!written.contains("password"));
        assert!(!written.contains("scratch_dir"));
    }
}
