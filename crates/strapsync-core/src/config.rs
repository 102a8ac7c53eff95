// ── Runtime connection and transfer configuration ──
//
// These types describe how to reach an instance and how a transfer run
// behaves. They carry credentials and tuning but never touch disk: the CLI
// builds them from the persisted config and hands them in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use strapsync_api::{TlsMode, TransportConfig};

use crate::rewrite::MappingPolicy;
use crate::walker::CountHints;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed staging instances).
    DangerAcceptInvalid,
}

/// Everything needed to log in to one instance.
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    /// Display name of the instance (used in logs and summaries).
    pub name: String,
    /// Instance base URL (e.g. `https://cms.example.com`).
    pub url: Url,
    /// Admin account email.
    pub email: String,
    /// Admin account password.
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ConnectConfig {
    pub fn new(
        name: impl Into<String>,
        url: Url,
        email: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            name: name.into(),
            url,
            email: email.into(),
            password,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Transport settings for the API client.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}

/// Knobs that change how a transfer run behaves.
#[derive(Debug, Clone, Default)]
pub struct TransferOptions {
    /// Whether folder listings trust the backend's child/file counts.
    pub count_hints: CountHints,
    /// What to do with asset references that have no mapping.
    pub mapping_policy: MappingPolicy,
    /// Directory for temporary asset bytes; the system temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn transport_mirrors_tls_choice() {
        let mut config = ConnectConfig::new(
            "staging",
            Url::parse("https://cms.example.com").unwrap(),
            "ops@example.com",
            SecretString::from("pw".to_string()),
        );
        config.tls = TlsVerification::DangerAcceptInvalid;
        config.timeout = Duration::from_secs(5);

        let transport = config.transport();
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(transport.timeout, Duration::from_secs(5));
    }
}
