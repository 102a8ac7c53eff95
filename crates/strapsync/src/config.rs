//! CLI configuration: thin wrapper around `strapsync_config`.
//!
//! Adds resolution that respects `GlobalOpts` (`--config`, `--insecure`,
//! `--timeout`) and the per-run transfer flags.

use std::path::PathBuf;
use std::time::Duration;

use strapsync_core::{ConnectConfig, CountHints, MappingPolicy, TlsVerification, TransferOptions};

use crate::cli::{EndpointArgs, GlobalOpts};
use crate::error::CliError;

pub use strapsync_config::{Config, Instance, InstanceRegistry};

/// Config file in effect: `--config` / `STRAPSYNC_CONFIG`, else the platform path.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(strapsync_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(strapsync_config::load_config_from(&config_file(global))?)
}

pub fn registry(global: &GlobalOpts) -> InstanceRegistry {
    InstanceRegistry::new(config_file(global))
}

/// Translate a saved instance into a `ConnectConfig`. CLI flags win.
pub fn connect_config(
    instance: &Instance,
    config: &Config,
    global: &GlobalOpts,
) -> Result<ConnectConfig, CliError> {
    let mut connect = strapsync_config::instance_to_connect_config(instance, &config.defaults)?;
    if global.insecure {
        connect.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(seconds) = global.timeout {
        connect.timeout = Duration::from_secs(seconds);
    }
    Ok(connect)
}

/// Transfer options from `[defaults]`, tightened by per-run flags.
pub fn transfer_options(config: &Config, args: &EndpointArgs) -> TransferOptions {
    let mut options = config.defaults.transfer_options();
    if args.strict_assets {
        options.mapping_policy = MappingPolicy::Strict;
    }
    if args.trust_count_hints {
        options.count_hints = CountHints::Trust;
    }
    if let Some(ref dir) = args.scratch_dir {
        options.scratch_dir = Some(dir.clone());
    }
    options
}
