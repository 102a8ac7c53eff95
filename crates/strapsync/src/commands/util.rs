//! Shared helpers for command handlers.

use std::io::IsTerminal;

use strapsync_core::Chooser;
use strapsync_core::prompt::choose_item;

use crate::config::Instance;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Like [`confirm`], but refuses to run unattended without `--yes`.
pub fn confirm_destructive(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if !yes_flag && !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    confirm(message, yes_flag)
}

/// Resolve `name` among `instances`, or ask the operator to pick one.
pub fn pick_instance(
    instances: &[Instance],
    name: Option<&str>,
    prompt: &str,
    chooser: &mut dyn Chooser,
) -> Result<Instance, CliError> {
    if let Some(name) = name {
        return instances
            .iter()
            .find(|instance| instance.name == name)
            .cloned()
            .ok_or_else(|| CliError::InstanceNotFound { name: name.into() });
    }
    let picked = choose_item(chooser, prompt, instances, |_, instance| {
        format!("{} ({})", instance.name, instance.url)
    })?;
    Ok(picked.clone())
}
