//! `strapsync instances`: manage the saved instance registry.

use std::path::PathBuf;

use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use crate::cli::{AddInstanceArgs, GlobalOpts, InstancesArgs, InstancesCommand, OutputFormat};
use crate::config::{self, Instance};
use crate::error::CliError;
use crate::output::{self, detail_lines, should_color};
use crate::prompt;

use super::util;

const KEYRING_NOTE: &str = "keyring / STRAPSYNC_PASSWORD";

// ── Views ────────────────────────────────────────────────────────────

/// An instance as shown to the user. Never carries the password itself.
#[derive(Serialize)]
struct InstanceView {
    name: String,
    url: String,
    email: String,
    password: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ca_cert: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    insecure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<u64>,
}

impl From<Instance> for InstanceView {
    fn from(instance: Instance) -> Self {
        let password = if instance.password.is_some() {
            "****"
        } else {
            KEYRING_NOTE
        };
        Self {
            name: instance.name,
            url: instance.url,
            email: instance.email,
            password,
            ca_cert: instance.ca_cert,
            insecure: instance.insecure,
            timeout: instance.timeout,
        }
    }
}

#[derive(Tabled)]
struct InstanceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Password")]
    password: &'static str,
}

fn to_row(view: &InstanceView) -> InstanceRow {
    InstanceRow {
        name: view.name.clone(),
        url: view.url.clone(),
        email: view.email.clone(),
        password: view.password,
    }
}

// ── Handlers ─────────────────────────────────────────────────────────

pub fn handle(args: InstancesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        InstancesCommand::List => list(global),
        InstancesCommand::Add(add_args) => add(add_args, global),
        InstancesCommand::Remove { name } => remove(&name, global),
        InstancesCommand::Show { name } => show(&name, global),
    }
}

pub fn list(global: &GlobalOpts) -> Result<(), CliError> {
    let registry = config::registry(global);
    let views: Vec<InstanceView> = registry.list()?.into_iter().map(Into::into).collect();

    if views.is_empty() && matches!(global.output, OutputFormat::Table) {
        if !global.quiet {
            eprintln!(
                "No saved instances in {}. Add one with: strapsync instances add",
                registry.path().display()
            );
        }
        return Ok(());
    }

    let out = output::render_list(&global.output, &views, to_row, |v| v.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn add(args: AddInstanceArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let registry = config::registry(global);

    let name = match args.name {
        Some(name) => name,
        None => prompt::text("Instance name")?,
    };
    if name.trim().is_empty() {
        return Err(CliError::Validation {
            field: "name".into(),
            reason: "instance name cannot be empty".into(),
        });
    }
    if registry.get(&name).is_ok() {
        return Err(CliError::DuplicateInstance { name });
    }

    let url = match args.url {
        Some(url) => url,
        None => prompt::text("Base URL")?,
    };
    url::Url::parse(&url).map_err(|e| CliError::Validation {
        field: "url".into(),
        reason: e.to_string(),
    })?;

    let email = match args.email {
        Some(email) => email,
        None => prompt::text("Admin email")?,
    };
    let password = match args.password {
        Some(password) => password,
        None => prompt::password("Admin password: ")?,
    };

    let mut instance = Instance::new(name, url, email);
    instance.ca_cert = args.ca_cert;
    if args.keyring {
        strapsync_config::store_password(&instance.name, &password)?;
    } else {
        instance.password = Some(password);
    }

    let name = instance.name.clone();
    registry.add(instance)?;
    if !global.quiet {
        eprintln!("Saved instance '{name}'");
    }
    Ok(())
}

pub fn remove(name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let registry = config::registry(global);
    let instance = registry.get(name)?;

    if !util::confirm_destructive(
        "instances remove",
        &format!("Remove instance '{name}'?"),
        global.yes,
    )? {
        eprintln!("Aborted.");
        return Ok(());
    }

    registry.remove(name)?;
    if instance.password.is_none() {
        if let Err(e) = strapsync_config::forget_password(name) {
            warn!(instance = name, error = %e, "could not remove keyring entry");
        }
    }
    if !global.quiet {
        eprintln!("Removed instance '{name}'");
    }
    Ok(())
}

pub fn show(name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let color = should_color(&global.color);
    let view = InstanceView::from(config::registry(global).get(name)?);
    let out = output::render_single(
        &global.output,
        &view,
        |v| detail_view(v, color),
        |v| v.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail_view(view: &InstanceView, color: bool) -> String {
    let mut pairs = vec![
        ("Name", view.name.clone()),
        ("URL", view.url.clone()),
        ("Email", view.email.clone()),
        ("Password", view.password.to_string()),
    ];
    if let Some(ref path) = view.ca_cert {
        pairs.push(("CA cert", path.display().to_string()));
    }
    if let Some(insecure) = view.insecure {
        pairs.push(("Insecure", insecure.to_string()));
    }
    if let Some(timeout) = view.timeout {
        pairs.push(("Timeout", format!("{timeout}s")));
    }
    detail_lines(&pairs, color)
}
