//! `strapsync transfer`: run one transfer between two saved instances.

use std::io::IsTerminal;

use strum::{Display, EnumIter};
use tracing::debug;

use strapsync_core::{
    ComponentTransferReport, Connection, CoreError, DocumentTransferReport, FullTransferReport,
    Progress, ReconcileStats, TransferSession, transfer_component, transfer_document,
    transfer_full,
};

use crate::cli::{EndpointArgs, GlobalOpts, TransferArgs, TransferMode};
use crate::config;
use crate::error::CliError;
use crate::output::{self, detail_lines, should_color};
use crate::progress::Spinner;
use crate::prompt::TerminalChooser;

use super::util;

/// What a transfer run copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Mode {
    #[strum(to_string = "Full transfer (replace everything)")]
    Full,
    #[strum(to_string = "Single document")]
    Document,
    #[strum(to_string = "Single component")]
    Component,
}

pub async fn handle(args: TransferArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (mode, endpoints) = match args.mode {
        TransferMode::Full(endpoints) => (Mode::Full, endpoints),
        TransferMode::Document(endpoints) => (Mode::Document, endpoints),
        TransferMode::Component(endpoints) => (Mode::Component, endpoints),
    };
    run(mode, &endpoints, global).await
}

/// Resolve both endpoints, connect, and run `mode`.
pub async fn run(mode: Mode, endpoints: &EndpointArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = should_color(&global.color);
    let config = config::load(global)?;
    let registry = config::registry(global);
    let instances = registry.list()?;
    if instances.is_empty() {
        return Err(CliError::NoInstances {
            path: registry.path().display().to_string(),
        });
    }

    let mut chooser = TerminalChooser::new(color);
    let source = util::pick_instance(
        &instances,
        endpoints.from.as_deref(),
        "Select the source instance",
        &mut chooser,
    )?;
    let destination = util::pick_instance(
        &instances,
        endpoints.to.as_deref(),
        "Select the destination instance",
        &mut chooser,
    )?;
    if source.name == destination.name {
        return Err(CliError::Validation {
            field: "to".into(),
            reason: "source and destination must differ".into(),
        });
    }

    if mode == Mode::Full
        && !util::confirm_destructive(
            "transfer full",
            &format!(
                "Delete ALL media and content on '{}' and replace it with '{}'?",
                destination.name, source.name
            ),
            global.yes,
        )?
    {
        eprintln!("Aborted.");
        return Ok(());
    }

    let options = config::transfer_options(&config, endpoints);
    let source_config = config::connect_config(&source, &config, global)?;
    let destination_config = config::connect_config(&destination, &config, global)?;
    debug!(source = %source.name, destination = %destination.name, ?mode, "starting transfer");

    let spinner = Spinner::new(!global.quiet && std::io::stderr().is_terminal());
    spinner.stage(&format!("Connecting to {}", source.name));
    let source_conn = Connection::connect(&source_config).await?;
    spinner.stage(&format!("Connecting to {}", destination.name));
    let destination_conn = Connection::connect(&destination_config).await?;
    let session = TransferSession::new(source_conn, destination_conn, options);

    let mut chooser = chooser.with_spinner(spinner.handle());
    let result = match mode {
        Mode::Full => transfer_full(&session, &spinner).await.map(Report::Full),
        Mode::Document => transfer_document(&session, &mut chooser, &spinner)
            .await
            .map(Report::Document),
        Mode::Component => transfer_component(&session, &mut chooser, &spinner)
            .await
            .map(Report::Component),
    };
    drop(spinner);

    let report = match result {
        Ok(report) => report,
        Err(CoreError::NothingToTransfer { reason }) => {
            if !global.quiet {
                eprintln!("Nothing to transfer: {reason}");
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let out = match report {
        Report::Full(ref report) => output::render_single(
            &global.output,
            report,
            |r| full_detail(r, color),
            |r| r.destination.clone(),
        )?,
        Report::Document(ref report) => output::render_single(
            &global.output,
            report,
            |r| document_detail(r, color),
            |r| r.document.clone(),
        )?,
        Report::Component(ref report) => output::render_single(
            &global.output,
            report,
            |r| component_detail(r, color),
            |r| r.destination_document.clone(),
        )?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

enum Report {
    Full(FullTransferReport),
    Document(DocumentTransferReport),
    Component(ComponentTransferReport),
}

// ── Detail views ─────────────────────────────────────────────────────

fn full_detail(r: &FullTransferReport, color: bool) -> String {
    detail_lines(
        &[
            ("From", r.source.clone()),
            ("To", r.destination.clone()),
            (
                "Cleared",
                format!(
                    "{} folders, {} files, {} single types, {} documents",
                    r.cleared_folders, r.cleared_files, r.cleared_singles, r.cleared_documents
                ),
            ),
            ("Folders created", r.folders_created.to_string()),
            (
                "Files uploaded",
                format!(
                    "{} ({} failed, {} not downloadable)",
                    r.files_uploaded, r.files_failed, r.files_unavailable
                ),
            ),
            ("Assets mapped", r.assets_mapped.to_string()),
            (
                "Documents",
                format!(
                    "{} published ({} failed)",
                    r.documents_published, r.documents_failed
                ),
            ),
        ],
        color,
    )
}

fn document_detail(r: &DocumentTransferReport, color: bool) -> String {
    let mut pairs = vec![
        ("Entry", format!("{} ({})", r.entry, r.kind)),
        ("Document", r.document.clone()),
    ];
    pairs.extend(asset_pairs(r.assets, r.stats));
    detail_lines(&pairs, color)
}

fn component_detail(r: &ComponentTransferReport, color: bool) -> String {
    let mut pairs = vec![
        (
            "Component",
            format!("{} from {}.{}", r.component, r.source_entry, r.source_field),
        ),
        (
            "Appended to",
            format!(
                "{} / {}.{}",
                r.destination_entry, r.destination_document, r.destination_field
            ),
        ),
    ];
    pairs.extend(asset_pairs(r.assets, r.stats));
    detail_lines(&pairs, color)
}

fn asset_pairs(assets: usize, stats: ReconcileStats) -> Vec<(&'static str, String)> {
    vec![
        ("Assets", assets.to_string()),
        (
            "Reconciled",
            format!(
                "{} uploaded, {} reused, {} overwritten, {} skipped",
                stats.uploaded, stats.reused, stats.overwritten, stats.skipped
            ),
        ),
        ("Folders created", stats.folders_created.to_string()),
    ]
}
