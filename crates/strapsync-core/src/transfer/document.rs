// ── Document transfer ──
//
// Copies one document, with the assets it references, into the same entry
// of the destination.

use serde::Serialize;
use tracing::info;

use crate::assets::extract_assets;
use crate::content::publish_new;
use crate::error::{CoreError, InvalidSelection};
use crate::progress::Progress;
use crate::prompt::Chooser;
use crate::reconcile::ReconcileStats;
use crate::rewrite::rewrite_document;
use crate::schema::{EntryKind, EntryName};
use crate::session::TransferSession;

use super::{choose_entry, choose_kind, reconcile_assets, select_document};

/// Summary of a document transfer.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentTransferReport {
    pub entry: EntryName,
    pub kind: EntryKind,
    pub document: String,
    pub assets: usize,
    pub stats: ReconcileStats,
}

/// Choose a source document, reconcile its assets and publish it as a new
/// document of the same entry in the destination.
pub async fn transfer_document(
    session: &TransferSession,
    chooser: &mut dyn Chooser,
    progress: &dyn Progress,
) -> Result<DocumentTransferReport, CoreError> {
    let source = &session.source;
    let destination = &session.destination;
    if source.schema.is_empty() {
        return Err(CoreError::NothingToTransfer {
            reason: format!("{} has no content types", source.name),
        });
    }

    let kind = choose_kind(chooser)?;
    let entry = choose_entry(chooser, "Select the entry to transfer", &source.schema, kind)?;
    if destination.schema.resolve(entry.as_str()) != Some(kind) {
        return Err(InvalidSelection::UnknownEntry {
            entry: format!("{entry} ({kind}) in {}", destination.name),
        }
        .into());
    }

    progress.stage("Fetching document");
    let (doc, label) = select_document(&source.client, chooser, &entry, kind).await?;

    let assets = extract_assets(&doc);
    info!(entry = %entry, document = %label, assets = assets.len(), "document selected");
    let outcome = reconcile_assets(session, chooser, progress, &assets).await?;

    progress.stage("Publishing document");
    let rewritten = rewrite_document(&doc, &outcome.mapping, session.options.mapping_policy)?;
    publish_new(&destination.client, &entry, kind, &rewritten).await?;
    progress.finish(&format!("{entry} published to {}", destination.name));

    info!(entry = %entry, destination = %destination.name, "document transferred");
    Ok(DocumentTransferReport {
        entry,
        kind,
        document: label,
        assets: assets.len(),
        stats: outcome.stats,
    })
}
