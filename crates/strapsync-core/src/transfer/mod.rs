//! Transfer orchestrators.
//!
//! Each mode is a linear pipeline over a [`TransferSession`](crate::TransferSession).
//! Operator decisions go through a [`Chooser`]; stage changes are reported
//! through [`Progress`].

pub mod component;
pub mod document;
pub mod full;

use strum::IntoEnumIterator;
use tracing::info;

use strapsync_api::AdminClient;

use crate::content::{download_collection, download_single};
use crate::document::{AssetRef, Document};
use crate::error::{CoreError, InvalidSelection};
use crate::progress::Progress;
use crate::prompt::{Chooser, choose_item};
use crate::reconcile::{AssetReconciler, ReconcileOutcome};
use crate::schema::{EntryKind, EntryName, SchemaDescriptor};
use crate::session::TransferSession;
use crate::walker::TreeWalker;

pub use component::{ComponentTransferReport, transfer_component};
pub use document::{DocumentTransferReport, transfer_document};
pub use full::{FullTransferReport, transfer_full};

/// Ask for single vs collection.
pub(crate) fn choose_kind(chooser: &mut dyn Chooser) -> Result<EntryKind, CoreError> {
    let kinds: Vec<EntryKind> = EntryKind::iter().collect();
    choose_item(chooser, "Select the content kind", &kinds, |_, kind| {
        kind.to_string()
    })
    .copied()
}

/// Ask for one entry of `kind`.
pub(crate) fn choose_entry(
    chooser: &mut dyn Chooser,
    prompt: &str,
    schema: &SchemaDescriptor,
    kind: EntryKind,
) -> Result<EntryName, CoreError> {
    let entries = schema.entries(kind);
    if entries.is_empty() {
        return Err(CoreError::NothingToTransfer {
            reason: format!("no {} entries", kind.to_string().to_lowercase()),
        });
    }
    choose_item(chooser, prompt, entries, |_, entry| entry.to_string()).cloned()
}

/// Fetch the document to work on: the single type's document, or one
/// collection document picked by label. Returns the document with the
/// label it was offered under.
pub(crate) async fn select_document(
    client: &AdminClient,
    chooser: &mut dyn Chooser,
    entry: &EntryName,
    kind: EntryKind,
) -> Result<(Document, String), CoreError> {
    match kind {
        EntryKind::Single => {
            let doc = download_single(client, entry).await?.ok_or_else(|| {
                InvalidSelection::MissingDocument {
                    what: entry.to_string(),
                }
            })?;
            let label = doc.label(0);
            Ok((doc, label))
        }
        EntryKind::Collection => {
            let documents = download_collection(client, entry).await?;
            if documents.is_empty() {
                return Err(InvalidSelection::MissingDocument {
                    what: entry.to_string(),
                }
                .into());
            }
            let labels: Vec<String> = documents
                .iter()
                .enumerate()
                .map(|(i, doc)| doc.label(i))
                .collect();
            let prompt = format!("Select a {entry} document");
            let index = chooser.choose(&prompt, &labels)?;
            let len = labels.len();
            documents
                .into_iter()
                .zip(labels)
                .nth(index)
                .ok_or_else(|| {
                    InvalidSelection::OutOfRange {
                        choice: index + 1,
                        len,
                    }
                    .into()
                })
        }
    }
}

/// Ask for one field of `doc`.
pub(crate) fn choose_field(
    chooser: &mut dyn Chooser,
    prompt: &str,
    doc: &Document,
    what: &str,
) -> Result<String, CoreError> {
    let fields = doc.field_names();
    if fields.is_empty() {
        return Err(InvalidSelection::NoFields {
            what: what.to_string(),
        }
        .into());
    }
    choose_item(chooser, prompt, &fields, |_, field| field.clone()).cloned()
}

/// Walk both media libraries and bring `assets` across.
pub(crate) async fn reconcile_assets(
    session: &TransferSession,
    chooser: &mut dyn Chooser,
    progress: &dyn Progress,
    assets: &[AssetRef],
) -> Result<ReconcileOutcome, CoreError> {
    if assets.is_empty() {
        info!("no asset references found");
        return Ok(ReconcileOutcome::default());
    }
    let hints = session.options.count_hints;

    progress.stage("Walking source media library");
    let source_tree = TreeWalker::new(&session.source.client, hints).walk().await?;
    progress.stage("Walking destination media library");
    let mut destination_tree = TreeWalker::new(&session.destination.client, hints)
        .walk()
        .await?;

    progress.stage("Transferring assets");
    let outcome = AssetReconciler::new(
        &session.source.client,
        &session.destination.client,
        &source_tree,
        &mut destination_tree,
        chooser,
    )
    .progress(progress)
    .scratch_dir(session.options.scratch_dir.as_deref())
    .run(assets)
    .await?;
    progress.finish(&format!("{} assets mapped", outcome.mapping.len()));
    Ok(outcome)
}
