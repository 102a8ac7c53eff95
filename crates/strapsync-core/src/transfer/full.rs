// ── Full-instance transfer ──
//
// Replaces the destination's media library and content with the source's.
// Destructive: the destination is cleared before anything is recreated.

use serde::Serialize;
use tracing::{info, warn};

use crate::content::{ClearedContent, clear_content, download_all, publish_new};
use crate::document::Document;
use crate::error::CoreError;
use crate::media::{ClearedMedia, MediaSnapshot, RecreateStats, clear_media, recreate_tree};
use crate::progress::Progress;
use crate::rewrite::{AssetMapping, MappingPolicy, rewrite_document};
use crate::schema::{EntryKind, EntryName};
use crate::session::TransferSession;
use crate::walker::TreeWalker;

/// Summary of a full transfer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FullTransferReport {
    pub source: String,
    pub destination: String,
    pub cleared_folders: usize,
    pub cleared_files: usize,
    pub cleared_singles: usize,
    pub cleared_documents: usize,
    pub folders_created: usize,
    pub files_uploaded: usize,
    pub files_failed: usize,
    /// Source files that could not be downloaded.
    pub files_unavailable: usize,
    pub assets_mapped: usize,
    pub documents_published: usize,
    pub documents_failed: usize,
}

/// Copy every folder, file and published document from source to destination.
pub async fn transfer_full(
    session: &TransferSession,
    progress: &dyn Progress,
) -> Result<FullTransferReport, CoreError> {
    let source = &session.source;
    let destination = &session.destination;
    let options = &session.options;

    progress.stage("Walking source media library");
    let mut tree = TreeWalker::new(&source.client, options.count_hints)
        .walk()
        .await?;

    progress.stage("Downloading source content");
    let content = download_all(&source.client, &source.schema).await?;
    if content.document_count() == 0 && tree.file_count() == 0 && tree.folder_count() == 0 {
        return Err(CoreError::NothingToTransfer {
            reason: format!("{} has no media and no published content", source.name),
        });
    }

    progress.stage("Downloading source media");
    let snapshot = MediaSnapshot::download(
        &source.client,
        &tree,
        options.scratch_dir.as_deref(),
        progress,
    )
    .await?;

    progress.stage("Clearing destination media");
    let ClearedMedia { folders, files } = clear_media(&destination.client).await?;
    progress.stage("Clearing destination content");
    let ClearedContent { singles, documents } =
        clear_content(&destination.client, &destination.schema).await?;

    progress.stage("Recreating media library");
    let stats: RecreateStats =
        recreate_tree(&destination.client, &mut tree, &snapshot, progress).await;
    let mapping = AssetMapping::from_tree(&tree);
    let files_unavailable = snapshot.failed();
    drop(snapshot);

    let mut report = FullTransferReport {
        source: source.name.clone(),
        destination: destination.name.clone(),
        cleared_folders: folders,
        cleared_files: files,
        cleared_singles: singles,
        cleared_documents: documents,
        folders_created: stats.folders_created,
        files_uploaded: stats.files_uploaded,
        files_failed: stats.failures,
        files_unavailable,
        assets_mapped: mapping.len(),
        ..FullTransferReport::default()
    };

    progress.stage("Publishing content");
    let mut publisher = Publisher {
        session,
        mapping: &mapping,
        policy: options.mapping_policy,
        progress,
        report: &mut report,
    };
    for (entry, doc) in &content.singles {
        publisher.publish(entry, EntryKind::Single, doc).await?;
    }
    for (entry, docs) in &content.collections {
        for doc in docs {
            publisher.publish(entry, EntryKind::Collection, doc).await?;
        }
    }
    progress.finish(&format!(
        "{} documents published",
        report.documents_published
    ));

    info!(
        source = %report.source,
        destination = %report.destination,
        files = report.files_uploaded,
        documents = report.documents_published,
        "full transfer complete"
    );
    Ok(report)
}

struct Publisher<'a> {
    session: &'a TransferSession,
    mapping: &'a AssetMapping,
    policy: MappingPolicy,
    progress: &'a dyn Progress,
    report: &'a mut FullTransferReport,
}

impl Publisher<'_> {
    /// Rewrite and publish one document. Publish failures are counted and
    /// skipped; an unmapped asset under the strict policy ends the run.
    async fn publish(
        &mut self,
        entry: &EntryName,
        kind: EntryKind,
        doc: &Document,
    ) -> Result<(), CoreError> {
        self.progress.item(entry.as_str());
        let rewritten = rewrite_document(doc, self.mapping, self.policy)?;
        match publish_new(&self.session.destination.client, entry, kind, &rewritten).await {
            Ok(()) => self.report.documents_published += 1,
            Err(e) => {
                warn!(entry = %entry, error = %e, "publish failed; skipping");
                self.report.documents_failed += 1;
            }
        }
        Ok(())
    }
}
