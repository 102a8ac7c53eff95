// ── Media library replay ──
//
// Full-instance transfers snapshot every source file to local disk, clear
// the destination library and rebuild the folder tree there. Per-file
// failures are logged and skipped.

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use serde::Serialize;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use strapsync_api::{AdminClient, FolderQuery, UploadRequest};

use crate::error::CoreError;
use crate::progress::Progress;
use crate::tree::{FileNode, FolderNode, ROOT_PATH};

/// Counts of what [`clear_media`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearedMedia {
    pub folders: usize,
    pub files: usize,
}

/// Delete every top-level folder (with its contents) and every root file.
pub async fn clear_media(client: &AdminClient) -> Result<ClearedMedia, CoreError> {
    let folder_ids: Vec<i64> = client
        .list_folders(&FolderQuery::Root)
        .await?
        .iter()
        .map(|folder| folder.id)
        .collect();
    let file_ids: Vec<i64> = client
        .list_files(ROOT_PATH)
        .await?
        .iter()
        .map(|file| file.id)
        .collect();

    let cleared = ClearedMedia {
        folders: folder_ids.len(),
        files: file_ids.len(),
    };
    if folder_ids.is_empty() && file_ids.is_empty() {
        info!("destination media library already empty");
        return Ok(cleared);
    }

    client.bulk_delete_media(&file_ids, &folder_ids).await?;
    info!(
        folders = cleared.folders,
        files = cleared.files,
        "destination media cleared"
    );
    Ok(cleared)
}

/// Local copies of every file of a walked tree, keyed by source id.
///
/// Bytes live in a temporary directory removed when the snapshot drops.
pub struct MediaSnapshot {
    dir: TempDir,
    stored: HashSet<i64>,
    failed: usize,
}

impl MediaSnapshot {
    /// Download every file of `tree`. Failed downloads are logged and skipped.
    pub async fn download(
        client: &AdminClient,
        tree: &FolderNode,
        scratch_dir: Option<&Path>,
        progress: &dyn Progress,
    ) -> Result<Self, CoreError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("strapsync-media-");
        let dir = match scratch_dir {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };

        let mut snapshot = Self {
            dir,
            stored: HashSet::new(),
            failed: 0,
        };
        for file in tree.all_files() {
            progress.item(&file.name);
            let dest = snapshot.path_of(file.source_id);
            match client.download_to(&file.url, &dest).await {
                Ok(_) => {
                    snapshot.stored.insert(file.source_id);
                }
                Err(e) => {
                    warn!(file = %file.name, error = %e, "download failed; skipping");
                    snapshot.failed += 1;
                }
            }
        }
        info!(
            stored = snapshot.stored.len(),
            failed = snapshot.failed,
            "source media downloaded"
        );
        Ok(snapshot)
    }

    pub fn path_of(&self, source_id: i64) -> PathBuf {
        self.dir.path().join(source_id.to_string())
    }

    pub fn contains(&self, source_id: i64) -> bool {
        self.stored.contains(&source_id)
    }

    /// Files that could not be downloaded.
    pub fn failed(&self) -> usize {
        self.failed
    }
}

/// Counts of what [`recreate_tree`] produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecreateStats {
    pub folders_created: usize,
    pub files_uploaded: usize,
    /// Failed folder creations and uploads. Files missing from the
    /// snapshot are not counted here.
    pub failures: usize,
}

struct Replay<'a> {
    client: &'a AdminClient,
    snapshot: &'a MediaSnapshot,
    progress: &'a dyn Progress,
    stats: RecreateStats,
}

type ReplayFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Recreate `tree` (walked from the source) on the destination.
///
/// Sets `destination_id` on every folder and file that made it across.
/// A folder that cannot be created is skipped with its whole subtree.
pub async fn recreate_tree(
    client: &AdminClient,
    tree: &mut FolderNode,
    snapshot: &MediaSnapshot,
    progress: &dyn Progress,
) -> RecreateStats {
    let mut replay = Replay {
        client,
        snapshot,
        progress,
        stats: RecreateStats::default(),
    };
    replay.children(&mut tree.children, None).await;
    for file in &mut tree.files {
        replay.upload(file, None).await;
    }
    info!(
        folders = replay.stats.folders_created,
        files = replay.stats.files_uploaded,
        failures = replay.stats.failures,
        "media library recreated"
    );
    replay.stats
}

impl<'a> Replay<'a> {
    fn children<'b>(
        &'b mut self,
        folders: &'b mut [FolderNode],
        parent: Option<i64>,
    ) -> ReplayFuture<'b>
    where
        'a: 'b,
    {
        Box::pin(async move {
            for folder in folders {
                let created = match self.client.create_folder(&folder.name, parent).await {
                    Ok(created) => created,
                    Err(e) => {
                        warn!(folder = %folder.path, error = %e, "folder creation failed; skipping subtree");
                        self.stats.failures += 1;
                        continue;
                    }
                };
                folder.destination_id = Some(created.id);
                self.stats.folders_created += 1;

                for file in &mut folder.files {
                    self.upload(file, Some(created.id)).await;
                }
                self.children(&mut folder.children, Some(created.id)).await;
            }
        })
    }

    async fn upload(&mut self, file: &mut FileNode, folder_id: Option<i64>) {
        // Already counted by the snapshot.
        if !self.snapshot.contains(file.source_id) {
            debug!(file = %file.name, "no local copy; skipping upload");
            return;
        }
        self.progress.item(&file.name);

        let request = UploadRequest {
            path: self.snapshot.path_of(file.source_id),
            file_name: file.name.clone(),
            folder_id,
            replace_id: None,
        };
        match self.client.upload_file(&request).await {
            Ok(id) => {
                file.destination_id = Some(id);
                self.stats.files_uploaded += 1;
            }
            Err(e) => {
                warn!(file = %file.name, error = %e, "upload failed; skipping");
                self.stats.failures += 1;
            }
        }
    }
}
