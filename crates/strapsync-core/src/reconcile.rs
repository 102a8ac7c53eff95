// ── Asset reconciler ──
//
// Brings the assets referenced by a document (or component) into the
// destination media library and records where each one ended up.
// Assets are processed one at a time, in encounter order.

use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use strapsync_api::{AdminClient, UploadRequest};

use crate::document::AssetRef;
use crate::error::CoreError;
use crate::progress::{Progress, Silent};
use crate::prompt::{Chooser, CollisionChoice};
use crate::rewrite::AssetMapping;
use crate::tree::{FolderNode, ROOT_PATH};

/// What happened to the assets of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    pub uploaded: usize,
    pub reused: usize,
    pub overwritten: usize,
    /// References without a downloadable URL.
    pub skipped: usize,
    pub folders_created: usize,
}

/// Result of [`AssetReconciler::run`].
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    pub mapping: AssetMapping,
    pub stats: ReconcileStats,
}

/// Maps source assets onto destination files, creating folders and
/// uploading bytes as needed.
///
/// The destination tree is updated in place: a folder created for one asset
/// is found by name for the next, so each missing folder is created once.
pub struct AssetReconciler<'a> {
    source: &'a AdminClient,
    destination: &'a AdminClient,
    source_tree: &'a FolderNode,
    destination_tree: &'a mut FolderNode,
    chooser: &'a mut dyn Chooser,
    progress: &'a dyn Progress,
    scratch_dir: Option<&'a Path>,
    reuse_always: bool,
    outcome: ReconcileOutcome,
}

impl<'a> AssetReconciler<'a> {
    pub fn new(
        source: &'a AdminClient,
        destination: &'a AdminClient,
        source_tree: &'a FolderNode,
        destination_tree: &'a mut FolderNode,
        chooser: &'a mut dyn Chooser,
    ) -> Self {
        Self {
            source,
            destination,
            source_tree,
            destination_tree,
            chooser,
            progress: &Silent,
            scratch_dir: None,
            reuse_always: false,
            outcome: ReconcileOutcome::default(),
        }
    }

    pub fn progress(mut self, progress: &'a dyn Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Directory for temporary downloads; the system temp dir when `None`.
    pub fn scratch_dir(mut self, dir: Option<&'a Path>) -> Self {
        self.scratch_dir = dir;
        self
    }

    /// Reconcile `assets` in order and return the id mapping.
    pub async fn run(mut self, assets: &[AssetRef]) -> Result<ReconcileOutcome, CoreError> {
        if assets.is_empty() {
            info!("no assets to transfer");
            return Ok(self.outcome);
        }
        info!(count = assets.len(), "transferring assets");

        for asset in assets {
            if self.outcome.mapping.contains(asset.id) {
                debug!(source_id = asset.id, "asset already mapped");
                continue;
            }
            self.transfer(asset).await?;
        }
        Ok(self.outcome)
    }

    async fn transfer(&mut self, asset: &AssetRef) -> Result<(), CoreError> {
        let file_name = asset.file_name();
        self.progress.item(&file_name);

        let names = self.source_tree.resolve_names(asset.folder_path());
        let (folder_path, folder_id) = self.ensure_folder(&names).await?;
        debug!(
            asset = %file_name,
            source = asset.folder_path(),
            destination = %folder_path,
            "folder mapped"
        );

        let existing = self
            .destination
            .list_files(&folder_path)
            .await?
            .into_iter()
            .find(|file| file.name == file_name);

        let mut replace_id = None;
        if let Some(existing) = existing {
            let choice = if self.reuse_always {
                CollisionChoice::ReuseAlways
            } else {
                CollisionChoice::ask(&mut *self.chooser, &file_name)?
            };
            match choice {
                CollisionChoice::ReuseOnce | CollisionChoice::ReuseAlways => {
                    if choice == CollisionChoice::ReuseAlways {
                        self.reuse_always = true;
                    }
                    info!(asset = %file_name, id = existing.id, "using existing asset");
                    self.outcome.mapping.insert(asset.id, existing.id);
                    self.outcome.stats.reused += 1;
                    return Ok(());
                }
                CollisionChoice::Overwrite => replace_id = Some(existing.id),
            }
        }

        let Some(url) = asset.url() else {
            warn!(asset = %file_name, source_id = asset.id, "asset has no URL; skipping");
            self.outcome.stats.skipped += 1;
            return Ok(());
        };

        let new_id = self
            .copy_bytes(url, &file_name, folder_id, replace_id)
            .await
            .map_err(|e| CoreError::AssetFailed {
                name: file_name.clone(),
                message: e.to_string(),
            })?;

        info!(asset = %file_name, id = new_id, "asset uploaded");
        self.outcome.mapping.insert(asset.id, new_id);
        if replace_id.is_some() {
            self.outcome.stats.overwritten += 1;
        } else {
            self.outcome.stats.uploaded += 1;
        }
        Ok(())
    }

    /// Download from the source into a scratch file and upload it.
    /// The scratch file is removed when it goes out of scope.
    async fn copy_bytes(
        &self,
        url: &str,
        file_name: &str,
        folder_id: Option<i64>,
        replace_id: Option<i64>,
    ) -> Result<i64, CoreError> {
        let scratch = scratch_file(self.scratch_dir)?;
        self.source.download_to(url, scratch.path()).await?;

        let request = UploadRequest {
            path: scratch.path().to_path_buf(),
            file_name: file_name.to_string(),
            folder_id,
            replace_id,
        };
        Ok(self.destination.upload_file(&request).await?)
    }

    /// Walk the destination tree along `names`, creating missing levels.
    /// Returns the destination folder's path and id (`None` for the root).
    async fn ensure_folder(
        &mut self,
        names: &[String],
    ) -> Result<(String, Option<i64>), CoreError> {
        let client = self.destination;
        let mut node: &mut FolderNode = &mut *self.destination_tree;
        let mut path = ROOT_PATH.to_string();
        let mut parent = None;

        for name in names {
            let index = if let Some(index) = node.children.iter().position(|c| c.name == *name) {
                index
            } else {
                let created = client.create_folder(name, parent).await?;
                info!(folder = %name, path = %created.path, "destination folder created");
                node.children.push(FolderNode::from_created(name, &created));
                node.has_children = true;
                self.outcome.stats.folders_created += 1;
                node.children.len() - 1
            };
            node = &mut node.children[index];
            path.clone_from(&node.path);
            parent = Some(node.source_id);
        }
        Ok((path, parent))
    }
}

pub(crate) fn scratch_file(dir: Option<&Path>) -> Result<NamedTempFile, CoreError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("strapsync-");
    Ok(match dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            builder.tempfile_in(dir)?
        }
        None => builder.tempfile()?,
    })
}
