// ── Tree walker ──
//
// Recursive, paginated traversal of a media library into a `FolderNode`
// tree. Every listing uses page-number pagination with a fixed page size.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tracing::debug;

use strapsync_api::{AdminClient, Folder, FolderQuery};

use crate::error::CoreError;
use crate::tree::{FileNode, FolderNode, ROOT_PATH};

/// How folder listings use the backend's `children` / `files` counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountHints {
    /// Always list subfolders and files, whatever the counts say.
    #[default]
    Verify,
    /// Skip the listing when the count is zero. Stale counts drop content.
    Trust,
}

type WalkFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<FolderNode>, CoreError>> + Send + 'a>>;

/// Walks one instance's media library.
pub struct TreeWalker<'a> {
    client: &'a AdminClient,
    hints: CountHints,
}

impl<'a> TreeWalker<'a> {
    pub fn new(client: &'a AdminClient, hints: CountHints) -> Self {
        Self { client, hints }
    }

    /// Walk the whole library under a synthetic root.
    pub async fn walk(&self) -> Result<FolderNode, CoreError> {
        let children = self.walk_folders(FolderQuery::Root).await?;
        let files = self.list_files(ROOT_PATH).await?;
        let root = FolderNode::root(children, files);
        debug!(
            folders = root.folder_count(),
            files = root.file_count(),
            "media tree walked"
        );
        Ok(root)
    }

    fn walk_folders(&self, query: FolderQuery) -> WalkFuture<'_> {
        Box::pin(async move {
            let listed = self.client.list_folders(&query).await?;
            let mut nodes = Vec::with_capacity(listed.len());
            for folder in &listed {
                nodes.push(self.walk_folder(folder).await?);
            }
            Ok(nodes)
        })
    }

    async fn walk_folder(&self, folder: &Folder) -> Result<FolderNode, CoreError> {
        let mut node = FolderNode::from_folder(folder);

        if self.should_list(folder.children.count, "subfolders", &folder.path) {
            node.children = self
                .walk_folders(FolderQuery::Children {
                    parent_id: folder.id,
                    path: folder.path.clone(),
                })
                .await?;
            node.has_children = !node.children.is_empty();
        }
        if self.should_list(folder.files.count, "files", &folder.path) {
            node.files = self.list_files(&folder.path).await?;
        }
        Ok(node)
    }

    fn should_list(&self, count: u64, what: &str, path: &str) -> bool {
        match self.hints {
            CountHints::Verify => true,
            CountHints::Trust if count > 0 => true,
            CountHints::Trust => {
                debug!("skipping {what} of {path}: backend reports none");
                false
            }
        }
    }

    async fn list_files(&self, folder_path: &str) -> Result<Vec<FileNode>, CoreError> {
        let files = self.client.list_files(folder_path).await?;
        files
            .into_iter()
            .map(|file| -> Result<FileNode, CoreError> {
                let url = self.client.absolute_url(&file.url)?.to_string();
                Ok(FileNode::from_remote(file, url))
            })
            .collect()
    }
}
