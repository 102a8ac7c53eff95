// ── Media folder tree ──
//
// In-memory mirror of an instance's media library. The root is synthetic:
// it is never fetched and hosts the top-level folders and root files.

use serde::Serialize;

use strapsync_api::{CreatedFolder, Folder, RemoteFile};

/// Id of the synthetic root folder.
pub const ROOT_ID: i64 = -1;
/// Path of the synthetic root folder.
pub const ROOT_PATH: &str = "/";

/// A folder of the walked tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderNode {
    pub name: String,
    /// Backend path (id based, e.g. `/3/7`).
    pub path: String,
    /// Id on the instance the tree was walked from.
    pub source_id: i64,
    /// Id of the counterpart created on another instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<i64>,
    pub has_children: bool,
    pub children: Vec<FolderNode>,
    pub files: Vec<FileNode>,
}

/// A file of the walked tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileNode {
    pub source_id: i64,
    pub name: String,
    /// Absolute download URL.
    pub url: String,
    pub folder_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<i64>,
}

impl FileNode {
    pub fn from_remote(file: RemoteFile, url: String) -> Self {
        Self {
            source_id: file.id,
            name: file.name,
            url,
            folder_path: file.folder_path,
            destination_id: None,
        }
    }
}

impl FolderNode {
    /// Synthetic root hosting top-level folders and root files.
    pub fn root(children: Vec<FolderNode>, files: Vec<FileNode>) -> Self {
        Self {
            name: "root".into(),
            path: ROOT_PATH.into(),
            source_id: ROOT_ID,
            destination_id: None,
            has_children: !children.is_empty(),
            children,
            files,
        }
    }

    /// Node for a listed folder, before its children are walked.
    pub fn from_folder(folder: &Folder) -> Self {
        Self {
            name: folder.name.clone(),
            path: folder.path.clone(),
            source_id: folder.id,
            destination_id: None,
            has_children: folder.children.count > 0,
            children: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Node for a folder just created on the instance this tree mirrors.
    pub fn from_created(name: &str, folder: &CreatedFolder) -> Self {
        Self {
            name: folder.name.clone().unwrap_or_else(|| name.to_string()),
            path: folder.path.clone(),
            source_id: folder.id,
            destination_id: None,
            has_children: false,
            children: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.source_id == ROOT_ID
    }

    /// Map a backend folder path onto folder names, root to leaf.
    ///
    /// Each segment extends the path (`/3`, `/3/7`, ...) and must match a
    /// child's path exactly. The first unmatched segment ends the list.
    pub fn resolve_names(&self, folder_path: &str) -> Vec<String> {
        let mut names = Vec::new();
        let mut current = self;
        let mut prefix = String::new();

        for segment in folder_path.split('/').filter(|s| !s.is_empty()) {
            prefix.push('/');
            prefix.push_str(segment);
            match current.children.iter().find(|child| child.path == prefix) {
                Some(child) => {
                    names.push(child.name.clone());
                    current = child;
                }
                None => break,
            }
        }
        names
    }

    /// Every file in this subtree: own files first, then each child's.
    pub fn all_files(&self) -> Vec<&FileNode> {
        let mut files: Vec<&FileNode> = self.files.iter().collect();
        for child in &self.children {
            files.extend(child.all_files());
        }
        files
    }

    /// Number of folders below this one.
    pub fn folder_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.folder_count())
            .sum()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
            + self
                .children
                .iter()
                .map(FolderNode::file_count)
                .sum::<usize>()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    pub(crate) fn folder(name: &str, path: &str, id: i64, children: Vec<FolderNode>) -> FolderNode {
        FolderNode {
            name: name.into(),
            path: path.into(),
            source_id: id,
            destination_id: None,
            has_children: !children.is_empty(),
            children,
            files: Vec::new(),
        }
    }

    pub(crate) fn file(id: i64, name: &str, folder_path: &str) -> FileNode {
        FileNode {
            source_id: id,
            name: name.into(),
            url: format!("http://source/uploads/{name}"),
            folder_path: folder_path.into(),
            destination_id: None,
        }
    }

    fn sample() -> FolderNode {
        let mut banners = folder(
            "banners",
            "/1",
            1,
            vec![folder("summer", "/1/4", 4, Vec::new())],
        );
        banners.files.push(file(20, "wide.png", "/1"));
        banners.children[0].files.push(file(21, "beach.png", "/1/4"));
        FolderNode::root(
            vec![banners, folder("logos", "/2", 2, Vec::new())],
            vec![file(10, "hero.png", "/")],
        )
    }

    #[test]
    fn resolves_nested_path_to_names() {
        let tree = sample();
        assert_eq!(tree.resolve_names("/1/4"), vec!["banners", "summer"]);
        assert_eq!(tree.resolve_names("/2"), vec!["logos"]);
        assert!(tree.resolve_names("/").is_empty());
        assert!(tree.resolve_names("").is_empty());
    }

    #[test]
    fn unmatched_segment_truncates() {
        let tree = sample();
        assert_eq!(tree.resolve_names("/1/99/4"), vec!["banners"]);
        assert!(tree.resolve_names("/42").is_empty());
    }

    #[test]
    fn counts_and_file_order() {
        let tree = sample();
        assert!(tree.is_root());
        assert_eq!(tree.folder_count(), 3);
        assert_eq!(tree.file_count(), 3);
        let ids: Vec<i64> = tree.all_files().iter().map(|f| f.source_id).collect();
        assert_eq!(ids, vec![10, 20, 21]);
    }
}
