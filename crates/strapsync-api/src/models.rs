// Admin API response types
//
// Models for the content-manager and media-library endpoints. Fields use
// `#[serde(default)]` liberally because responses vary between backend
// versions; anything the engine does not need is ignored.

use serde::{Deserialize, Serialize};

// ── Envelopes ────────────────────────────────────────────────────────

/// `{ "data": ... }` wrapper used by login, folder and document endpoints.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: Option<T>,
}

/// `{ "results": [...] }` wrapper used by list endpoints. Paging stops on a
/// short page, so the `pagination` block is not read.
#[derive(Debug, Deserialize)]
pub struct ResultsPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub token: Option<String>,
}

// ── Content manager ──────────────────────────────────────────────────

/// Row of a collection-type listing. Only the durable id is kept.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub document_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkDeleteDocuments<'a> {
    pub document_ids: &'a [String],
}

// ── Media library ────────────────────────────────────────────────────

/// Count hint attached to folder listings (`children`, `files`).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CountHint {
    #[serde(default)]
    pub count: u64,
}

/// Folder row from `GET /upload/folders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: i64,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub children: CountHint,
    #[serde(default)]
    pub files: CountHint,
}

/// Folder returned by `POST /upload/folders`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedFolder {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub path: String,
}

/// File row from `GET /upload/files`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "root_folder_path")]
    pub folder_path: String,
}

fn root_folder_path() -> String {
    "/".into()
}

/// Which slice of the folder hierarchy to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderQuery {
    /// Folders without a parent.
    Root,
    /// Direct children of the folder with the given id and path.
    Children { parent_id: i64, path: String },
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateFolderBody<'a> {
    pub name: &'a str,
    pub parent: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkDeleteMedia<'a> {
    pub file_ids: &'a [i64],
    pub folder_ids: &'a [i64],
}

/// `fileInfo` part of a multipart upload.
#[derive(Debug, Serialize)]
pub(crate) struct FileInfo<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<i64>,
    pub name: &'a str,
}
