// Media-library endpoints
//
// Folder listing and creation, file listing, bulk deletion, downloads and
// multipart uploads (optionally replacing an existing file in place).

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::client::{AdminClient, PAGE_SIZE, paginate};
use crate::error::Error;
use crate::models::{
    BulkDeleteMedia, CreateFolderBody, CreatedFolder, DataEnvelope, FileInfo, Folder, FolderQuery,
    RemoteFile, ResultsPage,
};

const FOLDERS_PATH: &str = "/upload/folders";
const FILES_PATH: &str = "/upload/files";
const UPLOAD_PATH: &str = "/upload";
const BULK_DELETE_PATH: &str = "/upload/actions/bulk-delete";
const NEWEST_FIRST: &str = "createdAt:DESC";

/// A local file to push into the media library.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Local path holding the bytes.
    pub path: PathBuf,
    /// Name recorded in the media library.
    pub file_name: String,
    /// Destination folder; `None` uploads to the root.
    pub folder_id: Option<i64>,
    /// Existing file to overwrite in place.
    pub replace_id: Option<i64>,
}

fn page_params(page: u32, page_size: u32) -> Vec<(&'static str, String)> {
    vec![
        ("page", page.to_string()),
        ("pageSize", page_size.to_string()),
        ("sort", NEWEST_FIRST.into()),
    ]
}

impl AdminClient {
    // ── Folders ──────────────────────────────────────────────────────

    /// One page of folders matching `query`.
    pub async fn list_folders_page(
        &self,
        query: &FolderQuery,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Folder>, Error> {
        let mut params = page_params(page, page_size);
        match query {
            FolderQuery::Root => {
                params.push(("filters[$and][0][parent][id][$null]", "true".into()));
            }
            FolderQuery::Children { parent_id, path } => {
                params.push(("folderPath", path.clone()));
                params.push(("filters[$and][0][parent][id]", parent_id.to_string()));
            }
        }

        let envelope: DataEnvelope<Vec<Folder>> = self.get(FOLDERS_PATH, &params).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Every folder matching `query`.
    pub async fn list_folders(&self, query: &FolderQuery) -> Result<Vec<Folder>, Error> {
        paginate(PAGE_SIZE, |page, size| {
            self.list_folders_page(query, page, size)
        })
        .await
    }

    /// Create a folder under `parent` (or at the root).
    pub async fn create_folder(
        &self,
        name: &str,
        parent: Option<i64>,
    ) -> Result<CreatedFolder, Error> {
        let envelope: DataEnvelope<CreatedFolder> = self
            .post(FOLDERS_PATH, &CreateFolderBody { name, parent })
            .await?;
        envelope.data.ok_or_else(|| Error::Deserialization {
            message: format!("folder creation for {name:?} returned no data"),
            body: String::new(),
        })
    }

    // ── Files ────────────────────────────────────────────────────────

    /// One page of files stored directly in the folder at `folder_path`.
    pub async fn list_files_page(
        &self,
        folder_path: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<RemoteFile>, Error> {
        let mut params = page_params(page, page_size);
        params.push(("filters[$and][0][folderPath][$eq]", folder_path.into()));

        let page: ResultsPage<RemoteFile> = self.get(FILES_PATH, &params).await?;
        Ok(page.results)
    }

    /// Every file stored directly in the folder at `folder_path`.
    pub async fn list_files(&self, folder_path: &str) -> Result<Vec<RemoteFile>, Error> {
        paginate(PAGE_SIZE, |page, size| {
            self.list_files_page(folder_path, page, size)
        })
        .await
    }

    /// Delete files and folders in one request.
    pub async fn bulk_delete_media(
        &self,
        file_ids: &[i64],
        folder_ids: &[i64],
    ) -> Result<(), Error> {
        self.post_no_response(
            BULK_DELETE_PATH,
            &BulkDeleteMedia {
                file_ids,
                folder_ids,
            },
        )
        .await
    }

    // ── Transfer of bytes ────────────────────────────────────────────

    /// Download a file URL (absolute or instance-relative) to `dest`.
    pub async fn download_to(&self, raw_url: &str, dest: &Path) -> Result<u64, Error> {
        let url = self.absolute_url(raw_url)?;
        let mut resp = self.get_unauthenticated(url).await?;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!("downloaded {written} bytes to {}", dest.display());
        Ok(written)
    }

    /// Upload a local file and return the id of the stored media file.
    ///
    /// When `replace_id` is set the existing file is overwritten in place and
    /// keeps its id; a response without an id falls back to it.
    pub async fn upload_file(&self, request: &UploadRequest) -> Result<i64, Error> {
        let bytes = tokio::fs::read(&request.path).await?;
        let mime = mime_guess::from_path(&request.file_name).first_or_octet_stream();

        let part = Part::bytes(bytes)
            .file_name(request.file_name.clone())
            .mime_str(mime.essence_str())?;

        let info = FileInfo {
            folder: request.folder_id,
            name: &request.file_name,
        };
        let info = serde_json::to_string(&info).map_err(|e| Error::Deserialization {
            message: format!("failed to encode fileInfo: {e}"),
            body: String::new(),
        })?;

        let form = Form::new().part("files", part).text("fileInfo", info);

        let params: Vec<(&str, String)> = request
            .replace_id
            .map(|id| vec![("id", id.to_string())])
            .unwrap_or_default();

        let response: Value = self.post_multipart(UPLOAD_PATH, &params, form).await?;

        uploaded_id(&response)
            .or(request.replace_id)
            .ok_or_else(|| Error::Deserialization {
                message: format!("upload of {} returned no file id", request.file_name),
                body: response.to_string(),
            })
    }
}

/// The upload endpoint answers with an array of files or a single file.
fn uploaded_id(response: &Value) -> Option<i64> {
    let file = match response {
        Value::Array(files) => files.first()?,
        other => other,
    };
    file.get("id").and_then(Value::as_i64)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::uploaded_id;

    #[test]
    fn uploaded_id_from_array_or_object() {
        assert_eq!(uploaded_id(&json!([{ "id": 7 }])), Some(7));
        assert_eq!(uploaded_id(&json!({ "id": 9 })), Some(9));
        assert_eq!(uploaded_id(&json!([])), None);
        assert_eq!(uploaded_id(&json!(null)), None);
    }
}
