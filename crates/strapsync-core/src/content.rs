// ── Content snapshots and replay ──
//
// Downloads sanitized documents, clears an instance's content and publishes
// documents into it.

use serde_json::Value;
use tracing::{debug, info};

use strapsync_api::AdminClient;

use crate::document::Document;
use crate::error::CoreError;
use crate::sanitize::sanitize;
use crate::schema::{EntryKind, EntryName, SchemaDescriptor};

/// Every published document of an instance, sanitized.
#[derive(Debug, Clone, Default)]
pub struct ContentSnapshot {
    pub singles: Vec<(EntryName, Document)>,
    pub collections: Vec<(EntryName, Vec<Document>)>,
}

impl ContentSnapshot {
    pub fn document_count(&self) -> usize {
        self.singles.len()
            + self
                .collections
                .iter()
                .map(|(_, docs)| docs.len())
                .sum::<usize>()
    }
}

fn sanitized(value: Value) -> Option<Document> {
    let mut doc = Document::from_value(value)?;
    sanitize(&mut doc);
    Some(doc)
}

/// The published document of a single type, sanitized.
pub async fn download_single(
    client: &AdminClient,
    entry: &EntryName,
) -> Result<Option<Document>, CoreError> {
    let raw = client.get_single_type(&entry.uid()).await?;
    Ok(raw.and_then(sanitized).filter(|doc| !doc.is_empty()))
}

/// Every published document of a collection type, sanitized, in listing order.
pub async fn download_collection(
    client: &AdminClient,
    entry: &EntryName,
) -> Result<Vec<Document>, CoreError> {
    let uid = entry.uid();
    let ids = client.list_document_ids(&uid).await?;
    let mut documents = Vec::with_capacity(ids.len());
    for id in &ids {
        let raw = client.get_collection_document(&uid, id).await?;
        if let Some(doc) = sanitized(raw) {
            documents.push(doc);
        }
    }
    debug!("downloaded {} documents of {entry}", documents.len());
    Ok(documents)
}

/// Download every single type and collection document.
pub async fn download_all(
    client: &AdminClient,
    schema: &SchemaDescriptor,
) -> Result<ContentSnapshot, CoreError> {
    let mut snapshot = ContentSnapshot::default();
    for entry in &schema.single_entries {
        if let Some(doc) = download_single(client, entry).await? {
            snapshot.singles.push((entry.clone(), doc));
        }
    }
    for entry in &schema.collection_entries {
        let docs = download_collection(client, entry).await?;
        snapshot.collections.push((entry.clone(), docs));
    }
    info!(documents = snapshot.document_count(), "content downloaded");
    Ok(snapshot)
}

/// Counts of what [`clear_content`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearedContent {
    pub singles: usize,
    pub documents: usize,
}

/// Delete existing single types and every collection document.
///
/// A single type counts as existing when its document has a `documentId`.
pub async fn clear_content(
    client: &AdminClient,
    schema: &SchemaDescriptor,
) -> Result<ClearedContent, CoreError> {
    let mut singles = Vec::new();
    for entry in &schema.single_entries {
        let exists = client
            .get_single_type(&entry.uid())
            .await?
            .and_then(|doc| doc.get("documentId").cloned())
            .is_some_and(|id| !id.is_null());
        if exists {
            singles.push(entry);
        }
    }

    let mut collections = Vec::new();
    for entry in &schema.collection_entries {
        let ids = client.list_document_ids(&entry.uid()).await?;
        collections.push((entry, ids));
    }

    let mut cleared = ClearedContent::default();
    for entry in singles {
        client.delete_single_type(&entry.uid()).await?;
        cleared.singles += 1;
    }
    for (entry, ids) in collections {
        if ids.is_empty() {
            continue;
        }
        client.bulk_delete_documents(&entry.uid(), &ids).await?;
        cleared.documents += ids.len();
    }
    info!(
        singles = cleared.singles,
        documents = cleared.documents,
        "destination content cleared"
    );
    Ok(cleared)
}

/// Publish `doc` as a new document of `entry`.
///
/// The source `documentId` is dropped so the destination assigns its own.
pub async fn publish_new(
    client: &AdminClient,
    entry: &EntryName,
    kind: EntryKind,
    doc: &Document,
) -> Result<(), CoreError> {
    let mut body = doc.clone();
    body.fields.shift_remove("documentId");
    let body = body.to_value();
    let uid = entry.uid();

    let result = match kind {
        EntryKind::Single => client.publish_single_type(&uid, &body).await,
        EntryKind::Collection => client.publish_new_document(&uid, &body).await,
    };
    result.map_err(|e| CoreError::PublishFailed {
        target: entry.to_string(),
        message: e.to_string(),
    })
}

/// Publish a partial update of an existing document.
///
/// Single types are addressed by entry; collection documents need their id.
pub async fn publish_update(
    client: &AdminClient,
    entry: &EntryName,
    document_id: Option<&str>,
    body: &Value,
) -> Result<(), CoreError> {
    let uid = entry.uid();
    let result = match document_id {
        None => client.publish_single_type(&uid, body).await,
        Some(id) => client.publish_existing_document(&uid, id, body).await,
    };
    result.map_err(|e| CoreError::PublishFailed {
        target: document_id.map_or_else(|| entry.to_string(), |id| format!("{entry}/{id}")),
        message: e.to_string(),
    })
}
