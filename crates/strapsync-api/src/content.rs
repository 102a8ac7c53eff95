// Content-manager endpoints
//
// Schema listing plus read/delete/publish for single types and collection
// types. Documents travel as raw `serde_json::Value`: their shape is defined
// by the instance's schema, not by this crate.

use serde_json::Value;

use crate::client::{AdminClient, PAGE_SIZE, paginate};
use crate::error::Error;
use crate::models::{BulkDeleteDocuments, DataEnvelope, DocumentSummary, ResultsPage};

const SCHEMA_PATH: &str = "/content-type-builder/schema";

fn single_type_path(uid: &str) -> String {
    format!("/content-manager/single-types/{uid}")
}

fn collection_type_path(uid: &str) -> String {
    format!("/content-manager/collection-types/{uid}")
}

fn published() -> (&'static str, String) {
    ("status", "published".into())
}

impl AdminClient {
    // ── Schema ───────────────────────────────────────────────────────

    /// Raw content-type schema. Interpretation is left to the caller.
    pub async fn content_type_schema(&self) -> Result<Value, Error> {
        self.get(SCHEMA_PATH, &[]).await
    }

    // ── Single types ─────────────────────────────────────────────────

    /// Published document of a single type, or `None` when it has none.
    ///
    /// A single type that was never filled in answers 404.
    pub async fn get_single_type(&self, uid: &str) -> Result<Option<Value>, Error> {
        let envelope: DataEnvelope<Value> =
            match self.get(&single_type_path(uid), &[published()]).await {
                Ok(envelope) => envelope,
                Err(Error::Api { status: 404, .. }) => return Ok(None),
                Err(e) => return Err(e),
            };
        Ok(envelope.data.filter(|data| !data.is_null()))
    }

    pub async fn delete_single_type(&self, uid: &str) -> Result<(), Error> {
        self.delete(&single_type_path(uid)).await
    }

    /// Create-or-replace and publish the single type's document.
    pub async fn publish_single_type(&self, uid: &str, document: &Value) -> Result<(), Error> {
        self.post_no_response(
            &format!("{}/actions/publish", single_type_path(uid)),
            document,
        )
        .await
    }

    // ── Collection types ─────────────────────────────────────────────

    /// One page of published document ids.
    pub async fn list_document_ids_page(
        &self,
        uid: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<String>, Error> {
        let page: ResultsPage<DocumentSummary> = self
            .get(
                &collection_type_path(uid),
                &[
                    published(),
                    ("page", page.to_string()),
                    ("pageSize", page_size.to_string()),
                ],
            )
            .await?;
        Ok(page.results.into_iter().map(|d| d.document_id).collect())
    }

    /// Every published document id of a collection type.
    pub async fn list_document_ids(&self, uid: &str) -> Result<Vec<String>, Error> {
        paginate(PAGE_SIZE, |page, size| {
            self.list_document_ids_page(uid, page, size)
        })
        .await
    }

    /// One collection document by its durable id.
    pub async fn get_collection_document(
        &self,
        uid: &str,
        document_id: &str,
    ) -> Result<Value, Error> {
        let path = format!("{}/{document_id}", collection_type_path(uid));
        let envelope: DataEnvelope<Value> = self.get(&path, &[]).await?;
        envelope.data.ok_or_else(|| Error::Api {
            status: 404,
            message: format!("document {document_id} of {uid} has no data"),
        })
    }

    pub async fn bulk_delete_documents(
        &self,
        uid: &str,
        document_ids: &[String],
    ) -> Result<(), Error> {
        self.post_no_response(
            &format!("{}/actions/bulkDelete", collection_type_path(uid)),
            &BulkDeleteDocuments { document_ids },
        )
        .await
    }

    /// Create and publish a new collection document.
    pub async fn publish_new_document(&self, uid: &str, document: &Value) -> Result<(), Error> {
        self.post_no_response(
            &format!("{}/actions/publish", collection_type_path(uid)),
            document,
        )
        .await
    }

    /// Update and publish an existing collection document.
    pub async fn publish_existing_document(
        &self,
        uid: &str,
        document_id: &str,
        document: &Value,
    ) -> Result<(), Error> {
        self.post_no_response(
            &format!("{}/{document_id}/actions/publish", collection_type_path(uid)),
            document,
        )
        .await
    }
}
