// ── Content-type schema ──
//
// Classifies the application-defined content types of an instance into
// single and collection entries. Built once per connection.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use strum::{Display, EnumIter};
use tracing::{debug, warn};

const APPLICATION_NAMESPACE: &str = "api::";

/// Model name of a content type (e.g. `article`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryName(String);

impl EntryName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Backend type uid: `api::<name>.<name>`.
    pub fn uid(&self) -> String {
        format!("{APPLICATION_NAMESPACE}{0}.{0}", self.0)
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Whether a content type holds one document or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    #[strum(to_string = "Single type")]
    Single,
    #[strum(to_string = "Collection type")]
    Collection,
}

/// Single and collection entries of one instance, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub single_entries: Vec<EntryName>,
    pub collection_entries: Vec<EntryName>,
}

impl SchemaDescriptor {
    /// Classify the raw `/content-type-builder/schema` payload.
    ///
    /// Only `api::` types are kept. Types without a `modelName` or with an
    /// unknown `kind` are dropped. A payload without `data.contentTypes`
    /// yields an empty descriptor.
    pub fn from_payload(payload: &Value) -> Self {
        let Some(content_types) = payload
            .get("data")
            .and_then(|data| data.get("contentTypes"))
            .and_then(Value::as_object)
        else {
            warn!("schema payload has no data.contentTypes; treating as empty");
            return Self::default();
        };

        let mut descriptor = Self::default();
        for (key, content_type) in content_types {
            if !key.starts_with(APPLICATION_NAMESPACE) {
                continue;
            }
            // Newer backends nest the attributes under `schema`.
            let attrs = content_type.get("schema").unwrap_or(content_type);
            let model_name = attrs
                .get("modelName")
                .or_else(|| content_type.get("modelName"))
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty());
            let Some(model_name) = model_name else {
                debug!("skipping {key}: no modelName");
                continue;
            };
            let kind = attrs
                .get("kind")
                .or_else(|| content_type.get("kind"))
                .and_then(Value::as_str);

            match kind {
                Some("singleType") => descriptor.single_entries.push(model_name.into()),
                Some("collectionType") => descriptor.collection_entries.push(model_name.into()),
                other => debug!("skipping {key}: unknown kind {other:?}"),
            }
        }
        descriptor
    }

    pub fn is_empty(&self) -> bool {
        self.single_entries.is_empty() && self.collection_entries.is_empty()
    }

    /// Entries of the given kind.
    pub fn entries(&self, kind: EntryKind) -> &[EntryName] {
        match kind {
            EntryKind::Single => &self.single_entries,
            EntryKind::Collection => &self.collection_entries,
        }
    }

    /// Kind of the entry with the given name, if the instance has it.
    pub fn resolve(&self, name: &str) -> Option<EntryKind> {
        if self.single_entries.iter().any(|e| e.as_str() == name) {
            Some(EntryKind::Single)
        } else if self.collection_entries.iter().any(|e| e.as_str() == name) {
            Some(EntryKind::Collection)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn payload() -> Value {
        json!({
            "data": {
                "components": {},
                "contentTypes": {
                    "api::homepage.homepage": { "modelName": "homepage", "kind": "singleType" },
                    "api::article.article": { "modelName": "article", "kind": "collectionType" },
                    "api::tag.tag": { "uid": "api::tag.tag", "schema": { "modelName": "tag", "kind": "collectionType" } },
                    "api::broken.broken": { "kind": "collectionType" },
                    "plugin::users-permissions.user": { "modelName": "user", "kind": "collectionType" },
                    "admin::user": { "modelName": "user", "kind": "collectionType" }
                }
            }
        })
    }

    #[test]
    fn classifies_application_types_only() {
        let schema = SchemaDescriptor::from_payload(&payload());
        assert_eq!(schema.single_entries, vec![EntryName::from("homepage")]);
        assert_eq!(
            schema.collection_entries,
            vec![EntryName::from("article"), EntryName::from("tag")]
        );
    }

    #[test]
    fn malformed_payload_is_empty_not_error() {
        assert!(SchemaDescriptor::from_payload(&json!({ "error": "nope" })).is_empty());
        assert!(SchemaDescriptor::from_payload(&json!([1, 2, 3])).is_empty());
        assert!(SchemaDescriptor::from_payload(&json!({ "data": { "contentTypes": 5 } })).is_empty());
    }

    #[test]
    fn uid_and_resolve() {
        let schema = SchemaDescriptor::from_payload(&payload());
        assert_eq!(EntryName::from("article").uid(), "api::article.article");
        assert_eq!(schema.resolve("homepage"), Some(EntryKind::Single));
        assert_eq!(schema.resolve("article"), Some(EntryKind::Collection));
        assert_eq!(schema.resolve("user"), None);
        assert_eq!(schema.entries(EntryKind::Single).len(), 1);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(EntryKind::Single.to_string(), "Single type");
        assert_eq!(EntryKind::Collection.to_string(), "Collection type");
    }
}
