// ── Reference rewriter ──
//
// Substitutes every mapped asset reference with `{ "id": <destination id> }`.
// Run after sanitizing: the rewritten `{id}` objects carry no `documentId`
// and would otherwise lose their id.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::document::{AssetRef, Document, Node};
use crate::error::CoreError;
use crate::tree::FolderNode;

/// Source asset id to destination asset id. Built per run, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetMapping(IndexMap<i64, i64>);

impl AssetMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping from the files of a replayed tree (those with a destination id).
    pub fn from_tree(tree: &FolderNode) -> Self {
        Self(
            tree.all_files()
                .into_iter()
                .filter_map(|file| file.destination_id.map(|dest| (file.source_id, dest)))
                .collect(),
        )
    }

    /// Record a mapping; the first entry for a source id wins.
    pub fn insert(&mut self, source_id: i64, destination_id: i64) {
        self.0.entry(source_id).or_insert(destination_id);
    }

    pub fn get(&self, source_id: i64) -> Option<i64> {
        self.0.get(&source_id).copied()
    }

    pub fn contains(&self, source_id: i64) -> bool {
        self.0.contains_key(&source_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(i64, i64)> for AssetMapping {
    fn from_iter<I: IntoIterator<Item = (i64, i64)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (source, dest) in iter {
            mapping.insert(source, dest);
        }
        mapping
    }
}

/// What to do with an asset reference that has no mapping entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingPolicy {
    /// Keep the original reference and log a warning.
    #[default]
    Lenient,
    /// Fail with [`CoreError::UnmappedAsset`].
    Strict,
}

/// Rewrite every asset reference in `doc`.
pub fn rewrite_document(
    doc: &Document,
    mapping: &AssetMapping,
    policy: MappingPolicy,
) -> Result<Document, CoreError> {
    let fields = rewrite_fields(&doc.fields, mapping, policy)?;
    Ok(Document { fields })
}

/// Rewrite every asset reference below `node`.
pub fn rewrite_node(
    node: &Node,
    mapping: &AssetMapping,
    policy: MappingPolicy,
) -> Result<Node, CoreError> {
    Ok(match node {
        Node::Asset(asset) => rewrite_asset(asset, mapping, policy)?,
        Node::Component(fields) => Node::Component(rewrite_fields(fields, mapping, policy)?),
        Node::Object(fields) => Node::Object(rewrite_fields(fields, mapping, policy)?),
        Node::Array(items) => Node::Array(
            items
                .iter()
                .map(|item| rewrite_node(item, mapping, policy))
                .collect::<Result<_, _>>()?,
        ),
        Node::Scalar(value) => Node::Scalar(value.clone()),
    })
}

fn rewrite_fields(
    fields: &IndexMap<String, Node>,
    mapping: &AssetMapping,
    policy: MappingPolicy,
) -> Result<IndexMap<String, Node>, CoreError> {
    fields
        .iter()
        .map(|(key, node)| -> Result<(String, Node), CoreError> {
            Ok((key.clone(), rewrite_node(node, mapping, policy)?))
        })
        .collect()
}

fn rewrite_asset(
    asset: &AssetRef,
    mapping: &AssetMapping,
    policy: MappingPolicy,
) -> Result<Node, CoreError> {
    match (mapping.get(asset.id), policy) {
        (Some(dest), _) => Ok(id_reference(dest)),
        (None, MappingPolicy::Lenient) => {
            warn!(
                source_id = asset.id,
                name = asset.name().unwrap_or_default(),
                "asset has no destination counterpart; keeping original reference"
            );
            Ok(Node::Asset(asset.clone()))
        }
        (None, MappingPolicy::Strict) => Err(CoreError::UnmappedAsset {
            source_id: asset.id,
        }),
    }
}

fn id_reference(id: i64) -> Node {
    let mut fields = IndexMap::with_capacity(1);
    fields.insert("id".to_string(), Node::Scalar(Value::from(id)));
    Node::Object(fields)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::assets::extract_assets;

    fn sample() -> Document {
        Document::from_value(json!({
            "title": "Home",
            "hero": { "id": 7, "documentId": "f7", "url": "/uploads/hero.png", "name": "hero.png" },
            "blocks": [
                { "__component": "blocks.text", "body": "hi" },
                { "__component": "blocks.gallery", "images": [
                    { "id": 8, "hash": "a", "url": "/a.png" },
                    { "id": 9, "hash": "b", "url": "/b.png" }
                ] }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn mapped_assets_become_id_objects_in_place() {
        let mapping: AssetMapping = [(7, 70), (8, 80), (9, 90)].into_iter().collect();
        let out = rewrite_document(&sample(), &mapping, MappingPolicy::Strict).unwrap();
        assert_eq!(
            out.to_value(),
            json!({
                "title": "Home",
                "hero": { "id": 70 },
                "blocks": [
                    { "__component": "blocks.text", "body": "hi" },
                    { "__component": "blocks.gallery", "images": [{ "id": 80 }, { "id": 90 }] }
                ]
            })
        );
    }

    #[test]
    fn identity_mapping_only_reduces_assets() {
        let doc = sample();
        let mapping: AssetMapping = extract_assets(&doc).iter().map(|a| (a.id, a.id)).collect();
        let out = rewrite_document(&doc, &mapping, MappingPolicy::Lenient).unwrap();
        let value = out.to_value();
        assert_eq!(value["title"], "Home");
        assert_eq!(value["hero"], json!({ "id": 7 }));
        assert_eq!(value["blocks"][0], json!({ "__component": "blocks.text", "body": "hi" }));
        assert_eq!(value["blocks"][1]["images"], json!([{ "id": 8 }, { "id": 9 }]));
    }

    #[test]
    fn lenient_keeps_unmapped_strict_fails() {
        let mapping: AssetMapping = [(7, 70)].into_iter().collect();
        let lenient = rewrite_document(&sample(), &mapping, MappingPolicy::Lenient).unwrap();
        assert_eq!(lenient.to_value()["blocks"][1]["images"][0]["hash"], "a");

        let strict = rewrite_document(&sample(), &mapping, MappingPolicy::Strict);
        assert!(matches!(strict, Err(CoreError::UnmappedAsset { source_id: 8 })));
    }

    #[test]
    fn first_mapping_wins() {
        let mut mapping = AssetMapping::new();
        mapping.insert(1, 10);
        mapping.insert(1, 11);
        assert_eq!(mapping.get(1), Some(10));
        assert_eq!(mapping.len(), 1);
    }
}
