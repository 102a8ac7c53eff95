// ── Asset extraction ──

use crate::document::{AssetRef, Document, Node};

/// Every asset reference in `doc`, in encounter (depth-first, field) order.
pub fn extract_assets(doc: &Document) -> Vec<AssetRef> {
    let mut assets = Vec::new();
    for node in doc.fields.values() {
        collect(node, &mut assets);
    }
    assets
}

/// Asset references below a single node (e.g. a selected component).
pub fn extract_node_assets(node: &Node) -> Vec<AssetRef> {
    let mut assets = Vec::new();
    collect(node, &mut assets);
    assets
}

fn collect(node: &Node, out: &mut Vec<AssetRef>) {
    match node {
        Node::Asset(asset) => out.push(asset.clone()),
        Node::Component(fields) | Node::Object(fields) => {
            for child in fields.values() {
                collect(child, out);
            }
        }
        Node::Array(items) => {
            for item in items {
                collect(item, out);
            }
        }
        Node::Scalar(_) => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn finds_assets_in_order_without_descending_into_them() {
        let doc = Document::from_value(json!({
            "hero": { "id": 7, "url": "/uploads/hero.png", "formats": { "thumb": { "id": 99, "url": "/t.png" } } },
            "blocks": [
                { "__component": "blocks.gallery", "images": [
                    { "id": 8, "hash": "a" }, { "id": 9, "hash": "b" }
                ] }
            ],
            "seo": { "metaImage": { "id": 10, "documentId": "m" } }
        }))
        .unwrap();
        let ids: Vec<i64> = extract_assets(&doc).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![7, 8, 9, 10]);
    }

    #[test]
    fn component_node_extraction() {
        let node = Node::classify(json!({
            "__component": "blocks.hero",
            "image": { "id": 3, "url": "/u/x.png" }
        }));
        assert_eq!(extract_node_assets(&node).len(), 1);
    }
}
