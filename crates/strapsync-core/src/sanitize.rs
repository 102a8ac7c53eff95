// ── Sanitizer ──
//
// Removes backend bookkeeping from documents before they are replayed into
// another instance.

use crate::document::{Document, Node};

/// Top-level fields owned by the backend, never replayed.
pub const BOOKKEEPING_FIELDS: [&str; 9] = [
    "createdAt",
    "updatedAt",
    "publishedAt",
    "createdBy",
    "updatedBy",
    "id",
    "localizations",
    "status",
    "locale",
];

/// Remove `fields` from the top level of `doc`. Nested values are untouched.
pub fn strip_known_fields(doc: &mut Document, fields: &[&str]) {
    for field in fields {
        doc.fields.shift_remove(*field);
    }
}

/// Recursively drop backend-internal numeric ids.
///
/// Components lose their `id`. Other objects lose `id` unless they carry a
/// `documentId`. Asset references keep theirs. Idempotent.
pub fn strip_internal_ids(doc: &mut Document) {
    strip_object_id(&mut doc.fields);
    for node in doc.fields.values_mut() {
        strip_node(node);
    }
}

/// [`strip_internal_ids`] for a detached node (e.g. a selected component).
pub fn strip_node(node: &mut Node) {
    match node {
        Node::Asset(_) | Node::Scalar(_) => {}
        Node::Component(fields) => {
            fields.shift_remove("id");
            fields.values_mut().for_each(strip_node);
        }
        Node::Object(fields) => {
            strip_object_id(fields);
            fields.values_mut().for_each(strip_node);
        }
        Node::Array(items) => items.iter_mut().for_each(strip_node),
    }
}

fn strip_object_id(fields: &mut indexmap::IndexMap<String, Node>) {
    if !fields.contains_key("documentId") {
        fields.shift_remove("id");
    }
}

/// Full sanitizing pass applied to every downloaded document.
pub fn sanitize(doc: &mut Document) {
    strip_known_fields(doc, &BOOKKEEPING_FIELDS);
    strip_internal_ids(doc);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;

    fn doc(value: Value) -> Document {
        Document::from_value(value).unwrap()
    }

    #[test]
    fn known_fields_are_top_level_only() {
        let mut d = doc(json!({
            "id": 1, "documentId": "d1", "title": "x", "createdAt": "t", "locale": "en",
            "meta": { "createdAt": "nested", "status": "draft" }
        }));
        strip_known_fields(&mut d, &BOOKKEEPING_FIELDS);
        assert_eq!(
            d.to_value(),
            json!({
                "documentId": "d1", "title": "x",
                "meta": { "createdAt": "nested", "status": "draft" }
            })
        );
    }

    #[test]
    fn component_and_bare_ids_are_stripped_assets_kept() {
        let mut d = doc(json!({
            "documentId": "d1",
            "blocks": [
                {
                    "__component": "blocks.hero", "id": 4,
                    "image": { "id": 7, "documentId": "f7", "url": "/uploads/a.png" },
                    "cta": { "id": 12, "label": "Go" }
                }
            ],
            "seo": { "id": 3, "metaTitle": "t" },
            "author": { "id": 5, "documentId": "a5", "name": "Ada" }
        }));
        strip_internal_ids(&mut d);
        assert_eq!(
            d.to_value(),
            json!({
                "documentId": "d1",
                "blocks": [
                    {
                        "__component": "blocks.hero",
                        "image": { "id": 7, "documentId": "f7", "url": "/uploads/a.png" },
                        "cta": { "label": "Go" }
                    }
                ],
                "seo": { "metaTitle": "t" },
                "author": { "id": 5, "documentId": "a5", "name": "Ada" }
            })
        );
    }

    #[test]
    fn asset_without_document_id_keeps_its_id() {
        let mut d = doc(json!({ "cover": { "id": 9, "hash": "h", "url": "/u/c.png" } }));
        strip_internal_ids(&mut d);
        assert_eq!(d.get("cover").unwrap().to_value()["id"], 9);
    }

    #[test]
    fn strip_internal_ids_is_idempotent() {
        let mut once = doc(json!({
            "id": 2,
            "list": [{ "id": 1, "x": [{ "__component": "a.b", "id": 3 }] }],
            "img": { "id": 8, "url": "/u/x.png" }
        }));
        strip_internal_ids(&mut once);
        let mut twice = once.clone();
        strip_internal_ids(&mut twice);
        assert_eq!(once, twice);
    }
}
