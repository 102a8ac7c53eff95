// ── Document model ──
//
// Raw JSON documents are classified once, at ingestion, into a tagged tree.
// Asset references, component instances and plain objects keep their tag
// through sanitizing, asset extraction and reference rewriting.

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Field carrying a component's type discriminator.
pub const COMPONENT_FIELD: &str = "__component";

/// Fields that, next to `id`, mark an object as a media asset reference.
const ASSET_MARKERS: [&str; 3] = ["documentId", "url", "hash"];

/// Fields tried, in order, when labelling a document for selection.
const LABEL_FIELDS: [&str; 4] = ["title", "name", "slug", "documentId"];

/// One classified value inside a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Reference to a media-library file. Opaque leaf.
    Asset(AssetRef),
    /// Component instance (`__component` present). Fields include the discriminator.
    Component(IndexMap<String, Node>),
    Object(IndexMap<String, Node>),
    Array(Vec<Node>),
    Scalar(Value),
}

/// A media asset as embedded in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRef {
    /// Source media-library file id.
    pub id: i64,
    raw: Map<String, Value>,
}

impl AssetRef {
    fn text(&self, field: &str) -> Option<&str> {
        self.raw.get(field).and_then(Value::as_str)
    }

    /// File name, if the reference carries one.
    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    pub fn url(&self) -> Option<&str> {
        self.text("url").filter(|url| !url.is_empty())
    }

    /// Source folder path; the root when absent.
    pub fn folder_path(&self) -> &str {
        self.text("folderPath").unwrap_or("/")
    }

    /// Name used for the destination file.
    pub fn file_name(&self) -> String {
        self.name()
            .map_or_else(|| format!("asset-{}", self.id), ToString::to_string)
    }

    /// The original JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.raw.clone())
    }
}

impl Node {
    /// Classify a raw JSON value. Asset detection runs before component
    /// detection, so an asset carrying `__component` stays an asset.
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Object(map) => classify_object(map),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::classify).collect()),
            scalar => Self::Scalar(scalar),
        }
    }

    /// Rebuild the raw JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Asset(asset) => asset.to_value(),
            Self::Component(fields) | Self::Object(fields) => fields_to_value(fields),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_value).collect()),
            Self::Scalar(value) => value.clone(),
        }
    }

    /// Component type, for component nodes.
    pub fn component_type(&self) -> Option<&str> {
        match self {
            Self::Component(fields) => match fields.get(COMPONENT_FIELD) {
                Some(Self::Scalar(Value::String(kind))) => Some(kind.as_str()),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

fn classify_object(map: Map<String, Value>) -> Node {
    let asset_id = map
        .get("id")
        .and_then(Value::as_i64)
        .filter(|_| ASSET_MARKERS.iter().any(|marker| map.contains_key(*marker)));
    if let Some(id) = asset_id {
        return Node::Asset(AssetRef { id, raw: map });
    }

    let is_component = map.contains_key(COMPONENT_FIELD);
    let fields = classify_fields(map);
    if is_component {
        Node::Component(fields)
    } else {
        Node::Object(fields)
    }
}

fn classify_fields(map: Map<String, Value>) -> IndexMap<String, Node> {
    map.into_iter()
        .map(|(key, value)| (key, Node::classify(value)))
        .collect()
}

fn fields_to_value(fields: &IndexMap<String, Node>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(key, node)| (key.clone(), node.to_value()))
            .collect(),
    )
}

/// A top-level document. The root itself is never classified as an asset
/// or component; only its nested values are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub fields: IndexMap<String, Node>,
}

impl Document {
    /// Classify a raw document. Non-object payloads yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                fields: classify_fields(map),
            }),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        fields_to_value(&self.fields)
    }

    pub fn get(&self, field: &str) -> Option<&Node> {
        self.fields.get(field)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    /// Durable id of the document, when present.
    pub fn document_id(&self) -> Option<&str> {
        match self.fields.get("documentId") {
            Some(Node::Scalar(Value::String(id))) if !id.is_empty() => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Human label: `title`, `name`, `slug`, `documentId`, else `#<position>`.
    pub fn label(&self, index: usize) -> String {
        LABEL_FIELDS
            .iter()
            .find_map(|field| match self.fields.get(*field) {
                Some(Node::Scalar(Value::String(text))) if !text.is_empty() => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_else(|| format!("#{}", index + 1))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn asset_wins_over_component() {
        let node = Node::classify(json!({
            "id": 7, "url": "/uploads/a.png", "__component": "odd.shape"
        }));
        assert!(matches!(node, Node::Asset(AssetRef { id: 7, .. })));
    }

    #[test]
    fn classification_needs_integer_id_and_marker() {
        assert!(matches!(
            Node::classify(json!({ "id": 1, "title": "x" })),
            Node::Object(_)
        ));
        assert!(matches!(
            Node::classify(json!({ "url": "/a.png" })),
            Node::Object(_)
        ));
        assert!(matches!(
            Node::classify(json!({ "id": 3, "hash": "abc" })),
            Node::Asset(_)
        ));
        assert!(matches!(
            Node::classify(json!({ "__component": "blocks.hero", "id": 2 })),
            Node::Component(_)
        ));
    }

    #[test]
    fn round_trip_preserves_order_and_shape() {
        let raw = json!({
            "title": "Welcome",
            "hero": { "id": 7, "documentId": "f1", "url": "/uploads/hero.png", "name": "hero.png" },
            "blocks": [
                { "__component": "blocks.text", "id": 4, "body": "hi" },
                { "__component": "blocks.gallery", "images": [{ "id": 9, "hash": "h" }] }
            ],
            "count": 3
        });
        let doc = Document::from_value(raw.clone()).unwrap();
        assert_eq!(doc.to_value(), raw);
        assert_eq!(doc.field_names(), vec!["title", "hero", "blocks", "count"]);
        let blocks = doc.get("blocks").unwrap().as_array().unwrap();
        assert_eq!(blocks[1].component_type(), Some("blocks.gallery"));
    }

    #[test]
    fn root_is_never_an_asset() {
        let doc = Document::from_value(json!({ "id": 1, "documentId": "d1", "url": "x" })).unwrap();
        assert_eq!(doc.document_id(), Some("d1"));
        assert!(matches!(doc.get("id"), Some(Node::Scalar(_))));
    }

    #[test]
    fn labels_fall_back_in_order() {
        let titled = Document::from_value(json!({ "title": "A", "name": "B" })).unwrap();
        let named = Document::from_value(json!({ "name": "B", "documentId": "d" })).unwrap();
        let bare = Document::from_value(json!({ "body": "x" })).unwrap();
        assert_eq!(titled.label(0), "A");
        assert_eq!(named.label(0), "B");
        assert_eq!(bare.label(4), "#5");
    }

    #[test]
    fn asset_accessors() {
        let Node::Asset(asset) = Node::classify(json!({ "id": 11, "hash": "h" })) else {
            panic!("expected asset");
        };
        assert_eq!(asset.folder_path(), "/");
        assert_eq!(asset.url(), None);
        assert_eq!(asset.file_name(), "asset-11");
    }
}
