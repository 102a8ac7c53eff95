// ── Component transfer ──
//
// Appends one component from a source document's array field to an array
// field of a destination document.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::assets::extract_node_assets;
use crate::content::publish_update;
use crate::document::{Document, Node};
use crate::error::{CoreError, InvalidSelection};
use crate::progress::Progress;
use crate::prompt::{Chooser, choose_item};
use crate::reconcile::ReconcileStats;
use crate::rewrite::rewrite_node;
use crate::sanitize::strip_node;
use crate::schema::{EntryKind, EntryName};
use crate::session::TransferSession;

use super::{choose_entry, choose_field, choose_kind, reconcile_assets, select_document};

/// Summary of a component transfer.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentTransferReport {
    pub kind: EntryKind,
    pub source_entry: EntryName,
    pub source_field: String,
    pub component: String,
    pub destination_entry: EntryName,
    pub destination_document: String,
    pub destination_field: String,
    pub assets: usize,
    pub stats: ReconcileStats,
}

/// Elements of an array field, or why the field cannot be used.
fn array_field<'d>(doc: &'d Document, field: &str) -> Result<&'d [Node], InvalidSelection> {
    doc.get(field)
        .and_then(Node::as_array)
        .ok_or_else(|| InvalidSelection::NotAnArray {
            field: field.to_string(),
        })
}

fn component_label(index: usize, node: &Node) -> String {
    node.component_type()
        .map_or_else(|| format!("#{}", index + 1), ToString::to_string)
}

/// Choose a component in a source document and append it to an array field
/// of a destination document.
pub async fn transfer_component(
    session: &TransferSession,
    chooser: &mut dyn Chooser,
    progress: &dyn Progress,
) -> Result<ComponentTransferReport, CoreError> {
    let source = &session.source;
    let destination = &session.destination;
    if source.schema.is_empty() {
        return Err(CoreError::NothingToTransfer {
            reason: format!("{} has no content types", source.name),
        });
    }

    // Source side.
    let kind = choose_kind(chooser)?;
    let source_entry = choose_entry(chooser, "Select the source entry", &source.schema, kind)?;
    progress.stage("Fetching source document");
    let (source_doc, _) = select_document(&source.client, chooser, &source_entry, kind).await?;

    let source_field = choose_field(
        chooser,
        "Select the field holding the component",
        &source_doc,
        source_entry.as_str(),
    )?;
    let items = array_field(&source_doc, &source_field)?;
    if items.is_empty() {
        return Err(InvalidSelection::EmptyArray {
            field: source_field,
        }
        .into());
    }
    let indexed: Vec<(usize, &Node)> = items.iter().enumerate().collect();
    let (index, node) = *choose_item(chooser, "Select the component", &indexed, |_, (i, node)| {
        component_label(*i, node)
    })?;
    let component_name = component_label(index, node);
    let mut component = node.clone();

    // Destination side.
    let destination_entry = choose_entry(
        chooser,
        "Select the destination entry",
        &destination.schema,
        kind,
    )?;
    progress.stage("Fetching destination document");
    let (destination_doc, destination_label) =
        select_document(&destination.client, chooser, &destination_entry, kind).await?;
    let document_id = match kind {
        EntryKind::Single => None,
        EntryKind::Collection => Some(
            destination_doc
                .document_id()
                .ok_or_else(|| InvalidSelection::MissingId {
                    what: destination_entry.to_string(),
                })?
                .to_string(),
        ),
    };
    let destination_field = choose_field(
        chooser,
        "Select the destination field",
        &destination_doc,
        destination_entry.as_str(),
    )?;
    let existing = array_field(&destination_doc, &destination_field)?;

    info!(
        component = %component_name,
        from = %source_entry,
        to = %destination_entry,
        field = %destination_field,
        "component selected"
    );

    let assets = extract_node_assets(&component);
    let outcome = reconcile_assets(session, chooser, progress, &assets).await?;

    strip_node(&mut component);
    let component = rewrite_node(&component, &outcome.mapping, session.options.mapping_policy)?;
    let mut values: Vec<Value> = existing.iter().map(Node::to_value).collect();
    values.push(component.to_value());
    let mut body = Map::new();
    body.insert(destination_field.clone(), Value::Array(values));

    progress.stage("Publishing destination document");
    publish_update(
        &destination.client,
        &destination_entry,
        document_id.as_deref(),
        &Value::Object(body),
    )
    .await?;
    progress.finish(&format!("{component_name} appended to {destination_entry}"));

    info!(entry = %destination_entry, field = %destination_field, "component transferred");
    Ok(ComponentTransferReport {
        kind,
        source_entry,
        source_field,
        component: component_name,
        destination_document: destination_label,
        destination_entry,
        destination_field,
        assets: assets.len(),
        stats: outcome.stats,
    })
}
