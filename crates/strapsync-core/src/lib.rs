//! Transfer engine between two headless-CMS instances.
//!
//! This crate owns everything between the raw admin API (`strapsync-api`)
//! and the terminal front end:
//!
//! - **[`SchemaDescriptor`]**: single and collection entries of an instance.
//! - **[`TreeWalker`]**: paginated walk of a media library into a
//!   [`FolderNode`] tree.
//! - **[`Document`] / [`Node`]**: documents classified once into assets,
//!   components, plain objects, arrays and scalars, then sanitized with
//!   [`sanitize`](sanitize::sanitize).
//! - **[`AssetReconciler`]**: brings referenced assets into the destination
//!   library, asking a [`Chooser`] about name collisions, and produces an
//!   [`AssetMapping`] that [`rewrite_document`] applies.
//! - **Orchestrators** ([`transfer`]): full-instance, single-document and
//!   single-component transfers over a [`TransferSession`].

pub mod assets;
pub mod config;
pub mod content;
pub mod document;
pub mod error;
pub mod media;
pub mod progress;
pub mod prompt;
pub mod reconcile;
pub mod rewrite;
pub mod sanitize;
pub mod schema;
pub mod session;
pub mod transfer;
pub mod tree;
pub mod walker;

// ── Primary re-exports ──────────────────────────────────────────────
pub use assets::{extract_assets, extract_node_assets};
pub use config::{ConnectConfig, TlsVerification, TransferOptions};
pub use document::{AssetRef, Document, Node};
pub use error::{CoreError, InvalidSelection};
pub use progress::{Progress, Silent};
pub use prompt::{Chooser, CollisionChoice, parse_choice};
pub use reconcile::{AssetReconciler, ReconcileOutcome, ReconcileStats};
pub use rewrite::{AssetMapping, MappingPolicy, rewrite_document, rewrite_node};
pub use schema::{EntryKind, EntryName, SchemaDescriptor};
pub use session::{Connection, TransferSession};
pub use transfer::{
    ComponentTransferReport, DocumentTransferReport, FullTransferReport, transfer_component,
    transfer_document, transfer_full,
};
pub use tree::{FileNode, FolderNode};
pub use walker::{CountHints, TreeWalker};
