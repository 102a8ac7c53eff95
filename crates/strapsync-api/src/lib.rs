// strapsync-api: Async Rust client for the Strapi admin REST API

pub mod auth;
pub mod client;
pub mod content;
pub mod error;
pub mod models;
pub mod transport;
pub mod upload;

pub use auth::request_token;
pub use client::{AdminClient, PAGE_SIZE, paginate};
pub use error::Error;
pub use models::{CountHint, CreatedFolder, DocumentSummary, Folder, FolderQuery, RemoteFile};
pub use transport::{TlsMode, TransportConfig};
pub use upload::UploadRequest;
