// ── Connections and transfer sessions ──

use tracing::info;

use strapsync_api::AdminClient;

use crate::config::{ConnectConfig, TransferOptions};
use crate::error::CoreError;
use crate::schema::SchemaDescriptor;

/// An authenticated instance together with its content schema.
#[derive(Clone)]
pub struct Connection {
    pub name: String,
    pub client: AdminClient,
    pub schema: SchemaDescriptor,
}

impl Connection {
    /// Log in and fetch the schema.
    pub async fn connect(config: &ConnectConfig) -> Result<Self, CoreError> {
        info!(instance = %config.name, url = %config.url, "connecting");
        let client = AdminClient::login(
            config.url.clone(),
            &config.email,
            &config.password,
            &config.transport(),
        )
        .await?;
        Self::with_client(config.name.clone(), client).await
    }

    /// Fetch the schema through an already authenticated client.
    pub async fn with_client(name: String, client: AdminClient) -> Result<Self, CoreError> {
        let payload = client.content_type_schema().await?;
        let schema = SchemaDescriptor::from_payload(&payload);
        info!(
            instance = %name,
            singles = schema.single_entries.len(),
            collections = schema.collection_entries.len(),
            "schema loaded"
        );
        Ok(Self {
            name,
            client,
            schema,
        })
    }
}

/// Source and destination of one transfer run.
pub struct TransferSession {
    pub source: Connection,
    pub destination: Connection,
    pub options: TransferOptions,
}

impl TransferSession {
    pub fn new(source: Connection, destination: Connection, options: TransferOptions) -> Self {
        Self {
            source,
            destination,
            options,
        }
    }
}
