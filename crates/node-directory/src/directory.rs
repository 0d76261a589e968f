use crate::document::FederatedCacheNodeDocument;
use crate::store::{DocumentStore, StoredDocument};
use async_trait::async_trait;
use dsc_common::{retry_async, RetrySettings};
use dsc_error::{ConnectorError, ErrorCode, Result};
use dsc_spi::store::FederatedCacheNodeDirectory;
use dsc_spi::types::FederatedCacheNode;
use std::sync::Arc;
use tracing::debug;

/// Keeps one document per node name in a [`DocumentStore`].
pub struct DocumentNodeDirectory {
    store: Arc<dyn DocumentStore>,
    partition_key: String,
    retry: RetrySettings,
}

impl DocumentNodeDirectory {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        partition_key: impl Into<String>,
        retry: RetrySettings,
    ) -> Self {
        Self {
            store,
            partition_key: partition_key.into(),
            retry,
        }
    }
}

#[async_trait]
impl FederatedCacheNodeDirectory for DocumentNodeDirectory {
    async fn get_all(&self) -> Result<Vec<FederatedCacheNode>> {
        self.store
            .query_all_items()
            .await?
            .into_iter()
            .map(|item| {
                serde_json::from_value::<FederatedCacheNodeDocument>(item.body)
                    .map(|document| document.wrapped_instance)
                    .map_err(|e| {
                        ConnectorError::new(
                            ErrorCode::SerializationFailed,
                            format!("Stored node document {} is malformed: {}", item.id, e),
                        )
                    })
            })
            .collect()
    }

    async fn insert(&self, node: FederatedCacheNode) -> Result<()> {
        let document = FederatedCacheNodeDocument::new(node, self.partition_key.as_str());
        let item = StoredDocument {
            id: document.id.clone(),
            partition_key: document.partition_key.clone(),
            body: serde_json::to_value(&document)?,
        };

        let operation = format!("save node {}", item.id);
        retry_async(&operation, self.retry, || self.store.save_item(item.clone())).await?;
        debug!(node = %item.id, "Node saved to directory");
        Ok(())
    }
}
