use dsc_spi::types::FederatedCacheNode;
use serde::{Deserialize, Serialize};

/// Envelope a node is persisted in. The id is the node name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedCacheNodeDocument {
    pub id: String,
    pub partition_key: String,
    pub wrapped_instance: FederatedCacheNode,
}

impl FederatedCacheNodeDocument {
    pub fn new(node: FederatedCacheNode, partition_key: impl Into<String>) -> Self {
        Self {
            id: node.name.clone(),
            partition_key: partition_key.into(),
            wrapped_instance: node,
        }
    }
}
