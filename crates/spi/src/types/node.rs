use serde::{Deserialize, Serialize};

/// A participant of the federation whose catalog can be crawled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedCacheNode {
    pub name: String,
    pub target_url: String,
    pub supported_protocols: Vec<String>,
}

impl FederatedCacheNode {
    pub fn new(
        name: impl Into<String>,
        target_url: impl Into<String>,
        supported_protocols: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target_url: target_url.into(),
            supported_protocols,
        }
    }
}
