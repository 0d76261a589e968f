use async_trait::async_trait;
use dsc_error::Result;
use dsc_spi::store::FederatedCacheNodeDirectory;
use dsc_spi::types::FederatedCacheNode;
use std::sync::RwLock;

#[derive(Default)]
pub struct InMemoryNodeDirectory {
    nodes: RwLock<Vec<FederatedCacheNode>>,
}

impl InMemoryNodeDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FederatedCacheNodeDirectory for InMemoryNodeDirectory {
    async fn get_all(&self) -> Result<Vec<FederatedCacheNode>> {
        Ok(self.nodes.read().expect("node directory lock poisoned").clone())
    }

    async fn insert(&self, node: FederatedCacheNode) -> Result<()> {
        let mut nodes = self.nodes.write().expect("node directory lock poisoned");
        match nodes.iter_mut().find(|n| n.name == node.name) {
            Some(existing) => *existing = node,
            None => nodes.push(node),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_replaces_by_name() {
        let directory = InMemoryNodeDirectory::new();
        directory
            .insert(FederatedCacheNode::new("node-1", "http://a", vec!["ids".into()]))
            .await
            .unwrap();
        directory
            .insert(FederatedCacheNode::new("node-1", "http://b", vec![]))
            .await
            .unwrap();
        directory
            .insert(FederatedCacheNode::new("node-2", "http://c", vec![]))
            .await
            .unwrap();

        let nodes = directory.get_all().await.unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].target_url, "http://b");
    }
}
