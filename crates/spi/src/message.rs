//! Outbound messages to other connectors, dispatched by protocol.
use async_trait::async_trait;
use dsc_error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteMessage {
    pub protocol: String,
    pub connector_address: String,
    pub payload: Value,
}

#[async_trait]
pub trait RemoteMessageDispatcher: Send + Sync {
    fn protocol(&self) -> &str;

    async fn send(&self, message: RemoteMessage) -> Result<Value>;
}

#[async_trait]
pub trait RemoteMessageDispatcherRegistry: Send + Sync {
    fn register(&self, dispatcher: Arc<dyn RemoteMessageDispatcher>);

    /// Sends through the dispatcher registered for `protocol`.
    async fn send(&self, protocol: &str, message: RemoteMessage) -> Result<Value>;
}
