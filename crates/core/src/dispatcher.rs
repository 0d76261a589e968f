use async_trait::async_trait;
use dsc_error::{ConnectorError, ErrorCode, Result};
use dsc_spi::message::{RemoteMessage, RemoteMessageDispatcher, RemoteMessageDispatcherRegistry};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Default)]
pub struct RemoteMessageDispatcherRegistryImpl {
    dispatchers: RwLock<HashMap<String, Arc<dyn RemoteMessageDispatcher>>>,
}

impl RemoteMessageDispatcherRegistryImpl {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RemoteMessageDispatcherRegistry for RemoteMessageDispatcherRegistryImpl {
    fn register(&self, dispatcher: Arc<dyn RemoteMessageDispatcher>) {
        self.dispatchers
            .write()
            .expect("dispatcher registry lock poisoned")
            .insert(dispatcher.protocol().to_string(), dispatcher);
    }

    async fn send(&self, protocol: &str, message: RemoteMessage) -> Result<Value> {
        let dispatcher = self
            .dispatchers
            .read()
            .expect("dispatcher registry lock poisoned")
            .get(protocol)
            .cloned();

        match dispatcher {
            Some(dispatcher) => dispatcher.send(message).await,
            None => Err(ConnectorError::new(
                ErrorCode::NoDispatcher,
                format!("No provider dispatcher registered for protocol: {}", protocol),
            )),
        }
    }
}
