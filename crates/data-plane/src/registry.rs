use dsc_spi::dataplane::{DataOperatorRegistry, DataReader, DataStreamPublisher, DataWriter};
use dsc_spi::types::DataFlowRequest;
use std::sync::{Arc, RwLock};

/// Operators are consulted in registration order.
#[derive(Default)]
pub struct DataOperatorRegistryImpl {
    readers: RwLock<Vec<Arc<dyn DataReader>>>,
    writers: RwLock<Vec<Arc<dyn DataWriter>>>,
    publishers: RwLock<Vec<Arc<dyn DataStreamPublisher>>>,
}

impl DataOperatorRegistryImpl {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataOperatorRegistry for DataOperatorRegistryImpl {
    fn register_reader(&self, reader: Arc<dyn DataReader>) {
        self.readers
            .write()
            .expect("readers lock poisoned")
            .push(reader);
    }

    fn register_writer(&self, writer: Arc<dyn DataWriter>) {
        self.writers
            .write()
            .expect("writers lock poisoned")
            .push(writer);
    }

    fn register_stream_publisher(&self, publisher: Arc<dyn DataStreamPublisher>) {
        self.publishers
            .write()
            .expect("publishers lock poisoned")
            .push(publisher);
    }

    fn get_reader(&self, address_type: &str) -> Option<Arc<dyn DataReader>> {
        self.readers
            .read()
            .expect("readers lock poisoned")
            .iter()
            .find(|r| r.can_handle(address_type))
            .cloned()
    }

    fn get_writer(&self, address_type: &str) -> Option<Arc<dyn DataWriter>> {
        self.writers
            .read()
            .expect("writers lock poisoned")
            .iter()
            .find(|w| w.can_handle(address_type))
            .cloned()
    }

    fn get_stream_publisher(&self, request: &DataFlowRequest) -> Option<Arc<dyn DataStreamPublisher>> {
        self.publishers
            .read()
            .expect("publishers lock poisoned")
            .iter()
            .find(|p| p.can_handle(request))
            .cloned()
    }
}
