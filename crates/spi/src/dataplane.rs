//! Data plane contracts: operators that move bytes and the manager that
//! schedules transfers.
use crate::types::{DataAddress, DataFlowRequest, DataFlowState};
use async_trait::async_trait;
use dsc_error::Result;
use std::sync::Arc;

#[async_trait]
pub trait DataReader: Send + Sync {
    fn can_handle(&self, address_type: &str) -> bool;

    async fn read(&self, source: &DataAddress) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait DataWriter: Send + Sync {
    fn can_handle(&self, address_type: &str) -> bool;

    async fn write(&self, destination: &DataAddress, name: &str, data: Vec<u8>) -> Result<()>;
}

/// Hands a whole flow to an external streaming system instead of copying bytes.
#[async_trait]
pub trait DataStreamPublisher: Send + Sync {
    fn can_handle(&self, request: &DataFlowRequest) -> bool;

    async fn notify_publisher(&self, request: &DataFlowRequest) -> Result<()>;
}

pub trait DataOperatorRegistry: Send + Sync {
    fn register_reader(&self, reader: Arc<dyn DataReader>);

    fn register_writer(&self, writer: Arc<dyn DataWriter>);

    fn register_stream_publisher(&self, publisher: Arc<dyn DataStreamPublisher>);

    /// First registered reader that can handle the type.
    fn get_reader(&self, address_type: &str) -> Option<Arc<dyn DataReader>>;

    fn get_writer(&self, address_type: &str) -> Option<Arc<dyn DataWriter>>;

    fn get_stream_publisher(&self, request: &DataFlowRequest) -> Option<Arc<dyn DataStreamPublisher>>;
}

#[async_trait]
pub trait DataPlaneManager: Send + Sync {
    fn validate(&self, request: &DataFlowRequest) -> Result<()>;

    async fn initiate_transfer(&self, request: DataFlowRequest) -> Result<()>;

    fn transfer_state(&self, process_id: &str) -> DataFlowState;
}
