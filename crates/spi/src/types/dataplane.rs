use super::asset::DataAddress;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Instructs the data plane to move data from a source to a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFlowRequest {
    pub id: String,
    pub process_id: String,
    pub source_data_address: DataAddress,
    pub destination_data_address: DataAddress,
    #[serde(default)]
    pub trace_context: HashMap<String, String>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataFlowState {
    NotTracked,
    Received,
    InProgress,
    Completed,
    Failed,
}
