use super::asset::DataAddress;
use dsc_error::{ConnectorError, ErrorCode, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferProcessStates {
    Unsaved,
    Initial,
    Provisioning,
    Provisioned,
    Requested,
    RequestedAck,
    InProgress,
    Streaming,
    Completed,
    DeprovisioningReq,
    Deprovisioning,
    Deprovisioned,
    Ended,
    Error,
}

impl TransferProcessStates {
    pub const ALL: [TransferProcessStates; 14] = [
        Self::Unsaved,
        Self::Initial,
        Self::Provisioning,
        Self::Provisioned,
        Self::Requested,
        Self::RequestedAck,
        Self::InProgress,
        Self::Streaming,
        Self::Completed,
        Self::DeprovisioningReq,
        Self::Deprovisioning,
        Self::Deprovisioned,
        Self::Ended,
        Self::Error,
    ];

    pub fn code(&self) -> i32 {
        match self {
            Self::Unsaved => 0,
            Self::Initial => 100,
            Self::Provisioning => 200,
            Self::Provisioned => 300,
            Self::Requested => 400,
            Self::RequestedAck => 500,
            Self::InProgress => 600,
            Self::Streaming => 700,
            Self::Completed => 800,
            Self::DeprovisioningReq => 850,
            Self::Deprovisioning => 900,
            Self::Deprovisioned => 1000,
            Self::Ended => 1100,
            Self::Error => -1,
        }
    }

    pub fn from(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

impl fmt::Display for TransferProcessStates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unsaved => "UNSAVED",
            Self::Initial => "INITIAL",
            Self::Provisioning => "PROVISIONING",
            Self::Provisioned => "PROVISIONED",
            Self::Requested => "REQUESTED",
            Self::RequestedAck => "REQUESTED_ACK",
            Self::InProgress => "IN_PROGRESS",
            Self::Streaming => "STREAMING",
            Self::Completed => "COMPLETED",
            Self::DeprovisioningReq => "DEPROVISIONING_REQ",
            Self::Deprovisioning => "DEPROVISIONING",
            Self::Deprovisioned => "DEPROVISIONED",
            Self::Ended => "ENDED",
            Self::Error => "ERROR",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRequest {
    pub id: String,
    #[serde(default)]
    pub process_id: Option<String>,
    #[serde(default)]
    pub connector_address: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub connector_id: String,
    pub asset_id: String,
    #[serde(default)]
    pub contract_id: String,
    pub data_destination: DataAddress,
    #[serde(default = "default_managed_resources")]
    pub managed_resources: bool,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

fn default_managed_resources() -> bool {
    true
}

impl DataRequest {
    pub fn new(
        id: impl Into<String>,
        asset_id: impl Into<String>,
        data_destination: DataAddress,
    ) -> Self {
        Self {
            id: id.into(),
            process_id: None,
            connector_address: String::new(),
            protocol: String::new(),
            connector_id: String::new(),
            asset_id: asset_id.into(),
            contract_id: String::new(),
            data_destination,
            managed_resources: true,
            properties: HashMap::new(),
        }
    }

    pub fn destination_type(&self) -> &str {
        self.data_destination.address_type()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferProcessKind {
    Consumer,
    Provider,
}

/// Tracks a data transfer through its lifecycle.
///
/// `state` holds a [`TransferProcessStates`] code; `state_count` counts
/// consecutive entries into the same state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferProcess {
    pub id: String,
    pub kind: TransferProcessKind,
    pub state: i32,
    pub state_count: u32,
    pub state_timestamp: i64,
    pub error_detail: Option<String>,
    pub data_request: Option<DataRequest>,
}

impl TransferProcess {
    pub fn new(
        id: impl Into<String>,
        kind: TransferProcessKind,
        data_request: Option<DataRequest>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            state: TransferProcessStates::Unsaved.code(),
            state_count: 0,
            state_timestamp: chrono::Utc::now().timestamp_millis(),
            error_detail: None,
            data_request,
        }
    }

    pub fn current_state(&self) -> Option<TransferProcessStates> {
        TransferProcessStates::from(self.state)
    }

    pub fn transition_initial(&mut self) -> Result<()> {
        self.transition(TransferProcessStates::Initial, &[TransferProcessStates::Unsaved])
    }

    pub fn transition_provisioning(&mut self) -> Result<()> {
        use TransferProcessStates::*;
        self.transition(Provisioning, &[Initial, Provisioning])
    }

    pub fn transition_provisioned(&mut self) -> Result<()> {
        use TransferProcessStates::*;
        self.transition(Provisioned, &[Provisioning, Provisioned])
    }

    pub fn transition_requested(&mut self) -> Result<()> {
        use TransferProcessStates::*;
        self.transition(Requested, &[Provisioned, Requested])
    }

    pub fn transition_requested_ack(&mut self) -> Result<()> {
        use TransferProcessStates::*;
        self.transition(RequestedAck, &[Requested])
    }

    pub fn transition_in_progress(&mut self) -> Result<()> {
        use TransferProcessStates::*;
        self.transition(InProgress, &[RequestedAck, Provisioned, InProgress])
    }

    pub fn transition_streaming(&mut self) -> Result<()> {
        use TransferProcessStates::*;
        self.transition(Streaming, &[RequestedAck, Provisioned, Streaming])
    }

    pub fn transition_completed(&mut self) -> Result<()> {
        use TransferProcessStates::*;
        self.transition(Completed, &[RequestedAck, InProgress, Streaming, Completed])
    }

    pub fn transition_deprovisioning(&mut self) -> Result<()> {
        use TransferProcessStates::*;
        self.transition(
            Deprovisioning,
            &[Completed, DeprovisioningReq, Deprovisioning],
        )
    }

    pub fn transition_deprovisioned(&mut self) -> Result<()> {
        use TransferProcessStates::*;
        self.transition(Deprovisioned, &[Deprovisioning, Deprovisioned])
    }

    pub fn transition_ended(&mut self) -> Result<()> {
        use TransferProcessStates::*;
        self.transition(Ended, &[Deprovisioned])
    }

    /// Moves to ERROR from any state.
    pub fn transition_error(&mut self, error_detail: impl Into<String>) {
        self.error_detail = Some(error_detail.into());
        self.set_state(TransferProcessStates::Error);
    }

    fn transition(
        &mut self,
        end: TransferProcessStates,
        allowed_from: &[TransferProcessStates],
    ) -> Result<()> {
        let allowed = allowed_from.iter().any(|s| s.code() == self.state);
        if !allowed {
            let current = self
                .current_state()
                .map(|s| s.to_string())
                .unwrap_or_else(|| self.state.to_string());
            return Err(ConnectorError::new(
                ErrorCode::InvalidRequest,
                format!(
                    "Cannot transition TransferProcess {} from {} to {}",
                    self.id, current, end
                ),
            ));
        }
        self.set_state(end);
        Ok(())
    }

    fn set_state(&mut self, state: TransferProcessStates) {
        if self.state == state.code() {
            self.state_count += 1;
        } else {
            self.state_count = 1;
        }
        self.state = state.code();
        self.state_timestamp = chrono::Utc::now().timestamp_millis();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_codes_round_trip() {
        for state in TransferProcessStates::ALL {
            assert_eq!(TransferProcessStates::from(state.code()), Some(state));
        }
        assert_eq!(TransferProcessStates::from(42), None);
        assert_eq!(TransferProcessStates::Error.code(), -1);
        assert_eq!(TransferProcessStates::DeprovisioningReq.code(), 850);
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut process = TransferProcess::new("tp-1", TransferProcessKind::Consumer, None);
        process.transition_initial().unwrap();
        process.transition_provisioning().unwrap();
        process.transition_provisioned().unwrap();
        process.transition_requested().unwrap();
        process.transition_requested_ack().unwrap();
        process.transition_in_progress().unwrap();
        process.transition_completed().unwrap();
        process.transition_deprovisioning().unwrap();
        process.transition_deprovisioned().unwrap();
        process.transition_ended().unwrap();
        assert_eq!(process.current_state(), Some(TransferProcessStates::Ended));
    }

    #[test]
    fn test_invalid_transition_is_rejected() {
        let mut process = TransferProcess::new("tp-1", TransferProcessKind::Provider, None);
        let err = process.transition_completed().unwrap_err();
        assert!(err.message.contains("UNSAVED"));
        assert_eq!(process.state, TransferProcessStates::Unsaved.code());
    }

    #[test]
    fn test_state_count_tracks_reentry() {
        let mut process = TransferProcess::new("tp-1", TransferProcessKind::Provider, None);
        process.transition_initial().unwrap();
        process.transition_provisioning().unwrap();
        process.transition_provisioning().unwrap();
        assert_eq!(process.state_count, 2);
        process.transition_provisioned().unwrap();
        assert_eq!(process.state_count, 1);
    }

    #[test]
    fn test_error_from_any_state() {
        let mut process = TransferProcess::new("tp-1", TransferProcessKind::Consumer, None);
        process.transition_error("boom");
        assert_eq!(process.current_state(), Some(TransferProcessStates::Error));
        assert_eq!(process.error_detail.as_deref(), Some("boom"));
    }
}
