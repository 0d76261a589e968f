use dsc_error::{ConnectorError, Result};
use dsc_spi::store::TransferProcessStore;
use dsc_spi::types::TransferProcess;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct InMemoryTransferProcessStore {
    processes: RwLock<HashMap<String, TransferProcess>>,
}

impl InMemoryTransferProcessStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransferProcessStore for InMemoryTransferProcessStore {
    fn find(&self, id: &str) -> Option<TransferProcess> {
        self.processes
            .read()
            .expect("transfer process lock poisoned")
            .get(id)
            .cloned()
    }

    fn process_id_for_transfer_id(&self, transfer_id: &str) -> Option<String> {
        self.processes
            .read()
            .expect("transfer process lock poisoned")
            .values()
            .find(|p| {
                p.data_request
                    .as_ref()
                    .is_some_and(|r| r.id == transfer_id)
            })
            .map(|p| p.id.clone())
    }

    fn create(&self, process: TransferProcess) -> Result<()> {
        let mut processes = self.processes.write().expect("transfer process lock poisoned");
        if processes.contains_key(&process.id) {
            return Err(ConnectorError::already_exists("TransferProcess", &process.id));
        }
        processes.insert(process.id.clone(), process);
        Ok(())
    }

    fn update(&self, process: TransferProcess) -> Result<()> {
        let mut processes = self.processes.write().expect("transfer process lock poisoned");
        match processes.get_mut(&process.id) {
            Some(existing) => {
                *existing = process;
                Ok(())
            }
            None => Err(ConnectorError::not_found("TransferProcess", &process.id)),
        }
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.processes
            .write()
            .expect("transfer process lock poisoned")
            .remove(id);
        Ok(())
    }

    fn next_for_state(&self, state: i32, max: usize) -> Vec<TransferProcess> {
        let mut matching: Vec<TransferProcess> = self
            .processes
            .read()
            .expect("transfer process lock poisoned")
            .values()
            .filter(|p| p.state == state)
            .cloned()
            .collect();
        matching.sort_by_key(|p| p.state_timestamp);
        matching.truncate(max);
        matching
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsc_error::ErrorCode;
    use dsc_spi::types::{
        DataAddress, DataRequest, TransferProcessKind, TransferProcessStates,
    };

    fn process(id: &str, request_id: &str) -> TransferProcess {
        let request = DataRequest::new(request_id, "asset", DataAddress::new("file"));
        let mut process = TransferProcess::new(id, TransferProcessKind::Consumer, Some(request));
        process.transition_initial().unwrap();
        process
    }

    #[test]
    fn test_create_find_and_lookup_by_request() {
        let store = InMemoryTransferProcessStore::new();
        store.create(process("tp-1", "req-1")).unwrap();

        assert_eq!(store.find("tp-1").unwrap().id, "tp-1");
        assert_eq!(store.process_id_for_transfer_id("req-1").as_deref(), Some("tp-1"));
        assert!(store.process_id_for_transfer_id("req-2").is_none());

        let err = store.create(process("tp-1", "req-1")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ObjectExists);
    }

    #[test]
    fn test_update_requires_existing() {
        let store = InMemoryTransferProcessStore::new();
        let err = store.update(process("tp-1", "req-1")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ObjectNotFound);

        store.create(process("tp-1", "req-1")).unwrap();
        let mut updated = store.find("tp-1").unwrap();
        updated.transition_provisioning().unwrap();
        store.update(updated).unwrap();
        assert_eq!(
            store.find("tp-1").unwrap().current_state(),
            Some(TransferProcessStates::Provisioning)
        );
    }

    #[test]
    fn test_next_for_state() {
        let store = InMemoryTransferProcessStore::new();
        for i in 0..5 {
            store
                .create(process(&format!("tp-{}", i), &format!("req-{}", i)))
                .unwrap();
        }
        let initial = TransferProcessStates::Initial.code();
        assert_eq!(store.next_for_state(initial, 3).len(), 3);
        assert!(store
            .next_for_state(TransferProcessStates::Completed.code(), 3)
            .is_empty());

        store.delete("tp-0").unwrap();
        assert_eq!(store.next_for_state(initial, 10).len(), 4);
    }
}
