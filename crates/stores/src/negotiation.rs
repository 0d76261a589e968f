use dsc_error::Result;
use dsc_spi::store::ContractNegotiationStore;
use dsc_spi::types::ContractAgreement;
use std::collections::HashMap;
use std::sync::RwLock;

/// Holds agreements only; negotiation state is not tracked.
#[derive(Default)]
pub struct InMemoryContractNegotiationStore {
    agreements: RwLock<HashMap<String, ContractAgreement>>,
}

impl InMemoryContractNegotiationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContractNegotiationStore for InMemoryContractNegotiationStore {
    fn find_contract_agreement(&self, agreement_id: &str) -> Option<ContractAgreement> {
        self.agreements
            .read()
            .expect("agreement lock poisoned")
            .get(agreement_id)
            .cloned()
    }

    fn save_agreement(&self, agreement: ContractAgreement) -> Result<()> {
        self.agreements
            .write()
            .expect("agreement lock poisoned")
            .insert(agreement.id.clone(), agreement);
        Ok(())
    }
}
