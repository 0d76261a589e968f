use dsc_error::{ConnectorError, Result};
use dsc_spi::store::ContractDefinitionStore;
use dsc_spi::types::{ContractDefinition, QuerySpec, SortOrder};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Contract definitions keyed by id; unsorted queries return id order.
#[derive(Default)]
pub struct InMemoryContractDefinitionStore {
    definitions: RwLock<BTreeMap<String, ContractDefinition>>,
}

impl InMemoryContractDefinitionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn as_json(definition: &ContractDefinition) -> Result<Value> {
    serde_json::to_value(definition).map_err(ConnectorError::from)
}

fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    let text = |v: &Value| match v.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
        None => None,
    };
    match (text(a), text(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl ContractDefinitionStore for InMemoryContractDefinitionStore {
    fn find_all(&self, spec: &QuerySpec) -> Result<Vec<ContractDefinition>> {
        let filter = spec.filter_expression()?;
        let definitions: Vec<ContractDefinition> = self
            .definitions
            .read()
            .expect("contract definition lock poisoned")
            .values()
            .cloned()
            .collect();

        let mut rows = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let json = as_json(&definition)?;
            if let Some(criterion) = &filter {
                if !criterion.matches(json.get(&criterion.operand_left))? {
                    continue;
                }
            }
            rows.push((json, definition));
        }

        if let Some(field) = spec.sort_field.as_deref() {
            rows.sort_by(|(a, _), (b, _)| compare_field(a, b, field));
        }
        if spec.sort_order == SortOrder::Desc {
            rows.reverse();
        }

        Ok(rows
            .into_iter()
            .map(|(_, definition)| definition)
            .skip(spec.offset)
            .take(spec.limit)
            .collect())
    }

    fn find_by_id(&self, id: &str) -> Option<ContractDefinition> {
        self.definitions
            .read()
            .expect("contract definition lock poisoned")
            .get(id)
            .cloned()
    }

    fn save(&self, definition: ContractDefinition) -> Result<()> {
        self.definitions
            .write()
            .expect("contract definition lock poisoned")
            .insert(definition.id.clone(), definition);
        Ok(())
    }

    fn create(&self, definition: ContractDefinition) -> Result<()> {
        let mut definitions = self
            .definitions
            .write()
            .expect("contract definition lock poisoned");
        match definitions.entry(definition.id.clone()) {
            Entry::Occupied(_) => Err(ConnectorError::already_exists(
                "ContractDefinition",
                definition.id,
            )),
            Entry::Vacant(slot) => {
                slot.insert(definition);
                Ok(())
            }
        }
    }

    fn delete_by_id(&self, id: &str) -> Option<ContractDefinition> {
        self.definitions
            .write()
            .expect("contract definition lock poisoned")
            .remove(id)
    }
}
