use dsc_error::{ConnectorError, ErrorCode, Result};
use dsc_spi::store::{AssetIndex, AssetLoader, DataAddressResolver};
use dsc_spi::types::{Asset, AssetSelectorExpression, Criterion, DataAddress};
use std::collections::HashMap;
use std::sync::RwLock;

pub type AssetPredicate = Box<dyn Fn(&Asset) -> bool + Send + Sync>;

/// Turns selector criteria into predicates over asset properties.
#[derive(Debug, Default, Clone, Copy)]
pub struct CriterionToPredicateConverter;

impl CriterionToPredicateConverter {
    pub fn new() -> Self {
        Self
    }

    /// Fails up front for operators the predicate cannot evaluate.
    pub fn convert(&self, criterion: &Criterion) -> Result<AssetPredicate> {
        criterion.matches(None)?;
        let criterion = criterion.clone();
        Ok(Box::new(move |asset: &Asset| {
            criterion
                .matches(asset.property(&criterion.operand_left))
                .unwrap_or(false)
        }))
    }
}

#[derive(Default)]
struct Entries {
    assets: HashMap<String, Asset>,
    addresses: HashMap<String, DataAddress>,
}

/// Asset index, data address resolver and loader backed by process memory.
#[derive(Default)]
pub struct InMemoryAssetLoader {
    converter: CriterionToPredicateConverter,
    entries: RwLock<Entries>,
}

impl InMemoryAssetLoader {
    pub fn new(converter: CriterionToPredicateConverter) -> Self {
        Self {
            converter,
            entries: RwLock::new(Entries::default()),
        }
    }
}

impl AssetIndex for InMemoryAssetLoader {
    fn query_assets(&self, selector: &AssetSelectorExpression) -> Result<Vec<Asset>> {
        let predicates = selector
            .criteria
            .iter()
            .map(|c| self.converter.convert(c))
            .collect::<Result<Vec<_>>>()?;

        let entries = self.entries.read().expect("asset index lock poisoned");
        let mut assets: Vec<Asset> = entries
            .assets
            .values()
            .filter(|asset| predicates.iter().all(|p| p(asset)))
            .cloned()
            .collect();
        assets.sort_by(|a, b| a.id().cmp(&b.id()));
        Ok(assets)
    }

    fn find_by_id(&self, asset_id: &str) -> Option<Asset> {
        self.entries
            .read()
            .expect("asset index lock poisoned")
            .assets
            .get(asset_id)
            .cloned()
    }
}

impl DataAddressResolver for InMemoryAssetLoader {
    fn resolve_for_asset(&self, asset_id: &str) -> Result<DataAddress> {
        if asset_id.is_empty() {
            return Err(ConnectorError::new(
                ErrorCode::InvalidRequest,
                "Asset ID must not be empty",
            ));
        }
        self.entries
            .read()
            .expect("asset index lock poisoned")
            .addresses
            .get(asset_id)
            .cloned()
            .ok_or_else(|| ConnectorError::not_found("DataAddress", asset_id))
    }
}

impl AssetLoader for InMemoryAssetLoader {
    fn accept(&self, asset: Asset, address: DataAddress) -> Result<()> {
        let Some(id) = asset.id().map(str::to_string) else {
            return Err(ConnectorError::new(
                ErrorCode::InvalidRequest,
                "Asset must have an id",
            ));
        };
        let mut entries = self.entries.write().expect("asset index lock poisoned");
        entries.addresses.insert(id.clone(), address);
        entries.assets.insert(id, asset);
        Ok(())
    }
}
