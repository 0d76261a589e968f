use dsc_common::Config;
use dsc_error::{ConnectorError, ErrorCode, Result};
use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;
use std::sync::Arc;

pub const CONNECTOR_NAME_SETTING: &str = "edc.connector.name";

/// Configuration, connector identity and the typed service registry shared by
/// all extensions during boot.
pub struct ServiceExtensionContext {
    config: Config,
    connector_id: String,
    services: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    features: BTreeSet<String>,
}

impl ServiceExtensionContext {
    pub fn new(config: Config) -> Self {
        let connector_id = config
            .get_string_opt(CONNECTOR_NAME_SETTING)
            .unwrap_or_else(|| format!("edc-{}", uuid::Uuid::new_v4()));
        Self {
            config,
            connector_id,
            services: HashMap::new(),
            features: BTreeSet::new(),
        }
    }

    pub fn connector_id(&self) -> &str {
        &self.connector_id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_at(&self, path: &str) -> Config {
        self.config.get_config(path)
    }

    /// Returns the parsed setting, or `default` when unset. Unparseable values are errors.
    pub fn get_setting<T: FromStr>(&self, key: &str, default: T) -> Result<T> {
        Ok(self
            .config
            .get_parsed(key, type_name::<T>())?
            .unwrap_or(default))
    }

    pub fn get_setting_string(&self, key: &str, default: &str) -> String {
        self.config.get_string_or(key, default)
    }

    /// Registers a service under its type, replacing any earlier registration.
    pub fn register_service<T>(&mut self, service: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.services.insert(TypeId::of::<T>(), Box::new(service));
    }

    pub fn get_service<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.find_service::<T>().ok_or_else(|| {
            ConnectorError::new(
                ErrorCode::ServiceNotFound,
                format!("Service not found: {}", type_name::<T>()),
            )
        })
    }

    pub fn find_service<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<Arc<T>>())
            .cloned()
    }

    pub fn has_service<T>(&self) -> bool
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.services.contains_key(&TypeId::of::<T>())
    }

    pub fn register_feature(&mut self, feature: impl Into<String>) {
        self.features.insert(feature.into());
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.contains(feature)
    }

    pub fn features(&self) -> &BTreeSet<String> {
        &self.features
    }
}
