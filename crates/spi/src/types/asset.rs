use dsc_error::{ConnectorError, ErrorCode, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

pub const PROPERTY_ID: &str = "asset:prop:id";
pub const PROPERTY_NAME: &str = "asset:prop:name";
pub const PROPERTY_VERSION: &str = "asset:prop:version";
pub const PROPERTY_CONTENT_TYPE: &str = "asset:prop:contenttype";

/// A piece of data offered by the connector, described purely by properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub properties: HashMap<String, Value>,
}

impl Asset {
    pub fn new(id: impl Into<String>) -> Self {
        let mut properties = HashMap::new();
        properties.insert(PROPERTY_ID.to_string(), Value::String(id.into()));
        Self { properties }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.properties.get(PROPERTY_ID).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get(PROPERTY_NAME).and_then(Value::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.properties.get(PROPERTY_VERSION).and_then(Value::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.properties
            .get(PROPERTY_CONTENT_TYPE)
            .and_then(Value::as_str)
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Physical location of an asset's data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataAddress {
    pub properties: BTreeMap<String, String>,
}

impl DataAddress {
    pub const TYPE: &'static str = "type";
    pub const KEY_NAME: &'static str = "keyName";

    pub fn new(address_type: impl Into<String>) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(Self::TYPE.to_string(), address_type.into());
        Self { properties }
    }

    /// Builds an address from raw properties; `type` must be present.
    pub fn from_properties(properties: BTreeMap<String, String>) -> Result<Self> {
        match properties.get(Self::TYPE) {
            Some(t) if !t.is_empty() => Ok(Self { properties }),
            _ => Err(ConnectorError::new(
                ErrorCode::InvalidRequest,
                "DataAddress builder missing Type property.",
            )),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_key_name(self, key_name: impl Into<String>) -> Self {
        self.with_property(Self::KEY_NAME, key_name)
    }

    pub fn address_type(&self) -> &str {
        self.properties
            .get(Self::TYPE)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn key_name(&self) -> Option<&str> {
        self.property(Self::KEY_NAME)
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_well_known_properties() {
        let asset = Asset::new("asset-1")
            .with_property(PROPERTY_NAME, "weather")
            .with_property(PROPERTY_VERSION, "1.0")
            .with_property(PROPERTY_CONTENT_TYPE, "application/json");

        assert_eq!(asset.id(), Some("asset-1"));
        assert_eq!(asset.name(), Some("weather"));
        assert_eq!(asset.version(), Some("1.0"));
        assert_eq!(asset.content_type(), Some("application/json"));
    }

    #[test]
    fn test_data_address_requires_type() {
        let mut props = BTreeMap::new();
        props.insert("path".to_string(), "/tmp/x".to_string());
        let err = DataAddress::from_properties(props.clone()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);

        props.insert(DataAddress::TYPE.to_string(), "file".to_string());
        let address = DataAddress::from_properties(props).unwrap();
        assert_eq!(address.address_type(), "file");
        assert_eq!(address.property("path"), Some("/tmp/x"));
    }

    #[test]
    fn test_data_address_key_name() {
        let address = DataAddress::new("HttpData").with_key_name("secret-key");
        assert_eq!(address.key_name(), Some("secret-key"));
    }
}
