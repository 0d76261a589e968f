//! Hierarchical, dot-separated runtime configuration.
//!
//! Settings are stored flat (`web.http.data.port = 9191`) and viewed through a
//! root path, so extensions can carve out the subtree they own with
//! [`Config::get_config`] and iterate groups with [`Config::partition`].
use dsc_error::{ConnectorError, ErrorCode, ErrorContext, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::str::FromStr;

/// Prefix for environment variables picked up by [`from_file`].
pub const ENV_PREFIX: &str = "DSC";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    root_path: String,
    entries: BTreeMap<String, String>,
}

impl Config {
    pub fn new(root_path: impl Into<String>, entries: BTreeMap<String, String>) -> Self {
        Self {
            root_path: root_path.into(),
            entries,
        }
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get_string_opt(key)
            .ok_or_else(|| ConnectorError::missing_setting(self.absolute_path_of(key)))
    }

    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string_opt(key)
            .unwrap_or_else(|| default.to_string())
    }

    pub fn get_string_opt(&self, key: &str) -> Option<String> {
        self.entries.get(&self.absolute_path_of(key)).cloned()
    }

    pub fn get_integer(&self, key: &str) -> Result<i32> {
        self.get_parsed(key, "integer")?
            .ok_or_else(|| ConnectorError::missing_setting(self.absolute_path_of(key)))
    }

    pub fn get_integer_or(&self, key: &str, default: i32) -> Result<i32> {
        Ok(self.get_parsed(key, "integer")?.unwrap_or(default))
    }

    pub fn get_long(&self, key: &str) -> Result<i64> {
        self.get_parsed(key, "long")?
            .ok_or_else(|| ConnectorError::missing_setting(self.absolute_path_of(key)))
    }

    pub fn get_long_or(&self, key: &str, default: i64) -> Result<i64> {
        Ok(self.get_parsed(key, "long")?.unwrap_or(default))
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool> {
        Ok(self.get_parsed(key, "boolean")?.unwrap_or(default))
    }

    /// Parses the value under `key` into any `FromStr` type.
    pub fn get_parsed<T: FromStr>(&self, key: &str, type_description: &str) -> Result<Option<T>> {
        let Some(value) = self.get_string_opt(key) else {
            return Ok(None);
        };
        value.trim().parse::<T>().map(Some).map_err(|_| {
            let key = self.absolute_path_of(key);
            ConnectorError::new(
                ErrorCode::InvalidSetting,
                format!(
                    "Setting {} with value {} cannot be parsed to {}",
                    key, value, type_description
                ),
            )
            .with_context(ErrorContext::Setting {
                key,
                value: Some(value.clone()),
            })
        })
    }

    /// Returns the subtree below `path`, relative to this config's root.
    pub fn get_config(&self, path: &str) -> Config {
        let absolute_path = self.absolute_path_of(path);
        let nested_prefix = format!("{}.", absolute_path);
        let entries = self
            .entries
            .iter()
            .filter(|(key, _)| **key == absolute_path || key.starts_with(&nested_prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Config::new(absolute_path, entries)
    }

    /// Union of both configs at the root path; `other` wins on duplicate keys.
    pub fn merge(&self, other: &Config) -> Config {
        let mut all = self.entries.clone();
        all.extend(other.entries.clone());
        Config::new("", all)
    }

    /// One sub-config per distinct first segment of the relative keys.
    pub fn partition(&self) -> Vec<Config> {
        let groups: BTreeSet<String> = self
            .relative_entries()
            .keys()
            .filter_map(|key| key.split('.').next().map(str::to_string))
            .collect();

        groups.iter().map(|group| self.get_config(group)).collect()
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn relative_entries(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(k, v)| (self.remove_prefix(k), v.clone()))
            .collect()
    }

    pub fn relative_entries_under(&self, base_path: &str) -> BTreeMap<String, String> {
        self.relative_entries()
            .into_iter()
            .filter(|(k, _)| k.starts_with(base_path))
            .collect()
    }

    /// Last segment of the root path (`"subgroup"` for `group.subgroup`).
    pub fn current_node(&self) -> &str {
        self.root_path.rsplit('.').next().unwrap_or_default()
    }

    pub fn is_leaf(&self) -> bool {
        self.entries.len() == 1 && self.entries.contains_key(&self.root_path)
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(&self.absolute_path_of(key))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_prefix(&self, path: &str) -> String {
        if self.root_path.is_empty() {
            return path.to_string();
        }
        match path.strip_prefix(&self.root_path) {
            Some(rest) => rest.strip_prefix('.').unwrap_or(rest).to_string(),
            None => path.to_string(),
        }
    }

    fn absolute_path_of(&self, key: &str) -> String {
        if self.root_path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.root_path, key)
        }
    }
}

pub fn empty() -> Config {
    Config::default()
}

pub fn from_map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Config
where
    K: Into<String>,
    V: Into<String>,
{
    Config::new(
        "",
        entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
    )
}

/// Parses Java-style properties text (`key=value` or `key: value`, `#`/`!` comments).
pub fn from_properties(content: &str) -> Config {
    let entries = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            let idx = line.find(['=', ':'])?;
            let (key, value) = line.split_at(idx);
            Some((key.trim().to_string(), value[1..].trim().to_string()))
        })
        .collect();
    Config::new("", entries)
}

/// Maps `EDC_WEB_HTTP_PORT=8181` style variables to `edc.web.http.port`.
pub fn from_environment_vars(vars: impl IntoIterator<Item = (String, String)>) -> Config {
    let entries = vars
        .into_iter()
        .map(|(k, v)| (k.to_lowercase().replace('_', "."), v))
        .collect();
    Config::new("", entries)
}

pub fn from_environment() -> Config {
    from_environment_vars(std::env::vars())
}

/// Loads a configuration file and overlays `DSC__`-prefixed environment
/// variables (`DSC__WEB__HTTP__PORT` overrides `web.http.port`).
///
/// `.properties` files are parsed directly; every other format goes through
/// the `config` crate and is flattened into dotted keys. A missing file
/// yields only the environment overlay.
pub fn from_file(path: &str) -> Result<Config> {
    let file_path = Path::new(path);
    let is_properties = file_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("properties"));

    let base = if is_properties && file_path.exists() {
        let content = std::fs::read_to_string(file_path).map_err(|e| {
            ConnectorError::new(
                ErrorCode::ConfigLoadFailed,
                format!("Failed to read configuration file {}: {}", path, e),
            )
        })?;
        from_properties(&content)
    } else {
        empty()
    };

    let builder = ::config::Config::builder();
    let builder = if !is_properties && file_path.exists() {
        builder.add_source(::config::File::with_name(path))
    } else {
        builder
    };
    let builder = builder.add_source(
        ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__"),
    );

    let cfg = builder.build().map_err(|e| {
        ConnectorError::new(
            ErrorCode::ConfigLoadFailed,
            format!("Failed to build configuration: {}", e),
        )
    })?;
    let value: serde_json::Value = cfg.try_deserialize().map_err(|e| {
        ConnectorError::new(
            ErrorCode::ConfigLoadFailed,
            format!("Failed to deserialize configuration: {}", e),
        )
    })?;

    let mut entries = BTreeMap::new();
    flatten_into("", &value, &mut entries);

    Ok(base.merge(&Config::new("", entries)))
}

fn flatten_into(prefix: &str, value: &serde_json::Value, out: &mut BTreeMap<String, String>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };

    match value {
        serde_json::Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(&join(key), nested, out);
            }
        }
        serde_json::Value::Array(items) => {
            let joined = items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(",");
            out.insert(prefix.to_string(), joined);
        }
        serde_json::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        serde_json::Value::Null => {}
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root: &str, entries: &[(&str, &str)]) -> Config {
        Config::new(
            root,
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_get_string() {
        let config = config("", &[("key", "value")]);
        assert_eq!(config.get_string("key").unwrap(), "value");
    }

    #[test]
    fn test_get_string_missing_without_default_fails() {
        let config = config("", &[]);
        let err = config.get_string("key").unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingSetting);
        assert_eq!(err.message, "No setting found for key key");
    }

    #[test]
    fn test_get_string_returns_default_or_none() {
        let config = config("", &[]);
        assert_eq!(config.get_string_or("key", "default"), "default");
        assert_eq!(config.get_string_opt("key"), None);
    }

    #[test]
    fn test_get_integer() {
        let config = config("", &[("key", "1")]);
        assert_eq!(config.get_integer("key").unwrap(), 1);
        assert_eq!(config.get_integer_or("missing", 2).unwrap(), 2);
        assert!(config.get_integer("missing").is_err());
    }

    #[test]
    fn test_get_integer_invalid_value_fails() {
        let config = config("", &[("key", "not_an_integer")]);
        let err = config.get_integer("key").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSetting);
        assert_eq!(
            err.message,
            "Setting key with value not_an_integer cannot be parsed to integer"
        );
        // a default does not hide a malformed value
        assert!(config.get_integer_or("key", 3).is_err());
    }

    #[test]
    fn test_get_long() {
        let config = config("", &[("key", "1"), ("bad", "not_a_long")]);
        assert_eq!(config.get_long("key").unwrap(), 1);
        assert_eq!(config.get_long_or("missing", 2).unwrap(), 2);
        assert!(config.get_long("bad").is_err());
        assert!(config.get_long("missing").is_err());
    }

    #[test]
    fn test_merge_overwrites_duplicates() {
        let config1 = config("", &[("key1", "value1"), ("key2", "value1")]);
        let config2 = config("", &[("key2", "value2"), ("key3", "value2")]);

        let union = config1.merge(&config2);

        assert_eq!(union.get_string("key1").unwrap(), "value1");
        assert_eq!(union.get_string("key2").unwrap(), "value2");
        assert_eq!(union.get_string("key3").unwrap(), "value2");
    }

    #[test]
    fn test_merge_is_rooted_at_empty_path() {
        let config1 = config("group", &[("group.key1", "value1")]);
        let config2 = config("another.group", &[("another.group.key2", "value2")]);

        let union = config1.merge(&config2);

        assert_eq!(config1.get_string("key1").unwrap(), "value1");
        assert!(union.get_string("key1").is_err());
        assert_eq!(union.get_string("group.key1").unwrap(), "value1");
        assert_eq!(config2.get_string("key2").unwrap(), "value2");
        assert!(union.get_string("key2").is_err());
        assert_eq!(union.get_string("another.group.key2").unwrap(), "value2");
    }

    #[test]
    fn test_get_config_relative_to_path() {
        let config = config("", &[("group.subgroup.key", "value")]);

        let nested = config.get_config("group").get_config("subgroup");
        assert_eq!(nested.get_string("key").unwrap(), "value");

        let multi_level = config.get_config("group.subgroup");
        assert_eq!(multi_level.get_string("key").unwrap(), "value");
    }

    #[test]
    fn test_get_config_filters_other_groups() {
        let config = config(
            "",
            &[
                ("another.group.another.key", "anotherValue"),
                ("group.subgroup.key", "value"),
                ("groupie.key", "sibling"),
            ],
        );

        let entries = config.get_config("group.subgroup").entries().clone();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get("group.subgroup.key").unwrap(), "value");

        assert!(!config.get_config("group").has_key("ie.key"));
    }

    #[test]
    fn test_relative_entries() {
        let config = config("", &[("group.subgroup.key", "value")]);

        let relative = config.get_config("group").relative_entries();
        assert_eq!(relative.get("subgroup.key").unwrap(), "value");
        assert_eq!(&config.relative_entries(), config.entries());
    }

    #[test]
    fn test_relative_entries_under_base_path() {
        let config = config(
            "default",
            &[
                ("default.properties.key", "value"),
                ("default.other", "anotherValue"),
            ],
        );

        let entries = config.relative_entries_under("properties");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get("properties.key").unwrap(), "value");
    }

    #[test]
    fn test_partition_yields_sub_configs() {
        let config = config(
            "group",
            &[
                ("group.default.key", "defaultValue"),
                ("group.specific.key", "specificValue"),
            ],
        );

        let parts = config.partition();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].get_string("key").unwrap(), "defaultValue");
        assert_eq!(parts[1].get_string("key").unwrap(), "specificValue");
        assert_eq!(parts[1].current_node(), "specific");
    }

    #[test]
    fn test_current_node_and_leaf() {
        assert_eq!(config("group.subgroup", &[]).current_node(), "subgroup");
        assert!(config("a.b", &[("a.b", "v")]).is_leaf());
        assert!(!config("a", &[("a.b", "v")]).is_leaf());
    }

    #[test]
    fn test_from_properties() {
        let config = from_properties(
            "# comment\nweb.http.port=8181\n! another comment\nweb.http.path : /api\n\nbroken line\n",
        );
        assert_eq!(config.get_string("web.http.port").unwrap(), "8181");
        assert_eq!(config.get_string("web.http.path").unwrap(), "/api");
        assert_eq!(config.entries().len(), 2);
    }

    #[test]
    fn test_from_environment_vars() {
        let config = from_environment_vars(vec![(
            "EDC_API_AUTH_KEY".to_string(),
            "secret".to_string(),
        )]);
        assert_eq!(config.get_string("edc.api.auth.key").unwrap(), "secret");
    }

    #[test]
    fn test_flatten_nested_values() {
        let value = serde_json::json!({
            "web": { "http": { "port": 8181, "path": "/api" } },
            "edc.connector.name": "provider",
            "origins": ["a", "b"],
            "unset": null
        });
        let mut out = BTreeMap::new();
        flatten_into("", &value, &mut out);

        assert_eq!(out.get("web.http.port").unwrap(), "8181");
        assert_eq!(out.get("web.http.path").unwrap(), "/api");
        assert_eq!(out.get("edc.connector.name").unwrap(), "provider");
        assert_eq!(out.get("origins").unwrap(), "a,b");
        assert!(!out.contains_key("unset"));
    }

    #[test]
    #[serial_test::serial]
    fn test_from_file_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connector.yaml");
        std::fs::write(
            &path,
            "web:\n  http:\n    port: 9191\n    data:\n      path: /api/v1/data\n",
        )
        .unwrap();

        let config = from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.get_integer("web.http.port").unwrap(), 9191);
        assert_eq!(
            config.get_string("web.http.data.path").unwrap(),
            "/api/v1/data"
        );
    }

    #[test]
    #[serial_test::serial]
    fn test_from_file_properties() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connector.properties");
        std::fs::write(&path, "edc.connector.name=consumer\n").unwrap();

        let config = from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.get_string("edc.connector.name").unwrap(), "consumer");
    }

    #[test]
    #[serial_test::serial]
    fn test_from_missing_file_is_empty() {
        let config = from_file("/definitely/not/here.yaml").unwrap();
        assert!(!config.has_key("web.http.port"));
    }
}
