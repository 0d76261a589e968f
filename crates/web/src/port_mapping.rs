use dsc_common::Config;
use dsc_error::{ConnectorError, ErrorCode, ErrorContext, Result};
use dsc_spi::web::DEFAULT_CONTEXT_ALIAS;
use std::collections::BTreeMap;
use std::fmt;

pub const WEB_HTTP_PREFIX: &str = "web.http";
pub const DEFAULT_PATH: &str = "/api";
pub const DEFAULT_PORT: u16 = 8181;

/// Binds a context alias to a port and a base path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortMapping {
    pub name: String,
    pub port: u16,
    pub path: String,
}

impl PortMapping {
    pub fn new(name: impl Into<String>, port: u16, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            port,
            path: path.into(),
        }
    }
}

impl Default for PortMapping {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_ALIAS, DEFAULT_PORT, DEFAULT_PATH)
    }
}

impl fmt::Display for PortMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> :{}{}", self.name, self.port, self.path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebServerConfiguration {
    port_mappings: BTreeMap<String, PortMapping>,
}

impl WebServerConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `web.http.<alias>.port|path`.
    ///
    /// `web.http.port` and `web.http.path` configure the `default` alias.
    /// Falls back to the default mapping when nothing is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let sub_config = config.get_config(WEB_HTTP_PREFIX);

        let mut raw: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (key, value) in sub_config.relative_entries() {
            let key = if key.contains('.') {
                key
            } else {
                format!("{}.{}", DEFAULT_CONTEXT_ALIAS, key)
            };

            let parts: Vec<&str> = key.split('.').collect();
            let [alias, component] = parts.as_slice() else {
                continue;
            };
            if *component != "port" && *component != "path" {
                continue;
            }

            let components = raw.entry(alias.to_string()).or_default();
            if components.contains_key(*component) {
                return Err(ConnectorError::new(
                    ErrorCode::InvalidPortMapping,
                    format!(
                        "A port mapping for {}.{} already exists, currently mapped to {}",
                        WEB_HTTP_PREFIX,
                        key,
                        format_components(components)
                    ),
                )
                .with_context(ErrorContext::PortMapping {
                    key: format!("{}.{}", WEB_HTTP_PREFIX, key),
                    existing: components.clone(),
                }));
            }
            components.insert(component.to_string(), value);
        }

        let mut configuration = Self::new();
        for (alias, components) in raw {
            let port = match components.get("port") {
                Some(port) => port.parse::<u16>().map_err(|_| {
                    ConnectorError::new(
                        ErrorCode::InvalidPortMapping,
                        format!(
                            "Setting {}.{}.port with value {} is not a valid port",
                            WEB_HTTP_PREFIX, alias, port
                        ),
                    )
                })?,
                None => DEFAULT_PORT,
            };
            let path = components
                .get("path")
                .cloned()
                .unwrap_or_else(|| DEFAULT_PATH.to_string());
            configuration.add_port_mapping(PortMapping::new(alias, port, path));
        }

        if configuration.port_mappings.is_empty() {
            configuration.add_port_mapping(PortMapping::default());
        }
        Ok(configuration)
    }

    pub fn add_port_mapping(&mut self, mapping: PortMapping) {
        self.port_mappings.insert(mapping.name.clone(), mapping);
    }

    pub fn with_port_mapping(mut self, mapping: PortMapping) -> Self {
        self.add_port_mapping(mapping);
        self
    }

    pub fn port_mapping(&self, alias: &str) -> Option<&PortMapping> {
        self.port_mappings.get(alias)
    }

    pub fn port_mappings(&self) -> impl Iterator<Item = &PortMapping> {
        self.port_mappings.values()
    }
}

/// `alias` when `web.http.<alias>.port` is configured, otherwise the default alias.
pub fn context_alias_or_default<'a>(config: &Config, alias: &'a str) -> &'a str {
    if config.has_key(&format!("{}.{}.port", WEB_HTTP_PREFIX, alias)) {
        alias
    } else {
        DEFAULT_CONTEXT_ALIAS
    }
}

fn format_components(components: &BTreeMap<String, String>) -> String {
    let inner: Vec<String> = components
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    format!("{{{}}}", inner.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsc_common::config::from_map;

    fn mappings(configuration: &WebServerConfiguration) -> Vec<PortMapping> {
        configuration.port_mappings().cloned().collect()
    }

    #[test]
    fn test_empty_config_uses_default_mapping() {
        let configuration =
            WebServerConfiguration::from_config(&dsc_common::config::empty()).unwrap();
        assert_eq!(mappings(&configuration), vec![PortMapping::default()]);
    }

    #[test]
    fn test_short_keys_configure_default_alias() {
        let configuration = WebServerConfiguration::from_config(&from_map([
            ("web.http.port", "9191"),
            ("web.http.path", "/management"),
        ]))
        .unwrap();
        assert_eq!(
            mappings(&configuration),
            vec![PortMapping::new("default", 9191, "/management")]
        );
    }

    #[test]
    fn test_multiple_aliases_with_defaults() {
        let configuration = WebServerConfiguration::from_config(&from_map([
            ("web.http.port", "8181"),
            ("web.http.data.port", "9292"),
            ("web.http.data.path", "/api/v1/data"),
            ("web.http.ids.path", "/ids"),
        ]))
        .unwrap();

        assert_eq!(
            configuration.port_mapping("data"),
            Some(&PortMapping::new("data", 9292, "/api/v1/data"))
        );
        assert_eq!(
            configuration.port_mapping("ids"),
            Some(&PortMapping::new("ids", DEFAULT_PORT, "/ids"))
        );
        assert_eq!(
            configuration.port_mapping("default"),
            Some(&PortMapping::new("default", 8181, DEFAULT_PATH))
        );
    }

    #[test]
    fn test_other_shapes_are_ignored() {
        let configuration = WebServerConfiguration::from_config(&from_map([
            ("web.http.data.port", "9292"),
            ("web.http.data.tls.enabled", "true"),
            ("web.http.data.timeout", "30"),
        ]))
        .unwrap();
        assert_eq!(
            mappings(&configuration),
            vec![PortMapping::new("data", 9292, DEFAULT_PATH)]
        );
    }

    #[test]
    fn test_duplicate_mapping_is_rejected() {
        let err = WebServerConfiguration::from_config(&from_map([
            ("web.http.port", "8181"),
            ("web.http.default.port", "9191"),
        ]))
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidPortMapping);
        assert_eq!(
            err.message,
            "A port mapping for web.http.default.port already exists, currently mapped to {port=9191}"
        );
    }

    #[test]
    fn test_context_alias_falls_back_to_default() {
        let config = from_map([("web.http.control.port", "9192")]);
        assert_eq!(context_alias_or_default(&config, "control"), "control");
        assert_eq!(context_alias_or_default(&config, "data"), "default");
    }

    #[test]
    fn test_invalid_port() {
        let err = WebServerConfiguration::from_config(&from_map([("web.http.port", "eighty")]))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPortMapping);
    }
}
