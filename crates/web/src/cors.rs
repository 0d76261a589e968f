use axum::http::{HeaderName, HeaderValue, Method};
use dsc_common::Config;
use dsc_error::{ConnectorError, ErrorCode, Result};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub const CORS_ENABLED_SETTING: &str = "edc.web.rest.cors.enabled";
pub const CORS_ORIGINS_SETTING: &str = "edc.web.rest.cors.origins";
pub const CORS_HEADERS_SETTING: &str = "edc.web.rest.cors.headers";
pub const CORS_METHODS_SETTING: &str = "edc.web.rest.cors.methods";

const DEFAULT_ORIGINS: &str = "*";
const DEFAULT_HEADERS: &str = "origin, content-type, accept, authorization";
const DEFAULT_METHODS: &str = "GET, POST, DELETE, PUT, OPTIONS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfiguration {
    pub enabled: bool,
    pub allowed_origins: String,
    pub allowed_headers: String,
    pub allowed_methods: String,
}

impl Default for CorsConfiguration {
    fn default() -> Self {
        Self::none()
    }
}

impl CorsConfiguration {
    pub fn none() -> Self {
        Self {
            enabled: false,
            allowed_origins: DEFAULT_ORIGINS.to_string(),
            allowed_headers: DEFAULT_HEADERS.to_string(),
            allowed_methods: DEFAULT_METHODS.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            enabled: config.get_bool_or(CORS_ENABLED_SETTING, false)?,
            allowed_origins: config.get_string_or(CORS_ORIGINS_SETTING, DEFAULT_ORIGINS),
            allowed_headers: config.get_string_or(CORS_HEADERS_SETTING, DEFAULT_HEADERS),
            allowed_methods: config.get_string_or(CORS_METHODS_SETTING, DEFAULT_METHODS),
        })
    }

    /// `None` when CORS is disabled.
    pub fn layer(&self) -> Result<Option<CorsLayer>> {
        if !self.enabled {
            return Ok(None);
        }

        let origins = split(&self.allowed_origins);
        let allow_origin = if origins.iter().any(|o| *o == "*") {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(
                origins
                    .iter()
                    .map(|o| parse(CORS_ORIGINS_SETTING, o, |s| HeaderValue::from_str(s).ok()))
                    .collect::<Result<Vec<_>>>()?,
            )
        };

        let headers = split(&self.allowed_headers)
            .iter()
            .map(|h| parse(CORS_HEADERS_SETTING, h, |s| HeaderName::try_from(s).ok()))
            .collect::<Result<Vec<_>>>()?;
        let methods = split(&self.allowed_methods)
            .iter()
            .map(|m| {
                parse(CORS_METHODS_SETTING, m, |s| {
                    Method::from_bytes(s.to_ascii_uppercase().as_bytes()).ok()
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let layer = CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(methods);
        Ok(Some(if headers.is_empty() {
            layer.allow_headers(Any)
        } else {
            layer.allow_headers(headers)
        }))
    }
}

fn split(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse<T>(key: &str, value: &str, f: impl Fn(&str) -> Option<T>) -> Result<T> {
    f(value).ok_or_else(|| {
        ConnectorError::new(
            ErrorCode::InvalidSetting,
            format!("Setting {} contains invalid entry '{}'", key, value),
        )
    })
}
