use async_trait::async_trait;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use dsc_error::{ConnectorError, ErrorCode, Result};
use dsc_spi::web::RequestFilter;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::debug;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Decides whether a request may reach the management APIs.
pub trait AuthenticationService: Send + Sync {
    fn is_authenticated(&self, headers: &HeaderMap) -> bool;
}

/// Compares the `x-api-key` header to a configured key.
pub struct TokenBasedAuthenticationService {
    api_key: SecretString,
}

impl TokenBasedAuthenticationService {
    pub fn new(api_key: SecretString) -> Self {
        Self { api_key }
    }
}

impl AuthenticationService for TokenBasedAuthenticationService {
    fn is_authenticated(&self, headers: &HeaderMap) -> bool {
        let expected = self.api_key.expose_secret().as_bytes();
        headers
            .get_all(API_KEY_HEADER)
            .iter()
            .any(|value| constant_time_eq(value.as_bytes(), expected))
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Rejects unauthenticated requests with 401.
pub struct AuthenticationRequestFilter {
    service: Arc<dyn AuthenticationService>,
}

impl AuthenticationRequestFilter {
    pub fn new(service: Arc<dyn AuthenticationService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RequestFilter for AuthenticationRequestFilter {
    async fn filter(&self, request: &Parts) -> Result<()> {
        // CORS preflight carries no credentials
        if request.method == axum::http::Method::OPTIONS {
            return Ok(());
        }
        if self.service.is_authenticated(&request.headers) {
            return Ok(());
        }
        debug!(path = %request.uri.path(), "Rejecting unauthenticated request");
        Err(ConnectorError::new(
            ErrorCode::AuthenticationFailed,
            "Request could not be authenticated",
        )
        .with_hint(format!("Send the API key in the '{}' header", API_KEY_HEADER)))
    }
}
