//! Outbound HTTP helpers.
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dsc_error::{ConnectorError, ErrorCode, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds an `Authorization: Basic ...` header value.
pub fn basic_auth_header(username: &str, password: &str) -> Result<HeaderValue> {
    let encoded = STANDARD.encode(format!("{}:{}", username, password));
    let mut value = HeaderValue::from_str(&format!("Basic {}", encoded)).map_err(|e| {
        ConnectorError::new(
            ErrorCode::InvalidRequest,
            format!("Invalid basic auth credentials: {}", e),
        )
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Returns a builder whose clients send basic auth credentials with every request.
pub fn with_basic_auth(
    builder: reqwest::ClientBuilder,
    username: &str,
    password: &str,
) -> Result<reqwest::ClientBuilder> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, basic_auth_header(username, password)?);
    Ok(builder.default_headers(headers))
}

pub fn default_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(DEFAULT_REQUEST_TIMEOUT)
}

pub fn default_http_client() -> Result<reqwest::Client> {
    default_client_builder()
        .build()
        .map_err(|e| ConnectorError::internal(format!("Failed to build HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_basic_auth_header() {
        let value = basic_auth_header("someuser", "somepwd").unwrap();
        let raw = value.to_str().unwrap();
        assert!(raw.starts_with("Basic "));

        let decoded = STANDARD.decode(raw.trim_start_matches("Basic ")).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "someuser:somepwd");
        assert!(value.is_sensitive());
    }

    #[tokio::test]
    async fn test_client_sends_authorization_header() {
        let server = MockServer::start().await;
        let expected = basic_auth_header("someuser", "somepwd").unwrap();
        Mock::given(method("GET"))
            .and(path("/api/test"))
            .and(header("authorization", expected.to_str().unwrap()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = with_basic_auth(default_client_builder(), "someuser", "somepwd")
            .unwrap()
            .build()
            .unwrap();
        let response = client
            .get(format!("{}/api/test", server.uri()))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }
}
