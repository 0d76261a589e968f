use super::required_property;
use async_trait::async_trait;
use dsc_error::{ConnectorError, ErrorCode, Result};
use dsc_spi::dataplane::{DataReader, DataWriter};
use dsc_spi::types::DataAddress;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

pub const HTTP_DATA_TYPE: &str = "HttpData";
pub const ENDPOINT_PROPERTY: &str = "endpoint";
pub const AUTH_KEY_PROPERTY: &str = "authKey";
pub const AUTH_CODE_PROPERTY: &str = "authCode";

/// Sends `authKey: authCode` when both are set on the address.
fn with_auth(request: reqwest::RequestBuilder, address: &DataAddress) -> reqwest::RequestBuilder {
    match (
        address.property(AUTH_KEY_PROPERTY),
        address.property(AUTH_CODE_PROPERTY),
    ) {
        (Some(key), Some(code)) => request.header(key, code),
        _ => request,
    }
}

fn transfer_failed(endpoint: &str, detail: impl std::fmt::Display) -> ConnectorError {
    ConnectorError::new(
        ErrorCode::TransferFailed,
        format!("HTTP transfer with {} failed: {}", endpoint, detail),
    )
}

pub struct HttpDataReader {
    client: reqwest::Client,
}

impl HttpDataReader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataReader for HttpDataReader {
    fn can_handle(&self, address_type: &str) -> bool {
        address_type == HTTP_DATA_TYPE
    }

    async fn read(&self, source: &DataAddress) -> Result<Vec<u8>> {
        let endpoint = required_property(source, ENDPOINT_PROPERTY)?;
        let response = with_auth(self.client.get(endpoint), source)
            .send()
            .await
            .map_err(|e| transfer_failed(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(transfer_failed(endpoint, status));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| transfer_failed(endpoint, e))?;
        debug!(endpoint, bytes = body.len(), "Read HTTP source");
        Ok(body.to_vec())
    }
}

/// POSTs the payload to `endpoint`, appending the transfer name as a path segment.
pub struct HttpDataWriter {
    client: reqwest::Client,
}

impl HttpDataWriter {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataWriter for HttpDataWriter {
    fn can_handle(&self, address_type: &str) -> bool {
        address_type == HTTP_DATA_TYPE
    }

    async fn write(&self, destination: &DataAddress, name: &str, data: Vec<u8>) -> Result<()> {
        let endpoint = required_property(destination, ENDPOINT_PROPERTY)?;
        let url = format!("{}/{}", endpoint.trim_end_matches('/'), name);
        let response = with_auth(self.client.post(&url), destination)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()
            .await
            .map_err(|e| transfer_failed(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(transfer_failed(&url, status));
        }
        Ok(())
    }
}
