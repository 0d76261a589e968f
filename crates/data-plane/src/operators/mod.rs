//! Built-in readers and writers.
mod file;
mod http;

pub use file::{FileDataReader, FileDataWriter, FILE_TYPE, PATH_PROPERTY};
pub use http::{
    HttpDataReader, HttpDataWriter, AUTH_CODE_PROPERTY, AUTH_KEY_PROPERTY, ENDPOINT_PROPERTY,
    HTTP_DATA_TYPE,
};

use dsc_error::{ConnectorError, ErrorCode, Result};
use dsc_spi::types::DataAddress;

fn required_property<'a>(address: &'a DataAddress, key: &str) -> Result<&'a str> {
    address
        .property(key)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            ConnectorError::new(
                ErrorCode::InvalidRequest,
                format!(
                    "{} address is missing property '{}'",
                    address.address_type(),
                    key
                ),
            )
        })
}
