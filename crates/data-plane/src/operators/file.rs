use super::required_property;
use async_trait::async_trait;
use dsc_error::{ConnectorError, ErrorCode, Result};
use dsc_spi::dataplane::{DataReader, DataWriter};
use dsc_spi::types::DataAddress;
use std::path::Path;
use tracing::debug;

pub const FILE_TYPE: &str = "file";
pub const PATH_PROPERTY: &str = "path";

/// Reads the file at `path`.
#[derive(Debug, Default)]
pub struct FileDataReader;

#[async_trait]
impl DataReader for FileDataReader {
    fn can_handle(&self, address_type: &str) -> bool {
        address_type == FILE_TYPE
    }

    async fn read(&self, source: &DataAddress) -> Result<Vec<u8>> {
        let path = required_property(source, PATH_PROPERTY)?;
        tokio::fs::read(path).await.map_err(|e| {
            ConnectorError::new(
                ErrorCode::TransferFailed,
                format!("Failed to read {}: {}", path, e),
            )
        })
    }
}

/// Writes into the directory at `path`, one file per transfer.
#[derive(Debug, Default)]
pub struct FileDataWriter;

#[async_trait]
impl DataWriter for FileDataWriter {
    fn can_handle(&self, address_type: &str) -> bool {
        address_type == FILE_TYPE
    }

    async fn write(&self, destination: &DataAddress, name: &str, data: Vec<u8>) -> Result<()> {
        let directory = Path::new(required_property(destination, PATH_PROPERTY)?);
        let target = directory.join(name);
        let failed = |e: std::io::Error| {
            ConnectorError::new(
                ErrorCode::TransferFailed,
                format!("Failed to write {}: {}", target.display(), e),
            )
        };

        tokio::fs::create_dir_all(directory).await.map_err(failed)?;
        tokio::fs::write(&target, &data).await.map_err(failed)?;
        debug!(path = %target.display(), bytes = data.len(), "Wrote file");
        Ok(())
    }
}
