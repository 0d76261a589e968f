//! Node directory for the federated catalog, stored as JSON documents.
pub mod directory;
pub mod document;
pub mod extension;
pub mod store;

pub use directory::DocumentNodeDirectory;
pub use document::FederatedCacheNodeDocument;
pub use extension::NodeDirectoryExtension;
pub use store::{DocumentStore, SqliteDocumentStore, StoredDocument};
