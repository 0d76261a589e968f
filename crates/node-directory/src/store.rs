use anyhow::{anyhow, Context};
use async_trait::async_trait;
use dsc_error::{ConnectorError, ErrorCode, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

/// A document with the keys it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub partition_key: String,
    pub body: Value,
}

/// A container of JSON documents keyed by id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts or replaces the document with the same id.
    async fn save_item(&self, document: StoredDocument) -> Result<()>;

    async fn find_item(&self, id: &str) -> Result<Option<StoredDocument>>;

    async fn query_all_items(&self) -> Result<Vec<StoredDocument>>;

    /// Returns whether a document was deleted.
    async fn delete_item(&self, id: &str) -> Result<bool>;
}

/// One SQLite table per container.
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
    table: String,
    last_failure: RwLock<Option<String>>,
}

impl SqliteDocumentStore {
    pub fn open(path: impl AsRef<Path>, container: &str) -> Result<Self> {
        let conn = open_connection(path.as_ref()).map_err(store_failure)?;
        Self::with_connection(conn, container)
    }

    pub fn in_memory(container: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .context("Failed to open in-memory SQLite database")
            .map_err(store_failure)?;
        Self::with_connection(conn, container)
    }

    fn with_connection(conn: Connection, container: &str) -> Result<Self> {
        if container.is_empty()
            || !container
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConnectorError::new(
                ErrorCode::InvalidSetting,
                format!("Invalid container name '{}'", container),
            ));
        }

        let table = format!("\"{}\"", container);
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                partition_key TEXT NOT NULL,
                document TEXT NOT NULL
            )",
            table
        ))
        .context("Failed to create container table")
        .map_err(store_failure)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            table,
            last_failure: RwLock::new(None),
        })
    }

    /// `SELECT 1` round trip on the blocking pool.
    pub async fn check_connection(&self) -> Result<()> {
        self.run(|conn, _| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .context("SQLite connection check failed")?;
            Ok(())
        })
        .await
    }

    /// Message of the last failed operation, cleared by the next success.
    /// Never touches the database.
    pub fn last_failure(&self) -> Option<String> {
        self.last_failure
            .read()
            .expect("SQLite status lock poisoned")
            .clone()
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &str) -> anyhow::Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        let table = self.table.clone();
        let result = tokio::task::spawn_blocking(move || {
            let conn = conn.lock().expect("SQLite connection lock poisoned");
            op(&*conn, table.as_str())
        })
        .await
        .map_err(|e| anyhow!("SQLite task failed: {}", e))
        .and_then(|result| result)
        .map_err(store_failure);

        *self.last_failure.write().expect("SQLite status lock poisoned") =
            result.as_ref().err().map(|e| e.message.clone());
        result
    }
}

fn open_connection(path: &Path) -> anyhow::Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }
    Connection::open(path).context("Failed to open SQLite database")
}

fn store_failure(e: anyhow::Error) -> ConnectorError {
    ConnectorError::new(ErrorCode::StoreFailure, format!("{:#}", e))
}

fn parse(id: String, partition_key: String, raw: &str) -> anyhow::Result<StoredDocument> {
    let body = serde_json::from_str(raw)
        .with_context(|| format!("Document {} is not valid JSON", id))?;
    Ok(StoredDocument {
        id,
        partition_key,
        body,
    })
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn save_item(&self, document: StoredDocument) -> Result<()> {
        self.run(move |conn, table| {
            conn.execute(
                &format!(
                    "INSERT INTO {} (id, partition_key, document) VALUES (?1, ?2, ?3)
                     ON CONFLICT(id) DO UPDATE SET
                        partition_key = excluded.partition_key,
                        document = excluded.document",
                    table
                ),
                params![document.id, document.partition_key, document.body.to_string()],
            )
            .with_context(|| format!("Failed to save document {}", document.id))?;
            Ok(())
        })
        .await
    }

    async fn find_item(&self, id: &str) -> Result<Option<StoredDocument>> {
        let id = id.to_string();
        self.run(move |conn, table| {
            let row = conn
                .query_row(
                    &format!(
                        "SELECT partition_key, document FROM {} WHERE id = ?1",
                        table
                    ),
                    params![id],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                )
                .optional()
                .with_context(|| format!("Failed to read document {}", id))?;
            row.map(|(partition_key, raw)| parse(id.clone(), partition_key, &raw))
                .transpose()
        })
        .await
    }

    async fn query_all_items(&self) -> Result<Vec<StoredDocument>> {
        self.run(|conn, table| {
            let mut stmt = conn.prepare(&format!(
                "SELECT id, partition_key, document FROM {} ORDER BY id",
                table
            ))?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()
                .context("Failed to query documents")?;
            rows.into_iter()
                .map(|(id, partition_key, raw)| parse(id, partition_key, &raw))
                .collect()
        })
        .await
    }

    async fn delete_item(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.run(move |conn, table| {
            let deleted = conn
                .execute(&format!("DELETE FROM {} WHERE id = ?1", table), params![id])
                .with_context(|| format!("Failed to delete document {}", id))?;
            Ok(deleted > 0)
        })
        .await
    }
}
