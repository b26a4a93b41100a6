pub mod fs;
pub mod memory;
pub mod schema;

use async_trait::async_trait;
use thiserror::Error;

pub use fs::FsStore;
pub use memory::MemoryStore;
pub use schema::{StoredSettings, StoredSnapshot};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Keyed document store behind the settings singleton and the snapshot
/// archive. The medium is swappable (flat files in production, memory in
/// tests) without touching ranking or archival logic.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The settings singleton, if one has ever been written.
    async fn load_settings(&self) -> Result<Option<StoredSettings>, StorageError>;

    /// Whole-document replace of the settings singleton.
    async fn save_settings(&self, document: &StoredSettings) -> Result<(), StorageError>;

    /// Appends a snapshot document keyed by its id.
    async fn insert_snapshot(&self, document: &StoredSnapshot) -> Result<(), StorageError>;

    /// Replaces an existing snapshot document. Only the archiver calls
    /// this, and only to attach an image reference.
    async fn replace_snapshot(&self, document: &StoredSnapshot) -> Result<(), StorageError>;

    async fn load_snapshot(&self, id: &str) -> Result<Option<StoredSnapshot>, StorageError>;

    /// All snapshot documents, in no particular order.
    async fn load_snapshots(&self) -> Result<Vec<StoredSnapshot>, StorageError>;
}
