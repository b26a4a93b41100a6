use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::schema::{StoredSettings, StoredSnapshot};
use super::{DocumentStore, StorageError};

/// In-memory document store. Backs tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: RwLock<Option<StoredSettings>>,
    snapshots: RwLock<HashMap<String, StoredSnapshot>>,
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load_settings(&self) -> Result<Option<StoredSettings>, StorageError> {
        Ok(self.settings.read().await.clone())
    }

    async fn save_settings(&self, document: &StoredSettings) -> Result<(), StorageError> {
        *self.settings.write().await = Some(document.clone());
        Ok(())
    }

    async fn insert_snapshot(&self, document: &StoredSnapshot) -> Result<(), StorageError> {
        self.snapshots
            .write()
            .await
            .insert(document.id.clone(), document.clone());
        Ok(())
    }

    async fn replace_snapshot(&self, document: &StoredSnapshot) -> Result<(), StorageError> {
        self.insert_snapshot(document).await
    }

    async fn load_snapshot(&self, id: &str) -> Result<Option<StoredSnapshot>, StorageError> {
        Ok(self.snapshots.read().await.get(id).cloned())
    }

    async fn load_snapshots(&self) -> Result<Vec<StoredSnapshot>, StorageError> {
        Ok(self.snapshots.read().await.values().cloned().collect())
    }
}
