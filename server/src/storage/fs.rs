use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::warn;

use super::schema::{StoredSettings, StoredSnapshot};
use super::{DocumentStore, StorageError};

const SETTINGS_FILE: &str = "settings.json";
const SNAPSHOTS_DIR: &str = "snapshots";

/// Flat-file document store: one `settings.json` plus one JSON file per
/// snapshot under `snapshots/`, named by snapshot id.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(root.join(SNAPSHOTS_DIR))?;
        Ok(Self { root })
    }

    fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    fn snapshot_path(&self, id: &str) -> Option<PathBuf> {
        // Ids are generated internally, but this path is also reachable
        // from a request parameter: keep it inside the snapshots dir.
        if id.is_empty()
            || id
                .chars()
                .any(|ch| !ch.is_ascii_alphanumeric() && ch != '-' && ch != '_')
        {
            return None;
        }
        Some(self.root.join(SNAPSHOTS_DIR).join(format!("{id}.json")))
    }

    async fn write_document<T: serde::Serialize>(
        &self,
        path: &Path,
        document: &T,
    ) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(document)?;
        // Write-then-rename so a crash mid-write never leaves a truncated
        // document behind.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FsStore {
    async fn load_settings(&self) -> Result<Option<StoredSettings>, StorageError> {
        match fs::read(self.settings_path()).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_settings(&self, document: &StoredSettings) -> Result<(), StorageError> {
        self.write_document(&self.settings_path(), document).await
    }

    async fn insert_snapshot(&self, document: &StoredSnapshot) -> Result<(), StorageError> {
        let Some(path) = self.snapshot_path(&document.id) else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid snapshot id: {}", document.id),
            )
            .into());
        };
        self.write_document(&path, document).await
    }

    async fn replace_snapshot(&self, document: &StoredSnapshot) -> Result<(), StorageError> {
        self.insert_snapshot(document).await
    }

    async fn load_snapshot(&self, id: &str) -> Result<Option<StoredSnapshot>, StorageError> {
        let Some(path) = self.snapshot_path(id) else {
            return Ok(None);
        };
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn load_snapshots(&self) -> Result<Vec<StoredSnapshot>, StorageError> {
        let mut documents = Vec::new();
        let mut entries = fs::read_dir(self.root.join(SNAPSHOTS_DIR)).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let bytes = fs::read(&path).await?;
            match serde_json::from_slice::<StoredSnapshot>(&bytes) {
                Ok(document) => documents.push(document),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable snapshot document");
                }
            }
        }
        Ok(documents)
    }
}
