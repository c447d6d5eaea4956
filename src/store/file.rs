use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::store::MarkerStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredValue {
    value: String,
    updated_at: DateTime<Utc>,
}

/// Marker store backed by a small JSON file.
///
/// Writes go to a sibling temp file that is then renamed over the original,
/// so readers only ever see a complete file.
pub struct FileMarkerStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl FileMarkerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, StoredValue>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(AppError::Store(format!(
                "Failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn write_all(&self, values: &BTreeMap<String, StoredValue>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(values)?).await?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::Store(format!("Failed to replace {}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl MarkerStore for FileMarkerStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let _guard = self.lock.lock().await;
        let values = self.read_all().await?;
        Ok(values.get(key).map(|v| v.value.clone().into_bytes()))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let value = std::str::from_utf8(value)
            .map_err(|e| AppError::Store(format!("Value for {key} is not UTF-8: {e}")))?;

        let _guard = self.lock.lock().await;
        let mut values = self.read_all().await?;
        values.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                updated_at: Utc::now(),
            },
        );
        self.write_all(&values).await
    }
}
