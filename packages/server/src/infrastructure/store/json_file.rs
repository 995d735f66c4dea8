//! Key-value store persisted as one JSON object on disk.
//!
//! Every write rewrites the whole file through a temp file, fsync and
//! rename, so a crash leaves either the old or the new contents.

use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

use super::KeyValueStore;
use crate::domain::RepositoryError;

pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, Value>>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or is not a JSON object.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let entries = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<HashMap<String, Value>>(&bytes).map_err(|e| {
                RepositoryError::Malformed {
                    key: path.display().to_string(),
                    reason: e.to_string(),
                }
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(path = %path.display(), keys = entries.len(), "opened room store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    async fn write_file(&self, entries: &HashMap<String, Value>) -> Result<(), RepositoryError> {
        let data = serde_json::to_vec_pretty(entries).map_err(|e| RepositoryError::Encode {
            key: self.path.display().to_string(),
            source: e,
        })?;
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).await?;
        }

        let tmp_path = self.tmp_path();
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    /// Apply `writes` to a copy, persist it, then swap it in.
    async fn commit(&self, writes: Vec<(String, Value)>) -> Result<(), RepositoryError> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.extend(writes);
        self.write_file(&next).await?;
        *entries = next;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, RepositoryError> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), RepositoryError> {
        self.commit(vec![(key.to_string(), value)]).await
    }

    async fn transaction(&self, writes: Vec<(String, Value)>) -> Result<(), RepositoryError> {
        self.commit(writes).await
    }
}
