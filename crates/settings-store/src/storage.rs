//! Key-value storage ports.
//!
//! Each key holds one JSON value and reads/writes are atomic per key, which is
//! all the browser's local storage area guarantees as well.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::StoreError;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Process-local storage used by tests and ephemeral hosts.
#[derive(Default)]
pub struct InMemoryStorage {
    entries: DashMap<String, Value>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Storage backed by a single JSON object on disk, one member per key.
pub struct JsonFileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::Storage(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    async fn write_document(&self, doc: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let body = serde_json::to_vec_pretty(doc)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, body).await?;
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let doc = self.read_document().await?;
        Ok(doc.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_document().await?;
        doc.insert(key.to_string(), value);
        self.write_document(&doc).await?;
        debug!(path = %self.path.display(), key, "storage record written");
        Ok(())
    }
}
