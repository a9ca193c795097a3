//! TUF repository metadata persisted in a key-value store
//!
//! Role files (`root.json`, `targets.json`, ...) are kept as raw JSON under
//! their file name. The store checks that what it is handed parses as JSON
//! but leaves signature verification to the TUF client.

use crate::error::{Result, ToolsError};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Trait for key-value backends
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Keys starting with `prefix`
    async fn keys(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Implement KvStore for Arc<dyn KvStore> to allow sharing one backend
#[async_trait]
impl KvStore for Arc<dyn KvStore> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key).await
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        (**self).keys(prefix).await
    }
}

/// Process-local key-value store
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.key().starts_with(prefix))
            .map(|e| e.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}

/// Key prefix under which role files are stored
const META_PREFIX: &str = "tuf/meta/";

/// Local TUF metadata backed by a [`KvStore`]
pub struct MetadataStore<K> {
    kv: K,
}

impl<K: KvStore> MetadataStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    fn key(name: &str) -> Result<String> {
        if name.is_empty() || name.contains('/') {
            return Err(ToolsError::BadRequest(format!(
                "Invalid metadata file name {:?}",
                name
            )));
        }
        Ok(format!("{}{}", META_PREFIX, name))
    }

    /// Every stored role file by name
    pub async fn get_meta(&self) -> Result<BTreeMap<String, Vec<u8>>> {
        let mut meta = BTreeMap::new();
        for key in self.kv.keys(META_PREFIX).await? {
            // A key deleted between listing and reading is skipped
            if let Some(value) = self.kv.get(&key).await? {
                let name = key.trim_start_matches(META_PREFIX).to_string();
                meta.insert(name, value);
            }
        }
        Ok(meta)
    }

    /// One role file by name
    pub async fn get_file(&self, name: &str) -> Result<Vec<u8>> {
        self.kv
            .get(&Self::key(name)?)
            .await?
            .ok_or_else(|| ToolsError::NotFound(format!("Metadata {}", name)))
    }

    /// Store a role file
    pub async fn set_meta(&self, name: &str, metadata: &[u8]) -> Result<()> {
        self.set_meta_batch([(name, metadata)]).await
    }

    /// Store several role files
    ///
    /// Every entry is validated before any is written, so a bad entry leaves
    /// the store unchanged.
    pub async fn set_meta_batch<'a, I>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a [u8])>,
    {
        let mut validated = Vec::new();
        for (name, metadata) in entries {
            serde_json::from_slice::<serde_json::Value>(metadata).map_err(|e| {
                ToolsError::BadJson(format!("{}: {}", name, e))
            })?;
            validated.push((Self::key(name)?, metadata));
        }

        for (key, metadata) in validated {
            self.kv.set(&key, metadata).await?;
            debug!("Stored {} ({} bytes)", key, metadata.len());
        }
        Ok(())
    }

    /// Drop a role file
    pub async fn delete_meta(&self, name: &str) -> Result<()> {
        self.kv.delete(&Self::key(name)?).await
    }
}
