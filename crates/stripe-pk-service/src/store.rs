//! JSON-file settings store.
//!
//! Settings live in memory behind a `RwLock` and the whole map is rewritten
//! to disk on every change (temp file + rename).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

/// Settings key holding the publishable key.
pub const PUBLISHABLE_KEY_SETTING: &str = "stripe_publishable_key";

/// Settings key holding the secret key.
pub const SECRET_KEY_SETTING: &str = "stripe_secret_key";

/// Errors from the settings store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the settings file failed.
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not a JSON object of strings.
    #[error("settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key/value settings persisted as a JSON object.
#[derive(Debug)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    values: RwLock<BTreeMap<String, String>>,
}

impl SettingsStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match tokio::fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(path = %path.display(), settings = values.len(), "Opened settings store");

        Ok(Self {
            path: Some(path),
            values: RwLock::new(values),
        })
    }

    /// A store that is never written to disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: RwLock::new(BTreeMap::new()),
        }
    }

    /// Current value of `key`.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }

    /// Set `key` and persist the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written; the in-memory value is
    /// left unchanged in that case.
    pub async fn set(&self, key: &str, value: impl Into<String>) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        let mut updated = values.clone();
        updated.insert(key.to_string(), value.into());

        if let Some(path) = &self.path {
            persist(path, &updated).await?;
        }

        *values = updated;
        Ok(())
    }
}

async fn persist(path: &Path, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let contents = serde_json::to_vec_pretty(values)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(dir.path().join("settings.json")).await.unwrap();
        assert!(store.get(PUBLISHABLE_KEY_SETTING).await.is_none());
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let store = SettingsStore::open(&path).await.unwrap();
        store.set(PUBLISHABLE_KEY_SETTING, "pk_test_abc").await.unwrap();
        drop(store);

        let reopened = SettingsStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get(PUBLISHABLE_KEY_SETTING).await.as_deref(),
            Some("pk_test_abc")
        );
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        assert!(matches!(
            SettingsStore::open(&path).await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn in_memory_store_keeps_values() {
        let store = SettingsStore::in_memory();
        store.set("site_name", "Atelier").await.unwrap();
        assert_eq!(store.get("site_name").await.as_deref(), Some("Atelier"));
    }
}
