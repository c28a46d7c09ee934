// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! File-backed preference store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PersistedPreferences, PreferenceStore};
use crate::error::StoreError;

/// Current on-disk document version.
const STORE_VERSION: u32 = 1;

/// Storage key prefix; the device id is appended.
const STORE_KEY_PREFIX: &str = crate::DOMAIN;

#[derive(serde::Serialize, serde::Deserialize)]
struct StoredDocument {
    version: u32,
    key: String,
    data: PersistedPreferences,
}

/// [`PreferenceStore`] keeping one JSON document per device.
///
/// The document lives at `<dir>/zephyr_lan.<device_id>.json` and wraps the
/// preferences with a version and the storage key. A missing file loads as
/// `None`.
///
/// # Examples
///
/// ```no_run
/// use zephyr_lan::preferences::{JsonFileStore, PreferenceStore};
///
/// # async fn example() -> Result<(), zephyr_lan::error::StoreError> {
/// let store = JsonFileStore::for_device("/var/lib/zephyr", "A1B2C3");
/// assert!(store.path().ends_with("zephyr_lan.A1B2C3.json"));
/// let prefs = store.load().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    key: String,
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for `device_id` inside `dir`.
    #[must_use]
    pub fn for_device(dir: impl AsRef<Path>, device_id: &str) -> Self {
        let key = format!("{STORE_KEY_PREFIX}.{device_id}");
        let path = dir.as_ref().join(format!("{key}.json"));
        Self { key, path }
    }

    /// Returns the storage key, `zephyr_lan.<device_id>`.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFileStore {
    async fn load(&self) -> Result<Option<PersistedPreferences>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No stored preferences");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let document: StoredDocument = serde_json::from_str(&contents)?;
        if document.version != STORE_VERSION {
            tracing::warn!(
                path = %self.path.display(),
                version = document.version,
                "Stored preferences have an unexpected version"
            );
        }
        Ok(Some(document.data))
    }

    async fn save(&self, preferences: &PersistedPreferences) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let document = StoredDocument {
            version: STORE_VERSION,
            key: self.key.clone(),
            data: preferences.clone(),
        };
        let json = serde_json::to_string_pretty(&document)?;

        // Readers never observe a partially written document.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), "Saved preferences");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::for_device(dir.path(), "A1B2C3");
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::for_device(dir.path().join("nested"), "A1B2C3");
        let prefs = PersistedPreferences {
            humidity_boost_level_last: Some(45),
            humidity_boost_level_max: Some(98),
        };

        store.save(&prefs).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(prefs));
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn document_is_wrapped_with_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::for_device(dir.path(), "A1B2C3");
        store
            .save(&PersistedPreferences {
                humidity_boost_level_last: Some(60),
                humidity_boost_level_max: None,
            })
            .await
            .unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["key"], "zephyr_lan.A1B2C3");
        assert_eq!(json["data"], serde_json::json!({"humidity_boost_level_last": 60}));
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::for_device(dir.path(), "A1B2C3");
        std::fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load().await, Err(StoreError::Json(_))));
    }

    #[test]
    fn path_uses_device_namespace() {
        let store = JsonFileStore::for_device("/tmp/prefs", "dev-1");
        assert_eq!(store.key(), "zephyr_lan.dev-1");
        assert_eq!(store.path(), Path::new("/tmp/prefs/zephyr_lan.dev-1.json"));
    }
}
