// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory preference store.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::{PersistedPreferences, PreferenceStore};
use crate::error::StoreError;

/// Process-held [`PreferenceStore`].
///
/// Counts saves, which makes it convenient for checking that unchanged
/// preferences are not written again.
///
/// # Examples
///
/// ```
/// use zephyr_lan::preferences::{MemoryStore, PersistedPreferences, PreferenceStore};
///
/// # async fn example() -> Result<(), zephyr_lan::error::StoreError> {
/// let store = MemoryStore::new();
/// assert_eq!(store.load().await?, None);
///
/// let prefs = PersistedPreferences { humidity_boost_level_last: Some(45), ..Default::default() };
/// store.save(&prefs).await?;
/// assert_eq!(store.load().await?, Some(prefs));
/// assert_eq!(store.saves(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    stored: Mutex<Option<PersistedPreferences>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `preferences`.
    #[must_use]
    pub fn with_preferences(preferences: PersistedPreferences) -> Self {
        Self {
            stored: Mutex::new(Some(preferences)),
            saves: AtomicUsize::new(0),
        }
    }

    /// Returns the currently stored preferences.
    #[must_use]
    pub fn stored(&self) -> Option<PersistedPreferences> {
        self.stored.lock().clone()
    }

    /// Number of successful saves.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

impl PreferenceStore for MemoryStore {
    async fn load(&self) -> Result<Option<PersistedPreferences>, StoreError> {
        Ok(self.stored())
    }

    async fn save(&self, preferences: &PersistedPreferences) -> Result<(), StoreError> {
        *self.stored.lock() = Some(preferences.clone());
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn preloaded_store_returns_preferences() {
        let prefs = PersistedPreferences {
            humidity_boost_level_last: Some(70),
            humidity_boost_level_max: Some(98),
        };
        let store = MemoryStore::with_preferences(prefs.clone());
        assert_eq!(store.load().await.unwrap(), Some(prefs));
        assert_eq!(store.saves(), 0);
    }

    #[tokio::test]
    async fn save_overwrites_and_counts() {
        let store = MemoryStore::new();
        let mut prefs = PersistedPreferences::default();
        store.save(&prefs).await.unwrap();
        prefs.humidity_boost_level_last = Some(30);
        store.save(&prefs).await.unwrap();
        assert_eq!(store.stored(), Some(prefs));
        assert_eq!(store.saves(), 2);
    }
}
