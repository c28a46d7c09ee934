// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client-side preferences that outlive a process.
//!
//! The appliance forgets the boost level the user chose as soon as boost is
//! disabled (it only stores the sentinel 99). The level is therefore kept on
//! the client in [`PersistedPreferences`] and written to a
//! [`PreferenceStore`] whenever it changes.
//!
//! # Stores
//!
//! - [`MemoryStore`] - Process-held, for tests and embedders with their own persistence
//! - [`JsonFileStore`] - One JSON document per device

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

/// Preferences persisted per device.
///
/// Keys that were never set are omitted from the serialized document.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PersistedPreferences {
    /// Last boost level seen while boost was enabled, or set while it was
    /// disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_boost_level_last: Option<u8>,

    /// Highest settable boost level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_boost_level_max: Option<u8>,
}

/// Async key/value persistence for [`PersistedPreferences`].
///
/// Implementations are scoped to one device; the coordinator loads once
/// before its first reconciliation and saves only when the preferences
/// changed.
#[allow(async_fn_in_trait)]
pub trait PreferenceStore {
    /// Loads the stored preferences, `None` if nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read or holds
    /// an invalid document.
    async fn load(&self) -> Result<Option<PersistedPreferences>, StoreError>;

    /// Replaces the stored preferences.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    async fn save(&self, preferences: &PersistedPreferences) -> Result<(), StoreError>;
}
