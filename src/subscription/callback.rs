// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for coordinator observers.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::error::Error;
use crate::state::{DeviceState, StateChange};

/// Unique identifier for a subscription.
///
/// Returned when registering a callback and used to unsubscribe later. IDs
/// are unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type UpdatedCallback = Arc<dyn Fn(&DeviceState) + Send + Sync>;
type UpdateFailedCallback = Arc<dyn Fn(&Error) + Send + Sync>;
type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Registry for observer callbacks.
///
/// Three kinds of events are dispatched:
///
/// - *updated*: a new [`DeviceState`] was published, after a poll or an
///   optimistic reconciliation
/// - *update failed*: a refresh cycle ended with an error
/// - *state changed*: a control command patched the cached raw snapshot
///
/// Callbacks run synchronously on the dispatching task, in arbitrary order.
/// The registry lock is released before callbacks run, so a callback may
/// subscribe or unsubscribe.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    updated_callbacks: RwLock<HashMap<SubscriptionId, UpdatedCallback>>,
    update_failed_callbacks: RwLock<HashMap<SubscriptionId, UpdateFailedCallback>>,
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            updated_callbacks: RwLock::new(HashMap::new()),
            update_failed_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for published device states.
    pub fn on_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.updated_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for failed refresh cycles.
    pub fn on_update_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.update_failed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for optimistic patches made by commands.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Removes a callback.
    ///
    /// Returns `true` if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.updated_callbacks.write().remove(&id).is_some()
            || self.update_failed_callbacks.write().remove(&id).is_some()
            || self.state_changed_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.updated_callbacks.write().clear();
        self.update_failed_callbacks.write().clear();
        self.state_changed_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches a published state to every *updated* callback.
    pub fn dispatch_updated(&self, state: &DeviceState) {
        let callbacks: Vec<_> = self.updated_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(state);
        }
    }

    /// Dispatches a refresh failure to every *update failed* callback.
    pub fn dispatch_update_failed(&self, error: &Error) {
        let callbacks: Vec<_> = self
            .update_failed_callbacks
            .read()
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(error);
        }
    }

    /// Dispatches an optimistic patch to every *state changed* callback.
    ///
    /// Batches are flattened: each callback sees the individual changes.
    pub fn dispatch_state_changed(&self, change: &StateChange) {
        if let StateChange::Batch(changes) = change {
            for nested in changes {
                self.dispatch_state_changed(nested);
            }
            return;
        }
        let callbacks: Vec<_> = self
            .state_changed_callbacks
            .read()
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(change);
        }
    }

    // =========================================================================
    // Utility methods
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.updated_callbacks.read().len()
            + self.update_failed_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
    }

    /// Returns `true` if no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish_non_exhaustive()
    }
}
