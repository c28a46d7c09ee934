// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that publish device events.

use crate::error::Error;
use crate::state::{DeviceState, StateChange};
use crate::subscription::SubscriptionId;

/// Trait for types that publish device events to observers.
///
/// # Examples
///
/// ```no_run
/// use zephyr_lan::coordinator::{Coordinator, CoordinatorConfig};
/// use zephyr_lan::preferences::MemoryStore;
/// use zephyr_lan::subscription::Subscribable;
/// use zephyr_lan::Device;
///
/// # fn example() -> zephyr_lan::Result<()> {
/// let device = Device::http("192.168.1.100").build_without_probe()?;
/// let coordinator = Coordinator::new(device, MemoryStore::new(), CoordinatorConfig::default());
///
/// let sub_id = coordinator.on_updated(|state| {
///     println!("{} at {}%", state.device_name(), state.humidity());
/// });
/// coordinator.on_update_failed(|error| eprintln!("poll failed: {error}"));
///
/// coordinator.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to published device states.
    ///
    /// Called after every successful poll and after every optimistic
    /// reconciliation following a command.
    fn on_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static;

    /// Subscribes to failed refresh cycles.
    fn on_update_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static;

    /// Subscribes to the optimistic patches applied by control commands.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
