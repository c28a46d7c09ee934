// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Optimistic patches produced by control commands.
//!
//! A successful command tells us what the appliance *should* report on its
//! next status page. Rather than waiting for that poll, the control path
//! describes the expected difference as a [`StateChange`] and applies it to a
//! copy of the last [`RawFieldMap`], so the next derivation reflects the
//! command immediately.
//!
//! # Examples
//!
//! ```
//! use zephyr_lan::state::StateChange;
//! use zephyr_lan::status::RawFieldMap;
//!
//! let mut raw = RawFieldMap::new();
//! raw.insert("power", true);
//! raw.insert("humidity_boost_running", true);
//!
//! let off = StateChange::batch([
//!     StateChange::Power(false),
//!     StateChange::HumidityBoostRunning(false),
//! ]);
//! let next = off.apply(&raw);
//!
//! assert_eq!(next.get_bool("power"), Some(false));
//! assert_eq!(next.get_bool("humidity_boost_running"), Some(false));
//! // The previous snapshot is untouched.
//! assert_eq!(raw.get_bool("power"), Some(true));
//! ```

use crate::status::RawFieldMap;
use crate::types::OperationMode;

/// Expected change to the appliance's reported fields.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Power switched on or off.
    Power(bool),

    /// Operation mode changed. Stored in the appliance's vocabulary.
    OperationMode(OperationMode),

    /// Raw fan speed changed.
    FanSpeed(u8),

    /// Raw humidity set-point changed (99 means boost disabled).
    HumidityBoostLevelRaw(u8),

    /// Boost cycle started or stopped.
    HumidityBoostRunning(bool),

    /// Buzzer switched on or off.
    Buzzer(bool),

    /// Several changes applied in order.
    Batch(Vec<StateChange>),
}

impl StateChange {
    /// Groups changes into a single batch.
    #[must_use]
    pub fn batch(changes: impl IntoIterator<Item = StateChange>) -> Self {
        Self::Batch(changes.into_iter().collect())
    }

    /// Returns `true` for an empty batch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Batch(changes) => changes.iter().all(Self::is_empty),
            _ => false,
        }
    }

    /// Returns a copy of `raw` with this change applied.
    #[must_use]
    pub fn apply(&self, raw: &RawFieldMap) -> RawFieldMap {
        let mut next = raw.clone();
        self.apply_to(&mut next);
        next
    }

    fn apply_to(&self, raw: &mut RawFieldMap) {
        match self {
            Self::Power(on) => raw.insert("power", *on),
            Self::OperationMode(mode) => raw.insert("operation_mode", mode.device_name()),
            Self::FanSpeed(speed) => raw.insert("fan_speed", i64::from(*speed)),
            Self::HumidityBoostLevelRaw(level) => {
                raw.insert("humidity_boost_level_raw", i64::from(*level));
            }
            Self::HumidityBoostRunning(running) => raw.insert("humidity_boost_running", *running),
            Self::Buzzer(on) => raw.insert("buzzer", *on),
            Self::Batch(changes) => {
                for change in changes {
                    change.apply_to(raw);
                }
            }
        }
    }
}
