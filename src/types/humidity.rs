// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Humidity boost set-point.
//!
//! The appliance overloads its humidity set-point: any value below 99 is the
//! relative humidity above which the boost cycle kicks in, while 99 itself
//! switches the feature off. [`HumidityBoostLevel`] only admits values a user
//! may actually set, so the sentinel can never be sent by accident.

use std::fmt;

use crate::error::ValueError;

/// Humidity boost target level (0-98 %).
///
/// # Examples
///
/// ```
/// use zephyr_lan::types::HumidityBoostLevel;
///
/// let level = HumidityBoostLevel::new(45).unwrap();
/// assert_eq!(level.value(), 45);
///
/// assert!(HumidityBoostLevel::new(99).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct HumidityBoostLevel(u8);

impl HumidityBoostLevel {
    /// Highest level that can be set.
    pub const MAX: u8 = Self::DISABLED_SENTINEL - 1;

    /// Raw set-point value meaning "boost disabled".
    pub const DISABLED_SENTINEL: u8 = 99;

    /// Level used when boost is enabled and no level was ever recorded.
    pub const DEFAULT: Self = Self(60);

    /// Creates a new level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::ReservedHumidityLevel` if the value is 99 or
    /// above.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > Self::MAX {
            return Err(ValueError::ReservedHumidityLevel {
                value,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    /// Returns the raw level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns `true` if a raw set-point reported by the appliance means the
    /// boost feature is on.
    #[must_use]
    pub const fn is_enabled_raw(raw: i64) -> bool {
        raw < Self::DISABLED_SENTINEL as i64
    }
}

impl Default for HumidityBoostLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for HumidityBoostLevel {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HumidityBoostLevel> for u8 {
    fn from(level: HumidityBoostLevel) -> Self {
        level.0
    }
}

impl fmt::Display for HumidityBoostLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
