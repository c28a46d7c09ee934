// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Firmware version comparison.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// A dotted numeric firmware version such as `3.1.5`.
///
/// Missing trailing components compare as zero, so `3.1` equals `3.1.0`.
/// A leading `v` is accepted.
///
/// # Examples
///
/// ```
/// use zephyr_lan::types::FirmwareVersion;
///
/// let v: FirmwareVersion = "3.1.4".parse().unwrap();
/// assert!(v <= FirmwareVersion::LAST_WITH_BOOST_STOP_BUG);
/// let short: FirmwareVersion = "3.1".parse().unwrap();
/// let long: FirmwareVersion = "3.1.0".parse().unwrap();
/// assert_eq!(short, long);
/// ```
#[derive(Debug, Clone, Eq)]
pub struct FirmwareVersion {
    parts: Vec<u32>,
}

impl FirmwareVersion {
    /// Last firmware release where changing the humidity set-point does not
    /// stop a running boost cycle.
    pub const LAST_WITH_BOOST_STOP_BUG: FirmwareVersionConst = FirmwareVersionConst([3, 1, 5]);

    /// Returns the numeric components.
    #[must_use]
    pub fn parts(&self) -> &[u32] {
        &self.parts
    }

    fn significant(&self) -> &[u32] {
        let len = self
            .parts
            .iter()
            .rposition(|p| *p != 0)
            .map_or(0, |i| i + 1);
        &self.parts[..len]
    }
}

impl FromStr for FirmwareVersion {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(ValueError::InvalidFirmwareVersion(s.to_string()));
        }
        let parts = digits
            .split('.')
            .map(str::parse::<u32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ValueError::InvalidFirmwareVersion(s.to_string()))?;
        Ok(Self { parts })
    }
}

impl PartialEq for FirmwareVersion {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Ord for FirmwareVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| {
                let a = self.parts.get(i).copied().unwrap_or(0);
                let b = other.parts.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for FirmwareVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .parts
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&joined)
    }
}

/// A three-part version usable in constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareVersionConst(pub [u32; 3]);

impl From<FirmwareVersionConst> for FirmwareVersion {
    fn from(v: FirmwareVersionConst) -> Self {
        Self {
            parts: v.0.to_vec(),
        }
    }
}

impl PartialEq<FirmwareVersionConst> for FirmwareVersion {
    fn eq(&self, other: &FirmwareVersionConst) -> bool {
        *self == FirmwareVersion::from(*other)
    }
}

impl PartialOrd<FirmwareVersionConst> for FirmwareVersion {
    fn partial_cmp(&self, other: &FirmwareVersionConst) -> Option<Ordering> {
        Some(self.cmp(&FirmwareVersion::from(*other)))
    }
}
