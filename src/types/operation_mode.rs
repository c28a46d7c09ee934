// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Airflow direction of the ventilation unit.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Canonical operation mode.
///
/// The appliance uses its own vocabulary (`intake`, `cycle`, `exhaust`) both
/// on the status page and in its endpoint names; [`OperationMode::parse`]
/// accepts either vocabulary.
///
/// # Examples
///
/// ```
/// use zephyr_lan::types::OperationMode;
///
/// assert_eq!(OperationMode::parse("intake").unwrap(), OperationMode::Supply);
/// assert_eq!(OperationMode::Extract.device_name(), "exhaust");
/// assert_eq!(OperationMode::parse_or("???", OperationMode::Cycle), OperationMode::Cycle);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    /// Fresh air is pulled in.
    Supply,
    /// Alternating intake and exhaust with heat recovery.
    Cycle,
    /// Stale air is pushed out.
    Extract,
}

impl OperationMode {
    /// All modes.
    pub const ALL: [Self; 3] = [Self::Supply, Self::Cycle, Self::Extract];

    /// Returns the canonical option name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Supply => "supply",
            Self::Cycle => "cycle",
            Self::Extract => "extract",
        }
    }

    /// Returns the name the appliance itself uses for this mode.
    #[must_use]
    pub const fn device_name(self) -> &'static str {
        match self {
            Self::Supply => "intake",
            Self::Cycle => "cycle",
            Self::Extract => "exhaust",
        }
    }

    /// Returns the endpoint that switches the appliance into this mode.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Supply => "/intake",
            Self::Cycle => "/cycle",
            Self::Extract => "/exhaust",
        }
    }

    /// Parses a mode from either vocabulary.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidOption` if nothing matches.
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        let v = value.trim().to_lowercase();
        let mode = match v.as_str() {
            "cycle" => Some(Self::Cycle),
            "intake" | "supply" => Some(Self::Supply),
            "exhaust" | "extract" => Some(Self::Extract),
            other => Self::ALL.into_iter().find(|m| m.as_str() == other),
        };
        mode.ok_or_else(|| ValueError::InvalidOption {
            kind: "OperationMode",
            value: value.to_string(),
            valid: Self::ALL.map(Self::as_str).join(", "),
        })
    }

    /// Parses a mode, falling back to `default` when nothing matches.
    #[must_use]
    pub fn parse_or(value: &str, default: Self) -> Self {
        Self::parse(value).unwrap_or(default)
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_device_vocabulary() {
        assert_eq!(OperationMode::parse("intake").unwrap(), OperationMode::Supply);
        assert_eq!(OperationMode::parse("cycle").unwrap(), OperationMode::Cycle);
        assert_eq!(OperationMode::parse("exhaust").unwrap(), OperationMode::Extract);
    }

    #[test]
    fn parse_canonical_names_case_insensitive() {
        assert_eq!(OperationMode::parse("Supply").unwrap(), OperationMode::Supply);
        assert_eq!(OperationMode::parse(" EXTRACT ").unwrap(), OperationMode::Extract);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = OperationMode::parse("recirculate").unwrap_err();
        assert_eq!(
            err,
            ValueError::InvalidOption {
                kind: "OperationMode",
                value: "recirculate".to_string(),
                valid: "supply, cycle, extract".to_string(),
            }
        );
    }

    #[test]
    fn parse_or_uses_default() {
        assert_eq!(
            OperationMode::parse_or("recirculate", OperationMode::Cycle),
            OperationMode::Cycle
        );
        assert_eq!(
            OperationMode::parse_or("exhaust", OperationMode::Cycle),
            OperationMode::Extract
        );
    }

    #[test]
    fn endpoints_use_device_vocabulary() {
        for mode in OperationMode::ALL {
            assert_eq!(mode.endpoint(), format!("/{}", mode.device_name()));
            assert_eq!(OperationMode::parse(mode.device_name()).unwrap(), mode);
        }
    }
}
