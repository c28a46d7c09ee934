// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed buckets and the raw fan speed scale.
//!
//! The appliance reports and accepts a raw fan speed on a 22-80 scale. The
//! buckets below are what a user picks from; each maps to a fixed
//! representative raw value when sent and is inferred back from any raw value
//! when read.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Lowest raw fan speed the appliance runs at.
pub const FAN_SPEED_MIN: u8 = 22;

/// Highest raw fan speed the appliance runs at.
pub const FAN_SPEED_MAX: u8 = 80;

/// Named fan speed bucket.
///
/// # Examples
///
/// ```
/// use zephyr_lan::types::FanSpeed;
///
/// assert_eq!(FanSpeed::from_speed_value(45), FanSpeed::Low);
/// assert_eq!(FanSpeed::Medium.speed_value(), 55);
/// assert_eq!("high".parse::<FanSpeed>().unwrap(), FanSpeed::High);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FanSpeed {
    /// Quietest setting.
    Night,
    /// Low airflow.
    Low,
    /// Medium airflow.
    Medium,
    /// Maximum airflow.
    High,
}

impl FanSpeed {
    /// All buckets, slowest first.
    pub const ALL: [Self; 4] = [Self::Night, Self::Low, Self::Medium, Self::High];

    /// Buckets a raw fan speed.
    ///
    /// Lower bounds are inclusive and the highest matching bucket wins:
    /// `>= 80` high, `>= 55` medium, `>= 30` low, anything else night.
    #[must_use]
    pub const fn from_speed_value(speed: i64) -> Self {
        if speed >= 80 {
            Self::High
        } else if speed >= 55 {
            Self::Medium
        } else if speed >= 30 {
            Self::Low
        } else {
            Self::Night
        }
    }

    /// Returns the raw speed sent to the appliance for this bucket.
    #[must_use]
    pub const fn speed_value(self) -> u8 {
        match self {
            Self::Night => 22,
            Self::Low => 30,
            Self::Medium => 55,
            Self::High => 80,
        }
    }

    /// Returns the option name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Night => "night",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    fn valid_options() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FanSpeed {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(speed) = Self::ALL.into_iter().find(|v| v.as_str() == s) {
            return Ok(speed);
        }
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == normalized)
            .ok_or_else(|| ValueError::InvalidOption {
                kind: "FanSpeed",
                value: s.to_string(),
                valid: Self::valid_options(),
            })
    }
}

/// Converts a raw fan speed to a 0-100 percentage of the 22-80 range.
///
/// Speeds below the range report 0, speeds above it report 100.
#[must_use]
pub fn fan_percentage_from_speed(speed: u8) -> u8 {
    let states = i64::from(FAN_SPEED_MAX - FAN_SPEED_MIN) + 1;
    let offset = i64::from(FAN_SPEED_MIN) - 1;
    let pct = ((i64::from(speed) - offset) * 100).div_euclid(states);
    // Clamped to 0..=100 so the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = pct.clamp(0, 100) as u8;
    pct
}

/// Converts a percentage to the raw fan speed, rounding up.
///
/// Percentages above 100 are treated as 100. The result always lies in
/// 22-80, so 0 % yields the lowest speed.
#[must_use]
pub fn fan_speed_from_percentage(percentage: u8) -> u8 {
    let states = u32::from(FAN_SPEED_MAX - FAN_SPEED_MIN) + 1;
    let pct = u32::from(percentage.min(100));
    let scaled = (states * pct).div_ceil(100).max(1);
    // At most 59 + 21.
    #[allow(clippy::cast_possible_truncation)]
    let speed = (scaled + u32::from(FAN_SPEED_MIN) - 1) as u8;
    speed
}

/// Brings a raw fan speed into the 22-80 range the appliance accepts.
#[must_use]
pub fn clamp_fan_speed(speed: u8) -> u8 {
    speed.clamp(FAN_SPEED_MIN, FAN_SPEED_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries() {
        assert_eq!(FanSpeed::from_speed_value(80), FanSpeed::High);
        assert_eq!(FanSpeed::from_speed_value(79), FanSpeed::Medium);
        assert_eq!(FanSpeed::from_speed_value(55), FanSpeed::Medium);
        assert_eq!(FanSpeed::from_speed_value(54), FanSpeed::Low);
        assert_eq!(FanSpeed::from_speed_value(30), FanSpeed::Low);
        assert_eq!(FanSpeed::from_speed_value(29), FanSpeed::Night);
        assert_eq!(FanSpeed::from_speed_value(0), FanSpeed::Night);
    }

    #[test]
    fn bucketing_is_total_and_monotonic() {
        let mut previous = FanSpeed::from_speed_value(-1000);
        for speed in -1000..=1000 {
            let bucket = FanSpeed::from_speed_value(speed);
            assert!(bucket >= previous, "bucket dropped at {speed}");
            previous = bucket;
        }
        assert_eq!(FanSpeed::from_speed_value(i64::MIN), FanSpeed::Night);
        assert_eq!(FanSpeed::from_speed_value(i64::MAX), FanSpeed::High);
    }

    #[test]
    fn representative_values_land_in_their_bucket() {
        for speed in FanSpeed::ALL {
            assert_eq!(
                FanSpeed::from_speed_value(i64::from(speed.speed_value())),
                speed
            );
        }
    }

    #[test]
    fn parse_names() {
        assert_eq!("night".parse::<FanSpeed>().unwrap(), FanSpeed::Night);
        assert_eq!(" Medium ".parse::<FanSpeed>().unwrap(), FanSpeed::Medium);
        let err = "turbo".parse::<FanSpeed>().unwrap_err();
        assert!(matches!(err, ValueError::InvalidOption { kind: "FanSpeed", .. }));
        assert!(err.to_string().contains("night, low, medium, high"));
    }

    #[test]
    fn percentage_mapping() {
        assert_eq!(fan_percentage_from_speed(80), 100);
        assert_eq!(fan_percentage_from_speed(22), 1);
        assert_eq!(fan_percentage_from_speed(0), 0);
        assert_eq!(fan_percentage_from_speed(200), 100);

        assert_eq!(fan_speed_from_percentage(100), 80);
        assert_eq!(fan_speed_from_percentage(1), 22);
        assert_eq!(fan_speed_from_percentage(50), 51);
        assert_eq!(fan_speed_from_percentage(255), 80);
        assert_eq!(fan_speed_from_percentage(0), 22);
    }

    #[test]
    fn clamping_keeps_speed_in_range() {
        assert_eq!(clamp_fan_speed(0), 22);
        assert_eq!(clamp_fan_speed(21), 22);
        assert_eq!(clamp_fan_speed(45), 45);
        assert_eq!(clamp_fan_speed(81), 80);
        assert_eq!(clamp_fan_speed(u8::MAX), 80);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&FanSpeed::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }
}
