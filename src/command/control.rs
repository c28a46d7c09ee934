// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named control intents.

use crate::error::ValueError;
use crate::types::{
    FanSpeed, HumidityBoostLevel, OperationMode, clamp_fan_speed, fan_speed_from_percentage,
};

/// A set of optional control intents for one appliance.
///
/// Any subset may be given. The device applies them in a fixed order: power,
/// operation mode, fan speed, boost enable/disable, boost level, buzzer.
///
/// # Examples
///
/// ```
/// use zephyr_lan::command::ControlRequest;
/// use zephyr_lan::types::{FanSpeed, OperationMode};
///
/// let request = ControlRequest::new()
///     .with_power(true)
///     .with_operation_mode(OperationMode::Supply)
///     .with_fan_speed_enum(FanSpeed::Medium);
///
/// assert_eq!(request.target_fan_speed(), Some(55));
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlRequest {
    /// Switch the unit on or off.
    pub power: Option<bool>,
    /// Change the airflow direction.
    pub operation_mode: Option<OperationMode>,
    /// Raw fan speed target; 0 means no change, other values are clamped
    /// to 22-80.
    pub fan_speed: Option<u8>,
    /// Named fan speed target; takes precedence over `fan_speed`.
    pub fan_speed_enum: Option<FanSpeed>,
    /// Enable or disable humidity boost.
    pub humidity_boost_enabled: Option<bool>,
    /// Boost level to use (0-98).
    pub humidity_boost_level: Option<u8>,
    /// Switch the buzzer on or off.
    pub buzzer: Option<bool>,
}

impl ControlRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the power intent.
    #[must_use]
    pub fn with_power(mut self, on: bool) -> Self {
        self.power = Some(on);
        self
    }

    /// Sets the operation mode intent.
    #[must_use]
    pub fn with_operation_mode(mut self, mode: OperationMode) -> Self {
        self.operation_mode = Some(mode);
        self
    }

    /// Sets a raw fan speed target.
    #[must_use]
    pub fn with_fan_speed(mut self, speed: u8) -> Self {
        self.fan_speed = Some(speed);
        self
    }

    /// Sets a fan speed target from a 0-100 percentage of the speed range.
    ///
    /// 0 % switches the unit off instead.
    #[must_use]
    pub fn with_fan_percentage(self, percentage: u8) -> Self {
        if percentage == 0 {
            return self.with_power(false);
        }
        self.with_fan_speed(fan_speed_from_percentage(percentage))
    }

    /// Sets a named fan speed target.
    #[must_use]
    pub fn with_fan_speed_enum(mut self, speed: FanSpeed) -> Self {
        self.fan_speed_enum = Some(speed);
        self
    }

    /// Sets the humidity boost enable intent.
    #[must_use]
    pub fn with_humidity_boost_enabled(mut self, enabled: bool) -> Self {
        self.humidity_boost_enabled = Some(enabled);
        self
    }

    /// Sets the humidity boost level intent.
    #[must_use]
    pub fn with_humidity_boost_level(mut self, level: u8) -> Self {
        self.humidity_boost_level = Some(level);
        self
    }

    /// Sets the buzzer intent.
    #[must_use]
    pub fn with_buzzer(mut self, on: bool) -> Self {
        self.buzzer = Some(on);
        self
    }

    /// Returns `true` if no intent is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Raw fan speed to send, the named bucket winning over a raw value.
    ///
    /// A raw speed of 0 sends nothing; other raw speeds are clamped to
    /// 22-80.
    #[must_use]
    pub fn target_fan_speed(&self) -> Option<u8> {
        self.fan_speed_enum.map(FanSpeed::speed_value).or_else(|| {
            self.fan_speed
                .filter(|speed| *speed != 0)
                .map(clamp_fan_speed)
        })
    }

    /// Checks the intents that can be rejected without talking to the
    /// appliance.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::ReservedHumidityLevel` if the boost level is 99
    /// or above.
    pub fn validate(&self) -> Result<Option<HumidityBoostLevel>, ValueError> {
        self.humidity_boost_level
            .map(HumidityBoostLevel::new)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request() {
        assert!(ControlRequest::new().is_empty());
        assert!(!ControlRequest::new().with_buzzer(false).is_empty());
    }

    #[test]
    fn named_speed_overrides_raw() {
        let request = ControlRequest::new()
            .with_fan_speed(42)
            .with_fan_speed_enum(FanSpeed::High);
        assert_eq!(request.target_fan_speed(), Some(80));

        let request = ControlRequest::new().with_fan_speed(42);
        assert_eq!(request.target_fan_speed(), Some(42));

        assert_eq!(ControlRequest::new().target_fan_speed(), None);
    }

    #[test]
    fn percentage_maps_onto_speed_range() {
        assert_eq!(ControlRequest::new().with_fan_percentage(100).target_fan_speed(), Some(80));
        assert_eq!(ControlRequest::new().with_fan_percentage(50).target_fan_speed(), Some(51));
    }

    #[test]
    fn zero_percentage_powers_off() {
        let request = ControlRequest::new().with_fan_percentage(0);
        assert_eq!(request.target_fan_speed(), None);
        assert_eq!(request.power, Some(false));
    }

    #[test]
    fn raw_speed_stays_in_range() {
        assert_eq!(ControlRequest::new().with_fan_speed(0).target_fan_speed(), None);
        assert_eq!(ControlRequest::new().with_fan_speed(10).target_fan_speed(), Some(22));
        assert_eq!(ControlRequest::new().with_fan_speed(200).target_fan_speed(), Some(80));
    }

    #[test]
    fn reserved_level_is_rejected() {
        for level in [99, 100, 200] {
            let request = ControlRequest::new().with_humidity_boost_level(level);
            assert_eq!(
                request.validate(),
                Err(ValueError::ReservedHumidityLevel { value: level, max: 98 })
            );
        }
    }

    #[test]
    fn valid_level_passes() {
        let request = ControlRequest::new().with_humidity_boost_level(98);
        assert_eq!(request.validate().unwrap().map(HumidityBoostLevel::value), Some(98));
        assert_eq!(ControlRequest::new().validate(), Ok(None));
    }
}
