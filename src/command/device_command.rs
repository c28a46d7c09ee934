// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-endpoint commands.

use std::fmt;

use crate::state::StateChange;
use crate::types::OperationMode;

/// One POST request to the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Switch the unit on.
    PowerOn,
    /// Switch the unit off.
    PowerOff,
    /// Change the airflow direction.
    SetMode(OperationMode),
    /// Set the raw fan speed.
    SetFanSpeed(u8),
    /// Set the raw humidity set-point; 99 disables boost.
    SetHumidityLevel(u8),
    /// Switch the buzzer on or off.
    SetBuzzer(bool),
}

impl DeviceCommand {
    /// Returns the endpoint path.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::PowerOn => "/on",
            Self::PowerOff => "/off",
            Self::SetMode(mode) => mode.endpoint(),
            Self::SetFanSpeed(_) => "/fan",
            Self::SetHumidityLevel(_) => "/humid",
            Self::SetBuzzer(_) => "/buzzer",
        }
    }

    /// Returns the form field sent as the request body, if any.
    #[must_use]
    pub fn form(&self) -> Option<(&'static str, String)> {
        match self {
            Self::PowerOn | Self::PowerOff | Self::SetMode(_) => None,
            Self::SetFanSpeed(speed) => Some(("speed", speed.to_string())),
            Self::SetHumidityLevel(level) => Some(("level", level.to_string())),
            Self::SetBuzzer(on) => Some(("state", u8::from(*on).to_string())),
        }
    }

    /// Returns what the status page is expected to show once the command
    /// succeeded.
    ///
    /// Switching off also stops any running boost cycle; the appliance does
    /// not always report that promptly.
    #[must_use]
    pub fn expected_change(&self) -> StateChange {
        match self {
            Self::PowerOn => StateChange::Power(true),
            Self::PowerOff => StateChange::batch([
                StateChange::Power(false),
                StateChange::HumidityBoostRunning(false),
            ]),
            Self::SetMode(mode) => StateChange::OperationMode(*mode),
            Self::SetFanSpeed(speed) => StateChange::FanSpeed(*speed),
            Self::SetHumidityLevel(level) => StateChange::HumidityBoostLevelRaw(*level),
            Self::SetBuzzer(on) => StateChange::Buzzer(*on),
        }
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.form() {
            Some((key, value)) => write!(f, "POST {} {key}={value}", self.path()),
            None => write!(f, "POST {}", self.path()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths() {
        assert_eq!(DeviceCommand::PowerOn.path(), "/on");
        assert_eq!(DeviceCommand::PowerOff.path(), "/off");
        assert_eq!(DeviceCommand::SetMode(OperationMode::Supply).path(), "/intake");
        assert_eq!(DeviceCommand::SetMode(OperationMode::Cycle).path(), "/cycle");
        assert_eq!(DeviceCommand::SetMode(OperationMode::Extract).path(), "/exhaust");
        assert_eq!(DeviceCommand::SetFanSpeed(30).path(), "/fan");
        assert_eq!(DeviceCommand::SetHumidityLevel(40).path(), "/humid");
        assert_eq!(DeviceCommand::SetBuzzer(true).path(), "/buzzer");
    }

    #[test]
    fn form_bodies() {
        assert_eq!(DeviceCommand::PowerOn.form(), None);
        assert_eq!(DeviceCommand::SetMode(OperationMode::Cycle).form(), None);
        assert_eq!(
            DeviceCommand::SetHumidityLevel(99).form(),
            Some(("level", "99".to_string()))
        );
        assert_eq!(
            DeviceCommand::SetBuzzer(true).form(),
            Some(("state", "1".to_string()))
        );
        assert_eq!(
            DeviceCommand::SetBuzzer(false).form(),
            Some(("state", "0".to_string()))
        );
    }

    #[test]
    fn power_off_stops_boost() {
        assert_eq!(
            DeviceCommand::PowerOff.expected_change(),
            StateChange::Batch(vec![
                StateChange::Power(false),
                StateChange::HumidityBoostRunning(false),
            ])
        );
    }

    #[test]
    fn display() {
        assert_eq!(DeviceCommand::SetFanSpeed(55).to_string(), "POST /fan speed=55");
        assert_eq!(DeviceCommand::PowerOff.to_string(), "POST /off");
    }
}
