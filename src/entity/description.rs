// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity descriptions exposed to a home-automation host.

use std::fmt;

use super::{Field, FieldValue};
use crate::state::DeviceState;
use crate::types::{FAN_SPEED_MAX, FAN_SPEED_MIN, HumidityBoostLevel, fan_percentage_from_speed};

/// Kind of entity a description produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Sensor,
    BinarySensor,
    Switch,
    Select,
    Number,
    Fan,
}

impl Platform {
    /// Returns the platform name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sensor => "sensor",
            Self::BinarySensor => "binary_sensor",
            Self::Switch => "switch",
            Self::Select => "select",
            Self::Number => "number",
            Self::Fan => "fan",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity category; uncategorized entities are primary controls or readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    Diagnostic,
}

/// Static description of one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityDescription {
    /// Field the entity reads, and writes for controls.
    pub field: Field,
    /// Entity kind.
    pub platform: Platform,
    /// Name suffix; the entity name is `"{group_title} {name}"`.
    pub name: &'static str,
    /// Key used in the unique id, `"{group_id}-{key}"`.
    pub key: &'static str,
    pub icon: Option<&'static str>,
    pub unit: Option<&'static str>,
    pub device_class: Option<&'static str>,
    /// `true` for measurements with a meaningful history.
    pub measurement: bool,
    pub category: Option<EntityCategory>,
    pub display_precision: Option<u8>,
    /// Options of a select.
    pub options: &'static [&'static str],
    /// Inclusive bounds of a number or fan speed.
    pub range: Option<(u8, u8)>,
}

impl EntityDescription {
    const fn new(platform: Platform, field: Field, name: &'static str) -> Self {
        Self {
            field,
            platform,
            name,
            key: field.key(),
            icon: None,
            unit: None,
            device_class: None,
            measurement: false,
            category: None,
            display_precision: None,
            options: &[],
            range: None,
        }
    }

    const fn icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }

    const fn unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    const fn device_class(mut self, class: &'static str) -> Self {
        self.device_class = Some(class);
        self
    }

    const fn measurement(mut self) -> Self {
        self.measurement = true;
        self
    }

    const fn diagnostic(mut self) -> Self {
        self.category = Some(EntityCategory::Diagnostic);
        self
    }

    const fn precision(mut self, digits: u8) -> Self {
        self.display_precision = Some(digits);
        self
    }

    const fn options(mut self, options: &'static [&'static str]) -> Self {
        self.options = options;
        self
    }

    const fn range(mut self, min: u8, max: u8) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Unique id of the entity for a device group.
    #[must_use]
    pub fn unique_id(&self, group_id: &str) -> String {
        format!("{group_id}-{}", self.key)
    }

    /// Display name of the entity for a device group.
    #[must_use]
    pub fn entity_name(&self, group_title: &str) -> String {
        format!("{group_title} {}", self.name)
    }

    /// Current value of the entity.
    #[must_use]
    pub fn value(&self, state: &DeviceState) -> FieldValue {
        self.field.read(state)
    }
}

/// Every entity a device exposes.
pub static ENTITY_DESCRIPTIONS: &[EntityDescription] = &[
    EntityDescription::new(Platform::Sensor, Field::Temperature, "Temperature")
        .device_class("temperature")
        .measurement()
        .unit("°C")
        .precision(1),
    EntityDescription::new(Platform::Sensor, Field::Humidity, "Humidity")
        .device_class("humidity")
        .measurement()
        .unit("%")
        .precision(1),
    EntityDescription::new(Platform::Sensor, Field::FilterTimer, "Filter Status")
        .diagnostic()
        .measurement()
        .icon("mdi:air-filter"),
    EntityDescription::new(Platform::Sensor, Field::HygieneStatus, "Capsule Status")
        .diagnostic()
        .measurement()
        .icon("mdi:cylinder"),
    EntityDescription::new(Platform::Sensor, Field::WifiSsid, "Wi-Fi SSID")
        .icon("mdi:wifi")
        .diagnostic(),
    EntityDescription::new(Platform::Sensor, Field::WifiRssi, "Wi-Fi RSSI")
        .unit("dBm")
        .device_class("signal_strength")
        .measurement()
        .diagnostic(),
    EntityDescription::new(Platform::Sensor, Field::WifiIp, "Wi-Fi IP")
        .icon("mdi:ip")
        .diagnostic(),
    EntityDescription::new(
        Platform::BinarySensor,
        Field::HumidityBoostRunning,
        "Humidity Boost Running",
    )
    .device_class("running"),
    EntityDescription::new(Platform::Switch, Field::Power, "Power"),
    EntityDescription::new(Platform::Switch, Field::Buzzer, "Buzzer"),
    EntityDescription::new(Platform::Select, Field::OperationModeEnum, "Fan Mode")
        .options(&["supply", "cycle", "extract"]),
    EntityDescription::new(Platform::Select, Field::FanSpeedEnum, "Fan Speed")
        .options(&["night", "low", "medium", "high"]),
    EntityDescription::new(Platform::Number, Field::HumidityBoostLevel, "Humidity Boost")
        .range(35, HumidityBoostLevel::MAX)
        .unit("%")
        .icon("mdi:water-percent"),
    EntityDescription::new(Platform::Fan, Field::FanSpeed, "Fan").range(FAN_SPEED_MIN, FAN_SPEED_MAX),
];

/// Returns the descriptions of one platform.
pub fn descriptions_for(platform: Platform) -> impl Iterator<Item = &'static EntityDescription> {
    ENTITY_DESCRIPTIONS
        .iter()
        .filter(move |description| description.platform == platform)
}

/// Fan entity readout: on/off, speed percentage and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanReadout {
    pub is_on: bool,
    /// Speed as a percentage of the 22-80 range.
    pub percentage: u8,
    /// `forward` for supply, `reverse` for extract, `cycle` otherwise.
    pub direction: &'static str,
}

impl FanReadout {
    /// Reads the fan entity from a state.
    #[must_use]
    pub fn from_state(state: &DeviceState) -> Self {
        use crate::types::OperationMode;

        let direction = match state.operation_mode_enum() {
            OperationMode::Supply => "forward",
            OperationMode::Extract => "reverse",
            OperationMode::Cycle => "cycle",
        };
        Self {
            is_on: state.power(),
            percentage: fan_percentage_from_speed(state.fan_speed()),
            direction,
        }
    }
}
