// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Enum-keyed accessors for [`DeviceState`] fields.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::command::ControlRequest;
use crate::error::ValueError;
use crate::state::DeviceState;
use crate::types::{FanSpeed, OperationMode};

/// A field value read from a [`DeviceState`].
///
/// Serializes to the same JSON as the field itself.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Switches and flags.
    Bool(bool),
    /// Counters and integer readings.
    Int(i64),
    /// Measurements.
    Float(f64),
    /// Identifiers, raw strings and enum option names.
    Text(String),
    /// Timestamps.
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    fn describe(&self) -> String {
        match self {
            Self::Bool(v) => format!("boolean {v}"),
            Self::Int(v) => format!("integer {v}"),
            Self::Float(v) => format!("number {v}"),
            Self::Text(v) => format!("text {v:?}"),
            Self::Timestamp(v) => format!("timestamp {v}"),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

/// Every field of a [`DeviceState`].
///
/// # Examples
///
/// ```
/// use zephyr_lan::entity::{Field, FieldValue};
/// use zephyr_lan::command::ControlRequest;
/// use zephyr_lan::types::FanSpeed;
///
/// assert_eq!(Field::FanSpeedEnum.key(), "fan_speed_enum");
/// assert_eq!(Field::from_key("_id"), Some(Field::Id));
///
/// let request = Field::FanSpeedEnum.write(FieldValue::Text("high".into())).unwrap();
/// assert_eq!(request, ControlRequest::new().with_fan_speed_enum(FanSpeed::High));
///
/// assert!(Field::Temperature.write(FieldValue::Float(20.0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Id,
    GroupId,
    GroupTitle,
    DeviceId,
    DeviceVersion,
    DeviceModel,
    DeviceName,
    WifiSsid,
    WifiRssi,
    WifiIp,
    Power,
    Buzzer,
    FanSpeed,
    FanSpeedEnum,
    OperationMode,
    OperationModeEnum,
    Temperature,
    TemperatureUnit,
    Humidity,
    HumidityBoostEnabled,
    HumidityBoostLevel,
    HumidityBoostRunning,
    FilterTimer,
    HygieneStatus,
    UpdatedAt,
}

impl Field {
    /// All fields, in declaration order.
    pub const ALL: [Self; 25] = [
        Self::Id,
        Self::GroupId,
        Self::GroupTitle,
        Self::DeviceId,
        Self::DeviceVersion,
        Self::DeviceModel,
        Self::DeviceName,
        Self::WifiSsid,
        Self::WifiRssi,
        Self::WifiIp,
        Self::Power,
        Self::Buzzer,
        Self::FanSpeed,
        Self::FanSpeedEnum,
        Self::OperationMode,
        Self::OperationModeEnum,
        Self::Temperature,
        Self::TemperatureUnit,
        Self::Humidity,
        Self::HumidityBoostEnabled,
        Self::HumidityBoostLevel,
        Self::HumidityBoostRunning,
        Self::FilterTimer,
        Self::HygieneStatus,
        Self::UpdatedAt,
    ];

    /// Returns the canonical field key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Id => "_id",
            Self::GroupId => "group_id",
            Self::GroupTitle => "group_title",
            Self::DeviceId => "device_id",
            Self::DeviceVersion => "device_version",
            Self::DeviceModel => "device_model",
            Self::DeviceName => "device_name",
            Self::WifiSsid => "wifi_ssid",
            Self::WifiRssi => "wifi_rssi",
            Self::WifiIp => "wifi_ip",
            Self::Power => "power",
            Self::Buzzer => "buzzer",
            Self::FanSpeed => "fan_speed",
            Self::FanSpeedEnum => "fan_speed_enum",
            Self::OperationMode => "operation_mode",
            Self::OperationModeEnum => "operation_mode_enum",
            Self::Temperature => "temperature",
            Self::TemperatureUnit => "temperature_unit",
            Self::Humidity => "humidity",
            Self::HumidityBoostEnabled => "humidity_boost_enabled",
            Self::HumidityBoostLevel => "humidity_boost_level",
            Self::HumidityBoostRunning => "humidity_boost_running",
            Self::FilterTimer => "filter_timer",
            Self::HygieneStatus => "hygiene_status",
            Self::UpdatedAt => "updated_at",
        }
    }

    /// Looks a field up by key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Returns `true` if [`write`](Self::write) accepts a value for this field.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        matches!(
            self,
            Self::Power
                | Self::Buzzer
                | Self::FanSpeed
                | Self::FanSpeedEnum
                | Self::OperationMode
                | Self::OperationModeEnum
                | Self::HumidityBoostEnabled
                | Self::HumidityBoostLevel
        )
    }

    /// Reads the field from a state.
    #[must_use]
    pub fn read(self, state: &DeviceState) -> FieldValue {
        use FieldValue::{Bool, Float, Int, Text, Timestamp};

        match self {
            Self::Id => Text(state.id().to_string()),
            Self::GroupId => Text(state.group_id().to_string()),
            Self::GroupTitle => Text(state.group_title().to_string()),
            Self::DeviceId => Text(state.device_id().to_string()),
            Self::DeviceVersion => Text(state.device_version().to_string()),
            Self::DeviceModel => Text(state.device_model().to_string()),
            Self::DeviceName => Text(state.device_name().to_string()),
            Self::WifiSsid => Text(state.wifi_ssid().to_string()),
            Self::WifiRssi => Int(i64::from(state.wifi_rssi())),
            Self::WifiIp => Text(state.wifi_ip().to_string()),
            Self::Power => Bool(state.power()),
            Self::Buzzer => Bool(state.buzzer()),
            Self::FanSpeed => Int(i64::from(state.fan_speed())),
            Self::FanSpeedEnum => Text(state.fan_speed_enum().as_str().to_string()),
            Self::OperationMode => Text(state.operation_mode().to_string()),
            Self::OperationModeEnum => Text(state.operation_mode_enum().as_str().to_string()),
            Self::Temperature => Float(state.temperature()),
            Self::TemperatureUnit => Text(state.temperature_unit().to_string()),
            Self::Humidity => Float(state.humidity()),
            Self::HumidityBoostEnabled => Bool(state.humidity_boost_enabled()),
            Self::HumidityBoostLevel => Int(i64::from(state.humidity_boost_level())),
            Self::HumidityBoostRunning => Bool(state.humidity_boost_running()),
            Self::FilterTimer => Int(state.filter_timer()),
            Self::HygieneStatus => Int(state.hygiene_status()),
            Self::UpdatedAt => Timestamp(state.updated_at()),
        }
    }

    /// Maps a value written to this field to a control request.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::ReadOnlyField` for fields that cannot be written,
    /// `ValueError::UnsupportedValue` for a value of the wrong type,
    /// `ValueError::OutOfRange` for numbers that do not fit a byte and
    /// `ValueError::InvalidOption` for unknown option names.
    pub fn write(self, value: FieldValue) -> Result<ControlRequest, ValueError> {
        let request = ControlRequest::new();
        match (self, value) {
            (Self::Power, FieldValue::Bool(on)) => Ok(request.with_power(on)),
            (Self::Buzzer, FieldValue::Bool(on)) => Ok(request.with_buzzer(on)),
            (Self::HumidityBoostEnabled, FieldValue::Bool(on)) => {
                Ok(request.with_humidity_boost_enabled(on))
            }
            (Self::FanSpeed, FieldValue::Int(speed)) => Ok(request.with_fan_speed(byte(speed)?)),
            (Self::HumidityBoostLevel, FieldValue::Int(level)) => {
                Ok(request.with_humidity_boost_level(byte(level)?))
            }
            (Self::FanSpeedEnum, FieldValue::Text(name)) => {
                Ok(request.with_fan_speed_enum(name.parse::<FanSpeed>()?))
            }
            (Self::OperationMode | Self::OperationModeEnum, FieldValue::Text(name)) => {
                Ok(request.with_operation_mode(OperationMode::parse(&name)?))
            }
            (field, _) if !field.is_writable() => Err(ValueError::ReadOnlyField(field.key())),
            (field, value) => Err(ValueError::UnsupportedValue {
                field: field.key(),
                value: value.describe(),
            }),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn byte(value: i64) -> Result<u8, ValueError> {
    u8::try_from(value).map_err(|_| ValueError::OutOfRange {
        min: 0,
        max: i64::from(u8::MAX),
        actual: value,
    })
}

/// Mismatch between [`Field`] and the serialized [`DeviceState`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccessorTableError {
    /// Serialized keys without an accessor, or accessors without a key.
    #[error("accessor table keys differ: unmapped {unmapped:?}, stale {stale:?}")]
    Keys {
        /// Keys of the serialized state no `Field` covers.
        unmapped: Vec<String>,
        /// `Field` keys the serialized state lacks.
        stale: Vec<&'static str>,
    },

    /// An accessor reads something other than the serialized value.
    #[error("accessor for {field} reads {read}, state serializes {serialized}")]
    Value {
        /// The offending field.
        field: Field,
        /// What the accessor returned.
        read: serde_json::Value,
        /// What the serialized state holds.
        serialized: serde_json::Value,
    },

    /// The state did not serialize to a JSON object.
    #[error("device state did not serialize to an object")]
    NotAnObject,
}

/// Checks that [`Field`] covers exactly the serialized schema of `state` and
/// that every accessor reads the serialized value.
///
/// # Errors
///
/// Returns the first mismatch found.
pub fn verify_accessor_table(state: &DeviceState) -> Result<(), AccessorTableError> {
    let serde_json::Value::Object(serialized) =
        serde_json::to_value(state).map_err(|_| AccessorTableError::NotAnObject)?
    else {
        return Err(AccessorTableError::NotAnObject);
    };

    let declared: BTreeSet<&str> = Field::ALL.iter().map(|field| field.key()).collect();
    let unmapped: Vec<String> = serialized
        .keys()
        .filter(|key| !declared.contains(key.as_str()))
        .cloned()
        .collect();
    let stale: Vec<&'static str> = Field::ALL
        .iter()
        .map(|field| field.key())
        .filter(|key| !serialized.contains_key(*key))
        .collect();
    if !unmapped.is_empty() || !stale.is_empty() {
        return Err(AccessorTableError::Keys { unmapped, stale });
    }

    for field in Field::ALL {
        let read = serde_json::to_value(field.read(state)).unwrap_or_default();
        let expected = &serialized[field.key()];
        if &read != expected {
            return Err(AccessorTableError::Value {
                field,
                read,
                serialized: expected.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::PersistedPreferences;
    use crate::state::{DeviceIdentity, normalize};
    use crate::status::RawFieldMap;

    fn state() -> DeviceState {
        let mut raw = RawFieldMap::new();
        raw.insert("device_id", "A1B2C3");
        raw.insert("device_model", "BSK-Zephyr-160MM-V2_4MB");
        raw.insert("device_version", "3.1.5");
        raw.insert("wifi_ssid", "home");
        raw.insert("wifi_rssi", -60.0);
        raw.insert("wifi_ip", "192.168.1.50");
        raw.insert("power", true);
        raw.insert("buzzer", false);
        raw.insert("fan_speed", 55_i64);
        raw.insert("operation_mode", "exhaust");
        raw.insert("temperature", 21.5);
        raw.insert("temperature_unit", "°C");
        raw.insert("humidity", 48.0);
        raw.insert("humidity_boost_level_raw", 40_i64);
        raw.insert("humidity_boost_running", true);
        raw.insert("filter_timer", 1200_i64);
        raw.insert("hygiene_status", 3_i64);
        let identity = DeviceIdentity::from_raw(&raw).unwrap();
        normalize(
            &raw,
            &identity,
            &mut PersistedPreferences::default(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn accessor_table_is_complete() {
        assert_eq!(verify_accessor_table(&state()), Ok(()));
    }

    #[test]
    fn keys_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("id"), None);
    }

    #[test]
    fn reads_typed_values() {
        let state = state();
        assert_eq!(Field::Id.read(&state), FieldValue::Text("A1B2C3".into()));
        assert_eq!(Field::WifiRssi.read(&state), FieldValue::Int(-60));
        assert_eq!(Field::FanSpeedEnum.read(&state), FieldValue::Text("medium".into()));
        assert_eq!(
            Field::OperationModeEnum.read(&state),
            FieldValue::Text("extract".into())
        );
        assert_eq!(Field::HumidityBoostLevel.read(&state), FieldValue::Int(40));
        assert_eq!(Field::Temperature.read(&state), FieldValue::Float(21.5));
    }

    #[test]
    fn writes_map_to_requests() {
        assert_eq!(
            Field::Power.write(FieldValue::Bool(false)),
            Ok(ControlRequest::new().with_power(false))
        );
        assert_eq!(
            Field::OperationModeEnum.write(FieldValue::Text("supply".into())),
            Ok(ControlRequest::new().with_operation_mode(OperationMode::Supply))
        );
        assert_eq!(
            Field::HumidityBoostLevel.write(FieldValue::Int(45)),
            Ok(ControlRequest::new().with_humidity_boost_level(45))
        );
        assert_eq!(
            Field::FanSpeed.write(FieldValue::Int(33)),
            Ok(ControlRequest::new().with_fan_speed(33))
        );
    }

    #[test]
    fn zero_fan_speed_write_sends_nothing() {
        let request = Field::FanSpeed.write(FieldValue::Int(0)).unwrap();
        assert_eq!(request.target_fan_speed(), None);

        let request = Field::FanSpeed.write(FieldValue::Int(10)).unwrap();
        assert_eq!(request.target_fan_speed(), Some(22));
    }

    #[test]
    fn invalid_writes() {
        assert_eq!(
            Field::DeviceId.write(FieldValue::Text("x".into())),
            Err(ValueError::ReadOnlyField("device_id"))
        );
        assert!(matches!(
            Field::Power.write(FieldValue::Int(1)),
            Err(ValueError::UnsupportedValue { field: "power", .. })
        ));
        assert!(matches!(
            Field::FanSpeed.write(FieldValue::Int(300)),
            Err(ValueError::OutOfRange { actual: 300, .. })
        ));
        assert!(matches!(
            Field::FanSpeedEnum.write(FieldValue::Text("turbo".into())),
            Err(ValueError::InvalidOption { kind: "FanSpeed", .. })
        ));
    }

    #[test]
    fn writable_fields() {
        let writable: Vec<_> = Field::ALL.into_iter().filter(|f| f.is_writable()).collect();
        assert_eq!(writable.len(), 8);
        assert!(!Field::HumidityBoostRunning.is_writable());
    }
}
