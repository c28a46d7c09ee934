// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Derivation of [`DeviceState`] from a [`RawFieldMap`].

use chrono::{DateTime, Utc};

use super::DeviceState;
use crate::error::ParseError;
use crate::preferences::PersistedPreferences;
use crate::status::{RawFieldMap, RawValue};
use crate::types::{FanSpeed, HumidityBoostLevel, OperationMode};

/// Exact model string with a shorter display name.
const MODEL_160MM_V2: &str = "BSK-Zephyr-160MM-V2_4MB";
const MODEL_160MM_V2_NAME: &str = "BSK-Zephyr";

/// Any model containing this string is displayed as this string.
const MODEL_MINI: &str = "BSK-Zephyr-Mini";

/// Identity fields of an appliance.
///
/// Computed from the first successful status page and reused for every later
/// derivation; only `device_id` and `device_model` are read from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    id: String,
    group_id: String,
    group_title: String,
    device_id: String,
    device_model: String,
    device_name: String,
}

impl DeviceIdentity {
    /// Builds the identity from a parsed status page.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` if the page lacks a device id or a
    /// model.
    pub fn from_raw(raw: &RawFieldMap) -> Result<Self, ParseError> {
        let device_id = text(raw, "device_id")?;
        let device_model = text(raw, "device_model")?;
        Ok(Self::new(device_id, device_model))
    }

    /// Builds the identity from a device id and model.
    #[must_use]
    pub fn new(device_id: impl Into<String>, device_model: impl Into<String>) -> Self {
        let device_id = device_id.into();
        let device_model = device_model.into();
        Self {
            id: device_id.clone(),
            group_id: format!("{device_id}_group"),
            group_title: device_model.clone(),
            device_name: display_name(&device_model),
            device_id,
            device_model,
        }
    }

    /// Group id, `<device_id>_group`.
    #[must_use]
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Device id.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Display name.
    #[must_use]
    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

/// Maps a model string to its display name.
///
/// # Examples
///
/// ```
/// use zephyr_lan::state::display_name;
///
/// assert_eq!(display_name("BSK-Zephyr-160MM-V2_4MB"), "BSK-Zephyr");
/// assert_eq!(display_name("BSK-Zephyr-Mini-V1"), "BSK-Zephyr-Mini");
/// assert_eq!(display_name("Other"), "Other");
/// ```
#[must_use]
pub fn display_name(model: &str) -> String {
    if model.contains(MODEL_MINI) {
        return MODEL_MINI.to_string();
    }
    if model == MODEL_160MM_V2 {
        return MODEL_160MM_V2_NAME.to_string();
    }
    model.to_string()
}

/// Builds a [`DeviceState`] from raw fields.
///
/// The humidity boost level is reconciled against `preferences`: while the
/// appliance reports a set-point below 99, that set-point is the effective
/// level and is written through to `humidity_boost_level_last`; otherwise
/// the effective level is `humidity_boost_level_last`, or 60 if unset.
/// `humidity_boost_level_max` is always set to 98.
///
/// `preferences` is only modified when the derivation succeeds.
///
/// # Errors
///
/// Returns `ParseError::MissingField` when a required field is absent and
/// `ParseError::InvalidValue` when one cannot be coerced to its type,
/// including an operation mode outside the known vocabulary.
pub fn normalize(
    raw: &RawFieldMap,
    identity: &DeviceIdentity,
    preferences: &mut PersistedPreferences,
    now: DateTime<Utc>,
) -> Result<DeviceState, ParseError> {
    let fan_speed = int(raw, "fan_speed")?;
    let operation_mode = text(raw, "operation_mode")?;
    let operation_mode_enum =
        OperationMode::parse(&operation_mode).map_err(|e| ParseError::InvalidValue {
            field: "operation_mode".to_string(),
            message: e.to_string(),
        })?;

    let level_raw = match raw.get("humidity_boost_level_raw") {
        Some(_) => int(raw, "humidity_boost_level_raw")?,
        None => i64::from(HumidityBoostLevel::DISABLED_SENTINEL) + 1,
    };
    let humidity_boost_enabled = HumidityBoostLevel::is_enabled_raw(level_raw);
    let humidity_boost_level = if humidity_boost_enabled {
        saturate(level_raw, 0, HumidityBoostLevel::MAX, "humidity_boost_level_raw")
    } else {
        preferences
            .humidity_boost_level_last
            .unwrap_or(HumidityBoostLevel::DEFAULT.value())
    };

    let state = DeviceState {
        id: identity.id.clone(),
        group_id: identity.group_id.clone(),
        group_title: identity.group_title.clone(),
        device_id: identity.device_id.clone(),
        device_version: text(raw, "device_version")?,
        device_model: identity.device_model.clone(),
        device_name: identity.device_name.clone(),
        wifi_ssid: text(raw, "wifi_ssid")?,
        wifi_rssi: narrow(int(raw, "wifi_rssi")?, "wifi_rssi")?,
        wifi_ip: text(raw, "wifi_ip")?,
        power: boolean(raw, "power")?,
        buzzer: boolean(raw, "buzzer")?,
        fan_speed: saturate(fan_speed, 0, u8::MAX, "fan_speed"),
        fan_speed_enum: FanSpeed::from_speed_value(fan_speed),
        operation_mode,
        operation_mode_enum,
        temperature: float(raw, "temperature")?,
        temperature_unit: text(raw, "temperature_unit")?,
        humidity: float(raw, "humidity")?,
        humidity_boost_enabled,
        humidity_boost_level,
        humidity_boost_running: boolean(raw, "humidity_boost_running")?,
        filter_timer: int(raw, "filter_timer")?,
        hygiene_status: int(raw, "hygiene_status")?,
        updated_at: now,
    };

    preferences.humidity_boost_level_max = Some(HumidityBoostLevel::MAX);
    if humidity_boost_enabled {
        preferences.humidity_boost_level_last = Some(humidity_boost_level);
    }

    Ok(state)
}

fn required<'a>(raw: &'a RawFieldMap, key: &str) -> Result<&'a RawValue, ParseError> {
    raw.get(key)
        .ok_or_else(|| ParseError::MissingField(key.to_string()))
}

fn invalid(key: &str, value: &RawValue, expected: &str) -> ParseError {
    ParseError::InvalidValue {
        field: key.to_string(),
        message: format!("expected {expected}, got {value:?}"),
    }
}

fn text(raw: &RawFieldMap, key: &str) -> Result<String, ParseError> {
    match required(raw, key)? {
        value @ RawValue::Bool(_) => Err(invalid(key, value, "text")),
        value => Ok(value.to_string()),
    }
}

fn int(raw: &RawFieldMap, key: &str) -> Result<i64, ParseError> {
    let value = required(raw, key)?;
    value.as_i64().ok_or_else(|| invalid(key, value, "an integer"))
}

fn float(raw: &RawFieldMap, key: &str) -> Result<f64, ParseError> {
    let value = required(raw, key)?;
    value.as_f64().ok_or_else(|| invalid(key, value, "a number"))
}

fn boolean(raw: &RawFieldMap, key: &str) -> Result<bool, ParseError> {
    let value = required(raw, key)?;
    value.as_bool().ok_or_else(|| invalid(key, value, "a boolean"))
}

/// Clamps an out-of-range device reading instead of rejecting the poll.
fn saturate(value: i64, min: u8, max: u8, key: &str) -> u8 {
    let clamped = value.clamp(i64::from(min), i64::from(max));
    if clamped != value {
        tracing::debug!(field = key, value, clamped, "Clamped device reading");
    }
    // Clamped to a u8 range above.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let byte = clamped as u8;
    byte
}

fn narrow<T: TryFrom<i64>>(value: i64, key: &str) -> Result<T, ParseError> {
    T::try_from(value).map_err(|_| ParseError::InvalidValue {
        field: key.to_string(),
        message: format!("{value} is out of range"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::parse_status_page;

    fn status_page(entries: &[(&str, &str)]) -> String {
        let defaults = [
            ("Device ID", "A1B2C3"),
            ("Version", "3.1.5"),
            ("Model", "BSK-Zephyr-160MM-V2_4MB"),
            ("SSID", "home"),
            ("RSSI", "-60 dBm"),
            ("IP", "192.168.1.50"),
            ("Power", "on"),
            ("Buzzer", "0"),
            ("Fan Speed", "45"),
            ("Operation Mode", "cycle"),
            ("Temperature", "21.5 °C"),
            ("Humidity", "55 %"),
            ("Set Humidity", "40"),
            ("Humidity Boost", "off"),
            ("Filter Timer", "120 h"),
            ("Hygiene Status", "1"),
        ];
        let mut html = String::new();
        for (label, value) in defaults.iter().chain(entries) {
            html.push_str(&format!("<p><b>{label}:</b> {value}</p>\n"));
        }
        html
    }

    fn derive(html: &str, prefs: &mut PersistedPreferences) -> Result<DeviceState, ParseError> {
        let raw = parse_status_page(html).unwrap();
        let identity = DeviceIdentity::from_raw(&raw).unwrap();
        normalize(&raw, &identity, prefs, Utc::now())
    }

    #[test]
    fn end_to_end_scenario() {
        let mut prefs = PersistedPreferences::default();
        let state = derive(&status_page(&[]), &mut prefs).unwrap();

        assert!(state.power());
        assert_eq!(state.fan_speed(), 45);
        assert_eq!(state.fan_speed_enum(), FanSpeed::Low);
        assert_eq!(state.operation_mode(), "cycle");
        assert_eq!(state.operation_mode_enum(), OperationMode::Cycle);
        assert!(state.humidity_boost_enabled());
        assert_eq!(state.humidity_boost_level(), 40);
        assert!(!state.humidity_boost_running());
        assert_eq!(state.wifi_rssi(), -60);
        assert_eq!(state.temperature_unit(), "°C");
        assert_eq!(state.filter_timer(), 120);
        assert_eq!(prefs.humidity_boost_level_last, Some(40));
        assert_eq!(prefs.humidity_boost_level_max, Some(98));
    }

    #[test]
    fn identity_fields_derive_from_device_id() {
        let mut prefs = PersistedPreferences::default();
        let state = derive(&status_page(&[]), &mut prefs).unwrap();
        assert_eq!(state.id(), "A1B2C3");
        assert_eq!(state.group_id(), "A1B2C3_group");
        assert_eq!(state.group_title(), "BSK-Zephyr-160MM-V2_4MB");
        assert_eq!(state.device_name(), "BSK-Zephyr");
    }

    #[test]
    fn boost_level_98_is_enabled() {
        let mut prefs = PersistedPreferences::default();
        let state = derive(&status_page(&[("Set Humidity", "98")]), &mut prefs).unwrap();
        assert!(state.humidity_boost_enabled());
        assert_eq!(state.humidity_boost_level(), 98);
    }

    #[test]
    fn boost_sentinel_uses_last_level() {
        let mut prefs = PersistedPreferences {
            humidity_boost_level_last: Some(70),
            humidity_boost_level_max: None,
        };
        let state = derive(&status_page(&[("Set Humidity", "99")]), &mut prefs).unwrap();
        assert!(!state.humidity_boost_enabled());
        assert_eq!(state.humidity_boost_level(), 70);
        assert_eq!(prefs.humidity_boost_level_last, Some(70));
    }

    #[test]
    fn boost_sentinel_without_history_defaults_to_sixty() {
        let mut prefs = PersistedPreferences::default();
        let state = derive(&status_page(&[("Set Humidity", "99")]), &mut prefs).unwrap();
        assert_eq!(state.humidity_boost_level(), 60);
        assert_eq!(prefs.humidity_boost_level_last, None);
    }

    #[test]
    fn missing_set_point_means_disabled() {
        let html = status_page(&[]).replace("<p><b>Set Humidity:</b> 40</p>\n", "");
        let mut prefs = PersistedPreferences::default();
        let state = derive(&html, &mut prefs).unwrap();
        assert!(!state.humidity_boost_enabled());
        assert_eq!(state.humidity_boost_level(), 60);
    }

    #[test]
    fn disable_then_enable_restores_last_level() {
        let mut prefs = PersistedPreferences::default();
        derive(&status_page(&[("Set Humidity", "45")]), &mut prefs).unwrap();
        let disabled = derive(&status_page(&[("Set Humidity", "99")]), &mut prefs).unwrap();
        assert_eq!(disabled.humidity_boost_level(), 45);
        assert_eq!(prefs.humidity_boost_level_last, Some(45));
    }

    #[test]
    fn unknown_operation_mode_fails() {
        let mut prefs = PersistedPreferences::default();
        let err = derive(&status_page(&[("Operation Mode", "turbo")]), &mut prefs).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { ref field, .. } if field == "operation_mode"));
    }

    #[test]
    fn device_vocabulary_mode_is_kept_raw() {
        let mut prefs = PersistedPreferences::default();
        let state = derive(&status_page(&[("Operation Mode", "intake")]), &mut prefs).unwrap();
        assert_eq!(state.operation_mode(), "intake");
        assert_eq!(state.operation_mode_enum(), OperationMode::Supply);
    }

    #[test]
    fn missing_required_field_fails_without_touching_preferences() {
        let html = status_page(&[]).replace("<p><b>Power:</b> on</p>\n", "");
        let mut prefs = PersistedPreferences::default();
        let err = derive(&html, &mut prefs).unwrap_err();
        assert_eq!(err, ParseError::MissingField("power".to_string()));
        assert_eq!(prefs, PersistedPreferences::default());
    }

    #[test]
    fn non_numeric_fan_speed_fails() {
        let mut prefs = PersistedPreferences::default();
        let err = derive(&status_page(&[("Fan Speed", "fast")]), &mut prefs).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { ref field, .. } if field == "fan_speed"));
    }

    #[test]
    fn out_of_range_readings_are_clamped() {
        let mut prefs = PersistedPreferences::default();
        let state = derive(
            &status_page(&[("Set Humidity", "-1"), ("Fan Speed", "300")]),
            &mut prefs,
        )
        .unwrap();

        assert!(state.humidity_boost_enabled());
        assert_eq!(state.humidity_boost_level(), 0);
        assert_eq!(prefs.humidity_boost_level_last, Some(0));
        assert_eq!(state.fan_speed(), 255);
        assert_eq!(state.fan_speed_enum(), FanSpeed::High);
    }

    #[test]
    fn serialized_keys_match_field_names() {
        let mut prefs = PersistedPreferences::default();
        let state = derive(&status_page(&[]), &mut prefs).unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["_id"], "A1B2C3");
        assert_eq!(json["fan_speed_enum"], "low");
        assert_eq!(json["operation_mode_enum"], "cycle");
        assert_eq!(json["humidity_boost_level"], 40);
    }

    #[test]
    fn display_name_aliases() {
        assert_eq!(display_name("BSK-Zephyr-160MM-V2_4MB"), "BSK-Zephyr");
        assert_eq!(display_name("BSK-Zephyr-Mini-160"), "BSK-Zephyr-Mini");
        assert_eq!(display_name("BSK-Zephyr-160MM-V3"), "BSK-Zephyr-160MM-V3");
    }
}
