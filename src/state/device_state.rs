// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validated device state.

use chrono::{DateTime, Utc};

use crate::types::{FanSpeed, OperationMode};

/// Complete, validated state of one Zephyr appliance.
///
/// A `DeviceState` is a value: every poll (or from-cache reconciliation)
/// builds a new one via [`normalize`](super::normalize). It serializes to a
/// flat object whose keys are the canonical field keys, which is also what
/// the [`entity`](crate::entity) accessor table is checked against.
///
/// # Examples
///
/// ```
/// use zephyr_lan::preferences::PersistedPreferences;
/// use zephyr_lan::state::{DeviceIdentity, normalize};
/// use zephyr_lan::status::parse_status_page;
/// use zephyr_lan::types::FanSpeed;
///
/// let page = "\
/// <p><b>Device ID:</b> A1B2C3</p>
/// <p><b>Version:</b> 3.2.0</p>
/// <p><b>Model:</b> BSK-Zephyr-160MM-V2_4MB</p>
/// <p><b>SSID:</b> home</p>
/// <p><b>RSSI:</b> -60 dBm</p>
/// <p><b>IP:</b> 192.168.1.50</p>
/// <p><b>Power:</b> on</p>
/// <p><b>Buzzer:</b> 0</p>
/// <p><b>Fan Speed:</b> 45</p>
/// <p><b>Operation Mode:</b> cycle</p>
/// <p><b>Temperature:</b> 21.5 °C</p>
/// <p><b>Humidity:</b> 55 %</p>
/// <p><b>Set Humidity:</b> 40</p>
/// <p><b>Humidity Boost:</b> off</p>
/// <p><b>Filter Timer:</b> 120 h</p>
/// <p><b>Hygiene Status:</b> 1</p>";
///
/// let raw = parse_status_page(page).unwrap();
/// let identity = DeviceIdentity::from_raw(&raw).unwrap();
/// let mut prefs = PersistedPreferences::default();
/// let state = normalize(&raw, &identity, &mut prefs, chrono::Utc::now()).unwrap();
///
/// assert_eq!(state.fan_speed_enum(), FanSpeed::Low);
/// assert_eq!(state.group_id(), "A1B2C3_group");
/// assert_eq!(state.device_name(), "BSK-Zephyr");
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DeviceState {
    #[serde(rename = "_id")]
    pub(crate) id: String,
    pub(crate) group_id: String,
    pub(crate) group_title: String,
    pub(crate) device_id: String,
    pub(crate) device_version: String,
    pub(crate) device_model: String,
    pub(crate) device_name: String,
    pub(crate) wifi_ssid: String,
    pub(crate) wifi_rssi: i32,
    pub(crate) wifi_ip: String,
    pub(crate) power: bool,
    pub(crate) buzzer: bool,
    pub(crate) fan_speed: u8,
    pub(crate) fan_speed_enum: FanSpeed,
    pub(crate) operation_mode: String,
    pub(crate) operation_mode_enum: OperationMode,
    pub(crate) temperature: f64,
    pub(crate) temperature_unit: String,
    pub(crate) humidity: f64,
    pub(crate) humidity_boost_enabled: bool,
    pub(crate) humidity_boost_level: u8,
    pub(crate) humidity_boost_running: bool,
    pub(crate) filter_timer: i64,
    pub(crate) hygiene_status: i64,
    pub(crate) updated_at: DateTime<Utc>,
}

impl DeviceState {
    // ========== Identity ==========

    /// Record id, always equal to the device id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Group id, `<device_id>_group`.
    #[must_use]
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Group title, the raw model string.
    #[must_use]
    pub fn group_title(&self) -> &str {
        &self.group_title
    }

    /// Device id as reported by the appliance.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Firmware version string.
    #[must_use]
    pub fn device_version(&self) -> &str {
        &self.device_version
    }

    /// Raw model string.
    #[must_use]
    pub fn device_model(&self) -> &str {
        &self.device_model
    }

    /// Display name derived from the model.
    #[must_use]
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    // ========== Network ==========

    /// Wi-Fi network name.
    #[must_use]
    pub fn wifi_ssid(&self) -> &str {
        &self.wifi_ssid
    }

    /// Wi-Fi signal strength in dBm.
    #[must_use]
    pub fn wifi_rssi(&self) -> i32 {
        self.wifi_rssi
    }

    /// IP address of the appliance.
    #[must_use]
    pub fn wifi_ip(&self) -> &str {
        &self.wifi_ip
    }

    // ========== Control ==========

    /// Whether the unit is on.
    #[must_use]
    pub fn power(&self) -> bool {
        self.power
    }

    /// Whether the buzzer is enabled.
    #[must_use]
    pub fn buzzer(&self) -> bool {
        self.buzzer
    }

    /// Raw fan speed on the 22-80 scale.
    #[must_use]
    pub fn fan_speed(&self) -> u8 {
        self.fan_speed
    }

    /// Bucket of [`fan_speed`](Self::fan_speed).
    #[must_use]
    pub fn fan_speed_enum(&self) -> FanSpeed {
        self.fan_speed_enum
    }

    /// Operation mode in the appliance's own vocabulary.
    #[must_use]
    pub fn operation_mode(&self) -> &str {
        &self.operation_mode
    }

    /// Canonical operation mode.
    #[must_use]
    pub fn operation_mode_enum(&self) -> OperationMode {
        self.operation_mode_enum
    }

    // ========== Climate ==========

    /// Measured temperature.
    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Unit of [`temperature`](Self::temperature), `°C` or `°F`.
    #[must_use]
    pub fn temperature_unit(&self) -> &str {
        &self.temperature_unit
    }

    /// Measured relative humidity in percent.
    #[must_use]
    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    // ========== Humidity boost ==========

    /// Whether the humidity boost feature is on.
    #[must_use]
    pub fn humidity_boost_enabled(&self) -> bool {
        self.humidity_boost_enabled
    }

    /// Effective boost level.
    ///
    /// While boost is disabled this is the last level the user chose, not
    /// the appliance's disabled sentinel.
    #[must_use]
    pub fn humidity_boost_level(&self) -> u8 {
        self.humidity_boost_level
    }

    /// Whether a boost cycle is running right now.
    #[must_use]
    pub fn humidity_boost_running(&self) -> bool {
        self.humidity_boost_running
    }

    // ========== Maintenance ==========

    /// Hours until the filter needs attention.
    #[must_use]
    pub fn filter_timer(&self) -> i64 {
        self.filter_timer
    }

    /// Hygiene capsule status.
    #[must_use]
    pub fn hygiene_status(&self) -> i64 {
        self.hygiene_status
    }

    /// When this state was built.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
