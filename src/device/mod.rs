// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level device abstraction for Zephyr appliances.
//!
//! A [`Device`] owns the last parsed status page, the cached identity and
//! the in-memory preferences of one appliance. It turns status pages into
//! [`DeviceState`]s and control intents into HTTP commands.
//!
//! Every HTTP exchange sequence (a poll, or all the commands of one
//! [`control`](Device::control) call) holds the device's I/O lock, so at most
//! one request is outstanding per appliance.
//!
//! ```no_run
//! use zephyr_lan::Device;
//! use zephyr_lan::command::ControlRequest;
//! use zephyr_lan::types::FanSpeed;
//!
//! # async fn example() -> zephyr_lan::Result<()> {
//! let (device, state) = Device::http("192.168.1.100").build().await?;
//!
//! let request = ControlRequest::new().with_fan_speed_enum(FanSpeed::High);
//! device.control(state.group_id(), &request).await?;
//! # Ok(())
//! # }
//! ```

mod http_builder;

pub use http_builder::HttpDeviceBuilder;

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::command::{ControlRequest, DeviceCommand};
use crate::error::Error;
use crate::preferences::PersistedPreferences;
use crate::protocol::{HttpClient, HttpConfig, Protocol};
use crate::state::{DeviceIdentity, DeviceState, normalize};
use crate::status::{RawFieldMap, parse_status_page};
use crate::subscription::CallbackRegistry;
use crate::types::{FirmwareVersion, HumidityBoostLevel};

/// Where a refresh takes its raw fields from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Fetch and parse a fresh status page.
    Fetch,
    /// Re-derive from the cached, possibly patched, raw snapshot.
    FromCache,
}

/// A Zephyr appliance reachable through a [`Protocol`].
///
/// # Type Parameter
///
/// `P` is the transport, [`HttpClient`] in production.
#[derive(Debug)]
pub struct Device<P: Protocol> {
    protocol: Arc<P>,
    io_lock: Mutex<()>,
    raw: RwLock<Option<Arc<RawFieldMap>>>,
    identity: RwLock<Option<DeviceIdentity>>,
    preferences: RwLock<PersistedPreferences>,
    state: RwLock<Option<DeviceState>>,
    callbacks: Arc<CallbackRegistry>,
}

impl<P: Protocol> Device<P> {
    /// Creates a device on top of a transport.
    #[must_use]
    pub fn new(protocol: P) -> Self {
        Self {
            protocol: Arc::new(protocol),
            io_lock: Mutex::new(()),
            raw: RwLock::new(None),
            identity: RwLock::new(None),
            preferences: RwLock::new(PersistedPreferences::default()),
            state: RwLock::new(None),
            callbacks: Arc::new(CallbackRegistry::new()),
        }
    }

    /// Returns the transport.
    #[must_use]
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// Returns the last derived state, if any refresh succeeded.
    #[must_use]
    pub fn state(&self) -> Option<DeviceState> {
        self.state.read().clone()
    }

    /// Returns the cached raw snapshot.
    #[must_use]
    pub fn raw_data(&self) -> Option<Arc<RawFieldMap>> {
        self.raw.read().clone()
    }

    /// Returns the cached identity.
    #[must_use]
    pub fn identity(&self) -> Option<DeviceIdentity> {
        self.identity.read().clone()
    }

    /// Returns a copy of the in-memory preferences.
    #[must_use]
    pub fn preferences(&self) -> PersistedPreferences {
        self.preferences.read().clone()
    }

    /// Replaces the in-memory preferences, typically with a loaded copy.
    pub fn set_preferences(&self, preferences: PersistedPreferences) {
        *self.preferences.write() = preferences;
    }

    pub(crate) fn callbacks(&self) -> &Arc<CallbackRegistry> {
        &self.callbacks
    }

    // ========== Polling ==========

    /// Refreshes the device state.
    ///
    /// The raw snapshot, the identity and the preferences are only committed
    /// when the derivation succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` for transport failures, `Error::Parse` when
    /// the page is not a status page or a field cannot be coerced, and
    /// `Error::NotInitialized` for a cache refresh before the first
    /// successful fetch.
    pub async fn refresh(&self, mode: RefreshMode) -> Result<DeviceState, Error> {
        let raw = match mode {
            RefreshMode::Fetch => {
                let html = {
                    let _guard = self.io_lock.lock().await;
                    self.protocol.fetch_status().await?
                };
                Arc::new(parse_status_page(&html)?)
            }
            RefreshMode::FromCache => self.raw_data().ok_or(Error::NotInitialized)?,
        };

        let identity = match self.identity() {
            Some(identity) => identity,
            None => DeviceIdentity::from_raw(&raw)?,
        };

        // Held across derive and commit so a level remembered by `control`
        // in between is not overwritten.
        let mut preferences = self.preferences.write();
        let mut updated = preferences.clone();
        let state = normalize(&raw, &identity, &mut updated, Utc::now())?;

        tracing::debug!(
            device = %identity.device_id(),
            ?mode,
            fields = raw.len(),
            "Derived device state"
        );

        *preferences = updated;
        *self.raw.write() = Some(raw);
        *self.identity.write() = Some(identity);
        *self.state.write() = Some(state.clone());
        Ok(state)
    }

    // ========== Control ==========

    /// Applies a set of control intents.
    ///
    /// Intents run in the order power, operation mode, fan speed, boost
    /// enable/disable, boost level, buzzer. After each successful command
    /// the cached raw snapshot is replaced by a patched copy. A failing
    /// command aborts the remaining intents; earlier patches stay.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for a boost level of 99 or above and
    /// `Error::UnknownGroup` for a foreign group id, both before anything is
    /// sent. Returns `Error::NotInitialized` for a boost level intent before
    /// the first refresh, and `Error::Protocol` when a command fails.
    pub async fn control(&self, group_id: &str, request: &ControlRequest) -> Result<(), Error> {
        let level = request.validate()?;
        self.check_group(group_id)?;
        if level.is_some() && self.raw.read().is_none() {
            return Err(Error::NotInitialized);
        }

        let _guard = self.io_lock.lock().await;

        if let Some(on) = request.power {
            let command = if on {
                DeviceCommand::PowerOn
            } else {
                DeviceCommand::PowerOff
            };
            self.send(command).await?;
        }
        if let Some(mode) = request.operation_mode {
            self.send(DeviceCommand::SetMode(mode)).await?;
        }
        if let Some(speed) = request.target_fan_speed() {
            self.send(DeviceCommand::SetFanSpeed(speed)).await?;
        }
        match request.humidity_boost_enabled {
            Some(true) => {
                let level = self
                    .preferences
                    .read()
                    .humidity_boost_level_last
                    .unwrap_or(HumidityBoostLevel::DEFAULT.value());
                self.apply_humidity_level(level).await?;
            }
            Some(false) => {
                self.apply_humidity_level(HumidityBoostLevel::DISABLED_SENTINEL)
                    .await?;
            }
            None => {}
        }
        if let Some(level) = level {
            if self.boost_enabled() {
                self.apply_humidity_level(level.value()).await?;
            } else {
                tracing::debug!(level = level.value(), "Boost disabled, remembering level");
                self.preferences.write().humidity_boost_level_last = Some(level.value());
            }
        }
        if let Some(on) = request.buzzer {
            self.send(DeviceCommand::SetBuzzer(on)).await?;
        }
        Ok(())
    }

    // ========== Helpers ==========

    fn check_group(&self, group_id: &str) -> Result<(), Error> {
        match self.identity.read().as_ref() {
            Some(identity) if identity.group_id() != group_id => {
                Err(Error::UnknownGroup(group_id.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn boost_enabled(&self) -> bool {
        self.raw
            .read()
            .as_ref()
            .and_then(|raw| raw.get_i64("humidity_boost_level_raw"))
            .is_some_and(HumidityBoostLevel::is_enabled_raw)
    }

    /// Sends one command and patches the cached snapshot.
    async fn send(&self, command: DeviceCommand) -> Result<(), Error> {
        self.protocol.send_command(&command).await?;

        let change = command.expected_change();
        {
            let mut raw = self.raw.write();
            if let Some(current) = raw.as_ref() {
                *raw = Some(Arc::new(change.apply(current)));
            }
        }
        self.callbacks.dispatch_state_changed(&change);
        Ok(())
    }

    async fn apply_humidity_level(&self, level: u8) -> Result<(), Error> {
        self.send(DeviceCommand::SetHumidityLevel(level)).await?;

        let needs_restart = self
            .raw_data()
            .is_some_and(|raw| boost_stop_bug_applies(&raw, level));
        if needs_restart {
            tracing::warn!(level, "Restarting unit to stop the running boost cycle");
            self.send(DeviceCommand::PowerOff).await?;
            self.send(DeviceCommand::PowerOn).await?;
        }
        Ok(())
    }
}

/// Firmware up to 3.1.5 keeps a running boost cycle going after the
/// set-point is raised above the current humidity. Power cycling stops it.
fn boost_stop_bug_applies(raw: &RawFieldMap, level: u8) -> bool {
    let affected = match raw.get("device_version") {
        Some(value) => match value.to_string().parse::<FirmwareVersion>() {
            Ok(version) => version <= FirmwareVersion::LAST_WITH_BOOST_STOP_BUG,
            Err(e) => {
                tracing::debug!(error = %e, "Cannot compare firmware version");
                false
            }
        },
        None => false,
    };
    affected
        && raw.get_bool("power") == Some(true)
        && raw.get_bool("humidity_boost_running") == Some(true)
        && raw
            .get_f64("humidity")
            .is_some_and(|humidity| f64::from(level) > humidity)
}

// ========== HTTP Device Entry Point ==========

impl Device<HttpClient> {
    /// Creates a builder for an HTTP device from a host string.
    ///
    /// This is a convenience method equivalent to
    /// `Device::http_config(HttpConfig::new(host))`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use zephyr_lan::Device;
    ///
    /// # async fn example() -> zephyr_lan::Result<()> {
    /// let (device, state) = Device::http("192.168.1.100").build().await?;
    /// println!("{} running {}", state.device_name(), state.device_version());
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn http(host: impl Into<String>) -> HttpDeviceBuilder {
        HttpDeviceBuilder::new(HttpConfig::new(host))
    }

    /// Creates a builder for an HTTP device from an `HttpConfig`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use zephyr_lan::Device;
    /// use zephyr_lan::protocol::HttpConfig;
    ///
    /// # fn example() -> zephyr_lan::Result<()> {
    /// let config = HttpConfig::new("192.168.1.100")
    ///     .with_port(8080)
    ///     .with_timeout(Duration::from_secs(3));
    ///
    /// let device = Device::http_config(config).build_without_probe()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn http_config(config: HttpConfig) -> HttpDeviceBuilder {
        HttpDeviceBuilder::new(config)
    }
}
