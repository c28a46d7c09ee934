// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP device builder.

use std::time::Duration;

use crate::device::{Device, RefreshMode};
use crate::error::Error;
use crate::preferences::PersistedPreferences;
use crate::protocol::{HttpClient, HttpConfig};
use crate::state::DeviceState;

/// Builder for creating HTTP devices.
///
/// This builder can be created in two ways:
/// - `Device::http("host")` - Simple host string
/// - `Device::http_config(HttpConfig::new("host").with_port(8080))` - Advanced configuration
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use zephyr_lan::Device;
///
/// # async fn example() -> zephyr_lan::Result<()> {
/// // Polls once and returns the initial state
/// let (device, state) = Device::http("192.168.1.100")
///     .with_timeout(Duration::from_secs(5))
///     .build()
///     .await?;
///
/// // No network access until the first refresh
/// let device = Device::http("192.168.1.100").build_without_probe()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpDeviceBuilder {
    config: HttpConfig,
    preferences: Option<PersistedPreferences>,
}

impl HttpDeviceBuilder {
    pub(crate) fn new(config: HttpConfig) -> Self {
        Self {
            config,
            preferences: None,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.config = self.config.with_port(port);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Seeds the device with previously persisted preferences.
    #[must_use]
    pub fn with_preferences(mut self, preferences: PersistedPreferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Returns the HTTP configuration.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Builds the device and polls it once.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The HTTP client cannot be created
    /// - The appliance cannot be reached or answers HTTP 401
    /// - The answer is not a status page
    pub async fn build(self) -> Result<(Device<HttpClient>, DeviceState), Error> {
        let device = self.build_without_probe()?;
        let state = device.refresh(RefreshMode::Fetch).await?;
        Ok((device, state))
    }

    /// Builds the device without polling it.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn build_without_probe(self) -> Result<Device<HttpClient>, Error> {
        let client = self.config.into_client().map_err(Error::Protocol)?;
        let device = Device::new(client);
        if let Some(preferences) = self.preferences {
            device.set_preferences(preferences);
        }
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;

    #[test]
    fn builder_overrides_config() {
        let builder = HttpDeviceBuilder::new(HttpConfig::new("192.168.1.100"))
            .with_port(8080)
            .with_timeout(Duration::from_secs(2));
        assert_eq!(builder.config().base_url(), "http://192.168.1.100:8080");
        assert_eq!(builder.config().timeout(), Duration::from_secs(2));
    }

    #[test]
    fn build_without_probe_seeds_preferences() {
        let prefs = PersistedPreferences {
            humidity_boost_level_last: Some(42),
            humidity_boost_level_max: Some(98),
        };
        let device = Device::http("192.168.1.100")
            .with_preferences(prefs.clone())
            .build_without_probe()
            .unwrap();

        assert_eq!(device.preferences(), prefs);
        assert!(device.state().is_none());
        assert_eq!(device.protocol().base_url(), "http://192.168.1.100");
    }

    #[test]
    fn empty_host_is_rejected() {
        let result = Device::http("").build_without_probe();
        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::InvalidAddress(_)))
        ));
    }
}
