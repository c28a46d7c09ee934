// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinator configuration.

use std::fmt;
use std::time::Duration;

/// Configuration for a [`Coordinator`](super::Coordinator).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use zephyr_lan::coordinator::CoordinatorConfig;
///
/// let config = CoordinatorConfig::for_host("192.168.1.100");
/// assert_eq!(config.name, "zephyr_lan_192.168.1.100");
/// assert_eq!(config.update_interval, Duration::from_secs(10));
///
/// let config = CoordinatorConfig::default().with_update_interval(Duration::from_secs(30));
/// assert_eq!(config.update_interval, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Name used in log records.
    pub name: String,
    /// Time between two scheduled polls.
    pub update_interval: Duration,
}

impl CoordinatorConfig {
    /// Default time between two scheduled polls.
    pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(10);

    /// Creates a configuration with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            update_interval: Self::DEFAULT_UPDATE_INTERVAL,
        }
    }

    /// Creates a configuration named after the appliance host.
    #[must_use]
    pub fn for_host(host: &str) -> Self {
        Self::new(format!("{}_{host}", crate::DOMAIN))
    }

    /// Sets the time between two scheduled polls.
    #[must_use]
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self::new(crate::DOMAIN)
    }
}

/// What the coordinator is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverPhase {
    /// Waiting for the next tick or refresh request.
    #[default]
    Idle,
    /// Fetching a fresh status page.
    Polling,
    /// Re-deriving from the cached snapshot after a command.
    Reconciling,
}

impl fmt::Display for DriverPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Polling => "polling",
            Self::Reconciling => "reconciling",
        };
        f.write_str(name)
    }
}
