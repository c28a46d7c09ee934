// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-shot validation of a user-entered host.
//!
//! The appliance has no credentials; "validation" means the host answers
//! with a parseable status page. Failures are reduced to the two codes a
//! setup form displays.

use std::fmt;

use thiserror::Error;

use crate::device::Device;
use crate::error::Error;
use crate::protocol::HttpConfig;
use crate::state::DeviceState;

/// Why a host could not be set up.
#[derive(Debug, Error)]
pub enum SetupFailure {
    /// The host answered HTTP 401.
    #[error("invalid_auth")]
    InvalidAuth,

    /// Anything else: unreachable host, error status, not a Zephyr page.
    #[error("unknown")]
    Unknown(#[source] Error),
}

impl SetupFailure {
    /// Returns the form error code, `invalid_auth` or `unknown`.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAuth => "invalid_auth",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl From<Error> for SetupFailure {
    fn from(error: Error) -> Self {
        if error.is_authentication_failure() {
            Self::InvalidAuth
        } else {
            Self::Unknown(error)
        }
    }
}

/// A validated host, ready to be stored as a configuration entry.
#[derive(Debug, Clone)]
pub struct SetupEntry {
    /// Entry title, the host as entered.
    pub title: String,
    /// Unique id of the entry, the host as entered.
    pub unique_id: String,
    /// State read during validation.
    pub state: DeviceState,
}

impl fmt::Display for SetupEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.state.device_name())
    }
}

/// Validates a host with the default HTTP configuration.
///
/// # Errors
///
/// Returns `SetupFailure::InvalidAuth` on HTTP 401 and
/// `SetupFailure::Unknown` for every other failure.
///
/// # Examples
///
/// ```no_run
/// use zephyr_lan::setup::validate_host;
///
/// # async fn example() {
/// match validate_host("192.168.1.100").await {
///     Ok(entry) => println!("found {entry}"),
///     Err(failure) => println!("setup error: {}", failure.code()),
/// }
/// # }
/// ```
pub async fn validate_host(host: &str) -> Result<SetupEntry, SetupFailure> {
    validate(HttpConfig::new(host)).await
}

/// Validates a host with a custom HTTP configuration.
///
/// # Errors
///
/// See [`validate_host`].
pub async fn validate(config: HttpConfig) -> Result<SetupEntry, SetupFailure> {
    let host = config.host().trim().to_string();
    match Device::http_config(config).build().await {
        Ok((_, state)) => {
            tracing::debug!(host = %host, device = %state.device_id(), "Host validated");
            Ok(SetupEntry {
                title: host.clone(),
                unique_id: host,
                state,
            })
        }
        Err(e) => {
            let failure = SetupFailure::from(e);
            match &failure {
                SetupFailure::InvalidAuth => {
                    tracing::debug!(host = %host, "Host requires authentication");
                }
                SetupFailure::Unknown(e) => {
                    tracing::error!(host = %host, error = %e, "Unexpected error validating host");
                }
            }
            Err(failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseError, ProtocolError};

    #[test]
    fn failure_codes() {
        let failure = SetupFailure::from(Error::Protocol(ProtocolError::AuthenticationFailed));
        assert_eq!(failure.code(), "invalid_auth");
        assert_eq!(failure.to_string(), "invalid_auth");

        let failure = SetupFailure::from(Error::Parse(ParseError::MissingStatusFields(12)));
        assert_eq!(failure.code(), "unknown");
        assert!(matches!(failure, SetupFailure::Unknown(Error::Parse(_))));
    }

    #[tokio::test]
    async fn empty_host_is_unknown() {
        let failure = validate_host("").await.unwrap_err();
        assert_eq!(failure.code(), "unknown");
    }
}
