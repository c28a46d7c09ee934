// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `zephyr_lan` library.
//!
//! The hierarchy follows the failure classes a caller has to tell apart:
//!
//! - [`ProtocolError::AuthenticationFailed`] - the appliance answered HTTP 401
//!   (the setup flow reports this as a wrong host / wrong device)
//! - [`ParseError`] - the status page was not a recognisable status page
//! - [`ProtocolError`] (other variants) - transport failures and non-2xx answers
//! - [`ValueError`] - an invalid option or value passed to a control operation

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during HTTP communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The status page could not be turned into a device state.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The preference store failed to load or save.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A control request addressed a group this client does not serve.
    #[error("unknown device group: {0}")]
    UnknownGroup(String),

    /// An operation needs data from a successful poll and none happened yet.
    #[error("device state is not available yet")]
    NotInitialized,
}

impl Error {
    /// Returns `true` if the appliance rejected the request with HTTP 401.
    #[must_use]
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::Protocol(ProtocolError::AuthenticationFailed))
    }

    /// Returns `true` for failures raised synchronously by argument validation.
    #[must_use]
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// A string does not name any option of an enumeration.
    #[error("option {value} is not valid for {kind}, valid options are: {valid}")]
    InvalidOption {
        /// The enumeration that was parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
        /// Comma-separated list of accepted options.
        valid: String,
    },

    /// The humidity boost level collides with the "disabled" sentinel.
    #[error("humidity_boost_level value {value} not allowed, max is {max}")]
    ReservedHumidityLevel {
        /// The rejected level.
        value: u8,
        /// Highest level that can be set.
        max: u8,
    },

    /// A firmware version string could not be parsed.
    #[error("invalid firmware version: {0}")]
    InvalidFirmwareVersion(String),

    /// A value of the wrong type was written to an entity field.
    #[error("field {field} does not accept {value}")]
    UnsupportedValue {
        /// The field key.
        field: &'static str,
        /// Description of the rejected value.
        value: String,
    },

    /// The entity field cannot be written.
    #[error("field {0} is read-only")]
    ReadOnlyField(&'static str),
}

/// Errors related to HTTP communication with the appliance.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed at the transport level.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The appliance answered with a non-success status code.
    #[error("HTTP {status} on {url}")]
    HttpStatus {
        /// The status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Authentication failed (HTTP 401).
    #[error("authentication failed")]
    AuthenticationFailed,
}

/// Errors related to parsing the status page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Neither `fan_speed` nor `operation_mode` was found on the page.
    #[error("no valid status data received ({0} bytes)")]
    MissingStatusFields(usize),

    /// Expected field is missing from the status page.
    #[error("missing field in status page: {0}")]
    MissingField(String),

    /// Failed to coerce a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors raised by a [`PreferenceStore`](crate::preferences::PreferenceStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document is not valid JSON for the preferences schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 22,
            max: 80,
            actual: 150,
        };
        assert_eq!(err.to_string(), "value 150 is out of range [22, 80]");
    }

    #[test]
    fn reserved_humidity_display() {
        let err = ValueError::ReservedHumidityLevel { value: 99, max: 98 };
        assert_eq!(
            err.to_string(),
            "humidity_boost_level value 99 not allowed, max is 98"
        );
    }

    #[test]
    fn authentication_failure_is_classified() {
        let err: Error = ProtocolError::AuthenticationFailed.into();
        assert!(err.is_authentication_failure());

        let err: Error = ProtocolError::HttpStatus {
            status: 500,
            url: "http://10.0.0.2/".to_string(),
        }
        .into();
        assert!(!err.is_authentication_failure());
    }

    #[test]
    fn validation_failure_is_classified() {
        let err: Error = ValueError::ReservedHumidityLevel { value: 120, max: 98 }.into();
        assert!(err.is_validation_failure());
        assert!(!Error::NotInitialized.is_validation_failure());
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("device_id".to_string());
        assert_eq!(err.to_string(), "missing field in status page: device_id");
    }
}
