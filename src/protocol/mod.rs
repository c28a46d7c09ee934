// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport to the appliance.
//!
//! [`Protocol`] is the seam between the device logic and the network:
//! [`HttpClient`] is the real implementation, tests can substitute their
//! own.

mod http;

pub use http::{HttpClient, HttpConfig};

use crate::command::DeviceCommand;
use crate::error::ProtocolError;

/// Response to a control command.
#[derive(Debug, Clone)]
pub struct CommandResponse {
    status: u16,
    body: String,
}

impl CommandResponse {
    /// Creates a new command response.
    #[must_use]
    pub fn new(status: u16, body: String) -> Self {
        Self { status, body }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Trait for transports that can talk to a Zephyr appliance.
#[allow(async_fn_in_trait)]
pub trait Protocol {
    /// Fetches the HTML status page.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::AuthenticationFailed` on HTTP 401 and another
    /// `ProtocolError` for any other failure.
    async fn fetch_status(&self) -> Result<String, ProtocolError>;

    /// Sends a control command.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::AuthenticationFailed` on HTTP 401 and another
    /// `ProtocolError` for any other failure.
    async fn send_command(&self, command: &DeviceCommand) -> Result<CommandResponse, ProtocolError>;
}
