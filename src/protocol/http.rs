// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP protocol implementation for Zephyr appliances.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::command::DeviceCommand;
use crate::error::ProtocolError;
use crate::protocol::{CommandResponse, Protocol};

// ============================================================================
// HttpConfig - Connection parameters
// ============================================================================

/// Configuration for an HTTP connection to a Zephyr appliance.
///
/// The appliance speaks plain HTTP without authentication. The host may be
/// a bare address, an address with a port (`10.0.0.2:8080`) or a full base
/// URL (`http://10.0.0.2`).
///
/// # Examples
///
/// ```
/// use zephyr_lan::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("192.168.1.100");
/// assert_eq!(config.base_url(), "http://192.168.1.100");
///
/// let config = HttpConfig::new("192.168.1.100")
///     .with_port(8080)
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://192.168.1.100:8080");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    port: u16,
    timeout: Duration,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new HTTP configuration for the specified host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    ///
    /// Ignored when the host already carries a scheme or a port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host as given.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            return host.to_string();
        }
        if host.contains(':') || self.port == Self::DEFAULT_PORT {
            format!("http://{host}")
        } else {
            format!("http://{host}:{}", self.port)
        }
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` for an empty host, or an
    /// error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if self.host.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }
        let base_url = self.base_url();

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpClient { base_url, client })
    }
}

// ============================================================================
// HttpClient - Request/response exchange
// ============================================================================

/// HTTP client for one Zephyr appliance.
///
/// `GET /` returns the status page; every control endpoint is a `POST` with
/// an optional form-encoded body.
///
/// # Examples
///
/// ```no_run
/// use zephyr_lan::command::DeviceCommand;
/// use zephyr_lan::protocol::{HttpClient, Protocol};
///
/// # async fn example() -> Result<(), zephyr_lan::error::ProtocolError> {
/// let client = HttpClient::new("192.168.1.100")?;
/// let page = client.fetch_status().await?;
/// client.send_command(&DeviceCommand::SetFanSpeed(55)).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client for the specified host with default
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        HttpConfig::new(host).into_client()
    }

    /// Returns the base URL of the appliance.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check(response: Response) -> Result<String, ProtocolError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ProtocolError::AuthenticationFailed);
        }
        if !status.is_success() {
            return Err(ProtocolError::HttpStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        response.text().await.map_err(ProtocolError::Http)
    }
}

impl Protocol for HttpClient {
    async fn fetch_status(&self) -> Result<String, ProtocolError> {
        let url = self.url("/");

        tracing::debug!(url = %url, "Fetching status page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProtocolError::Http)?;
        let body = Self::check(response).await?;

        tracing::debug!(bytes = body.len(), "Received status page");

        Ok(body)
    }

    async fn send_command(&self, command: &DeviceCommand) -> Result<CommandResponse, ProtocolError> {
        let url = self.url(command.path());

        tracing::debug!(url = %url, command = %command, "Sending HTTP command");

        let mut request = self.client.post(&url);
        if let Some((key, value)) = command.form() {
            request = request.form(&[(key, value)]);
        }
        let response = request.send().await.map_err(ProtocolError::Http)?;
        let status = response.status().as_u16();
        let body = Self::check(response).await?;

        tracing::debug!(status, body = %body, "Received HTTP response");

        Ok(CommandResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_config_default_values() {
        let config = HttpConfig::new("192.168.1.100");
        assert_eq!(config.host(), "192.168.1.100");
        assert_eq!(config.port(), 80);
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn http_config_base_url_custom_port() {
        let config = HttpConfig::new("192.168.1.100").with_port(8080);
        assert_eq!(config.base_url(), "http://192.168.1.100:8080");
    }

    #[test]
    fn http_config_host_with_port() {
        let config = HttpConfig::new("192.168.1.100:8081").with_port(9000);
        assert_eq!(config.base_url(), "http://192.168.1.100:8081");
    }

    #[test]
    fn http_config_full_url() {
        let config = HttpConfig::new("http://127.0.0.1:4321/");
        assert_eq!(config.base_url(), "http://127.0.0.1:4321");
    }

    #[test]
    fn http_config_empty_host() {
        let result = HttpConfig::new("  ").into_client();
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[test]
    fn client_urls() {
        let client = HttpClient::new("192.168.1.100").unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.100");
        assert_eq!(client.url("/"), "http://192.168.1.100/");
        assert_eq!(
            client.url(DeviceCommand::PowerOff.path()),
            "http://192.168.1.100/off"
        );
    }
}
