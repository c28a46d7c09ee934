// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `zephyr_lan` - A Rust library to poll and control Zephyr ventilation
//! units over their LAN HTTP interface.
//!
//! The appliance serves a plain HTML status page and accepts one POST per
//! setting. This library scrapes the page into a typed [`DeviceState`],
//! keeps the client-side preferences the firmware cannot store, and sends
//! control commands followed by an optimistic local update and a re-poll.
//!
//! # Supported Features
//!
//! - **Status polling**: power, buzzer, fan speed and mode, temperature,
//!   humidity, humidity boost, filter and capsule counters, Wi-Fi details
//! - **Control**: power, operation mode, fan speed, humidity boost level and
//!   enable/disable, buzzer
//! - **Firmware quirks**: the boost "disabled" sentinel (99) and the
//!   firmware 3.1.5 bug that keeps a running boost cycle going
//! - **Coordination**: periodic polling, preference persistence, observers
//!
//! # Quick Start
//!
//! ## One-off control
//!
//! ```no_run
//! use zephyr_lan::Device;
//! use zephyr_lan::command::ControlRequest;
//! use zephyr_lan::types::{FanSpeed, OperationMode};
//!
//! #[tokio::main]
//! async fn main() -> zephyr_lan::Result<()> {
//!     // Polls once; returns (device, initial_state)
//!     let (device, state) = Device::http("192.168.1.100").build().await?;
//!     println!("{}: {} °C, {} %", state.device_name(), state.temperature(), state.humidity());
//!
//!     let request = ControlRequest::new()
//!         .with_operation_mode(OperationMode::Cycle)
//!         .with_fan_speed_enum(FanSpeed::Low);
//!     device.control(state.group_id(), &request).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Long-running coordinator
//!
//! ```no_run
//! use std::sync::Arc;
//! use zephyr_lan::Device;
//! use zephyr_lan::coordinator::{Coordinator, CoordinatorConfig};
//! use zephyr_lan::preferences::JsonFileStore;
//! use zephyr_lan::subscription::Subscribable;
//!
//! #[tokio::main]
//! async fn main() -> zephyr_lan::Result<()> {
//!     let host = "192.168.1.100";
//!     let device = Device::http(host).build_without_probe()?;
//!     let coordinator = Arc::new(Coordinator::new(
//!         device,
//!         JsonFileStore::for_device("/var/lib/zephyr", host),
//!         CoordinatorConfig::for_host(host),
//!     ));
//!
//!     coordinator.on_updated(|state| {
//!         println!("fan {} ({})", state.fan_speed(), state.fan_speed_enum());
//!     });
//!     coordinator.on_update_failed(|error| eprintln!("update failed: {error}"));
//!
//!     coordinator.run().await;
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod coordinator;
mod device;
pub mod entity;
pub mod error;
pub mod preferences;
pub mod protocol;
pub mod setup;
pub mod state;
pub mod status;
pub mod subscription;
pub mod types;

/// Namespace used for coordinator names and preference storage keys.
pub const DOMAIN: &str = "zephyr_lan";

pub use command::{ControlRequest, DeviceCommand};
pub use coordinator::{Coordinator, CoordinatorConfig, DriverPhase};
pub use device::{Device, HttpDeviceBuilder, RefreshMode};
pub use error::{Error, ParseError, ProtocolError, Result, StoreError, ValueError};
pub use preferences::{JsonFileStore, MemoryStore, PersistedPreferences, PreferenceStore};
pub use protocol::{HttpClient, HttpConfig};
pub use state::{DeviceIdentity, DeviceState, StateChange};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{FanSpeed, FirmwareVersion, HumidityBoostLevel, OperationMode};
