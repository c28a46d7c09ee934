// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zephyr control commands.
//!
//! The appliance exposes one endpoint per setting, each taking at most one
//! form field.
//!
//! # Available Commands
//!
//! | Command | Endpoint | Body |
//! |---------|----------|------|
//! | [`DeviceCommand::PowerOn`] / [`DeviceCommand::PowerOff`] | `/on`, `/off` | none |
//! | [`DeviceCommand::SetMode`] | `/intake`, `/cycle`, `/exhaust` | none |
//! | [`DeviceCommand::SetFanSpeed`] | `/fan` | `speed=<22-80>` |
//! | [`DeviceCommand::SetHumidityLevel`] | `/humid` | `level=<0-98, 99 = off>` |
//! | [`DeviceCommand::SetBuzzer`] | `/buzzer` | `state=<0 or 1>` |
//!
//! A [`ControlRequest`] collects the user's intents; the
//! [`Device`](crate::Device) turns it into a sequence of commands.
//!
//! # Examples
//!
//! ```
//! use zephyr_lan::command::DeviceCommand;
//!
//! let cmd = DeviceCommand::SetFanSpeed(55);
//! assert_eq!(cmd.path(), "/fan");
//! assert_eq!(cmd.form(), Some(("speed", "55".to_string())));
//! ```

mod control;
mod device_command;

pub use control::ControlRequest;
pub use device_command::DeviceCommand;
