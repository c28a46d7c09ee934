// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Zephyr appliance control.
//!
//! Each type keeps its value inside the range the appliance accepts, so an
//! invalid option or level is rejected before anything goes over the wire.
//!
//! # Types
//!
//! - [`FanSpeed`] - Named fan speed bucket (night, low, medium, high)
//! - [`OperationMode`] - Airflow direction (supply, cycle, extract)
//! - [`HumidityBoostLevel`] - Humidity boost target (0-98 %)
//! - [`FirmwareVersion`] - Dotted firmware version with numeric ordering

mod fan_speed;
mod firmware;
mod humidity;
mod operation_mode;

pub use fan_speed::{
    FAN_SPEED_MAX, FAN_SPEED_MIN, FanSpeed, clamp_fan_speed, fan_percentage_from_speed,
    fan_speed_from_percentage,
};
pub use firmware::{FirmwareVersion, FirmwareVersionConst};
pub use humidity::HumidityBoostLevel;
pub use operation_mode::OperationMode;
