// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity accessor table.
//!
//! Host integrations address device fields by key. [`Field`] enumerates
//! every key of [`DeviceState`](crate::state::DeviceState) with a typed
//! reader and, for controls, a mapping to a
//! [`ControlRequest`](crate::command::ControlRequest).
//! [`verify_accessor_table`] checks the table against the serialized
//! schema, so a field added to the state without an accessor is caught.
//!
//! [`ENTITY_DESCRIPTIONS`] lists the entities a host should create per
//! device:
//!
//! | Platform | Entities |
//! |----------|----------|
//! | sensor | Temperature, Humidity, Filter Status, Capsule Status, Wi-Fi SSID/RSSI/IP |
//! | binary sensor | Humidity Boost Running |
//! | switch | Power, Buzzer |
//! | select | Fan Mode, Fan Speed |
//! | number | Humidity Boost (35-98 %) |
//! | fan | Fan (speed range 22-80) |

mod description;
mod field;

pub use description::{
    ENTITY_DESCRIPTIONS, EntityCategory, EntityDescription, FanReadout, Platform, descriptions_for,
};
pub use field::{AccessorTableError, Field, FieldValue, verify_accessor_table};
