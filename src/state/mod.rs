// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state and its derivation.
//!
//! [`normalize`] turns a [`RawFieldMap`](crate::status::RawFieldMap) into a
//! validated [`DeviceState`], computing the enum companions and reconciling
//! the humidity boost level with the persisted preferences. Control commands
//! describe their expected effect as a [`StateChange`], which is applied to a
//! copy of the raw fields before deriving again.

mod device_state;
mod normalize;
mod state_change;

pub use device_state::DeviceState;
pub use normalize::{DeviceIdentity, display_name, normalize};
pub use state_change::StateChange;
