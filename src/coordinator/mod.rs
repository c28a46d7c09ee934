// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polling and reconciliation for one appliance.
//!
//! The [`Coordinator`] is the piece a host application keeps alive: it
//! polls on a fixed interval, persists preferences when they change and
//! publishes each new [`DeviceState`](crate::state::DeviceState) to
//! observers registered through [`Subscribable`](crate::subscription::Subscribable).
//!
//! # Refresh cycle
//!
//! ```text
//!            tick / request_refresh()
//!   Idle ─────────────────────────────▶ Polling ──────▶ Idle
//!     │                                   (fetch + derive + save + publish)
//!     │ request after status_refresh()
//!     └───────────────────────────────▶ Reconciling ──▶ Idle ──▶ request_refresh()
//!                                         (derive from cache + save + publish)
//! ```

mod config;
mod driver;

pub use config::{CoordinatorConfig, DriverPhase};
pub use driver::Coordinator;
