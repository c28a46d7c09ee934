// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status page scraping.
//!
//! The appliance has no structured API: its root page is an HTML document
//! with one `<p><b>Label:</b> Value</p>` paragraph per reading. This module
//! turns that page into a [`RawFieldMap`] of loosely typed values which the
//! [`state`](crate::state) module then validates and derives from.

mod page_parser;
mod raw;

pub use page_parser::{UNITS, parse_bool, parse_status_page};
pub use raw::{RawFieldMap, RawValue};
