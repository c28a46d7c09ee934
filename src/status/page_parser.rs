// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scraper for the appliance's HTML status page.

use crate::error::ParseError;
use crate::status::{RawFieldMap, RawValue};

const ENTRY_OPEN: &str = "<p><b>";
const LABEL_CLOSE: &str = ":</b>";
const ENTRY_CLOSE: &str = "</p>";

/// Units recognised at the end of a value, checked in this order.
pub const UNITS: [&str; 5] = ["°C", "°F", "%", "dBm", "h"];

const BOOL_FIELDS: [&str; 3] = ["power", "buzzer", "humidity_boost_running"];

const INT_FIELDS: [&str; 4] = [
    "fan_speed",
    "humidity_boost_level",
    "humidity_boost_level_raw",
    "hygiene_status",
];

const ENUMERABLE_FIELDS: [&str; 2] = ["fan_speed", "operation_mode"];

/// Parses the status page into a [`RawFieldMap`].
///
/// Every `<p><b>Label:</b> Value</p>` entry becomes one field. The label may
/// not contain `<` or `:` and the value may not span lines. Labels are turned
/// into `snake_case` keys, and a few are renamed to their canonical field
/// name (`SSID` becomes `wifi_ssid`, `Set Humidity` becomes
/// `humidity_boost_level_raw`, ...). Later duplicates overwrite earlier ones.
///
/// # Errors
///
/// Returns `ParseError::MissingStatusFields` if neither a fan speed nor an
/// operation mode entry is present, which is how a login or error page
/// presents itself.
///
/// # Examples
///
/// ```
/// use zephyr_lan::status::parse_status_page;
///
/// let page = "<p><b>Fan Speed:</b> 45</p><p><b>Temperature:</b> 21.5 °C</p>";
/// let raw = parse_status_page(page).unwrap();
///
/// assert_eq!(raw.get_i64("fan_speed"), Some(45));
/// assert_eq!(raw.get_f64("temperature"), Some(21.5));
/// assert_eq!(raw.unit("temperature"), Some("°C"));
/// ```
pub fn parse_status_page(html: &str) -> Result<RawFieldMap, ParseError> {
    let mut raw = RawFieldMap::new();
    let mut valid = false;

    for (label, value) in entries(html) {
        let key = field_key(label);
        let (parsed, unit) = parse_value(&key, value);
        raw.insert(key.clone(), parsed);
        if let Some(unit) = unit {
            raw.insert(format!("{key}_unit"), unit);
        }
        if ENUMERABLE_FIELDS.contains(&key.as_str()) {
            raw.mark_enumerable(key);
            valid = true;
        }
    }

    if !valid {
        return Err(ParseError::MissingStatusFields(html.len()));
    }

    tracing::debug!(fields = raw.len(), "Parsed status page");
    Ok(raw)
}

/// Parses the appliance's boolean spelling.
///
/// `"0"` and `"1"` are decided first; anything else is `true` only for
/// `1`, `true`, `on` or `yes` in any case.
///
/// # Examples
///
/// ```
/// use zephyr_lan::status::parse_bool;
///
/// assert!(parse_bool("On"));
/// assert!(!parse_bool("no"));
/// assert!(!parse_bool("banana"));
/// ```
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    match value {
        "0" => false,
        "1" => true,
        other => matches!(
            other.trim().to_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
    }
}

/// Iterates over `(label, value)` pairs of the page, left to right.
fn entries(html: &str) -> impl Iterator<Item = (&str, &str)> {
    let mut rest = html;
    std::iter::from_fn(move || {
        while let Some(start) = rest.find(ENTRY_OPEN) {
            let body = &rest[start + ENTRY_OPEN.len()..];
            if let Some((label, value, consumed)) = match_entry(body) {
                rest = &body[consumed..];
                return Some((label, value));
            }
            // '<' is one byte, so this stays on a char boundary.
            rest = &rest[start + 1..];
        }
        None
    })
}

/// Matches `Label:</b>Value</p>` at the start of `body`.
fn match_entry(body: &str) -> Option<(&str, &str, usize)> {
    let label_end = body.find(['<', ':'])?;
    if label_end == 0 || !body[label_end..].starts_with(LABEL_CLOSE) {
        return None;
    }
    let value_start = label_end + LABEL_CLOSE.len();
    let tail = &body[value_start..];
    let line = tail.find('\n').map_or(tail, |nl| &tail[..nl]);
    let value_len = line.find(ENTRY_CLOSE)?;
    Some((
        &body[..label_end],
        &tail[..value_len],
        value_start + value_len + ENTRY_CLOSE.len(),
    ))
}

fn field_key(label: &str) -> String {
    let key = label.trim().to_lowercase().replace(' ', "_");
    match key.as_str() {
        "ssid" | "rssi" | "ip" => format!("wifi_{key}"),
        "version" | "model" => format!("device_{key}"),
        "set_humidity" => "humidity_boost_level_raw".to_string(),
        "humidity_boost" => "humidity_boost_running".to_string(),
        _ => key,
    }
}

/// Coerces one value. Returns the unit alongside when one was stripped.
fn parse_value(key: &str, value: &str) -> (RawValue, Option<&'static str>) {
    let v = value.trim();

    if BOOL_FIELDS.contains(&key) {
        return (RawValue::Bool(parse_bool(v)), None);
    }

    if let Some(&unit) = UNITS.iter().find(|u| v.ends_with(&format!(" {u}"))) {
        let numeric = v.replace(unit, "");
        return match parse_with_unit(numeric.trim(), unit) {
            Some(parsed) => (parsed, Some(unit)),
            None => (RawValue::Text(v.to_string()), None),
        };
    }

    if INT_FIELDS.contains(&key) {
        return match v.parse::<i64>() {
            Ok(i) => (RawValue::Int(i), None),
            Err(_) => (RawValue::Text(v.to_string()), None),
        };
    }

    (RawValue::Text(v.to_string()), None)
}

#[allow(clippy::cast_possible_truncation)]
fn parse_with_unit(numeric: &str, unit: &str) -> Option<RawValue> {
    let f = numeric.parse::<f64>().ok()?;
    if unit == "h" {
        // Hours truncate toward zero.
        return f.is_finite().then(|| RawValue::Int(f.trunc() as i64));
    }
    Some(RawValue::Float(f))
}
