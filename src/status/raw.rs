// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Untyped field values scraped from the status page.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

/// A single coerced value from the status page.
///
/// Accessors are lax: numeric text converts to numbers and integral floats
/// convert to integers, the same way a validating record would accept them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    /// A boolean field.
    Bool(bool),
    /// An integer field, or a value with an hours unit.
    Int(i64),
    /// A value with a temperature, percentage or signal unit.
    Float(f64),
    /// Anything else, trimmed.
    Text(String),
}

impl RawValue {
    /// Returns the value as a boolean.
    ///
    /// Integers `0` and `1` and the usual textual spellings are accepted.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(0) => Some(false),
            Self::Int(1) => Some(true),
            Self::Text(s) => match s.trim().to_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => Some(true),
                "0" | "false" | "off" | "no" => Some(false),
                _ => None,
            },
            Self::Int(_) | Self::Float(_) => None,
        }
    }

    /// Returns the value as an integer.
    ///
    /// Floats are accepted only when they have no fractional part.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) => float_to_i64(*f),
            Self::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(float_to_i64))
            }
            Self::Bool(_) => None,
        }
    }

    /// Returns the value as a float.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Bool(_) => None,
        }
    }

    /// Returns the text if this is a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn float_to_i64(f: f64) -> Option<i64> {
    // 2^63, exclusive upper bound so the cast is exact.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (f.is_finite() && f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f)).then_some(f as i64)
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Field name to value mapping produced from one status page.
///
/// Alongside each value that carried a unit, a `<field>_unit` text entry
/// holds the unit. Fields the derivation has to compute an enum companion
/// for are flagged as enumerable.
///
/// A map is a snapshot: the reconciliation path never mutates one that has
/// already been handed out, it builds a patched copy instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFieldMap {
    fields: BTreeMap<String, RawValue>,
    enumerable: BTreeSet<String>,
}

impl RawFieldMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<RawValue> {
        self.fields.remove(key)
    }

    /// Returns a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }

    /// Returns `true` if the field is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns a field coerced to a boolean.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(RawValue::as_bool)
    }

    /// Returns a field coerced to an integer.
    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(RawValue::as_i64)
    }

    /// Returns a field coerced to a float.
    #[must_use]
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(RawValue::as_f64)
    }

    /// Returns the unit recorded for a field, e.g. `°C` for `temperature`.
    #[must_use]
    pub fn unit(&self, key: &str) -> Option<&str> {
        self.get(&format!("{key}_unit")).and_then(RawValue::as_str)
    }

    /// Flags a field as needing a derived enum companion.
    pub fn mark_enumerable(&mut self, key: impl Into<String>) {
        self.enumerable.insert(key.into());
    }

    /// Returns `true` if the field was flagged as enumerable.
    #[must_use]
    pub fn is_enumerable(&self, key: &str) -> bool {
        self.enumerable.contains(key)
    }

    /// Number of fields, unit companions included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for RawFieldMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lax_integer_coercion() {
        assert_eq!(RawValue::Float(-60.0).as_i64(), Some(-60));
        assert_eq!(RawValue::Float(21.5).as_i64(), None);
        assert_eq!(RawValue::from("42").as_i64(), Some(42));
        assert_eq!(RawValue::from("42.0").as_i64(), Some(42));
        assert_eq!(RawValue::from("abc").as_i64(), None);
        assert_eq!(RawValue::Float(f64::NAN).as_i64(), None);
        assert_eq!(RawValue::Bool(true).as_i64(), None);
    }

    #[test]
    fn lax_float_coercion() {
        assert_eq!(RawValue::Int(40).as_f64(), Some(40.0));
        assert_eq!(RawValue::from("21.5").as_f64(), Some(21.5));
        assert_eq!(RawValue::from("warm").as_f64(), None);
    }

    #[test]
    fn lax_bool_coercion() {
        assert_eq!(RawValue::Int(1).as_bool(), Some(true));
        assert_eq!(RawValue::Int(2).as_bool(), None);
        assert_eq!(RawValue::from("Off").as_bool(), Some(false));
        assert_eq!(RawValue::from("maybe").as_bool(), None);
    }

    #[test]
    fn unit_lookup() {
        let mut map = RawFieldMap::new();
        map.insert("temperature", 21.5);
        map.insert("temperature_unit", "°C");
        assert_eq!(map.unit("temperature"), Some("°C"));
        assert_eq!(map.unit("humidity"), None);
    }

    #[test]
    fn clone_is_independent() {
        let mut original = RawFieldMap::new();
        original.insert("power", true);
        let mut copy = original.clone();
        copy.insert("power", false);
        assert_eq!(original.get_bool("power"), Some(true));
        assert_eq!(copy.get_bool("power"), Some(false));
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut map = RawFieldMap::new();
        map.insert("fan_speed", 45_i64);
        map.insert("operation_mode", "cycle");
        map.insert("power", true);
        map.mark_enumerable("fan_speed");
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"fan_speed": 45, "operation_mode": "cycle", "power": true})
        );
    }
}
