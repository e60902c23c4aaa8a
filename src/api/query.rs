// EditionGuard SDK - Rust client for the EditionGuard API
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Query parameter handling
//!
//! The EditionGuard API takes nearly all of its arguments as query parameters,
//! including nested lists such as `book_list`. Parameters are kept as a JSON
//! object ([`Params`]) until they hit the wire, where they are flattened the
//! way PHP's `http_build_query` does it with RFC 3986 escaping:
//!
//! ```text
//! {"email": "a b@x.io", "book_list": [{"resource_id": "r1", "quantity": 3}], "flag": true}
//! => email=a%20b%40x.io&book_list%5B0%5D%5Bresource_id%5D=r1&book_list%5B0%5D%5Bquantity%5D=3&flag=1
//! ```
//!
//! # Merge Rule
//! Computed defaults go in first, caller-supplied optional parameters second.
//! A key present in both ends up with the caller's value.

use crate::error::{EditionGuardError, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Caller-supplied query parameters
pub type Params = Map<String, Value>;

/// Merge caller `optional` parameters on top of `defaults`
pub fn merge(mut defaults: Params, optional: &Params) -> Params {
    for (key, value) in optional {
        defaults.insert(key.clone(), value.clone());
    }
    defaults
}

/// Convert any serializable struct or map into [`Params`]
///
/// # Errors
/// Returns `InvalidInput` if the value does not serialize to a JSON object.
pub fn to_params<T: Serialize + ?Sized>(value: &T) -> Result<Params> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(EditionGuardError::invalid_input(format!(
            "query parameters must be an object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(EditionGuardError::invalid_input(format!(
            "query parameters could not be serialized: {}",
            e
        ))),
    }
}

/// Flatten parameters into `(key, value)` pairs
///
/// Nested arrays and objects become bracketed keys, `null` values are
/// dropped, booleans become `1` / `0`.
pub fn to_pairs(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        flatten(key.clone(), value, &mut pairs);
    }
    pairs
}

/// Encode parameters as a query string (without the leading `?`)
///
/// Returns an empty string for empty parameters.
pub fn encode(params: &Params) -> String {
    to_pairs(params)
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn flatten(key: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((key, if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => out.push((key, n.to_string())),
        Value::String(s) => out.push((key, s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(format!("{}[{}]", key, index), item, out);
            }
        }
        Value::Object(map) => {
            for (name, item) in map {
                flatten(format!("{}[{}]", key, name), item, out);
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
