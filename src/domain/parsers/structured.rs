/*
Copyright 2025 the hwsnap authors

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Decoding of PowerShell probe output.
//!
//! `ConvertTo-Json` emits one object or an array depending on result count,
//! and some cmdlets fall back to `key : value` text when JSON formatting is
//! not available. Both shapes decode into the same map form.

use serde_json::{Map, Value};

/// Decode PowerShell output into a list of objects.
///
/// Tries JSON first (accepting a lone object as a one-element list). When
/// the payload is not JSON, falls back to `key : value` line parsing,
/// keeping only keys named in `known_keys` so prompt noise and progress
/// lines don't leak into the record.
pub fn parse_objects(raw: &str, known_keys: &[&str]) -> Vec<Map<String, Value>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return match value {
            Value::Object(obj) => vec![obj],
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(obj) => Some(obj),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
    }

    let mut obj = Map::new();
    for line in trimmed.lines() {
        if let Some((key, value)) = super::common::split_key_value(line, ':') {
            if known_keys.iter().any(|k| k.eq_ignore_ascii_case(key)) {
                obj.insert(key.to_string(), Value::String(value.to_string()));
            }
        }
    }
    if obj.is_empty() {
        Vec::new()
    } else {
        vec![obj]
    }
}

/// Case-insensitive string field lookup, stringifying numbers and booleans.
pub fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    let value = obj
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)?;
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric field that may arrive as a JSON number or a numeric string
/// (64-bit counters are stringly typed on some interfaces).
pub fn u64_field(obj: &Map<String, Value>, key: &str) -> Option<u64> {
    match obj.iter().find(|(k, _)| k.eq_ignore_ascii_case(key))?.1 {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Boolean field that may arrive as a JSON bool or "True"/"False" text.
pub fn bool_field(obj: &Map<String, Value>, key: &str) -> Option<bool> {
    match obj.iter().find(|(k, _)| k.eq_ignore_ascii_case(key))?.1 {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
