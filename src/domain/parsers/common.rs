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

//! Shared text helpers used across the format-specific parsers.

/// Split a `key<sep>value` line, trimming both sides. Returns `None` when
/// the separator is absent or the key is blank.
pub fn split_key_value<'a>(line: &'a str, sep: char) -> Option<(&'a str, &'a str)> {
    let (key, value) = line.split_once(sep)?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Collapse runs of whitespace into single spaces.
pub fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render a byte count as gigabytes with two decimals, the display format
/// used for every capacity field in the exported records.
pub fn bytes_to_gb(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / 1024.0 / 1024.0 / 1024.0)
}

/// Parse a decimal byte count (as interfaces report 64-bit counters: a
/// numeric string) into the gigabyte display format.
pub fn parse_gb_field(raw: &str) -> Option<String> {
    raw.trim().parse::<u64>().ok().map(bytes_to_gb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_key_value_trims_both_sides() {
        assert_eq!(
            split_key_value("    SSID                   : corpnet", ':'),
            Some(("SSID", "corpnet"))
        );
        assert_eq!(split_key_value("no separator here", ':'), None);
        assert_eq!(split_key_value("   : orphan value", ':'), None);
    }

    #[test]
    fn byte_counts_render_as_gigabytes() {
        assert_eq!(bytes_to_gb(17179869184), "16.00 GB");
        assert_eq!(parse_gb_field("500107862016").as_deref(), Some("465.76 GB"));
        assert_eq!(parse_gb_field("not a number"), None);
    }

    #[test]
    fn whitespace_normalization() {
        assert_eq!(
            normalize_whitespace("  Intel(R)  Core(TM)   i7 "),
            "Intel(R) Core(TM) i7"
        );
    }
}
