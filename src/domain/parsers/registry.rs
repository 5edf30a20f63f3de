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

//! Decoding of `reg query` output.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "    BaseBoardProduct    REG_SZ    PRIME Z390-A"
    static ref REG_VALUE_RE: Regex =
        Regex::new(r"^\s*(\S+)\s+(REG_[A-Z_]+)\s+(.*)$").unwrap();
}

/// One value line from `reg query` output.
#[derive(Debug, Clone, PartialEq)]
pub struct RegValue {
    pub name: String,
    pub value_type: String,
    pub data: String,
}

/// Parse every value line in `reg query` output. Key-path lines and blank
/// lines are skipped; value data is trimmed.
pub fn parse_reg_values(output: &str) -> Vec<RegValue> {
    output
        .lines()
        .filter_map(|line| {
            REG_VALUE_RE.captures(line).map(|caps| RegValue {
                name: caps[1].to_string(),
                value_type: caps[2].to_string(),
                data: caps[3].trim().to_string(),
            })
        })
        .collect()
}

/// Look up one named value, case-insensitively.
pub fn reg_value<'a>(values: &'a [RegValue], name: &str) -> Option<&'a str> {
    values
        .iter()
        .find(|v| v.name.eq_ignore_ascii_case(name))
        .map(|v| v.data.as_str())
}
