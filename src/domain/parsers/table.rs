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

//! Fixed-width table decoding for `wmic` output.
//!
//! `wmic` prints a header line and pads every column to a fixed width, so
//! values (which may themselves contain spaces) are recovered by slicing
//! data rows at the byte offsets where the requested header keywords start.

use crate::domain::merge::FieldRecord;

/// Decode a fixed-width table into one [`FieldRecord`] per data row.
///
/// `columns` maps a header keyword to the record field it fills. Keywords
/// are located case-insensitively in the header line; a keyword that does
/// not appear is skipped. Each column runs from its keyword's offset to the
/// next requested keyword's offset (or the end of the row). Keywords whose
/// header spellings overlap as substrings would collide on offset; the
/// keyword sets used here don't overlap.
pub fn parse_columns(output: &str, columns: &[(&str, &'static str)]) -> Vec<FieldRecord> {
    let mut lines = output.lines().filter(|l| !l.trim().is_empty());
    let header = match lines.next() {
        Some(h) => h,
        None => return Vec::new(),
    };
    let header_lower = header.to_lowercase();

    let mut offsets: Vec<(usize, &'static str)> = columns
        .iter()
        .filter_map(|(keyword, field)| {
            header_lower
                .find(&keyword.to_lowercase())
                .map(|start| (start, *field))
        })
        .collect();
    offsets.sort_by_key(|(start, _)| *start);
    if offsets.is_empty() {
        return Vec::new();
    }

    let mut records = Vec::new();
    for line in lines {
        let mut record = FieldRecord::new();
        for (i, (start, field)) in offsets.iter().enumerate() {
            let end = offsets
                .get(i + 1)
                .map(|(next, _)| *next)
                .unwrap_or(line.len());
            // get() rather than indexing: rows shorter than the header or
            // offsets landing mid-codepoint must not panic.
            if let Some(slice) = line.get(*start..end.min(line.len())) {
                record.set(field, slice);
            }
        }
        if !record.is_empty() {
            records.push(record);
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASEBOARD: &str = "\
Manufacturer                Product       SerialNumber\r
ASUSTeK COMPUTER INC.       PRIME Z390-A  190432811403274\r
";

    #[test]
    fn slices_values_at_header_offsets() {
        let records = parse_columns(
            BASEBOARD,
            &[
                ("manufacturer", "manufacturer"),
                ("product", "model"),
                ("serialnumber", "serial_number"),
            ],
        );
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].get("manufacturer"),
            Some("ASUSTeK COMPUTER INC.")
        );
        assert_eq!(records[0].get("model"), Some("PRIME Z390-A"));
        assert_eq!(records[0].get("serial_number"), Some("190432811403274"));
    }

    #[test]
    fn values_with_internal_spaces_survive() {
        let output = "\
Capacity     Manufacturer   PartNumber        Speed
17179869184  Unknown        KHX2666C16/16G    2666
";
        let records = parse_columns(
            output,
            &[
                ("capacity", "capacity"),
                ("manufacturer", "manufacturer"),
                ("partnumber", "part_number"),
                ("speed", "speed"),
            ],
        );
        assert_eq!(records[0].get("part_number"), Some("KHX2666C16/16G"));
        assert_eq!(records[0].get("speed"), Some("2666"));
    }

    #[test]
    fn absent_keyword_is_skipped() {
        let records = parse_columns(
            BASEBOARD,
            &[("product", "model"), ("nosuchcolumn", "ghost")],
        );
        // With no requested column to its right, the found column runs to
        // the end of the row.
        assert_eq!(
            records[0].get("model"),
            Some("PRIME Z390-A  190432811403274")
        );
        assert_eq!(records[0].get("ghost"), None);
    }

    #[test]
    fn short_rows_do_not_panic() {
        let output = "\
Model                Size
Samsung SSD 970 EVO
";
        let records = parse_columns(output, &[("model", "model"), ("size", "size")]);
        assert_eq!(records[0].get("model"), Some("Samsung SSD 970 EVO"));
        assert_eq!(records[0].get("size"), None);
    }

    #[test]
    fn empty_output_yields_no_records() {
        assert!(parse_columns("", &[("model", "model")]).is_empty());
        assert!(parse_columns("\r\n\r\n", &[("model", "model")]).is_empty());
    }
}
