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

//! Vendor heuristics: memory manufacturer inference from part numbers,
//! brand/model splitting, and disk media classification.

use crate::domain::entities::NOT_IDENTIFIED;

/// Placeholder strings firmware reports instead of a real manufacturer.
const GENERIC_MANUFACTURERS: &[&str] = &[
    "unknown",
    "not specified",
    "0000",
    "to be filled by o.e.m.",
];

/// Part-number substrings mapped to memory vendors, checked in order;
/// first match wins.
const PART_NUMBER_VENDORS: &[(&str, &str)] = &[
    ("KHX", "Kingston"),
    ("HX", "Kingston"),
    ("CMK", "Corsair"),
    ("CMW", "Corsair"),
    ("CM", "Corsair"),
    ("F4-", "G.Skill"),
    ("BLS", "Crucial"),
    ("CT", "Crucial"),
    ("AX4U", "ADATA XPG"),
    ("M378", "Samsung"),
    ("HMA", "Hynix"),
    ("HMP", "Hynix"),
    ("PVS", "Patriot Viper"),
    ("TED4", "Teamgroup Elite"),
];

pub const CPU_BRAND_TOKENS: &[&str] = &["Intel", "AMD"];
pub const GPU_BRAND_TOKENS: &[&str] = &["NVIDIA", "AMD", "Intel"];

/// Resolve a memory module's manufacturer.
///
/// A non-placeholder reported value is taken as-is. Otherwise the part
/// number is matched against the vendor table; no match yields the
/// "not identified" marker.
pub fn resolve_manufacturer(reported: Option<&str>, part_number: Option<&str>) -> String {
    if let Some(reported) = reported {
        let trimmed = reported.trim();
        if !trimmed.is_empty()
            && !GENERIC_MANUFACTURERS
                .iter()
                .any(|g| trimmed.eq_ignore_ascii_case(g))
        {
            return trimmed.to_string();
        }
    }
    if let Some(part) = part_number {
        let part = part.trim().to_ascii_uppercase();
        for (pattern, vendor) in PART_NUMBER_VENDORS {
            if part.contains(pattern) {
                return (*vendor).to_string();
            }
        }
    }
    NOT_IDENTIFIED.to_string()
}

/// Split a raw device name into `(brand, model)` against a token list.
///
/// The first token found (case-insensitive) becomes the brand, and its
/// first occurrence is removed from the model string. An unrecognized
/// vendor leaves the brand `None` and the model untouched.
pub fn split_brand_model(
    raw: &str,
    tokens: &'static [&'static str],
) -> (Option<&'static str>, String) {
    // ASCII case folding preserves byte offsets, so a match position in
    // the folded copy is a valid char boundary in the raw string.
    let lower = raw.to_ascii_lowercase();
    for token in tokens {
        if let Some(pos) = lower.find(&token.to_ascii_lowercase()) {
            let mut model = String::with_capacity(raw.len());
            model.push_str(&raw[..pos]);
            model.push_str(&raw[pos + token.len()..]);
            let model = model.split_whitespace().collect::<Vec<_>>().join(" ");
            return (Some(token), model);
        }
    }
    (None, raw.trim().to_string())
}

/// Classify a disk as "NVMe", "SSD", or "HDD" from its media type and
/// model string. NVMe is checked first since NVMe drives also read as
/// solid state.
pub fn classify_disk_type(media_type: Option<&str>, model: &str) -> &'static str {
    let media = media_type.unwrap_or("").to_lowercase();
    let model = model.to_lowercase();
    if media.contains("nvme") || model.contains("nvme") {
        "NVMe"
    } else if media.contains("ssd")
        || media.contains("solid state")
        || model.contains("ssd")
        || model.contains("solid state")
    {
        "SSD"
    } else {
        "HDD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_number_identifies_vendor_when_firmware_is_generic() {
        assert_eq!(
            resolve_manufacturer(Some("Unknown"), Some("KHX2666C16/16G")),
            "Kingston"
        );
        assert_eq!(
            resolve_manufacturer(Some("To Be Filled By O.E.M."), Some("F4-3200C16-16GVK")),
            "G.Skill"
        );
        assert_eq!(
            resolve_manufacturer(None, Some("CMK16GX4M2B3200C16")),
            "Corsair"
        );
    }

    #[test]
    fn real_manufacturer_is_kept_verbatim() {
        assert_eq!(
            resolve_manufacturer(Some("Micron Technology"), Some("KHX2666C16/16G")),
            "Micron Technology"
        );
    }

    #[test]
    fn unmatched_part_number_is_not_identified() {
        assert_eq!(resolve_manufacturer(Some("0000"), Some("XYZ123")), NOT_IDENTIFIED);
        assert_eq!(resolve_manufacturer(None, None), NOT_IDENTIFIED);
    }

    #[test]
    fn brand_token_is_stripped_from_model() {
        let (brand, model) =
            split_brand_model("Intel(R) Core(TM) i7-9700 CPU @ 3.00GHz", CPU_BRAND_TOKENS);
        assert_eq!(brand, Some("Intel"));
        assert_eq!(model, "(R) Core(TM) i7-9700 CPU @ 3.00GHz");

        let (brand, model) = split_brand_model("NVIDIA GeForce RTX 3080", GPU_BRAND_TOKENS);
        assert_eq!(brand, Some("NVIDIA"));
        assert_eq!(model, "GeForce RTX 3080");
    }

    #[test]
    fn non_ascii_names_neither_panic_nor_lose_bytes() {
        // U+212A (KELVIN SIGN) shrinks under full Unicode lowercasing;
        // the splitter must stay on char boundaries and remove only the
        // brand token.
        let (brand, model) = split_brand_model("\u{212A}\u{212A} AMD Ryzen", CPU_BRAND_TOKENS);
        assert_eq!(brand, Some("AMD"));
        assert_eq!(model, "\u{212A}\u{212A} Ryzen");

        let (brand, model) = split_brand_model("\u{212A} AMD", CPU_BRAND_TOKENS);
        assert_eq!(brand, Some("AMD"));
        assert_eq!(model, "\u{212A}");
    }

    #[test]
    fn unknown_vendor_keeps_full_string_as_model() {
        let (brand, model) = split_brand_model("Qualcomm Snapdragon X", CPU_BRAND_TOKENS);
        assert_eq!(brand, None);
        assert_eq!(model, "Qualcomm Snapdragon X");
    }

    #[test]
    fn disk_classification_prefers_nvme() {
        assert_eq!(
            classify_disk_type(Some("Fixed hard disk media"), "Samsung SSD 970 EVO NVMe"),
            "NVMe"
        );
        assert_eq!(classify_disk_type(Some("SSD"), "Crucial MX500"), "SSD");
        assert_eq!(
            classify_disk_type(Some("Fixed hard disk media"), "WDC WD10EZEX"),
            "HDD"
        );
        assert_eq!(classify_disk_type(None, "Samsung SSD 860 EVO"), "SSD");
    }
}
