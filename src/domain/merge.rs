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

//! Monotonic field-level merging of probe outputs.
//!
//! Each category runs a fixed, ordered list of probes. A probe returns a
//! [`FieldRecord`] holding only the fields it actually resolved; the
//! [`FieldMerger`] folds those records together under a non-overwriting rule
//! and stops consuming probes once every field in the schema is resolved.
//! Probe failure is data, not control flow: a failed probe simply
//! contributes nothing.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use log::debug;

use crate::domain::entities::UNAVAILABLE;
use crate::domain::errors::ProbeResult;
use crate::domain::parsers::common::normalize_whitespace;

/// Partial output of one probe: field name to resolved value.
///
/// Empty and "unavailable" values are never stored, so absence of a key is
/// the single "unresolved" state.
#[derive(Debug, Default, Clone)]
pub struct FieldRecord {
    fields: BTreeMap<&'static str, String>,
}

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolved value. Blank or "unavailable" input is dropped,
    /// keeping the record free of sentinel-shaped values.
    pub fn set(&mut self, field: &'static str, value: &str) {
        let trimmed = value.trim();
        if !trimmed.is_empty() && trimmed != UNAVAILABLE {
            self.fields.insert(field, trimmed.to_string());
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Accumulator for one category's scalar fields.
///
/// The merge is monotonic: once a field is resolved, later probes cannot
/// replace it, not even with another valid value.
#[derive(Debug)]
pub struct FieldMerger {
    schema: &'static [&'static str],
    resolved: BTreeMap<&'static str, String>,
}

impl FieldMerger {
    pub fn new(schema: &'static [&'static str]) -> Self {
        Self {
            schema,
            resolved: BTreeMap::new(),
        }
    }

    /// Fold one probe's output into the accumulator. Fields outside the
    /// schema are ignored; already-resolved fields are kept.
    pub fn absorb(&mut self, record: FieldRecord) {
        for (field, value) in record.fields {
            if self.schema.contains(&field) {
                self.resolved.entry(field).or_insert(value);
            }
        }
    }

    /// True once every schema field holds a value.
    pub fn is_complete(&self) -> bool {
        self.schema
            .iter()
            .all(|field| self.resolved.contains_key(field))
    }

    /// Extract a field for the final record, rendering unresolved fields as
    /// the "unavailable" marker.
    pub fn take(&mut self, field: &str) -> String {
        self.resolved
            .remove(field)
            .unwrap_or_else(|| UNAVAILABLE.to_string())
    }
}

/// A probe future producing a scalar field record.
pub type ScalarProbe<'a> = Pin<Box<dyn Future<Output = ProbeResult<FieldRecord>> + 'a>>;

/// A probe future producing a list of device entities.
pub type ListProbe<'a, T> = Pin<Box<dyn Future<Output = ProbeResult<Vec<T>>> + 'a>>;

/// Ordered-fallback combinator for scalar categories.
///
/// Probes run strictly in order. Once the schema is complete the remaining
/// probe futures are dropped unpolled, so their probe bodies never execute.
pub async fn merge_scalar_probes(
    category: &str,
    schema: &'static [&'static str],
    probes: Vec<(&'static str, ScalarProbe<'_>)>,
) -> FieldMerger {
    let mut merger = FieldMerger::new(schema);
    for (source, probe) in probes {
        if merger.is_complete() {
            break;
        }
        match probe.await {
            Ok(record) => merger.absorb(record),
            Err(err) => debug!("{category}: {source} probe yielded nothing: {err}"),
        }
    }
    merger
}

/// An entity in a list category (disk, GPU).
pub trait DeviceEntity {
    /// Normalized key deciding whether two probe-reported entities are the
    /// same physical device. No fuzzy matching: keys are equal or not.
    fn identity_key(&self) -> String;

    /// Copy fields the other entity resolved and this one did not.
    fn fill_missing_from(&mut self, other: &Self);
}

/// Trim and collapse whitespace, lowercase. Identity keys are compared
/// with plain equality after this normalization.
pub fn normalize_identity(raw: &str) -> String {
    normalize_whitespace(raw).to_ascii_lowercase()
}

/// Fill an exported field in place, honoring the monotonic rule.
pub fn fill_field(dst: &mut String, src: &str) {
    if dst == UNAVAILABLE && src != UNAVAILABLE {
        *dst = src.to_string();
    }
}

/// Merge one probe's entities into the accumulated list: matched identity
/// keys merge field-by-field, unmatched entities append in probe order.
pub fn merge_device_list<T: DeviceEntity>(merged: &mut Vec<T>, incoming: Vec<T>) {
    for device in incoming {
        let key = device.identity_key();
        match merged.iter_mut().find(|d| d.identity_key() == key) {
            Some(existing) => existing.fill_missing_from(&device),
            None => merged.push(device),
        }
    }
}

/// Combinator for list categories. Unlike the scalar path there is no early
/// exit: every probe runs, so later sources can fill gaps in matched
/// entities.
pub async fn merge_list_probes<T: DeviceEntity>(
    category: &str,
    probes: Vec<(&'static str, ListProbe<'_, T>)>,
) -> Vec<T> {
    let mut merged = Vec::new();
    for (source, probe) in probes {
        match probe.await {
            Ok(found) => merge_device_list(&mut merged, found),
            Err(err) => debug!("{category}: {source} probe yielded nothing: {err}"),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ProbeError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    const SCHEMA: &[&str] = &["manufacturer", "model"];

    fn record(pairs: &[(&'static str, &str)]) -> FieldRecord {
        let mut r = FieldRecord::new();
        for (field, value) in pairs {
            r.set(field, value);
        }
        r
    }

    #[test]
    fn blank_values_are_not_stored() {
        let r = record(&[("manufacturer", "  "), ("model", "")]);
        assert!(r.is_empty());
    }

    #[test]
    fn merge_is_monotonic_forward() {
        let mut merger = FieldMerger::new(SCHEMA);
        merger.absorb(record(&[("manufacturer", "ASUSTeK")]));
        merger.absorb(record(&[("manufacturer", "")]));
        assert_eq!(merger.take("manufacturer"), "ASUSTeK");
    }

    #[test]
    fn merge_is_monotonic_reverse() {
        let mut merger = FieldMerger::new(SCHEMA);
        merger.absorb(record(&[("manufacturer", "")]));
        merger.absorb(record(&[("manufacturer", "Gigabyte")]));
        assert_eq!(merger.take("manufacturer"), "Gigabyte");
    }

    #[test]
    fn first_resolved_value_wins_over_later_valid_values() {
        let mut merger = FieldMerger::new(SCHEMA);
        merger.absorb(record(&[("model", "PRIME Z390-A")]));
        merger.absorb(record(&[("model", "PRIME Z390-A (Rev 1.0)")]));
        assert_eq!(merger.take("model"), "PRIME Z390-A");
    }

    #[test]
    fn unresolved_fields_render_as_unavailable() {
        let mut merger = FieldMerger::new(SCHEMA);
        merger.absorb(record(&[("manufacturer", "MSI")]));
        assert!(!merger.is_complete());
        assert_eq!(merger.take("model"), UNAVAILABLE);
        assert_ne!(merger.take("manufacturer"), "");
    }

    #[tokio::test]
    async fn probe_failure_is_skipped_not_fatal() {
        let probes: Vec<(&'static str, ScalarProbe)> = vec![
            (
                "first",
                Box::pin(async { Err(ProbeError::InterfaceUnavailable("missing".into())) }),
            ),
            (
                "second",
                Box::pin(async { Ok(record(&[("manufacturer", "MSI"), ("model", "B550")])) }),
            ),
        ];
        let mut merger = merge_scalar_probes("test", SCHEMA, probes).await;
        assert_eq!(merger.take("manufacturer"), "MSI");
        assert_eq!(merger.take("model"), "B550");
    }

    #[tokio::test]
    async fn later_probes_never_run_after_early_exit() {
        let invoked = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&invoked);
        let probes: Vec<(&'static str, ScalarProbe)> = vec![
            (
                "first",
                Box::pin(async {
                    Ok(record(&[("manufacturer", "ASUSTeK"), ("model", "PRIME")]))
                }),
            ),
            (
                "second",
                Box::pin(async move {
                    flag.store(true, Ordering::SeqCst);
                    Ok(record(&[("manufacturer", "late")]))
                }),
            ),
        ];
        let merger = merge_scalar_probes("test", SCHEMA, probes).await;
        assert!(merger.is_complete());
        assert!(!invoked.load(Ordering::SeqCst));
    }

    #[test]
    fn identity_normalization_collapses_case_and_whitespace() {
        assert_eq!(
            normalize_identity("  Samsung   SSD 970  EVO "),
            normalize_identity("samsung ssd 970 evo")
        );
    }
}
