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

//! Bluetooth collector.
//!
//! The radio is found by name among plug-and-play entities; a reported
//! "OK" status is rendered as "Active", anything else passes through.

use crate::domain::collectors::{command_stdout, ProbeContext, POWERSHELL_TIMEOUT, PROBE_TIMEOUT};
use crate::domain::entities::BluetoothInfo;
use crate::domain::errors::{ProbeError, ProbeResult};
use crate::domain::merge::{merge_scalar_probes, FieldRecord, ScalarProbe};
use crate::domain::parsers::{structured, table};

const SCHEMA: &[&str] = &["device_name", "device_status"];

const PS_QUERY: &str = "Get-PnpDevice -Class Bluetooth | \
     Select-Object FriendlyName,Status | ConvertTo-Json -Compress";

const PS_KEYS: &[&str] = &["FriendlyName", "Status"];

fn display_status(raw: &str) -> String {
    if raw.trim().eq_ignore_ascii_case("ok") {
        "Active".to_string()
    } else {
        raw.trim().to_string()
    }
}

fn is_bluetooth(text: &str) -> bool {
    text.to_lowercase().contains("bluetooth")
}

pub async fn collect(ctx: &ProbeContext) -> BluetoothInfo {
    let probes: Vec<(&'static str, ScalarProbe)> = vec![
        ("instrumentation", Box::pin(probe_instrumentation(ctx))),
        ("wmic", Box::pin(probe_wmic(ctx))),
        ("powershell", Box::pin(probe_powershell(ctx))),
    ];
    let mut merger = merge_scalar_probes("bluetooth", SCHEMA, probes).await;
    BluetoothInfo {
        device_name: merger.take("device_name"),
        device_status: merger.take("device_status"),
    }
}

async fn probe_instrumentation(ctx: &ProbeContext) -> ProbeResult<FieldRecord> {
    let entities = ctx.instrumentation()?.pnp_entities()?;
    let radio = entities
        .iter()
        .find(|e| {
            e.name.as_deref().is_some_and(is_bluetooth)
                || e.description.as_deref().is_some_and(is_bluetooth)
        })
        .ok_or_else(|| ProbeError::DecodeFailed("no bluetooth entity".to_string()))?;
    let mut record = FieldRecord::new();
    if let Some(name) = radio.name.as_deref().or(radio.description.as_deref()) {
        record.set("device_name", name);
    }
    if let Some(status) = &radio.status {
        record.set("device_status", &display_status(status));
    }
    Ok(record)
}

async fn probe_wmic(ctx: &ProbeContext) -> ProbeResult<FieldRecord> {
    let output = command_stdout(
        ctx,
        "wmic",
        &[
            "path",
            "Win32_PnPEntity",
            "where",
            "Name like '%Bluetooth%'",
            "get",
            "name,status",
        ],
        PROBE_TIMEOUT,
    )
    .await?;
    let rows = table::parse_columns(&output, &[("name", "name"), ("status", "status")]);
    let row = rows
        .first()
        .ok_or_else(|| ProbeError::DecodeFailed("no bluetooth rows".to_string()))?;
    let mut record = FieldRecord::new();
    if let Some(name) = row.get("name") {
        record.set("device_name", name);
    }
    if let Some(status) = row.get("status") {
        record.set("device_status", &display_status(status));
    }
    Ok(record)
}

async fn probe_powershell(ctx: &ProbeContext) -> ProbeResult<FieldRecord> {
    let output = command_stdout(
        ctx,
        "powershell",
        &["-NoProfile", "-Command", PS_QUERY],
        POWERSHELL_TIMEOUT,
    )
    .await?;
    let objects = structured::parse_objects(&output, PS_KEYS);
    let obj = objects
        .first()
        .ok_or_else(|| ProbeError::DecodeFailed("no bluetooth devices".to_string()))?;
    let mut record = FieldRecord::new();
    if let Some(name) = structured::string_field(obj, "FriendlyName") {
        record.set("device_name", &name);
    }
    if let Some(status) = structured::string_field(obj, "Status") {
        record.set("device_status", &display_status(&status));
    }
    Ok(record)
}
