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

//! Wi-Fi collector.
//!
//! The instrumentation path identifies the wireless adapter and maps its
//! numeric connection-status code; only the wlan status command knows the
//! SSID, and it reports one only while connected.

use crate::domain::collectors::{command_stdout, ProbeContext, POWERSHELL_TIMEOUT, PROBE_TIMEOUT};
use crate::domain::entities::WifiInfo;
use crate::domain::errors::{ProbeError, ProbeResult};
use crate::domain::merge::{merge_scalar_probes, FieldRecord, ScalarProbe};
use crate::domain::parsers::common::split_key_value;
use crate::domain::parsers::structured;

const SCHEMA: &[&str] = &["adapter_name", "adapter_status", "connected_ssid"];

const PS_QUERY: &str = "Get-NetAdapter -Physical | \
     Where-Object { $_.InterfaceDescription -match 'Wireless|Wi-Fi|802.11' } | \
     Select-Object -First 1 Name,InterfaceDescription,Status | ConvertTo-Json -Compress";

const PS_KEYS: &[&str] = &["Name", "InterfaceDescription", "Status"];

/// Win32_NetworkAdapter.NetConnectionStatus code to text.
fn connection_status_text(code: u16) -> Option<&'static str> {
    Some(match code {
        0 => "Disconnected",
        1 => "Connecting",
        2 => "Connected",
        3 => "Disconnecting",
        4 => "Hardware not present",
        5 => "Hardware disabled",
        6 => "Hardware malfunction",
        7 => "Media disconnected",
        8 => "Authenticating",
        9 => "Authentication succeeded",
        10 => "Authentication failed",
        11 => "Invalid address",
        12 => "Credentials required",
        _ => return None,
    })
}

fn is_wireless(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("wireless") || lower.contains("wi-fi") || lower.contains("802.11")
}

pub async fn collect(ctx: &ProbeContext) -> WifiInfo {
    let probes: Vec<(&'static str, ScalarProbe)> = vec![
        ("instrumentation", Box::pin(probe_instrumentation(ctx))),
        ("netsh", Box::pin(probe_netsh(ctx))),
        ("powershell", Box::pin(probe_powershell(ctx))),
    ];
    let mut merger = merge_scalar_probes("wifi", SCHEMA, probes).await;
    WifiInfo {
        adapter_name: merger.take("adapter_name"),
        adapter_status: merger.take("adapter_status"),
        connected_ssid: merger.take("connected_ssid"),
    }
}

async fn probe_instrumentation(ctx: &ProbeContext) -> ProbeResult<FieldRecord> {
    let adapters = ctx.instrumentation()?.network_adapters()?;
    let adapter = adapters
        .iter()
        .find(|a| {
            a.name.as_deref().is_some_and(is_wireless)
                || a.description.as_deref().is_some_and(is_wireless)
        })
        .ok_or_else(|| ProbeError::DecodeFailed("no wireless adapter".to_string()))?;
    let mut record = FieldRecord::new();
    if let Some(name) = adapter.name.as_deref().or(adapter.description.as_deref()) {
        record.set("adapter_name", name);
    }
    if let Some(status) = adapter.net_connection_status.and_then(connection_status_text) {
        record.set("adapter_status", status);
    }
    Ok(record)
}

async fn probe_netsh(ctx: &ProbeContext) -> ProbeResult<FieldRecord> {
    let output = command_stdout(
        ctx,
        "netsh",
        &["wlan", "show", "interfaces"],
        PROBE_TIMEOUT,
    )
    .await?;
    let mut record = FieldRecord::new();
    let mut state: Option<String> = None;
    let mut ssid: Option<String> = None;
    for line in output.lines() {
        let (key, value) = match split_key_value(line, ':') {
            Some(kv) => kv,
            None => continue,
        };
        if key.eq_ignore_ascii_case("Name") {
            record.set("adapter_name", value);
        } else if key.eq_ignore_ascii_case("State") {
            state = Some(value.to_string());
        } else if key.eq_ignore_ascii_case("SSID") {
            ssid = Some(value.to_string());
        }
    }
    if let Some(state) = state {
        record.set("adapter_status", &state);
        if state.eq_ignore_ascii_case("connected") {
            if let Some(ssid) = ssid {
                record.set("connected_ssid", &ssid);
            }
        } else {
            record.set("connected_ssid", "not connected");
        }
    }
    if record.is_empty() {
        return Err(ProbeError::DecodeFailed(
            "no wlan interface block".to_string(),
        ));
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
        .ok_or_else(|| ProbeError::DecodeFailed("no wireless adapters".to_string()))?;
    let mut record = FieldRecord::new();
    let name = structured::string_field(obj, "Name")
        .or_else(|| structured::string_field(obj, "InterfaceDescription"));
    if let Some(name) = name {
        record.set("adapter_name", &name);
    }
    if let Some(status) = structured::string_field(obj, "Status") {
        record.set("adapter_status", &status);
    }
    Ok(record)
}
