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

//! TPM collector.
//!
//! Probe order: the TPM instrumentation namespace, the PowerShell TPM
//! cmdlet (JSON with a key/value fallback), then the TPM command-line
//! tool's key/value report.

use crate::domain::collectors::{command_stdout, ProbeContext, POWERSHELL_TIMEOUT, PROBE_TIMEOUT};
use crate::domain::entities::TpmInfo;
use crate::domain::errors::{ProbeError, ProbeResult};
use crate::domain::merge::{merge_scalar_probes, FieldRecord, ScalarProbe};
use crate::domain::parsers::common::split_key_value;
use crate::domain::parsers::structured;

const SCHEMA: &[&str] = &["version", "status", "manufacturer"];

const PS_QUERY: &str = "Get-Tpm | ConvertTo-Json -Compress";

const PS_KEYS: &[&str] = &[
    "TpmPresent",
    "TpmReady",
    "TpmEnabled",
    "ManufacturerIdTxt",
    "ManufacturerVersion",
];

fn enabled_status(enabled: bool) -> &'static str {
    if enabled {
        "Enabled"
    } else {
        "Disabled"
    }
}

pub async fn collect(ctx: &ProbeContext) -> TpmInfo {
    let probes: Vec<(&'static str, ScalarProbe)> = vec![
        ("instrumentation", Box::pin(probe_instrumentation(ctx))),
        ("powershell", Box::pin(probe_powershell(ctx))),
        ("tpmtool", Box::pin(probe_tpmtool(ctx))),
    ];
    let mut merger = merge_scalar_probes("tpm", SCHEMA, probes).await;
    TpmInfo {
        version: merger.take("version"),
        status: merger.take("status"),
        manufacturer: merger.take("manufacturer"),
    }
}

async fn probe_instrumentation(ctx: &ProbeContext) -> ProbeResult<FieldRecord> {
    let tpms = ctx.instrumentation()?.tpm()?;
    let tpm = tpms
        .first()
        .ok_or_else(|| ProbeError::DecodeFailed("no TPM records".to_string()))?;
    let mut record = FieldRecord::new();
    if let Some(v) = tpm
        .spec_version
        .as_deref()
        .or(tpm.manufacturer_version.as_deref())
    {
        record.set("version", v);
    }
    if let Some(enabled) = tpm.is_enabled_initial_value {
        let activated = tpm.is_activated_initial_value.unwrap_or(enabled);
        record.set("status", enabled_status(enabled && activated));
    }
    if let Some(v) = &tpm.manufacturer_id_txt {
        record.set("manufacturer", v);
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
        .ok_or_else(|| ProbeError::DecodeFailed("unreadable TPM cmdlet output".to_string()))?;
    let mut record = FieldRecord::new();
    if let Some(v) = structured::string_field(obj, "ManufacturerVersion") {
        record.set("version", &v);
    }
    let enabled = structured::bool_field(obj, "TpmEnabled")
        .or_else(|| structured::bool_field(obj, "TpmReady"));
    if let Some(enabled) = enabled {
        record.set("status", enabled_status(enabled));
    }
    if let Some(v) = structured::string_field(obj, "ManufacturerIdTxt") {
        record.set("manufacturer", &v);
    }
    Ok(record)
}

async fn probe_tpmtool(ctx: &ProbeContext) -> ProbeResult<FieldRecord> {
    let output = command_stdout(ctx, "tpmtool", &["getdeviceinformation"], PROBE_TIMEOUT).await?;
    let mut record = FieldRecord::new();
    for line in output.lines() {
        let (key, value) = match split_key_value(line, ':') {
            Some(kv) => kv,
            None => continue,
        };
        let key = key.trim_start_matches('-');
        if key.eq_ignore_ascii_case("TPM Version") {
            record.set("version", value);
        } else if key.eq_ignore_ascii_case("TPM Present") {
            if let Ok(present) = value.to_ascii_lowercase().parse::<bool>() {
                record.set("status", enabled_status(present));
            }
        } else if key.eq_ignore_ascii_case("TPM Manufacturer") {
            record.set("manufacturer", value);
        }
    }
    if record.is_empty() {
        return Err(ProbeError::DecodeFailed(
            "no recognized TPM tool keys".to_string(),
        ));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collectors::support::*;
    use crate::domain::entities::UNAVAILABLE;
    use crate::ports::instrumentation::RawTpm;

    #[tokio::test]
    async fn instrumentation_record_maps_directly() {
        let instrumentation = StaticInstrumentation {
            tpm: Ok(vec![RawTpm {
                spec_version: Some("2.0, 0, 1.38".to_string()),
                is_enabled_initial_value: Some(true),
                is_activated_initial_value: Some(true),
                manufacturer_id_txt: Some("IFX".to_string()),
                manufacturer_version: Some("7.85".to_string()),
            }]),
            ..Default::default()
        };
        let ctx = context_with(ScriptedExecutor::new(), instrumentation);
        let info = collect(&ctx).await;
        assert_eq!(info.version, "2.0, 0, 1.38");
        assert_eq!(info.status, "Enabled");
        assert_eq!(info.manufacturer, "IFX");
    }

    #[tokio::test]
    async fn powershell_kv_fallback_reads_ready_flag() {
        let executor = ScriptedExecutor::new().respond(
            &format!("powershell -NoProfile -Command {PS_QUERY}"),
            "TpmPresent           : True\nTpmReady             : False\nManufacturerIdTxt    : STM\n",
        );
        let ctx = context_with_executor(executor);
        let info = collect(&ctx).await;
        assert_eq!(info.status, "Disabled");
        assert_eq!(info.manufacturer, "STM");
        // The kv fallback carries no version key.
        assert_eq!(info.version, UNAVAILABLE);
    }

    #[tokio::test]
    async fn tpmtool_is_the_last_resort() {
        let executor = ScriptedExecutor::new().respond(
            "tpmtool getdeviceinformation",
            "-TPM Present: True\n-TPM Version: 2.0\n-TPM Manufacturer: MSFT\n",
        );
        let ctx = context_with_executor(executor);
        let info = collect(&ctx).await;
        assert_eq!(info.version, "2.0");
        assert_eq!(info.status, "Enabled");
        assert_eq!(info.manufacturer, "MSFT");
    }
}
