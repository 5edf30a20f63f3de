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

//! GPU collector (list category).
//!
//! The brand token is stripped from the controller name before the model
//! becomes the identity key, so the same adapter reported as
//! "NVIDIA GeForce RTX 3080" and "GeForce RTX 3080" still deduplicates.

use crate::domain::collectors::{command_stdout, ProbeContext, POWERSHELL_TIMEOUT, PROBE_TIMEOUT};
use crate::domain::entities::{or_unavailable, GpuDevice};
use crate::domain::errors::{ProbeError, ProbeResult};
use crate::domain::merge::{
    fill_field, merge_list_probes, normalize_identity, DeviceEntity, ListProbe,
};
use crate::domain::parsers::common::bytes_to_gb;
use crate::domain::parsers::{structured, table};
use crate::domain::vendors::{split_brand_model, GPU_BRAND_TOKENS};

const PS_QUERY: &str = "Get-CimInstance Win32_VideoController | \
     Select-Object Name,AdapterRAM | ConvertTo-Json -Compress";

const PS_KEYS: &[&str] = &["Name", "AdapterRAM"];

impl DeviceEntity for GpuDevice {
    fn identity_key(&self) -> String {
        normalize_identity(&self.model)
    }

    fn fill_missing_from(&mut self, other: &Self) {
        fill_field(&mut self.brand, &other.brand);
        fill_field(&mut self.vram, &other.vram);
    }
}

pub async fn collect(ctx: &ProbeContext) -> Vec<GpuDevice> {
    let probes: Vec<(&'static str, ListProbe<GpuDevice>)> = vec![
        ("instrumentation", Box::pin(probe_instrumentation(ctx))),
        ("wmic", Box::pin(probe_wmic(ctx))),
        ("powershell", Box::pin(probe_powershell(ctx))),
    ];
    merge_list_probes("gpus", probes).await
}

fn device_from_name(name: &str, vram_bytes: Option<u64>) -> Option<GpuDevice> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let (brand, model) = split_brand_model(name, GPU_BRAND_TOKENS);
    Some(GpuDevice {
        model,
        brand: or_unavailable(brand.map(str::to_string)),
        vram: or_unavailable(vram_bytes.filter(|b| *b > 0).map(bytes_to_gb)),
    })
}

async fn probe_instrumentation(ctx: &ProbeContext) -> ProbeResult<Vec<GpuDevice>> {
    let controllers = ctx.instrumentation()?.video_controllers()?;
    let gpus: Vec<GpuDevice> = controllers
        .iter()
        .filter_map(|c| device_from_name(c.name.as_deref()?, c.adapter_ram))
        .collect();
    if gpus.is_empty() {
        return Err(ProbeError::DecodeFailed(
            "no video controller records".to_string(),
        ));
    }
    Ok(gpus)
}

async fn probe_wmic(ctx: &ProbeContext) -> ProbeResult<Vec<GpuDevice>> {
    let output = command_stdout(
        ctx,
        "wmic",
        &["path", "win32_videocontroller", "get", "adapterram,name"],
        PROBE_TIMEOUT,
    )
    .await?;
    let rows = table::parse_columns(&output, &[("adapterram", "adapter_ram"), ("name", "name")]);
    let gpus: Vec<GpuDevice> = rows
        .iter()
        .filter_map(|row| {
            let vram = row.get("adapter_ram").and_then(|v| v.parse().ok());
            device_from_name(row.get("name")?, vram)
        })
        .collect();
    if gpus.is_empty() {
        return Err(ProbeError::DecodeFailed(
            "no video controller rows".to_string(),
        ));
    }
    Ok(gpus)
}

async fn probe_powershell(ctx: &ProbeContext) -> ProbeResult<Vec<GpuDevice>> {
    let output = command_stdout(
        ctx,
        "powershell",
        &["-NoProfile", "-Command", PS_QUERY],
        POWERSHELL_TIMEOUT,
    )
    .await?;
    let gpus: Vec<GpuDevice> = structured::parse_objects(&output, PS_KEYS)
        .iter()
        .filter_map(|obj| {
            let name = structured::string_field(obj, "Name")?;
            device_from_name(&name, structured::u64_field(obj, "AdapterRAM"))
        })
        .collect();
    if gpus.is_empty() {
        return Err(ProbeError::DecodeFailed(
            "no video controller objects".to_string(),
        ));
    }
    Ok(gpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collectors::support::*;
    use crate::domain::entities::UNAVAILABLE;
    use crate::ports::instrumentation::RawVideoController;

    #[tokio::test]
    async fn brand_is_split_and_vram_formatted() {
        let instrumentation = StaticInstrumentation {
            video_controllers: Ok(vec![RawVideoController {
                name: Some("NVIDIA GeForce RTX 3080".to_string()),
                adapter_ram: Some(10737418240),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let ctx = context_with(ScriptedExecutor::new(), instrumentation);
        let gpus = collect(&ctx).await;
        assert_eq!(gpus.len(), 1);
        assert_eq!(gpus[0].brand, "NVIDIA");
        assert_eq!(gpus[0].model, "GeForce RTX 3080");
        assert_eq!(gpus[0].vram, "10.00 GB");
    }

    #[tokio::test]
    async fn later_probes_fill_vram_for_the_same_adapter() {
        let instrumentation = StaticInstrumentation {
            video_controllers: Ok(vec![RawVideoController {
                name: Some("Intel UHD Graphics 630".to_string()),
                adapter_ram: None,
                ..Default::default()
            }]),
            ..Default::default()
        };
        let executor = ScriptedExecutor::new().respond(
            "wmic path win32_videocontroller get adapterram,name",
            "AdapterRAM   Name\n1073741824   Intel  UHD Graphics 630\n",
        );
        let ctx = context_with(executor, instrumentation);
        let gpus = collect(&ctx).await;
        assert_eq!(gpus.len(), 1);
        assert_eq!(gpus[0].brand, "Intel");
        assert_eq!(gpus[0].vram, "1.00 GB");
    }

    #[tokio::test]
    async fn unknown_vendor_keeps_name_and_no_brand() {
        let executor = ScriptedExecutor::new().respond(
            &format!("powershell -NoProfile -Command {PS_QUERY}"),
            r#"{"Name":"Matrox G200eR2","AdapterRAM":16777216}"#,
        );
        let ctx = context_with_executor(executor);
        let gpus = collect(&ctx).await;
        assert_eq!(gpus.len(), 1);
        assert_eq!(gpus[0].brand, UNAVAILABLE);
        assert_eq!(gpus[0].model, "Matrox G200eR2");
    }
}
