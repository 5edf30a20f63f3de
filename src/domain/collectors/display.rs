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

//! Display collector: current resolution of the primary display, read from
//! the video-controller interfaces.

use crate::domain::collectors::{command_stdout, ProbeContext, POWERSHELL_TIMEOUT, PROBE_TIMEOUT};
use crate::domain::entities::DisplayInfo;
use crate::domain::errors::{ProbeError, ProbeResult};
use crate::domain::merge::{merge_scalar_probes, FieldRecord, ScalarProbe};
use crate::domain::parsers::{structured, table};

const SCHEMA: &[&str] = &["resolution"];

const PS_QUERY: &str = "Get-CimInstance Win32_VideoController | \
     Select-Object CurrentHorizontalResolution,CurrentVerticalResolution | \
     ConvertTo-Json -Compress";

const PS_KEYS: &[&str] = &["CurrentHorizontalResolution", "CurrentVerticalResolution"];

pub async fn collect(ctx: &ProbeContext) -> DisplayInfo {
    let probes: Vec<(&'static str, ScalarProbe)> = vec![
        ("instrumentation", Box::pin(probe_instrumentation(ctx))),
        ("wmic", Box::pin(probe_wmic(ctx))),
        ("powershell", Box::pin(probe_powershell(ctx))),
    ];
    let mut merger = merge_scalar_probes("display", SCHEMA, probes).await;
    DisplayInfo {
        resolution: merger.take("resolution"),
    }
}

fn resolution_record(width: u32, height: u32) -> ProbeResult<FieldRecord> {
    if width == 0 || height == 0 {
        return Err(ProbeError::DecodeFailed("zero resolution".to_string()));
    }
    let mut record = FieldRecord::new();
    record.set("resolution", &format!("{width}x{height}"));
    Ok(record)
}

async fn probe_instrumentation(ctx: &ProbeContext) -> ProbeResult<FieldRecord> {
    let controllers = ctx.instrumentation()?.video_controllers()?;
    // Headless adapters report no current mode; the first one with a mode
    // is the active display.
    let (w, h) = controllers
        .iter()
        .find_map(|c| {
            Some((
                c.current_horizontal_resolution?,
                c.current_vertical_resolution?,
            ))
        })
        .ok_or_else(|| ProbeError::DecodeFailed("no controller reports a mode".to_string()))?;
    resolution_record(w, h)
}

async fn probe_wmic(ctx: &ProbeContext) -> ProbeResult<FieldRecord> {
    let output = command_stdout(
        ctx,
        "wmic",
        &[
            "path",
            "win32_videocontroller",
            "get",
            "currenthorizontalresolution,currentverticalresolution",
        ],
        PROBE_TIMEOUT,
    )
    .await?;
    let rows = table::parse_columns(
        &output,
        &[
            ("currenthorizontalresolution", "width"),
            ("currentverticalresolution", "height"),
        ],
    );
    let (w, h) = rows
        .iter()
        .find_map(|row| {
            Some((
                row.get("width")?.parse().ok()?,
                row.get("height")?.parse().ok()?,
            ))
        })
        .ok_or_else(|| ProbeError::DecodeFailed("no resolution rows".to_string()))?;
    resolution_record(w, h)
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
    let (w, h) = objects
        .iter()
        .find_map(|obj| {
            Some((
                structured::u64_field(obj, "CurrentHorizontalResolution")? as u32,
                structured::u64_field(obj, "CurrentVerticalResolution")? as u32,
            ))
        })
        .ok_or_else(|| ProbeError::DecodeFailed("no resolution objects".to_string()))?;
    resolution_record(w, h)
}
