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

//! Disk collector (list category).
//!
//! All probes run; entities from later probes merge into earlier ones when
//! their normalized model strings match, otherwise they append. Free space
//! comes from the local logical disks, which no consumed interface maps
//! back to a physical drive directly; the summed free space is attributed
//! to the single partitioned drive when that is unambiguous, and to the
//! first drive otherwise.

use sysinfo::{DiskKind, Disks};

use crate::domain::collectors::{command_stdout, ProbeContext, PROBE_TIMEOUT};
use crate::domain::entities::{or_unavailable, DiskDevice, UNAVAILABLE};
use crate::domain::errors::{ProbeError, ProbeResult};
use crate::domain::merge::{
    fill_field, merge_list_probes, normalize_identity, DeviceEntity, ListProbe,
};
use crate::domain::parsers::common::{bytes_to_gb, parse_gb_field};
use crate::domain::parsers::table;
use crate::domain::vendors::classify_disk_type;

impl DeviceEntity for DiskDevice {
    fn identity_key(&self) -> String {
        normalize_identity(&self.model)
    }

    fn fill_missing_from(&mut self, other: &Self) {
        fill_field(&mut self.type_, &other.type_);
        fill_field(&mut self.size, &other.size);
        fill_field(&mut self.free_space, &other.free_space);
    }
}

pub async fn collect(ctx: &ProbeContext) -> Vec<DiskDevice> {
    let probes: Vec<(&'static str, ListProbe<DiskDevice>)> = vec![
        ("instrumentation", Box::pin(probe_instrumentation(ctx))),
        ("wmic", Box::pin(probe_wmic(ctx))),
        ("sysinfo", Box::pin(probe_sysinfo())),
    ];
    merge_list_probes("disks", probes).await
}

fn attribute_free_space(disks: &mut [DiskDevice], free_total: Option<u64>, target: usize) {
    if let (Some(free), Some(disk)) = (free_total, disks.get_mut(target)) {
        fill_field(&mut disk.free_space, &bytes_to_gb(free));
    }
}

async fn probe_instrumentation(ctx: &ProbeContext) -> ProbeResult<Vec<DiskDevice>> {
    let client = ctx.instrumentation()?;
    let drives = client.disk_drives()?;
    if drives.is_empty() {
        return Err(ProbeError::DecodeFailed("no disk drive records".to_string()));
    }

    let mut indexes = Vec::new();
    let mut disks = Vec::new();
    for drive in &drives {
        let model = match drive.model.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => continue,
        };
        indexes.push(drive.index);
        disks.push(DiskDevice {
            type_: classify_disk_type(drive.media_type.as_deref(), &model).to_string(),
            size: or_unavailable(drive.size.as_deref().and_then(parse_gb_field)),
            free_space: UNAVAILABLE.to_string(),
            model,
        });
    }

    let free_total = client
        .logical_disks()
        .ok()
        .map(|locals| {
            locals
                .iter()
                .filter_map(|l| l.free_space.as_deref())
                .filter_map(|f| f.trim().parse::<u64>().ok())
                .sum::<u64>()
        })
        .filter(|total| *total > 0);

    // Partition records tell which drives actually hold volumes.
    let mut partitioned: Vec<u32> = client
        .disk_partitions()
        .ok()
        .map(|parts| parts.iter().filter_map(|p| p.disk_index).collect())
        .unwrap_or_default();
    partitioned.sort_unstable();
    partitioned.dedup();

    let target = if partitioned.len() == 1 {
        indexes
            .iter()
            .position(|i| *i == Some(partitioned[0]))
            .unwrap_or(0)
    } else {
        0
    };
    attribute_free_space(&mut disks, free_total, target);
    Ok(disks)
}

async fn probe_wmic(ctx: &ProbeContext) -> ProbeResult<Vec<DiskDevice>> {
    let output = command_stdout(
        ctx,
        "wmic",
        &["diskdrive", "get", "mediatype,model,size"],
        PROBE_TIMEOUT,
    )
    .await?;
    let rows = table::parse_columns(
        &output,
        &[
            ("mediatype", "media_type"),
            ("model", "model"),
            ("size", "size"),
        ],
    );
    let mut disks: Vec<DiskDevice> = rows
        .iter()
        .filter_map(|row| {
            let model = row.get("model")?.to_string();
            Some(DiskDevice {
                type_: classify_disk_type(row.get("media_type"), &model).to_string(),
                size: or_unavailable(row.get("size").and_then(parse_gb_field)),
                free_space: UNAVAILABLE.to_string(),
                model,
            })
        })
        .collect();
    if disks.is_empty() {
        return Err(ProbeError::DecodeFailed("no disk drive rows".to_string()));
    }

    // Free space needs a second query; its failure costs only that field.
    let free_total = command_stdout(
        ctx,
        "wmic",
        &["logicaldisk", "where", "drivetype=3", "get", "freespace"],
        PROBE_TIMEOUT,
    )
    .await
    .ok()
    .map(|out| {
        table::parse_columns(&out, &[("freespace", "free_space")])
            .iter()
            .filter_map(|r| r.get("free_space"))
            .filter_map(|f| f.parse::<u64>().ok())
            .sum::<u64>()
    })
    .filter(|total| *total > 0);
    attribute_free_space(&mut disks, free_total, 0);
    Ok(disks)
}

/// Volume-level fallback; reports mounted volumes rather than physical
/// drives when nothing else answered.
async fn probe_sysinfo() -> ProbeResult<Vec<DiskDevice>> {
    let disks = Disks::new_with_refreshed_list();
    let devices: Vec<DiskDevice> = disks
        .iter()
        .map(|disk| {
            let type_ = match disk.kind() {
                DiskKind::SSD => "SSD".to_string(),
                DiskKind::HDD => "HDD".to_string(),
                DiskKind::Unknown(_) => UNAVAILABLE.to_string(),
            };
            DiskDevice {
                model: format!("Volume {}", disk.name().to_string_lossy()),
                type_,
                size: bytes_to_gb(disk.total_space()),
                free_space: bytes_to_gb(disk.available_space()),
            }
        })
        .collect();
    if devices.is_empty() {
        return Err(ProbeError::InterfaceUnavailable(
            "no volumes enumerated".to_string(),
        ));
    }
    Ok(devices)
}
