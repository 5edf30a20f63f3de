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

//! RAM collector.
//!
//! The summary fields (total, slots_used) follow the scalar merge rule.
//! The module list is different: the first probe that returns a non-empty
//! list supplies it wholesale, and later probes never partially merge into
//! it even when they carry more detail.

use std::future::Future;
use std::pin::Pin;

use log::debug;
use serde_json::{Map, Value};
use sysinfo::{MemoryRefreshKind, RefreshKind, System};

use crate::domain::collectors::{command_stdout, ProbeContext, POWERSHELL_TIMEOUT, PROBE_TIMEOUT};
use crate::domain::entities::{or_unavailable, MemoryModule, RamInfo};
use crate::domain::errors::{ProbeError, ProbeResult};
use crate::domain::merge::{FieldMerger, FieldRecord};
use crate::domain::parsers::common::bytes_to_gb;
use crate::domain::parsers::{structured, table};
use crate::domain::vendors::resolve_manufacturer;
use crate::ports::instrumentation::RawPhysicalMemory;

const SCHEMA: &[&str] = &["total", "slots_used"];

const PS_QUERY: &str = "Get-CimInstance Win32_PhysicalMemory | \
     Select-Object Capacity,Manufacturer,PartNumber,BankLabel,DeviceLocator,Speed | \
     ConvertTo-Json -Compress";

const PS_KEYS: &[&str] = &[
    "Capacity",
    "Manufacturer",
    "PartNumber",
    "BankLabel",
    "DeviceLocator",
    "Speed",
];

struct RamProbe {
    record: FieldRecord,
    modules: Vec<MemoryModule>,
}

type RamProbeFuture<'a> = Pin<Box<dyn Future<Output = ProbeResult<RamProbe>> + 'a>>;

pub async fn collect(ctx: &ProbeContext) -> RamInfo {
    let probes: Vec<(&'static str, RamProbeFuture)> = vec![
        ("powershell", Box::pin(probe_powershell(ctx))),
        ("instrumentation", Box::pin(probe_instrumentation(ctx))),
        ("wmic", Box::pin(probe_wmic(ctx))),
        ("sysinfo", Box::pin(probe_sysinfo())),
    ];

    let mut merger = FieldMerger::new(SCHEMA);
    let mut modules: Option<Vec<MemoryModule>> = None;
    for (source, probe) in probes {
        if merger.is_complete() && modules.is_some() {
            break;
        }
        match probe.await {
            Ok(out) => {
                merger.absorb(out.record);
                if modules.is_none() && !out.modules.is_empty() {
                    modules = Some(out.modules);
                }
            }
            Err(err) => debug!("ram: {source} probe yielded nothing: {err}"),
        }
    }

    RamInfo {
        total: merger.take("total"),
        slots_used: merger.take("slots_used"),
        modules: modules.unwrap_or_default(),
    }
}

/// Build the summary record from a decoded module list.
fn summarize(modules: Vec<MemoryModule>, capacities: &[u64]) -> ProbeResult<RamProbe> {
    if modules.is_empty() {
        return Err(ProbeError::DecodeFailed("no memory modules".to_string()));
    }
    let mut record = FieldRecord::new();
    let total: u64 = capacities.iter().sum();
    if total > 0 {
        record.set("total", &bytes_to_gb(total));
    }
    record.set("slots_used", &modules.len().to_string());
    Ok(RamProbe { record, modules })
}

fn module_from_object(obj: &Map<String, Value>) -> (MemoryModule, Option<u64>) {
    let capacity = structured::u64_field(obj, "Capacity");
    let manufacturer = structured::string_field(obj, "Manufacturer");
    let part_number = structured::string_field(obj, "PartNumber");
    let location = structured::string_field(obj, "BankLabel")
        .filter(|s| !s.is_empty())
        .or_else(|| structured::string_field(obj, "DeviceLocator"));
    let module = MemoryModule {
        size: or_unavailable(capacity.map(bytes_to_gb)),
        manufacturer: resolve_manufacturer(manufacturer.as_deref(), part_number.as_deref()),
        location: or_unavailable(location),
        speed: or_unavailable(structured::u64_field(obj, "Speed").map(|s| format!("{s} MHz"))),
    };
    (module, capacity)
}

async fn probe_powershell(ctx: &ProbeContext) -> ProbeResult<RamProbe> {
    let output = command_stdout(
        ctx,
        "powershell",
        &["-NoProfile", "-Command", PS_QUERY],
        POWERSHELL_TIMEOUT,
    )
    .await?;
    let objects = structured::parse_objects(&output, PS_KEYS);
    let mut modules = Vec::new();
    let mut capacities = Vec::new();
    for obj in &objects {
        let (module, capacity) = module_from_object(obj);
        capacities.extend(capacity);
        modules.push(module);
    }
    summarize(modules, &capacities)
}

fn module_from_raw(raw: &RawPhysicalMemory) -> (MemoryModule, Option<u64>) {
    let capacity = raw.capacity.as_deref().and_then(|c| c.trim().parse().ok());
    let location = raw
        .bank_label
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or(raw.device_locator.as_deref())
        .map(str::to_string);
    let module = MemoryModule {
        size: or_unavailable(capacity.map(bytes_to_gb)),
        manufacturer: resolve_manufacturer(raw.manufacturer.as_deref(), raw.part_number.as_deref()),
        location: or_unavailable(location),
        speed: or_unavailable(raw.speed.map(|s| format!("{s} MHz"))),
    };
    (module, capacity)
}

async fn probe_instrumentation(ctx: &ProbeContext) -> ProbeResult<RamProbe> {
    let raws = ctx.instrumentation()?.physical_memory()?;
    let mut modules = Vec::new();
    let mut capacities = Vec::new();
    for raw in &raws {
        let (module, capacity) = module_from_raw(raw);
        capacities.extend(capacity);
        modules.push(module);
    }
    summarize(modules, &capacities)
}

async fn probe_wmic(ctx: &ProbeContext) -> ProbeResult<RamProbe> {
    let output = command_stdout(
        ctx,
        "wmic",
        &[
            "memorychip",
            "get",
            "banklabel,capacity,devicelocator,manufacturer,partnumber,speed",
        ],
        PROBE_TIMEOUT,
    )
    .await?;
    let rows = table::parse_columns(
        &output,
        &[
            ("banklabel", "bank_label"),
            ("capacity", "capacity"),
            ("devicelocator", "device_locator"),
            ("manufacturer", "manufacturer"),
            ("partnumber", "part_number"),
            ("speed", "speed"),
        ],
    );
    let mut modules = Vec::new();
    let mut capacities = Vec::new();
    for row in &rows {
        let capacity: Option<u64> = row.get("capacity").and_then(|c| c.parse().ok());
        capacities.extend(capacity);
        let location = row.get("bank_label").or_else(|| row.get("device_locator"));
        modules.push(MemoryModule {
            size: or_unavailable(capacity.map(bytes_to_gb)),
            manufacturer: resolve_manufacturer(row.get("manufacturer"), row.get("part_number")),
            location: or_unavailable(location.map(str::to_string)),
            speed: or_unavailable(row.get("speed").map(|s| format!("{s} MHz"))),
        });
    }
    summarize(modules, &capacities)
}

/// Last-resort total from the local system tables; carries no per-module
/// detail and no slot count.
async fn probe_sysinfo() -> ProbeResult<RamProbe> {
    let system = System::new_with_specifics(
        RefreshKind::new().with_memory(MemoryRefreshKind::everything()),
    );
    let total = system.total_memory();
    if total == 0 {
        return Err(ProbeError::InterfaceUnavailable(
            "system memory tables empty".to_string(),
        ));
    }
    let mut record = FieldRecord::new();
    record.set("total", &bytes_to_gb(total));
    Ok(RamProbe {
        record,
        modules: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collectors::support::*;
    use crate::domain::entities::NOT_IDENTIFIED;

    fn powershell_ctx(json: &str) -> ProbeContext {
        let executor = ScriptedExecutor::new().respond(
            &format!("powershell -NoProfile -Command {PS_QUERY}"),
            json,
        );
        context_with_executor(executor)
    }

    #[tokio::test]
    async fn modules_decode_with_heuristic_manufacturer() {
        let ctx = powershell_ctx(
            r#"[{"Capacity":17179869184,"Manufacturer":"Unknown","PartNumber":"KHX2666C16/16G","BankLabel":"BANK 0","Speed":2666},
               {"Capacity":17179869184,"Manufacturer":"","PartNumber":"XYZ123","BankLabel":"","DeviceLocator":"DIMM_B1","Speed":2666}]"#,
        );
        let info = collect(&ctx).await;
        assert_eq!(info.total, "32.00 GB");
        assert_eq!(info.slots_used, "2");
        assert_eq!(info.modules.len(), 2);
        assert_eq!(info.modules[0].manufacturer, "Kingston");
        assert_eq!(info.modules[0].location, "BANK 0");
        assert_eq!(info.modules[0].speed, "2666 MHz");
        assert_eq!(info.modules[1].manufacturer, NOT_IDENTIFIED);
        assert_eq!(info.modules[1].location, "DIMM_B1");
    }

    #[tokio::test]
    async fn first_nonempty_module_list_wins_wholesale() {
        // PowerShell answers with a sparse list; wmic would answer with a
        // richer one, but the list is already taken and only the summary
        // fields could still merge.
        let executor = ScriptedExecutor::new()
            .respond(
                &format!("powershell -NoProfile -Command {PS_QUERY}"),
                r#"{"Capacity":8589934592,"Manufacturer":"Samsung","BankLabel":"BANK 0"}"#,
            )
            .respond(
                "wmic memorychip get banklabel,capacity,devicelocator,manufacturer,partnumber,speed",
                "BankLabel  Capacity    DeviceLocator  Manufacturer  PartNumber       Speed\n\
                 BANK 0     8589934592  DIMM_A1        Samsung       M378A1K43CB2     3200\n\
                 BANK 1     8589934592  DIMM_A2        Samsung       M378A1K43CB2     3200\n",
            );
        let ctx = context_with_executor(executor);
        let info = collect(&ctx).await;
        assert_eq!(info.modules.len(), 1);
        assert_eq!(info.modules[0].manufacturer, "Samsung");
        // Summary came from the first probe too.
        assert_eq!(info.total, "8.00 GB");
        assert_eq!(info.slots_used, "1");
    }

    #[tokio::test]
    async fn sysinfo_total_survives_when_every_module_probe_fails() {
        let ctx = context_with_executor(ScriptedExecutor::new());
        let info = collect(&ctx).await;
        assert!(info.modules.is_empty());
        assert!(info.total.ends_with(" GB"), "total was {}", info.total);
    }
}
