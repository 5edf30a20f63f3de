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

//! CPU collector.
//!
//! Every probe resolves the same raw product-name string; the brand/model
//! split happens once per probe so the merge engine sees uniform fields.
//! An unrecognized vendor leaves the brand unresolved and keeps the full
//! string as the model.

use sysinfo::{CpuRefreshKind, RefreshKind, System};

use crate::domain::collectors::{command_stdout, ProbeContext, PROBE_TIMEOUT};
use crate::domain::entities::CpuInfo;
use crate::domain::errors::{ProbeError, ProbeResult};
use crate::domain::merge::{merge_scalar_probes, FieldRecord, ScalarProbe};
use crate::domain::parsers::{registry, table};
use crate::domain::vendors::{split_brand_model, CPU_BRAND_TOKENS};

const SCHEMA: &[&str] = &["brand", "model"];

const CPU_KEY: &str = r"HKLM\HARDWARE\DESCRIPTION\System\CentralProcessor\0";

pub async fn collect(ctx: &ProbeContext) -> CpuInfo {
    let probes: Vec<(&'static str, ScalarProbe)> = vec![
        ("instrumentation", Box::pin(probe_instrumentation(ctx))),
        ("wmic", Box::pin(probe_wmic(ctx))),
        ("registry", Box::pin(probe_registry(ctx))),
        ("sysinfo", Box::pin(probe_sysinfo())),
    ];
    let mut merger = merge_scalar_probes("cpu", SCHEMA, probes).await;
    CpuInfo {
        brand: merger.take("brand"),
        model: merger.take("model"),
    }
}

fn record_from_name(raw: &str) -> ProbeResult<FieldRecord> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ProbeError::DecodeFailed("empty processor name".to_string()));
    }
    let (brand, model) = split_brand_model(raw, CPU_BRAND_TOKENS);
    let mut record = FieldRecord::new();
    if let Some(brand) = brand {
        record.set("brand", brand);
    }
    record.set("model", &model);
    Ok(record)
}

async fn probe_instrumentation(ctx: &ProbeContext) -> ProbeResult<FieldRecord> {
    let processors = ctx.instrumentation()?.processors()?;
    let name = processors
        .first()
        .and_then(|p| p.name.as_deref())
        .ok_or_else(|| ProbeError::DecodeFailed("no processor name".to_string()))?;
    record_from_name(name)
}

async fn probe_wmic(ctx: &ProbeContext) -> ProbeResult<FieldRecord> {
    let output = command_stdout(ctx, "wmic", &["cpu", "get", "name"], PROBE_TIMEOUT).await?;
    let rows = table::parse_columns(&output, &[("name", "name")]);
    let name = rows
        .first()
        .and_then(|r| r.get("name"))
        .ok_or_else(|| ProbeError::DecodeFailed("no cpu rows".to_string()))?;
    record_from_name(name)
}

async fn probe_registry(ctx: &ProbeContext) -> ProbeResult<FieldRecord> {
    let output = command_stdout(ctx, "reg", &["query", CPU_KEY], PROBE_TIMEOUT).await?;
    let values = registry::parse_reg_values(&output);
    let name = registry::reg_value(&values, "ProcessorNameString")
        .ok_or_else(|| ProbeError::DecodeFailed("ProcessorNameString missing".to_string()))?;
    record_from_name(name)
}

/// Last-resort brand string from the local processor tables.
async fn probe_sysinfo() -> ProbeResult<FieldRecord> {
    let system =
        System::new_with_specifics(RefreshKind::new().with_cpu(CpuRefreshKind::everything()));
    let brand = system
        .cpus()
        .first()
        .map(|cpu| cpu.brand())
        .ok_or_else(|| {
            ProbeError::InterfaceUnavailable("processor tables empty".to_string())
        })?;
    record_from_name(brand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collectors::support::*;
    use crate::domain::entities::UNAVAILABLE;

    #[tokio::test]
    async fn failing_probe_falls_through_to_raw_name_split() {
        // Instrumentation is absent; wmic answers with a raw name.
        let executor = ScriptedExecutor::new().respond(
            "wmic cpu get name",
            "Name\nIntel Core i7-9700\n",
        );
        let ctx = context_with_executor(executor);
        let info = collect(&ctx).await;
        assert_eq!(info.brand, "Intel");
        assert_eq!(info.model, "Core i7-9700");
    }

    #[tokio::test]
    async fn registry_is_the_last_resort() {
        let executor = ScriptedExecutor::new().respond(
            &format!("reg query {CPU_KEY}"),
            "    ProcessorNameString    REG_SZ    AMD Ryzen 7 5800X 8-Core Processor\n",
        );
        let ctx = context_with_executor(executor);
        let info = collect(&ctx).await;
        assert_eq!(info.brand, "AMD");
        assert_eq!(info.model, "Ryzen 7 5800X 8-Core Processor");
    }

    #[tokio::test]
    async fn unknown_vendor_keeps_full_name_as_model() {
        let executor = ScriptedExecutor::new().respond(
            "wmic cpu get name",
            "Name\nQualcomm Snapdragon X Elite\n",
        );
        let ctx = context_with_executor(executor);
        let info = collect(&ctx).await;
        // Later fallbacks may still resolve the brand from the local
        // processor tables, but the resolved model is monotonic.
        assert_eq!(info.model, "Qualcomm Snapdragon X Elite");
    }

    #[tokio::test]
    async fn local_processor_tables_are_the_final_fallback() {
        // No OS interface answers; the model still resolves.
        let ctx = context_with_executor(ScriptedExecutor::new());
        let info = collect(&ctx).await;
        assert_ne!(info.model, UNAVAILABLE);
        assert!(!info.model.is_empty());
    }
}
