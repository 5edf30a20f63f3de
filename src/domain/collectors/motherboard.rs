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

//! Motherboard collector.
//!
//! Probe order: instrumentation base-board class, then the legacy tabular
//! query tool, then the firmware description keys in the registry (which
//! carry manufacturer and product but no serial number).

use crate::domain::collectors::{command_stdout, ProbeContext, PROBE_TIMEOUT};
use crate::domain::entities::MotherboardInfo;
use crate::domain::errors::{ProbeError, ProbeResult};
use crate::domain::merge::{merge_scalar_probes, FieldRecord, ScalarProbe};
use crate::domain::parsers::{registry, table};

const SCHEMA: &[&str] = &["manufacturer", "model", "serial_number"];

const BIOS_KEY: &str = r"HKLM\HARDWARE\DESCRIPTION\System\BIOS";

pub async fn collect(ctx: &ProbeContext) -> MotherboardInfo {
    let probes: Vec<(&'static str, ScalarProbe)> = vec![
        ("instrumentation", Box::pin(probe_instrumentation(ctx))),
        ("wmic", Box::pin(probe_wmic(ctx))),
        ("registry", Box::pin(probe_registry(ctx))),
    ];
    let mut merger = merge_scalar_probes("motherboard", SCHEMA, probes).await;
    MotherboardInfo {
        manufacturer: merger.take("manufacturer"),
        model: merger.take("model"),
        serial_number: merger.take("serial_number"),
    }
}

async fn probe_instrumentation(ctx: &ProbeContext) -> ProbeResult<FieldRecord> {
    let boards = ctx.instrumentation()?.base_boards()?;
    let board = boards
        .first()
        .ok_or_else(|| ProbeError::DecodeFailed("no base board records".to_string()))?;
    let mut record = FieldRecord::new();
    if let Some(v) = &board.manufacturer {
        record.set("manufacturer", v);
    }
    if let Some(v) = &board.product {
        record.set("model", v);
    }
    if let Some(v) = &board.serial_number {
        record.set("serial_number", v);
    }
    Ok(record)
}

async fn probe_wmic(ctx: &ProbeContext) -> ProbeResult<FieldRecord> {
    let output = command_stdout(
        ctx,
        "wmic",
        &["baseboard", "get", "manufacturer,product,serialnumber"],
        PROBE_TIMEOUT,
    )
    .await?;
    table::parse_columns(
        &output,
        &[
            ("manufacturer", "manufacturer"),
            ("product", "model"),
            ("serialnumber", "serial_number"),
        ],
    )
    .into_iter()
    .next()
    .ok_or_else(|| ProbeError::DecodeFailed("no base board rows".to_string()))
}

async fn probe_registry(ctx: &ProbeContext) -> ProbeResult<FieldRecord> {
    let output = command_stdout(ctx, "reg", &["query", BIOS_KEY], PROBE_TIMEOUT).await?;
    let values = registry::parse_reg_values(&output);
    let mut record = FieldRecord::new();
    if let Some(v) = registry::reg_value(&values, "BaseBoardManufacturer") {
        record.set("manufacturer", v);
    }
    if let Some(v) = registry::reg_value(&values, "BaseBoardProduct") {
        record.set("model", v);
    }
    if record.is_empty() {
        return Err(ProbeError::DecodeFailed(
            "no base board values under BIOS key".to_string(),
        ));
    }
    Ok(record)
}
