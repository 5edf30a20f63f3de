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

//! Port for the native management-instrumentation interface.
//!
//! Raw records mirror the provider's class properties. Every field is
//! optional: providers routinely omit properties, and a missing property
//! must decode as "unresolved", never fail the whole query. 64-bit
//! counters (`Capacity`, `Size`, `FreeSpace`) arrive as decimal strings.

use serde::Deserialize;

use crate::domain::errors::ProbeResult;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawBaseBoard {
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawProcessor {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPhysicalMemory {
    pub capacity: Option<String>,
    pub manufacturer: Option<String>,
    pub part_number: Option<String>,
    pub bank_label: Option<String>,
    pub device_locator: Option<String>,
    pub speed: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDiskDrive {
    pub index: Option<u32>,
    pub model: Option<String>,
    pub size: Option<String>,
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawLogicalDisk {
    #[serde(rename = "DeviceID")]
    pub device_id: Option<String>,
    pub free_space: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDiskPartition {
    #[serde(rename = "DeviceID")]
    pub device_id: Option<String>,
    pub disk_index: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawVideoController {
    pub name: Option<String>,
    #[serde(rename = "AdapterRAM")]
    pub adapter_ram: Option<u64>,
    pub current_horizontal_resolution: Option<u32>,
    pub current_vertical_resolution: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTpm {
    pub spec_version: Option<String>,
    #[serde(rename = "IsEnabled_InitialValue")]
    pub is_enabled_initial_value: Option<bool>,
    #[serde(rename = "IsActivated_InitialValue")]
    pub is_activated_initial_value: Option<bool>,
    pub manufacturer_id_txt: Option<String>,
    pub manufacturer_version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPnpEntity {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawNetworkAdapter {
    pub name: Option<String>,
    pub description: Option<String>,
    pub net_connection_status: Option<u16>,
}

/// Port for querying management-instrumentation classes.
///
/// Deliberately not `Send`/`Sync`: the native client is tied to the
/// apartment of the thread that created it, so a connection is created and
/// used on the collection thread only.
pub trait InstrumentationClient {
    fn base_boards(&self) -> ProbeResult<Vec<RawBaseBoard>>;
    fn processors(&self) -> ProbeResult<Vec<RawProcessor>>;
    fn physical_memory(&self) -> ProbeResult<Vec<RawPhysicalMemory>>;
    fn disk_drives(&self) -> ProbeResult<Vec<RawDiskDrive>>;
    fn logical_disks(&self) -> ProbeResult<Vec<RawLogicalDisk>>;
    fn disk_partitions(&self) -> ProbeResult<Vec<RawDiskPartition>>;
    fn video_controllers(&self) -> ProbeResult<Vec<RawVideoController>>;
    fn tpm(&self) -> ProbeResult<Vec<RawTpm>>;
    fn pnp_entities(&self) -> ProbeResult<Vec<RawPnpEntity>>;
    fn network_adapters(&self) -> ProbeResult<Vec<RawNetworkAdapter>>;
}
