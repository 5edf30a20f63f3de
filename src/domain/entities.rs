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

use serde::{Deserialize, Serialize};

/// Marker for a field no probe could resolve.
///
/// Exported records never contain the empty string; a field is either a real
/// value or this marker, so "not found" is never confused with "blank".
pub const UNAVAILABLE: &str = "unavailable";

/// Marker for a manufacturer that could not be inferred from a part number.
pub const NOT_IDENTIFIED: &str = "not identified";

/// Normalize an optional raw value into an exported field value.
pub fn or_unavailable(value: Option<String>) -> String {
    match value {
        Some(v) => {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                UNAVAILABLE.to_string()
            } else {
                trimmed.to_string()
            }
        }
        None => UNAVAILABLE.to_string(),
    }
}

/// Motherboard information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotherboardInfo {
    /// Board manufacturer
    pub manufacturer: String,
    /// Board model (product name)
    pub model: String,
    /// Board serial number
    pub serial_number: String,
}

/// Processor information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuInfo {
    /// Vendor brand (e.g. "Intel", "AMD")
    pub brand: String,
    /// Model with the brand token removed
    pub model: String,
}

/// A single installed memory module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryModule {
    /// Module capacity (e.g. "16.00 GB")
    pub size: String,
    /// Module manufacturer, heuristically resolved from the part number
    /// when the firmware reports a generic placeholder
    pub manufacturer: String,
    /// Bank label, falling back to the device locator
    pub location: String,
    /// Configured speed (e.g. "3200 MHz")
    pub speed: String,
}

/// Memory summary plus the per-module breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RamInfo {
    /// Total installed capacity
    pub total: String,
    /// Number of populated slots
    pub slots_used: String,
    /// Installed modules; populated wholesale by the first probe that
    /// returns a non-empty list
    pub modules: Vec<MemoryModule>,
}

/// A physical storage device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskDevice {
    /// Device model; also the identity key for list deduplication
    pub model: String,
    /// "NVMe", "SSD", or "HDD"
    #[serde(rename = "type")]
    pub type_: String,
    /// Total capacity
    pub size: String,
    /// Free space across the device's local volumes
    pub free_space: String,
}

/// A video controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuDevice {
    /// Controller model with the brand token removed; identity key for
    /// list deduplication
    pub model: String,
    /// Vendor brand (e.g. "NVIDIA", "AMD", "Intel")
    pub brand: String,
    /// Dedicated video memory
    pub vram: String,
}

/// Primary display information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayInfo {
    /// Current resolution (e.g. "1920x1080")
    pub resolution: String,
}

/// Trusted platform module information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TpmInfo {
    /// Specification or manufacturer version
    pub version: String,
    /// Enabled/activated state
    pub status: String,
    /// Module manufacturer
    pub manufacturer: String,
}

/// Bluetooth adapter information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BluetoothInfo {
    /// Device name as reported by plug-and-play enumeration
    pub device_name: String,
    /// Device status
    pub device_status: String,
}

/// Wireless network adapter information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WifiInfo {
    /// Adapter name or interface description
    pub adapter_name: String,
    /// Connection status
    pub adapter_status: String,
    /// SSID of the connected network, or "not connected"
    pub connected_ssid: String,
}

/// Aggregate hardware snapshot (root aggregate).
///
/// Immutable once assembled; shared by reference with report and UI
/// collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub motherboard: MotherboardInfo,
    pub cpu: CpuInfo,
    pub ram: RamInfo,
    pub disks: Vec<DiskDevice>,
    pub gpus: Vec<GpuDevice>,
    pub display: DisplayInfo,
    pub tpm: TpmInfo,
    pub bluetooth: BluetoothInfo,
    pub wifi: WifiInfo,
}
