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

//! Snapshot assembly service.
//!
//! Owns the probe context (command executor plus the optional
//! instrumentation handle, created once) and drives the nine category
//! collectors strictly sequentially. Collectors never fail, so neither
//! does assembly: the worst outcome is a fully unresolved snapshot.

use log::info;

use crate::domain::collectors::{
    bluetooth, cpu, disks, display, gpus, motherboard, ram, tpm, wifi, ProbeContext,
};
use crate::domain::entities::{
    BluetoothInfo, CpuInfo, DiskDevice, DisplayInfo, GpuDevice, MotherboardInfo, RamInfo,
    Snapshot, TpmInfo, WifiInfo,
};

pub struct SnapshotAssembler {
    ctx: ProbeContext,
}

impl SnapshotAssembler {
    pub fn new(ctx: ProbeContext) -> Self {
        Self { ctx }
    }

    /// Collect every category and compose the aggregate snapshot.
    /// Category order does not affect correctness; categories are
    /// independent.
    pub async fn collect(&self) -> Snapshot {
        info!("starting hardware collection pass");
        let snapshot = Snapshot {
            motherboard: self.motherboard().await,
            cpu: self.cpu().await,
            ram: self.ram().await,
            disks: self.disks().await,
            gpus: self.gpus().await,
            display: self.display().await,
            tpm: self.tpm().await,
            bluetooth: self.bluetooth().await,
            wifi: self.wifi().await,
        };
        info!("hardware collection pass finished");
        snapshot
    }

    pub async fn motherboard(&self) -> MotherboardInfo {
        motherboard::collect(&self.ctx).await
    }

    pub async fn cpu(&self) -> CpuInfo {
        cpu::collect(&self.ctx).await
    }

    pub async fn ram(&self) -> RamInfo {
        ram::collect(&self.ctx).await
    }

    pub async fn disks(&self) -> Vec<DiskDevice> {
        disks::collect(&self.ctx).await
    }

    pub async fn gpus(&self) -> Vec<GpuDevice> {
        gpus::collect(&self.ctx).await
    }

    pub async fn display(&self) -> DisplayInfo {
        display::collect(&self.ctx).await
    }

    pub async fn tpm(&self) -> TpmInfo {
        tpm::collect(&self.ctx).await
    }

    pub async fn bluetooth(&self) -> BluetoothInfo {
        bluetooth::collect(&self.ctx).await
    }

    pub async fn wifi(&self) -> WifiInfo {
        wifi::collect(&self.ctx).await
    }
}
