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

//! Best-effort hardware snapshot collection.
//!
//! No single operating-system interface reliably exposes every hardware
//! attribute on every machine, so each category (motherboard, CPU, RAM,
//! disks, GPU, display, TPM, Bluetooth, Wi-Fi) is probed through several
//! independent, fallible sources whose partial answers merge into one
//! canonical record. Probe failure is never fatal; the worst outcome is a
//! snapshot full of "unavailable" markers.

pub mod adapters;
pub mod container;
pub mod domain;
pub mod ports;
pub mod worker;

pub use container::platform_assembler;
pub use domain::entities::Snapshot;
pub use domain::services::snapshot::SnapshotAssembler;
pub use worker::SnapshotWorker;
