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

//! Native management-instrumentation adapter.
//!
//! On Windows this wraps a WMI connection; everywhere else the interface
//! is simply absent and every category falls through to its command-line
//! and sysinfo probes.

use std::sync::Arc;

use crate::ports::instrumentation::InstrumentationClient;

/// Connect to the platform instrumentation service, if this platform has
/// one. `None` means the whole interface is unavailable, not an error.
///
/// Must be called on the thread that will issue the queries; the
/// connection cannot cross threads.
pub fn platform_instrumentation() -> Option<Arc<dyn InstrumentationClient>> {
    #[cfg(windows)]
    {
        match windows::WmiInstrumentationClient::connect() {
            Ok(client) => Some(Arc::new(client)),
            Err(err) => {
                log::warn!("instrumentation connection failed: {err}");
                None
            }
        }
    }
    #[cfg(not(windows))]
    {
        None
    }
}

#[cfg(windows)]
mod windows {
    use wmi::{COMLibrary, WMIConnection};

    use crate::domain::errors::{ProbeError, ProbeResult};
    use crate::ports::instrumentation::*;

    const TPM_NAMESPACE: &str = "ROOT\\CIMV2\\Security\\MicrosoftTpm";

    /// WMI-backed instrumentation client. Holds two connections: the
    /// default CIMV2 namespace and the TPM security namespace.
    pub struct WmiInstrumentationClient {
        cimv2: WMIConnection,
        tpm: Option<WMIConnection>,
    }

    impl WmiInstrumentationClient {
        pub fn connect() -> Result<Self, wmi::WMIError> {
            let com = COMLibrary::new()?;
            let cimv2 = WMIConnection::new(com)?;
            // The TPM namespace is missing on machines without a TPM;
            // that only disables the TPM query.
            let tpm = WMIConnection::with_namespace_path(TPM_NAMESPACE, com).ok();
            Ok(Self { cimv2, tpm })
        }

        fn query<T>(&self, wql: &str) -> ProbeResult<Vec<T>>
        where
            T: serde::de::DeserializeOwned,
        {
            self.cimv2
                .raw_query(wql)
                .map_err(|e| ProbeError::InvocationFailed(format!("query failed: {e}")))
        }
    }

    impl InstrumentationClient for WmiInstrumentationClient {
        fn base_boards(&self) -> ProbeResult<Vec<RawBaseBoard>> {
            self.query("SELECT Manufacturer, Product, SerialNumber FROM Win32_BaseBoard")
        }

        fn processors(&self) -> ProbeResult<Vec<RawProcessor>> {
            self.query("SELECT Name FROM Win32_Processor")
        }

        fn physical_memory(&self) -> ProbeResult<Vec<RawPhysicalMemory>> {
            self.query(
                "SELECT Capacity, Manufacturer, PartNumber, BankLabel, DeviceLocator, Speed \
                 FROM Win32_PhysicalMemory",
            )
        }

        fn disk_drives(&self) -> ProbeResult<Vec<RawDiskDrive>> {
            self.query("SELECT Index, Model, Size, MediaType FROM Win32_DiskDrive")
        }

        fn logical_disks(&self) -> ProbeResult<Vec<RawLogicalDisk>> {
            // DriveType 3 restricts to local fixed disks.
            self.query(
                "SELECT DeviceID, FreeSpace, Size FROM Win32_LogicalDisk WHERE DriveType = 3",
            )
        }

        fn disk_partitions(&self) -> ProbeResult<Vec<RawDiskPartition>> {
            self.query("SELECT DeviceID, DiskIndex FROM Win32_DiskPartition")
        }

        fn video_controllers(&self) -> ProbeResult<Vec<RawVideoController>> {
            self.query(
                "SELECT Name, AdapterRAM, CurrentHorizontalResolution, \
                 CurrentVerticalResolution FROM Win32_VideoController",
            )
        }

        fn tpm(&self) -> ProbeResult<Vec<RawTpm>> {
            let conn = self.tpm.as_ref().ok_or_else(|| {
                ProbeError::InterfaceUnavailable("TPM namespace not present".to_string())
            })?;
            conn.raw_query("SELECT * FROM Win32_Tpm")
                .map_err(|e| ProbeError::InvocationFailed(format!("query failed: {e}")))
        }

        fn pnp_entities(&self) -> ProbeResult<Vec<RawPnpEntity>> {
            self.query("SELECT Name, Description, Status FROM Win32_PnPEntity")
        }

        fn network_adapters(&self) -> ProbeResult<Vec<RawNetworkAdapter>> {
            self.query(
                "SELECT Name, Description, NetConnectionStatus FROM Win32_NetworkAdapter",
            )
        }
    }
}
