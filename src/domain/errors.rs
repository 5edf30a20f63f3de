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

use thiserror::Error;

/// Why a single source probe produced no data.
///
/// Every variant is caught at the probe boundary and converted into an
/// all-"unavailable" contribution; none of them is fatal to a collection
/// pass. Callers above the category layer never see these errors.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    /// The backing client, binary, or API does not exist on this machine.
    #[error("interface unavailable: {0}")]
    InterfaceUnavailable(String),

    /// Process launch failure, non-zero exit, empty output, or timeout.
    #[error("invocation failed: {0}")]
    InvocationFailed(String),

    /// The interface produced output that could not be decoded.
    #[error("decode failed: {0}")]
    DecodeFailed(String),
}

pub type ProbeResult<T> = Result<T, ProbeError>;
