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

//! Category collectors: one module per hardware category.
//!
//! Each collector declares its field schema, its fixed probe order, and its
//! merge discipline, and never lets a probe error escape. A category whose
//! probes all fail yields an all-"unavailable" record (or an empty list).

use std::sync::Arc;
use std::time::Duration;

use crate::domain::errors::{ProbeError, ProbeResult};
use crate::ports::command::{CommandExecutor, SystemCommand};
use crate::ports::instrumentation::InstrumentationClient;

pub mod bluetooth;
pub mod cpu;
pub mod disks;
pub mod display;
pub mod gpus;
pub mod motherboard;
pub mod ram;
pub mod tpm;
pub mod wifi;

#[cfg(test)]
pub(crate) mod support;

/// Timeout for plain command-line probes.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// PowerShell starts slowly enough to deserve a longer limit.
pub const POWERSHELL_TIMEOUT: Duration = Duration::from_secs(15);

/// Everything a probe may consume: the command executor and the optional
/// instrumentation handle, created once per collection pass and passed by
/// reference into every probe.
pub struct ProbeContext {
    pub executor: Arc<dyn CommandExecutor>,
    pub instrumentation: Option<Arc<dyn InstrumentationClient>>,
}

impl ProbeContext {
    pub fn instrumentation(&self) -> ProbeResult<&dyn InstrumentationClient> {
        self.instrumentation.as_deref().ok_or_else(|| {
            ProbeError::InterfaceUnavailable("instrumentation client not connected".to_string())
        })
    }
}

/// Run a probe command and return its stdout. A non-zero exit or empty
/// output is an invocation failure; the binary being absent surfaces from
/// the executor as interface-unavailable.
pub(crate) async fn command_stdout(
    ctx: &ProbeContext,
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> ProbeResult<String> {
    let command = SystemCommand::new(program)
        .args(args.iter().copied())
        .timeout(timeout);
    let output = ctx.executor.execute(&command).await?;
    if !output.success() {
        return Err(ProbeError::InvocationFailed(format!(
            "{program} exited with {:?}: {}",
            output.exit_code,
            output.stderr.trim()
        )));
    }
    if output.stdout.trim().is_empty() {
        return Err(ProbeError::InvocationFailed(format!(
            "{program} produced no output"
        )));
    }
    Ok(output.stdout)
}
