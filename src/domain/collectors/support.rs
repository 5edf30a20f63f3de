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

//! Mock port implementations for collector tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::collectors::ProbeContext;
use crate::domain::errors::{ProbeError, ProbeResult};
use crate::ports::command::{CommandExecutor, CommandOutput, SystemCommand};
use crate::ports::instrumentation::*;

/// Executor serving canned stdout keyed on `"program arg1 arg2 ..."`.
/// Commands with no scripted response behave like a missing binary.
#[derive(Default)]
pub struct ScriptedExecutor {
    responses: HashMap<String, String>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, command_line: &str, stdout: &str) -> Self {
        self.responses
            .insert(command_line.to_string(), stdout.to_string());
        self
    }

    fn key(command: &SystemCommand) -> String {
        let mut key = command.program.clone();
        for arg in &command.args {
            key.push(' ');
            key.push_str(arg);
        }
        key
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn execute(&self, command: &SystemCommand) -> ProbeResult<CommandOutput> {
        match self.responses.get(&Self::key(command)) {
            Some(stdout) => Ok(CommandOutput {
                stdout: stdout.clone(),
                stderr: String::new(),
                exit_code: Some(0),
            }),
            None => Err(ProbeError::InterfaceUnavailable(format!(
                "{} not found",
                command.program
            ))),
        }
    }
}

fn unavailable<T>() -> ProbeResult<Vec<T>> {
    Err(ProbeError::InterfaceUnavailable(
        "not scripted".to_string(),
    ))
}

/// Instrumentation client returning fixed per-class results; every class
/// defaults to interface-unavailable.
pub struct StaticInstrumentation {
    pub base_boards: ProbeResult<Vec<RawBaseBoard>>,
    pub processors: ProbeResult<Vec<RawProcessor>>,
    pub physical_memory: ProbeResult<Vec<RawPhysicalMemory>>,
    pub disk_drives: ProbeResult<Vec<RawDiskDrive>>,
    pub logical_disks: ProbeResult<Vec<RawLogicalDisk>>,
    pub disk_partitions: ProbeResult<Vec<RawDiskPartition>>,
    pub video_controllers: ProbeResult<Vec<RawVideoController>>,
    pub tpm: ProbeResult<Vec<RawTpm>>,
    pub pnp_entities: ProbeResult<Vec<RawPnpEntity>>,
    pub network_adapters: ProbeResult<Vec<RawNetworkAdapter>>,
}

impl Default for StaticInstrumentation {
    fn default() -> Self {
        Self {
            base_boards: unavailable(),
            processors: unavailable(),
            physical_memory: unavailable(),
            disk_drives: unavailable(),
            logical_disks: unavailable(),
            disk_partitions: unavailable(),
            video_controllers: unavailable(),
            tpm: unavailable(),
            pnp_entities: unavailable(),
            network_adapters: unavailable(),
        }
    }
}

impl InstrumentationClient for StaticInstrumentation {
    fn base_boards(&self) -> ProbeResult<Vec<RawBaseBoard>> {
        self.base_boards.clone()
    }
    fn processors(&self) -> ProbeResult<Vec<RawProcessor>> {
        self.processors.clone()
    }
    fn physical_memory(&self) -> ProbeResult<Vec<RawPhysicalMemory>> {
        self.physical_memory.clone()
    }
    fn disk_drives(&self) -> ProbeResult<Vec<RawDiskDrive>> {
        self.disk_drives.clone()
    }
    fn logical_disks(&self) -> ProbeResult<Vec<RawLogicalDisk>> {
        self.logical_disks.clone()
    }
    fn disk_partitions(&self) -> ProbeResult<Vec<RawDiskPartition>> {
        self.disk_partitions.clone()
    }
    fn video_controllers(&self) -> ProbeResult<Vec<RawVideoController>> {
        self.video_controllers.clone()
    }
    fn tpm(&self) -> ProbeResult<Vec<RawTpm>> {
        self.tpm.clone()
    }
    fn pnp_entities(&self) -> ProbeResult<Vec<RawPnpEntity>> {
        self.pnp_entities.clone()
    }
    fn network_adapters(&self) -> ProbeResult<Vec<RawNetworkAdapter>> {
        self.network_adapters.clone()
    }
}

/// Context with a scripted executor and no instrumentation.
pub fn context_with_executor(executor: ScriptedExecutor) -> ProbeContext {
    ProbeContext {
        executor: Arc::new(executor),
        instrumentation: None,
    }
}

/// Context with both mock ports wired in.
pub fn context_with(
    executor: ScriptedExecutor,
    instrumentation: StaticInstrumentation,
) -> ProbeContext {
    ProbeContext {
        executor: Arc::new(executor),
        instrumentation: Some(Arc::new(instrumentation)),
    }
}
