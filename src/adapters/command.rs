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

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::trace;
use tokio::process::Command;
use tokio::time::timeout;

use crate::domain::errors::{ProbeError, ProbeResult};
use crate::ports::command::{CommandExecutor, CommandOutput, SystemCommand};

/// Executes probe commands as child processes with a hard timeout.
///
/// No retries: a probe that fails once stays failed for this collection
/// pass, and the next source in the fallback chain takes over.
pub struct TokioCommandExecutor {
    default_timeout: Duration,
}

impl TokioCommandExecutor {
    pub fn new(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }

    pub fn with_defaults() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl CommandExecutor for TokioCommandExecutor {
    async fn execute(&self, command: &SystemCommand) -> ProbeResult<CommandOutput> {
        trace!("executing {} {:?}", command.program, command.args);

        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    ProbeError::InterfaceUnavailable(format!("{} not found", command.program))
                }
                _ => ProbeError::InvocationFailed(format!(
                    "failed to launch {}: {e}",
                    command.program
                )),
            })?;

        let limit = command.timeout.unwrap_or(self.default_timeout);
        let output = timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| {
                ProbeError::InvocationFailed(format!(
                    "{} timed out after {limit:?}",
                    command.program
                ))
            })?
            .map_err(|e| {
                ProbeError::InvocationFailed(format!("{} did not complete: {e}", command.program))
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}
