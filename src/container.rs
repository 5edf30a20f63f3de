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

//! Dependency wiring: connects the domain services to the real
//! operating-system adapters.

use std::sync::Arc;

use crate::adapters::command::TokioCommandExecutor;
use crate::adapters::instrumentation::platform_instrumentation;
use crate::domain::collectors::ProbeContext;
use crate::domain::services::snapshot::SnapshotAssembler;

/// Assembler wired to the real operating system. Must be constructed on
/// the thread that will run the collection, because the instrumentation
/// handle cannot cross threads.
pub fn platform_assembler() -> SnapshotAssembler {
    SnapshotAssembler::new(ProbeContext {
        executor: Arc::new(TokioCommandExecutor::with_defaults()),
        instrumentation: platform_instrumentation(),
    })
}
