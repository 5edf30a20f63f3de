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

//! Background collection worker.
//!
//! Collection runs on a dedicated thread, away from whoever is driving the
//! UI or CLI. One pass at a time: an atomic in-flight flag refuses
//! redundant passes instead of queueing them. A pass cannot be cancelled
//! once started. The assembler (and the instrumentation handle inside it)
//! is created on the worker thread because the handle cannot cross
//! threads; probes still run strictly sequentially on a current-thread
//! runtime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use log::{error, warn};

use crate::container::platform_assembler;
use crate::domain::entities::Snapshot;
use crate::domain::services::snapshot::SnapshotAssembler;

pub struct SnapshotWorker {
    in_flight: Arc<AtomicBool>,
    sender: Sender<Arc<Snapshot>>,
    factory: Arc<dyn Fn() -> SnapshotAssembler + Send + Sync>,
}

impl SnapshotWorker {
    /// Create a worker wired to the real operating system, and the
    /// receiving end its snapshots arrive on.
    pub fn channel() -> (Self, Receiver<Arc<Snapshot>>) {
        Self::with_factory(platform_assembler)
    }

    /// Worker building its assembler from the given factory. The factory
    /// runs on the collection thread, where the instrumentation handle
    /// must be created.
    pub fn with_factory<F>(factory: F) -> (Self, Receiver<Arc<Snapshot>>)
    where
        F: Fn() -> SnapshotAssembler + Send + Sync + 'static,
    {
        let (sender, receiver) = channel();
        (
            Self {
                in_flight: Arc::new(AtomicBool::new(false)),
                sender,
                factory: Arc::new(factory),
            },
            receiver,
        )
    }

    /// Start a collection pass unless one is already running. Returns
    /// whether a pass was started; the snapshot arrives on the receiver.
    pub fn try_collect(&self) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("collection pass already in flight, not starting another");
            return false;
        }

        let in_flight = Arc::clone(&self.in_flight);
        let sender = self.sender.clone();
        let factory = Arc::clone(&self.factory);
        let spawned = std::thread::Builder::new()
            .name("hwsnap-collector".to_string())
            .spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build();
                match runtime {
                    Ok(runtime) => {
                        let snapshot =
                            runtime.block_on(async { factory().collect().await });
                        // The receiver may be gone; that only ends delivery.
                        let _ = sender.send(Arc::new(snapshot));
                    }
                    Err(e) => error!("collector runtime failed to start: {e}"),
                }
                in_flight.store(false, Ordering::SeqCst);
            });

        if let Err(e) = spawned {
            error!("collector thread failed to spawn: {e}");
            self.in_flight.store(false, Ordering::SeqCst);
            return false;
        }
        true
    }

    pub fn is_collecting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::domain::collectors::ProbeContext;
    use crate::domain::entities::UNAVAILABLE;
    use crate::domain::errors::{ProbeError, ProbeResult};
    use crate::ports::command::{CommandExecutor, CommandOutput, SystemCommand};

    /// Executor that keeps a collection pass busy long enough to observe
    /// the in-flight guard from the outside.
    struct StallingExecutor;

    #[async_trait]
    impl CommandExecutor for StallingExecutor {
        async fn execute(&self, _command: &SystemCommand) -> ProbeResult<CommandOutput> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Err(ProbeError::InterfaceUnavailable("stalled".to_string()))
        }
    }

    fn stalling_worker() -> (SnapshotWorker, std::sync::mpsc::Receiver<Arc<Snapshot>>) {
        SnapshotWorker::with_factory(|| {
            SnapshotAssembler::new(ProbeContext {
                executor: Arc::new(StallingExecutor),
                instrumentation: None,
            })
        })
    }

    #[test]
    fn redundant_pass_is_refused_while_one_is_in_flight() {
        let (worker, receiver) = stalling_worker();
        assert!(worker.try_collect());
        assert!(worker.is_collecting());
        // Every command probe stalls, so the pass is still running.
        assert!(!worker.try_collect());
        let snapshot = receiver
            .recv_timeout(Duration::from_secs(120))
            .expect("stalled pass still delivers a snapshot");
        assert_eq!(snapshot.motherboard.manufacturer, UNAVAILABLE);
        while worker.is_collecting() {
            std::thread::sleep(Duration::from_millis(10));
        }
        // Once the guard clears a new pass may start.
        assert!(worker.try_collect());
        let _ = receiver.recv_timeout(Duration::from_secs(120));
    }

    #[test]
    fn pass_runs_and_guard_clears() {
        let (worker, receiver) = SnapshotWorker::channel();
        assert!(worker.try_collect());
        let snapshot = receiver
            .recv_timeout(Duration::from_secs(120))
            .expect("collection pass should deliver a snapshot");
        // The snapshot is structurally complete even when nothing
        // resolved on this machine.
        assert!(!snapshot.cpu.model.is_empty());
        while worker.is_collecting() {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(worker.try_collect());
        let _ = receiver.recv_timeout(Duration::from_secs(120));
    }
}
