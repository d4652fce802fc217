//! Worker loop: poll the stop source, otherwise do one unit of work and
//! sleep a tick.

use crate::app::journal::{EventKind, Journal};
use crate::signal::StopCheck;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    Active,
    Terminated,
}

const ACTIVE: u8 = 0;
const TERMINATED: u8 = 1;

/// State published by a running worker, readable from any task.
#[derive(Debug, Default)]
struct Shared {
    state: AtomicU8,
    iterations: AtomicU64,
}

#[derive(Debug, Clone, Default)]
pub struct WorkerStatus {
    inner: Arc<Shared>,
}

impl WorkerStatus {
    pub fn state(&self) -> WorkerState {
        match self.inner.state.load(Ordering::Acquire) {
            TERMINATED => WorkerState::Terminated,
            _ => WorkerState::Active,
        }
    }

    pub fn iterations(&self) -> u64 {
        self.inner.iterations.load(Ordering::Acquire)
    }

    fn set_iterations(&self, n: u64) {
        self.inner.iterations.store(n, Ordering::Release);
    }

    fn terminate(&self) {
        // Terminated is final; nothing ever stores ACTIVE again.
        self.inner.state.store(TERMINATED, Ordering::Release);
    }
}

/// What a worker reports when its task returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerSummary {
    pub label: String,
    pub iterations: u64,
}

pub struct Worker<S> {
    label: String,
    stop: S,
    tick: Duration,
    journal: Journal,
    status: WorkerStatus,
}

impl<S: StopCheck> Worker<S> {
    pub fn new(label: impl Into<String>, stop: S, tick: Duration, journal: Journal) -> Self {
        Self {
            label: label.into(),
            stop,
            tick,
            journal,
            status: WorkerStatus::default(),
        }
    }

    pub fn status(&self) -> WorkerStatus {
        self.status.clone()
    }

    /// Run until the stop source fires. The check never waits: when not
    /// stopped the worker goes straight to its work unit.
    pub async fn run(mut self) -> WorkerSummary {
        log::debug!("worker {} entering loop (tick {:?})", self.label, self.tick);
        self.journal.record(EventKind::WorkerStarted {
            label: self.label.clone(),
        });

        let mut iterations = 0u64;
        loop {
            if self.stop.should_stop() {
                self.status.terminate();
                self.journal.record(EventKind::Terminated {
                    label: self.label.clone(),
                    iterations,
                });
                log::debug!("worker {} stopped after {} iterations", self.label, iterations);
                return WorkerSummary {
                    label: self.label,
                    iterations,
                };
            }

            iterations += 1;
            self.status.set_iterations(iterations);
            self.journal.record(EventKind::Working {
                label: self.label.clone(),
                iteration: iterations,
            });
            tokio::time::sleep(self.tick).await;
        }
    }

    /// Spawn the worker onto the tokio runtime.
    pub fn spawn(self) -> WorkerHandle {
        let label = self.label.clone();
        let status = self.status();
        let join = tokio::spawn(self.run());
        WorkerHandle {
            label,
            status,
            join,
        }
    }
}

/// Controller-side handle to a spawned worker.
#[derive(Debug)]
pub struct WorkerHandle {
    pub label: String,
    pub status: WorkerStatus,
    pub join: JoinHandle<WorkerSummary>,
}
