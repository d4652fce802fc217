use crate::app::journal::{EventKind, Journal};
use crate::app::worker::{Worker, WorkerHandle, WorkerState};
use crate::error::JoinErrorContext;
use crate::signal::CancellationSignal;
use anyhow::Result;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;

/// Timing shared by the controller and its workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Sleep between a worker's poll iterations.
    pub tick: Duration,
    /// How long the controller lets workers run before triggering.
    pub run_for: Duration,
    /// How long the controller waits after triggering.
    pub grace: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub label: String,
    pub state: WorkerState,
    pub iterations: u64,
    /// Whether the controller saw the worker's task return.
    pub confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShutdownReport {
    pub confirmed_mode: bool,
    pub workers: Vec<WorkerReport>,
}

impl ShutdownReport {
    pub fn all_terminated(&self) -> bool {
        self.workers
            .iter()
            .all(|w| w.state == WorkerState::Terminated)
    }
}

/// Owns the shared cancellation signal and every worker bound to it.
pub struct Controller {
    signal: CancellationSignal,
    journal: Journal,
    timings: Timings,
    workers: Vec<WorkerHandle>,
}

impl Controller {
    /// `signal` may be shared with others, e.g. a Ctrl+C handler.
    pub fn new(signal: CancellationSignal, timings: Timings, journal: Journal) -> Self {
        Self {
            signal,
            journal,
            timings,
            workers: Vec::new(),
        }
    }

    /// Start one worker per distinct label, all polling the shared signal.
    pub fn spawn<I, L>(&mut self, labels: I)
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let mut seen: HashSet<String> = self.workers.iter().map(|w| w.label.clone()).collect();
        let mut count = 0;
        for label in labels {
            let label = label.into();
            if !seen.insert(label.clone()) {
                log::warn!("worker label {:?} already running, skipping", label);
                continue;
            }
            let worker = Worker::new(
                label,
                self.signal.clone(),
                self.timings.tick,
                self.journal.clone(),
            );
            self.workers.push(worker.spawn());
            count += 1;
        }
        self.journal.record(EventKind::Spawned { count });
    }

    /// Let the workers run. Returns early only if the signal fires
    /// from elsewhere (Ctrl+C).
    pub async fn run_for(&self, duration: Duration) {
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = self.signal.fired() => {
                log::info!("signal fired externally, ending run early");
            }
        }
    }

    pub fn states(&self) -> Vec<(String, WorkerState)> {
        self.workers
            .iter()
            .map(|w| (w.label.clone(), w.status.state()))
            .collect()
    }

    /// Fire the signal, wait out the grace period, and report what each
    /// worker had published by then. Termination is not confirmed: a worker
    /// whose tick exceeds the grace period may still be running.
    pub async fn shutdown(self) -> ShutdownReport {
        self.trigger();
        tokio::time::sleep(self.timings.grace).await;
        self.journal.record(EventKind::GraceElapsed);

        let workers = self
            .workers
            .iter()
            .map(|w| WorkerReport {
                label: w.label.clone(),
                state: w.status.state(),
                iterations: w.status.iterations(),
                confirmed: false,
            })
            .collect();
        // Dropping the join handles detaches any stragglers.
        ShutdownReport {
            confirmed_mode: false,
            workers,
        }
    }

    /// Fire the signal and join every worker, bounded by the grace period.
    /// Workers still running at the deadline are reported unconfirmed and
    /// left detached.
    pub async fn shutdown_confirmed(self) -> Result<ShutdownReport> {
        self.trigger();
        let deadline = tokio::time::Instant::now() + self.timings.grace;

        let mut workers = Vec::with_capacity(self.workers.len());
        for mut handle in self.workers {
            let confirmed = match tokio::time::timeout_at(deadline, &mut handle.join).await {
                Ok(joined) => {
                    let summary = joined.context_worker(&handle.label)?;
                    log::debug!("worker {} confirmed stopped", summary.label);
                    true
                }
                Err(_) => {
                    log::warn!("worker {} still running after grace period", handle.label);
                    false
                }
            };
            workers.push(WorkerReport {
                label: handle.label,
                state: handle.status.state(),
                iterations: handle.status.iterations(),
                confirmed,
            });
        }
        self.journal.record(EventKind::GraceElapsed);

        Ok(ShutdownReport {
            confirmed_mode: true,
            workers,
        })
    }

    fn trigger(&self) {
        log::info!("triggering cancellation for {} workers", self.workers.len());
        self.signal.trigger();
        self.journal.record(EventKind::Triggered);
    }
}
