use crate::app::controller::{ShutdownReport, Timings, WorkerReport};
use crate::app::journal::{EventKind, Journal};
use crate::app::worker::Worker;
use crate::signal::{stop_channel, CancellationSignal};
use clap::ValueEnum;

/// How the lone worker is told to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StopVia {
    /// Broadcast cancellation signal
    Token,
    /// One-message stop channel
    Channel,
}

pub const SINGLE_LABEL: &str = "worker";

/// Run one worker, stop it after `run_for`, then wait out the grace period.
/// `interrupt` ends the run early (Ctrl+C) without replacing the stop path.
pub async fn run_single(
    via: StopVia,
    timings: Timings,
    journal: &Journal,
    interrupt: &CancellationSignal,
) -> ShutdownReport {
    let signal = interrupt.child();
    let (stop_tx, handle) = match via {
        StopVia::Token => {
            let worker = Worker::new(SINGLE_LABEL, signal.clone(), timings.tick, journal.clone());
            (None, worker.spawn())
        }
        StopVia::Channel => {
            let (tx, rx) = stop_channel();
            let worker = Worker::new(SINGLE_LABEL, rx, timings.tick, journal.clone());
            (Some(tx), worker.spawn())
        }
    };
    journal.record(EventKind::Spawned { count: 1 });

    tokio::select! {
        _ = tokio::time::sleep(timings.run_for) => {}
        _ = interrupt.fired() => log::info!("interrupted, stopping worker early"),
    }

    match &stop_tx {
        Some(tx) => tx.stop(),
        None => signal.trigger(),
    }
    journal.record(EventKind::Triggered);

    tokio::time::sleep(timings.grace).await;
    journal.record(EventKind::GraceElapsed);

    ShutdownReport {
        confirmed_mode: false,
        workers: vec![WorkerReport {
            label: handle.label,
            state: handle.status.state(),
            iterations: handle.status.iterations(),
            confirmed: false,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::worker::WorkerState;
    use std::time::Duration;

    const TICK: Duration = Duration::from_millis(100);

    fn timings() -> Timings {
        Timings {
            tick: TICK,
            run_for: TICK * 5,
            grace: TICK + TICK / 2,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_by_token() {
        let journal = Journal::silent();
        let report = run_single(StopVia::Token, timings(), &journal, &CancellationSignal::new()).await;
        assert!(report.all_terminated());
        assert!(report.workers[0].iterations >= 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_by_channel() {
        let journal = Journal::silent();
        let report =
            run_single(StopVia::Channel, timings(), &journal, &CancellationSignal::new()).await;
        assert_eq!(report.workers[0].label, SINGLE_LABEL);
        assert_eq!(report.workers[0].state, WorkerState::Terminated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_ends_run_early() {
        let journal = Journal::silent();
        let interrupt = CancellationSignal::new();
        interrupt.trigger();
        let start = tokio::time::Instant::now();
        let report = run_single(StopVia::Channel, timings(), &journal, &interrupt).await;
        assert!(report.all_terminated());
        assert!(start.elapsed() < TICK * 5);
    }
}
