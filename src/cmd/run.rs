use crate::app::controller::{Controller, ShutdownReport, Timings};
use crate::app::journal::Journal;
use crate::app::worker::WorkerState;
use crate::out;
use crate::signal::CancellationSignal;
use crate::Cli;
use anyhow::Result;
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Worker label (repeatable)
    #[arg(
        long = "worker",
        value_name = "LABEL",
        default_values = ["worker-1", "worker-2", "worker-3"]
    )]
    pub workers: Vec<String>,

    /// Sleep between worker poll iterations, in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,

    /// How long workers run before cancellation, in milliseconds
    #[arg(long, default_value = "1000")]
    pub run_for_ms: u64,

    /// Grace period after cancellation, in milliseconds
    #[arg(long, default_value = "1000")]
    pub grace_ms: u64,

    /// Join every worker instead of trusting the grace period
    #[arg(long, default_value_t = false)]
    pub confirm: bool,
}

impl RunArgs {
    pub fn timings(&self) -> Timings {
        Timings {
            tick: Duration::from_millis(self.tick_ms),
            run_for: Duration::from_millis(self.run_for_ms),
            grace: Duration::from_millis(self.grace_ms),
        }
    }
}

pub async fn run(cli: &Cli, args: &RunArgs, interrupt: &CancellationSignal) -> Result<()> {
    let journal = Journal::new(cli.output);
    let timings = args.timings();

    let mut controller = Controller::new(interrupt.child(), timings, journal.clone());
    controller.spawn(args.workers.iter().cloned());
    controller.run_for(timings.run_for).await;
    log::debug!("worker states before shutdown: {:?}", controller.states());

    let report = if args.confirm {
        controller.shutdown_confirmed().await?
    } else {
        controller.shutdown().await
    };

    print_report(cli, &journal, &report)
}

pub(crate) fn print_report(cli: &Cli, journal: &Journal, report: &ShutdownReport) -> Result<()> {
    if cli.output.is_json() {
        return out::write_json(report);
    }

    let stopped = report
        .workers
        .iter()
        .filter(|w| w.state == WorkerState::Terminated)
        .count();
    if report.all_terminated() {
        journal.note(format!("all {} workers stopped", report.workers.len()));
        return Ok(());
    }

    journal.note(format!(
        "{} of {} workers stopped; the rest may still be running",
        stopped,
        report.workers.len()
    ));
    for worker in report.workers.iter().filter(|w| w.state != WorkerState::Terminated) {
        if let Some(last) = journal.events_for(&worker.label).last() {
            journal.note(format!("  {} last seen: {}", worker.label, out::event_line(last)));
        }
    }
    log::debug!("{} events recorded", journal.events().len());
    Ok(())
}
