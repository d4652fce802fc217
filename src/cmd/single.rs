use crate::app::controller::Timings;
use crate::app::journal::Journal;
use crate::app::single::{run_single, StopVia};
use crate::cmd::run::print_report;
use crate::signal::CancellationSignal;
use crate::Cli;
use anyhow::Result;
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct SingleArgs {
    /// How the worker is stopped
    #[arg(long, value_enum, default_value = "token")]
    pub via: StopVia,

    /// Sleep between poll iterations, in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,

    /// How long the worker runs before being stopped, in milliseconds
    #[arg(long, default_value = "5000")]
    pub run_for_ms: u64,

    /// Grace period after stopping, in milliseconds
    #[arg(long, default_value = "1000")]
    pub grace_ms: u64,
}

pub async fn run(cli: &Cli, args: &SingleArgs, interrupt: &CancellationSignal) -> Result<()> {
    let journal = Journal::new(cli.output);
    let timings = Timings {
        tick: Duration::from_millis(args.tick_ms),
        run_for: Duration::from_millis(args.run_for_ms),
        grace: Duration::from_millis(args.grace_ms),
    };

    let report = run_single(args.via, timings, &journal, interrupt).await;
    print_report(cli, &journal, &report)
}
