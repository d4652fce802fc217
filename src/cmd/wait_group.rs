use crate::app::journal::Journal;
use crate::app::wait_group::{run_wait_group, TimedTask};
use crate::out;
use crate::Cli;
use anyhow::Result;
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct WaitGroupArgs {
    /// Delay of one task in milliseconds (repeatable, one task each)
    #[arg(long = "delay-ms", value_name = "MS", default_values = ["2000", "1000"])]
    pub delays: Vec<u64>,
}

pub async fn run(cli: &Cli, args: &WaitGroupArgs) -> Result<()> {
    let journal = Journal::new(cli.output);
    let tasks = args
        .delays
        .iter()
        .enumerate()
        .map(|(i, ms)| TimedTask {
            label: format!("task-{}", i + 1),
            delay: Duration::from_millis(*ms),
        })
        .collect();

    let finished = run_wait_group(tasks, &journal).await?;

    if cli.output.is_json() {
        out::write_json(&serde_json::json!({
            "finished": finished,
        }))?;
    }
    Ok(())
}
