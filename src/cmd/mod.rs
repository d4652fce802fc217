pub mod completions;
pub mod run;
pub mod single;
pub mod wait_group;

use crate::signal::CancellationSignal;
use crate::Cli;
use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Spawn workers, cancel them all with one signal, wait a grace period
    Run(run::RunArgs),
    /// Run a single worker stopped by token or stop channel
    Single(single::SingleArgs),
    /// Run timed tasks and wait for all of them
    WaitGroup(wait_group::WaitGroupArgs),
    /// Generate shell completions
    Completions {
        /// Shell type to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

pub async fn run(cli: Cli, interrupt: &CancellationSignal) -> anyhow::Result<()> {
    match &cli.command {
        Command::Run(args) => run::run(&cli, args, interrupt).await,
        Command::Single(args) => single::run(&cli, args, interrupt).await,
        Command::WaitGroup(args) => wait_group::run(&cli, args).await,
        Command::Completions { shell } => completions::run(*shell),
    }
}
