mod app;
mod cmd;
mod error;
mod out;
mod signal;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "cancelcast",
    version,
    about = "Broadcast cooperative cancellation to polling workers"
)]
pub struct Cli {
    /// Output mode: text (default), json, or none
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub output: out::OutputMode,

    #[command(subcommand)]
    pub command: cmd::Command,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    // Ctrl+C fires the same signal the workers poll.
    let interrupt = signal::CancellationSignal::new();
    let interrupt_clone = interrupt.clone();
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            log::info!("Received Ctrl+C, cancelling workers...");
            interrupt_clone.trigger();
        }
    });

    if let Err(e) = cmd::run(cli, &interrupt).await {
        // Don't report error if we're shutting down on Ctrl+C
        if interrupt.is_fired() {
            std::process::exit(0);
        }
        let msg = format!("{e:#}");
        eprintln!("Error: {msg}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["cancelcast", "run"]).unwrap();
        assert_eq!(cli.output, out::OutputMode::Text);
        match cli.command {
            cmd::Command::Run(args) => {
                assert_eq!(args.workers, vec!["worker-1", "worker-2", "worker-3"]);
                assert_eq!(args.tick_ms, 1000);
                assert!(!args.confirm);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_run_custom_workers() {
        let cli = Cli::try_parse_from([
            "cancelcast",
            "run",
            "--worker",
            "A",
            "--worker",
            "B",
            "--confirm",
            "--output",
            "json",
        ])
        .unwrap();
        assert!(cli.output.is_json());
        match cli.command {
            cmd::Command::Run(args) => {
                assert_eq!(args.workers, vec!["A", "B"]);
                assert!(args.confirm);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_single_and_wait_group() {
        let cli = Cli::try_parse_from(["cancelcast", "single", "--via", "channel"]).unwrap();
        match cli.command {
            cmd::Command::Single(args) => {
                assert_eq!(args.via, app::single::StopVia::Channel);
                assert_eq!(args.run_for_ms, 5000);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["cancelcast", "wait-group"]).unwrap();
        match cli.command {
            cmd::Command::WaitGroup(args) => assert_eq!(args.delays, vec![2000, 1000]),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
