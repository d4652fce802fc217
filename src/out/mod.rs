use crate::app::journal::{Event, EventKind};
use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

/// Output mode for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// No output
    None,
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON output
    Json,
}

impl OutputMode {
    pub fn is_json(&self) -> bool {
        matches!(self, OutputMode::Json)
    }
}

/// Write JSON to stdout.
pub fn write_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Write one event line to stdout: text, a compact JSON object, or nothing.
pub fn write_event(mode: OutputMode, event: &Event) {
    match mode {
        OutputMode::None => {}
        OutputMode::Text => println!("{}", event_line(&event.kind)),
        OutputMode::Json => match serde_json::to_string(event) {
            Ok(line) => println!("{}", line),
            Err(e) => log::warn!("failed to serialize event: {}", e),
        },
    }
}

/// Human-readable line for an event.
pub fn event_line(kind: &EventKind) -> String {
    match kind {
        EventKind::WorkerStarted { label } => format!("{} started", label),
        EventKind::Working { label, iteration } => {
            format!("{} working (iteration {})", label, iteration)
        }
        EventKind::Terminated { label, iterations } => {
            format!("{} terminated after {} iterations", label, iterations)
        }
        EventKind::Spawned { count } => format!("controller: spawned {} workers", count),
        EventKind::Triggered => "controller: cancellation triggered".to_string(),
        EventKind::GraceElapsed => "controller: grace period elapsed".to_string(),
        EventKind::TaskFinished { label } => format!("{} finished", label),
        EventKind::AllFinished { count } => format!("all {} tasks finished", count),
        EventKind::Note { message } => message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_lines() {
        assert_eq!(
            event_line(&EventKind::Working {
                label: "A".to_string(),
                iteration: 2
            }),
            "A working (iteration 2)"
        );
        assert_eq!(
            event_line(&EventKind::Terminated {
                label: "B".to_string(),
                iterations: 1
            }),
            "B terminated after 1 iterations"
        );
        assert_eq!(
            event_line(&EventKind::Spawned { count: 3 }),
            "controller: spawned 3 workers"
        );
    }

    #[test]
    fn test_output_mode_flags() {
        assert!(OutputMode::Json.is_json());
        assert!(!OutputMode::Text.is_json());
        assert_eq!(OutputMode::default(), OutputMode::Text);
    }
}
