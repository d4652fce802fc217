use crate::out::{self, OutputMode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Something a worker or the controller did that is worth reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    WorkerStarted { label: String },
    Working { label: String, iteration: u64 },
    Terminated { label: String, iterations: u64 },
    Spawned { count: usize },
    Triggered,
    GraceElapsed,
    TaskFinished { label: String },
    AllFinished { count: usize },
    Note { message: String },
}

impl EventKind {
    /// Worker or task label this event belongs to, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            EventKind::WorkerStarted { label }
            | EventKind::Working { label, .. }
            | EventKind::Terminated { label, .. }
            | EventKind::TaskFinished { label } => Some(label),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Ordered, shared record of events. Each recorded event is also echoed to
/// stdout according to the output mode.
#[derive(Debug, Clone)]
pub struct Journal {
    events: Arc<Mutex<Vec<Event>>>,
    output: OutputMode,
}

impl Journal {
    pub fn new(output: OutputMode) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            output,
        }
    }

    /// A journal that records without printing.
    #[cfg(test)]
    pub fn silent() -> Self {
        Self::new(OutputMode::None)
    }

    pub fn record(&self, kind: EventKind) {
        let event = Event {
            at: Utc::now(),
            kind,
        };
        // Print under the lock so stdout order matches the recorded order.
        let mut events = self.lock();
        out::write_event(self.output, &event);
        events.push(event);
    }

    pub fn note(&self, message: impl Into<String>) {
        self.record(EventKind::Note {
            message: message.into(),
        });
    }

    /// Copy of every event recorded so far.
    pub fn events(&self) -> Vec<EventKind> {
        self.lock().iter().map(|e| e.kind.clone()).collect()
    }

    /// Events belonging to one label, in order.
    pub fn events_for(&self, label: &str) -> Vec<EventKind> {
        self.lock()
            .iter()
            .filter(|e| e.kind.label() == Some(label))
            .map(|e| e.kind.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Event>> {
        // A panicking recorder cannot leave the Vec half-written.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
