//! Stop signals shared between a controller and its workers.
//!
//! [`CancellationSignal`] is a broadcast-once flag: every clone observes the
//! same fired state, and once fired it stays fired. [`stop_channel`] is the
//! point-to-point alternative, delivering a single stop message to exactly
//! one worker.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Non-blocking stop check performed by a worker at the top of each iteration.
pub trait StopCheck: Send + 'static {
    /// Returns `true` once the worker should stop. Must never block.
    fn should_stop(&mut self) -> bool;
}

/// Broadcast stop flag for coordinating shutdown across tasks.
#[derive(Clone, Debug, Default)]
pub struct CancellationSignal {
    token: CancellationToken,
}

impl CancellationSignal {
    /// Create a signal in the not-fired state.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Fire the signal. Calling this again is a no-op.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    /// Check whether the signal has fired.
    pub fn is_fired(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until the signal fires.
    /// Use this in `tokio::select!` when polling is not wanted.
    pub async fn fired(&self) {
        self.token.cancelled().await
    }

    /// Create a child signal that fires when this one fires, but can also
    /// be fired on its own without affecting the parent.
    pub fn child(&self) -> CancellationSignal {
        CancellationSignal {
            token: self.token.child_token(),
        }
    }
}

impl StopCheck for CancellationSignal {
    fn should_stop(&mut self) -> bool {
        self.is_fired()
    }
}

/// Sending half of a stop channel.
#[derive(Debug)]
pub struct StopSender {
    tx: mpsc::Sender<()>,
}

/// Receiving half of a stop channel, owned by a single worker.
#[derive(Debug)]
pub struct StopReceiver {
    rx: mpsc::Receiver<()>,
    stopped: bool,
}

/// Create a one-message stop channel.
pub fn stop_channel() -> (StopSender, StopReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (
        StopSender { tx },
        StopReceiver { rx, stopped: false },
    )
}

impl StopSender {
    /// Deliver the stop message. A full channel or a dropped receiver both
    /// mean the worker is already stopping, so neither is reported.
    pub fn stop(&self) {
        if self.tx.try_send(()).is_err() {
            log::debug!("stop message not delivered; receiver already stopping");
        }
    }
}

impl StopCheck for StopReceiver {
    fn should_stop(&mut self) -> bool {
        if !self.stopped {
            self.stopped = matches!(
                self.rx.try_recv(),
                Ok(()) | Err(mpsc::error::TryRecvError::Disconnected)
            );
        }
        self.stopped
    }
}
