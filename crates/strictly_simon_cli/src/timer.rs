//! Tokio-backed scheduler for the interactive game.

use std::time::Duration;
use strictly_simon::{PlaybackId, Scheduler, TimerToken};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

/// Delivers timer tokens over a channel after a real delay.
///
/// Each wake-up is a spawned sleep; the event loop drains the receiver and
/// hands tokens back to the session, so all game logic stays on one task.
#[derive(Debug)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<TimerToken>,
    pending: Vec<(PlaybackId, AbortHandle)>,
}

impl TokioScheduler {
    /// Creates a scheduler and the receiver its tokens arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                pending: Vec::new(),
            },
            rx,
        )
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, token: TimerToken) {
        self.pending.retain(|(_, handle)| !handle.is_finished());

        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(token).is_err() {
                warn!(?token, "Timer channel closed");
            }
        });
        self.pending.push((token.playback, handle.abort_handle()));
    }

    fn cancel(&mut self, playback: PlaybackId) {
        self.pending.retain(|(id, handle)| {
            if *id == playback {
                handle.abort();
                false
            } else {
                !handle.is_finished()
            }
        });
        debug!(%playback, "Aborted pending timers");
    }
}
