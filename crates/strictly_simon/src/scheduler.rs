//! Timer abstraction for cooperative playback scheduling.
//!
//! The core never sleeps. Each wait in playback is a [`TimerToken`] handed
//! to a [`Scheduler`], and the driver delivers the token back to
//! [`GameSession::on_timer`](crate::GameSession::on_timer) once it is due.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Identifies one playback run. A new id is issued for every `play`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[display("playback#{_0}")]
pub struct PlaybackId(pub u64);

/// A scheduled wake-up for a playback run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_new::new,
)]
pub struct TimerToken {
    /// Playback the wake-up belongs to.
    pub playback: PlaybackId,
    /// Step counter within that playback.
    pub step: u32,
}

/// Clock collaborator: arranges for a token to be delivered later.
pub trait Scheduler {
    /// Requests delivery of `token` after `delay`.
    fn schedule(&mut self, delay: Duration, token: TimerToken);

    /// Drops any pending wake-ups for a playback.
    ///
    /// Stale tokens are also filtered by the playback controller, so
    /// schedulers that cannot cancel may leave this as a no-op.
    fn cancel(&mut self, _playback: PlaybackId) {}
}

/// Manually advanced virtual clock.
///
/// Nothing fires until the owner advances time, which makes playback
/// fully deterministic in tests and simulations.
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now: Duration,
    seq: u64,
    pending: BinaryHeap<Reverse<(Duration, u64, TimerToken)>>,
}

impl VirtualScheduler {
    /// Creates a clock at time zero with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of wake-ups still pending.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Due time of the earliest pending wake-up.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.peek().map(|Reverse((due, _, _))| *due)
    }

    /// Pops the earliest wake-up due at or before `until`, moving the clock to it.
    #[instrument(skip(self), fields(now = ?self.now))]
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerToken> {
        match self.next_due() {
            Some(due) if due <= until => {
                let Reverse((due, _, token)) = self.pending.pop()?;
                self.now = self.now.max(due);
                debug!(?token, ?due, "Timer fired");
                Some(token)
            }
            _ => None,
        }
    }

    /// Moves the clock forward to `until` without firing anything.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule(&mut self, delay: Duration, token: TimerToken) {
        let due = self.now + delay;
        self.seq += 1;
        self.pending.push(Reverse((due, self.seq, token)));
    }

    fn cancel(&mut self, playback: PlaybackId) {
        let before = self.pending.len();
        self.pending
            .retain(|Reverse((_, _, token))| token.playback != playback);
        debug!(%playback, dropped = before - self.pending.len(), "Cancelled pending timers");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(playback: u64, step: u32) -> TimerToken {
        TimerToken::new(PlaybackId(playback), step)
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut clock = VirtualScheduler::new();
        clock.schedule(Duration::from_millis(300), token(1, 1));
        clock.schedule(Duration::from_millis(100), token(1, 0));

        let until = Duration::from_secs(1);
        assert_eq!(clock.pop_due(until), Some(token(1, 0)));
        assert_eq!(clock.now(), Duration::from_millis(100));
        assert_eq!(clock.pop_due(until), Some(token(1, 1)));
        assert_eq!(clock.pop_due(until), None);
    }

    #[test]
    fn test_equal_due_times_keep_insertion_order() {
        let mut clock = VirtualScheduler::new();
        clock.schedule(Duration::from_millis(50), token(1, 7));
        clock.schedule(Duration::from_millis(50), token(1, 3));
        let until = Duration::from_millis(50);
        assert_eq!(clock.pop_due(until), Some(token(1, 7)));
        assert_eq!(clock.pop_due(until), Some(token(1, 3)));
    }

    #[test]
    fn test_not_due_yet() {
        let mut clock = VirtualScheduler::new();
        clock.schedule(Duration::from_millis(500), token(1, 0));
        assert_eq!(clock.pop_due(Duration::from_millis(499)), None);
        assert_eq!(clock.pending(), 1);
    }

    #[test]
    fn test_cancel_drops_only_that_playback() {
        let mut clock = VirtualScheduler::new();
        clock.schedule(Duration::from_millis(10), token(1, 0));
        clock.schedule(Duration::from_millis(20), token(2, 0));
        clock.cancel(PlaybackId(1));
        assert_eq!(clock.pending(), 1);
        assert_eq!(clock.pop_due(Duration::from_secs(1)), Some(token(2, 0)));
    }

    #[test]
    fn test_schedule_is_relative_to_now() {
        let mut clock = VirtualScheduler::new();
        clock.settle(Duration::from_secs(2));
        clock.schedule(Duration::from_millis(250), token(1, 0));
        assert_eq!(clock.next_due(), Some(Duration::from_millis(2250)));
    }
}
