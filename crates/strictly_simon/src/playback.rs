//! Timed replay of the sequence to the player.
//!
//! Each signal takes one lead-in gap followed by one highlight window:
//!
//! ```text
//! play ──gap──▶ start(s0) ──highlight──▶ end(s0) ──gap──▶ start(s1) ... end(sN) ▶ complete
//! ```

use crate::presenter::Presenter;
use crate::scheduler::{PlaybackId, Scheduler, TimerToken};
use crate::signal::Signal;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default time a signal stays lit.
pub const DEFAULT_HIGHLIGHT: Duration = Duration::from_millis(300);

/// Default pause before each signal lights up.
pub const DEFAULT_GAP: Duration = Duration::from_millis(500);

/// Playback durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize, derive_new::new)]
pub struct PlaybackTiming {
    /// How long a signal stays lit.
    highlight: Duration,
    /// Pause before each signal lights up.
    gap: Duration,
}

impl PlaybackTiming {
    /// Total time to replay `len` signals, or `None` if it overflows.
    pub fn total(&self, len: usize) -> Option<Duration> {
        let per_signal = self.highlight.checked_add(self.gap)?;
        per_signal.checked_mul(u32::try_from(len).ok()?)
    }
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT, DEFAULT_GAP)
    }
}

/// What a timer delivery did to the playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackProgress {
    /// More steps are scheduled.
    Continuing,
    /// The last signal went dark; input may be accepted.
    Completed,
    /// The token belonged to a cancelled or finished playback.
    Stale,
}

#[derive(Debug, Clone)]
struct ActivePlayback {
    id: PlaybackId,
    sequence: Vec<Signal>,
    cursor: usize,
    lit: bool,
    step: u32,
}

impl ActivePlayback {
    fn next_token(&mut self) -> TimerToken {
        self.step += 1;
        TimerToken::new(self.id, self.step)
    }
}

/// Replays a sequence through the presenter, one timed step at a time.
///
/// Only one playback is active at a time. Starting a new one, or calling
/// [`cancel`](Self::cancel), retires the previous id so its late timers
/// are ignored.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    timing: PlaybackTiming,
    last_id: u64,
    active: Option<ActivePlayback>,
}

impl PlaybackController {
    /// Creates an idle controller.
    pub fn new(timing: PlaybackTiming) -> Self {
        Self {
            timing,
            last_id: 0,
            active: None,
        }
    }

    /// Playback durations.
    pub fn timing(&self) -> &PlaybackTiming {
        &self.timing
    }

    /// True while a playback is running (the input gate).
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Position within the sequence being replayed, or 0 when idle.
    pub fn turn_number(&self) -> usize {
        self.active.as_ref().map_or(0, |p| p.cursor)
    }

    /// Starts replaying `sequence`. Any running playback is cancelled first.
    #[instrument(skip_all, fields(len = sequence.len()))]
    pub fn play<S, V>(&mut self, sequence: &[Signal], scheduler: &mut S, presenter: &mut V) -> PlaybackId
    where
        S: Scheduler,
        V: Presenter,
    {
        if let Some(previous) = self.cancel(scheduler, presenter) {
            warn!(%previous, "Playback started while another was running");
        }

        self.last_id += 1;
        let mut playback = ActivePlayback {
            id: PlaybackId(self.last_id),
            sequence: sequence.to_vec(),
            cursor: 0,
            lit: false,
            step: 0,
        };
        let token = playback.next_token();
        scheduler.schedule(self.timing.gap, token);

        info!(playback = %playback.id, "Playback started");
        let id = playback.id;
        self.active = Some(playback);
        id
    }

    /// Handles a timer delivery.
    #[instrument(skip(self, scheduler, presenter))]
    pub fn advance<S, V>(&mut self, token: TimerToken, scheduler: &mut S, presenter: &mut V) -> PlaybackProgress
    where
        S: Scheduler,
        V: Presenter,
    {
        let Some(playback) = self.active.as_mut() else {
            debug!("Timer arrived with no active playback");
            return PlaybackProgress::Stale;
        };
        if playback.id != token.playback || playback.step != token.step {
            debug!(active = %playback.id, "Ignoring stale timer");
            return PlaybackProgress::Stale;
        }

        if playback.lit {
            let signal = playback.sequence[playback.cursor];
            presenter.highlight_end(signal);
            playback.lit = false;
            playback.cursor += 1;
            debug!(%signal, turn = playback.cursor, "Highlight ended");

            if playback.cursor < playback.sequence.len() {
                let next = playback.next_token();
                scheduler.schedule(self.timing.gap, next);
                return PlaybackProgress::Continuing;
            }
        } else if let Some(&signal) = playback.sequence.get(playback.cursor) {
            presenter.highlight_start(signal);
            playback.lit = true;
            debug!(%signal, turn = playback.cursor, "Highlight started");
            let next = playback.next_token();
            scheduler.schedule(self.timing.highlight, next);
            return PlaybackProgress::Continuing;
        }

        info!(playback = %playback.id, "Playback complete");
        self.active = None;
        PlaybackProgress::Completed
    }

    /// Aborts the running playback, switching off a lit signal.
    ///
    /// Returns the id of the aborted playback, if one was running.
    #[instrument(skip_all)]
    pub fn cancel<S, V>(&mut self, scheduler: &mut S, presenter: &mut V) -> Option<PlaybackId>
    where
        S: Scheduler,
        V: Presenter,
    {
        let playback = self.active.take()?;
        if playback.lit {
            presenter.highlight_end(playback.sequence[playback.cursor]);
        }
        scheduler.cancel(playback.id);
        info!(playback = %playback.id, turn = playback.cursor, "Playback cancelled");
        Some(playback.id)
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(PlaybackTiming::default())
    }
}
