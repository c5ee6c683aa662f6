//! The game session: owns all mutable state and drives the round loop.
//!
//! ```text
//! Idle ──start──▶ Playing ──playback done──▶ AwaitingInput
//!                    ▲                            │
//!                    ├──── round complete ◀───────┤
//!                    └──── mismatch (reset) ◀─────┘
//! ```

use crate::config::{RulesConfig, ScoringMode, SimonConfig};
use crate::generator::{SequenceGenerator, SignalPicker};
use crate::invariants::assert_invariants;
use crate::playback::{PlaybackController, PlaybackProgress, PlaybackTiming};
use crate::presenter::Presenter;
use crate::scheduler::{Scheduler, TimerToken, VirtualScheduler};
use crate::signal::{Signal, SignalSet};
use crate::validator::{InputValidator, Verdict};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Where the session is in its round loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum SessionPhase {
    /// Not started yet.
    #[display("idle")]
    Idle,
    /// Replaying the sequence; input is ignored.
    #[display("playing")]
    Playing,
    /// Waiting for the player to reproduce the sequence.
    #[display("awaiting input")]
    AwaitingInput,
}

/// Snapshot of all mutable game state.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SessionState {
    /// Round loop position.
    pub(crate) phase: SessionPhase,
    /// Signals generated so far.
    pub(crate) sequence: Vec<Signal>,
    /// The player's attempt at this round.
    pub(crate) player_moves: Vec<Signal>,
    /// Points earned since the last start.
    pub(crate) score: u32,
    /// Playback position within the sequence; 0 when not playing.
    pub(crate) turn_number: usize,
    /// True while playback runs (the input gate).
    pub(crate) turn_in_progress: bool,
    /// Most recent signal accepted from the player, right or wrong.
    pub(crate) last_signal: Option<Signal>,
    /// Mistakes since the last start.
    pub(crate) failures: u32,
}

impl SessionState {
    fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            sequence: Vec::new(),
            player_moves: Vec::new(),
            score: 0,
            turn_number: 0,
            turn_in_progress: false,
            last_signal: None,
            failures: 0,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened to a submitted signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    /// Not awaiting input; nothing changed.
    Ignored,
    /// Right signal, round continues.
    Correct {
        /// Index of the matched signal.
        position: usize,
    },
    /// Whole sequence reproduced; a longer one is now playing.
    RoundComplete {
        /// Length of the new sequence.
        new_length: usize,
    },
    /// Wrong signal; the round was reset.
    Mismatch {
        /// Index of the wrong signal.
        position: usize,
        /// Signal the sequence held there.
        expected: Signal,
        /// Signal the player gave.
        actual: Signal,
    },
    /// Signal given after the sequence was already complete; the round was reset.
    Overflow {
        /// Index of the extra signal.
        position: usize,
    },
}

/// One player's game, from first start to the next reset.
///
/// Generic over its collaborators: `P` picks new signals, `S` schedules
/// playback wake-ups, `V` presents the game.
#[derive(Debug)]
pub struct GameSession<P, S, V> {
    generator: SequenceGenerator<P>,
    playback: PlaybackController,
    scheduler: S,
    presenter: V,
    rules: RulesConfig,
    state: SessionState,
    listeners_attached: bool,
}

impl<P, S, V> GameSession<P, S, V>
where
    P: SignalPicker,
    S: Scheduler,
    V: Presenter,
{
    /// Creates an idle session with default timing and rules.
    #[instrument(skip_all)]
    pub fn new(picker: P, scheduler: S, presenter: V) -> Self {
        Self::with_parts(
            SignalSet::default(),
            PlaybackTiming::default(),
            RulesConfig::default(),
            picker,
            scheduler,
            presenter,
        )
    }

    /// Creates an idle session from configuration.
    #[instrument(skip_all, fields(scoring = %config.rules().scoring()))]
    pub fn from_config(config: &SimonConfig, picker: P, scheduler: S, presenter: V) -> Self {
        Self::with_parts(
            SignalSet::default(),
            config.timing().to_timing(),
            *config.rules(),
            picker,
            scheduler,
            presenter,
        )
    }

    /// Creates an idle session from explicit parts.
    pub fn with_parts(
        signals: SignalSet,
        timing: PlaybackTiming,
        rules: RulesConfig,
        picker: P,
        scheduler: S,
        presenter: V,
    ) -> Self {
        debug!(?timing, ?rules, "Creating game session");
        Self {
            generator: SequenceGenerator::new(signals, picker),
            playback: PlaybackController::new(timing),
            scheduler,
            presenter,
            rules,
            state: SessionState::new(),
            listeners_attached: false,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Round loop position.
    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// Current score.
    pub fn score(&self) -> u32 {
        self.state.score
    }

    /// Signals generated so far.
    pub fn sequence(&self) -> &[Signal] {
        &self.state.sequence
    }

    /// True while playback runs.
    pub fn is_turn_in_progress(&self) -> bool {
        self.state.turn_in_progress
    }

    /// The signal set in play.
    pub fn signals(&self) -> &SignalSet {
        self.generator.signals()
    }

    /// Playback durations.
    pub fn timing(&self) -> &PlaybackTiming {
        self.playback.timing()
    }

    /// The presenter.
    pub fn presenter(&self) -> &V {
        &self.presenter
    }

    /// The presenter, mutably.
    pub fn presenter_mut(&mut self) -> &mut V {
        &mut self.presenter
    }

    /// The scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Starts a new game from any phase.
    ///
    /// Any running playback is cancelled first. Score, sequence, player moves
    /// and turn number are cleared, then the first signal is generated and
    /// played.
    #[instrument(skip(self), fields(phase = %self.state.phase))]
    pub fn start(&mut self) {
        if let Some(cancelled) = self.playback.cancel(&mut self.scheduler, &mut self.presenter) {
            info!(%cancelled, "Restart interrupted playback");
        }

        if !self.listeners_attached {
            for &signal in self.generator.signals().list() {
                self.presenter.listener_attached(signal);
            }
            self.listeners_attached = true;
        }

        self.state.score = 0;
        self.state.failures = 0;
        self.state.sequence.clear();
        self.state.turn_number = 0;
        self.presenter.score_changed(0);

        info!("New game started");
        self.begin_round();
    }

    /// Alias for [`start`](Self::start).
    pub fn reset(&mut self) {
        self.start();
    }

    /// Handles a player's signal. A no-op unless awaiting input.
    #[instrument(skip(self), fields(phase = %self.state.phase))]
    pub fn submit_signal(&mut self, signal: Signal) -> SubmitOutcome {
        if self.state.phase != SessionPhase::AwaitingInput {
            debug!("Input ignored outside of the player's turn");
            return SubmitOutcome::Ignored;
        }

        self.state.last_signal = Some(signal);
        let verdict = InputValidator::submit(&mut self.state.player_moves, &self.state.sequence, signal);

        let outcome = match verdict {
            Verdict::Correct { position } => {
                self.award(verdict);
                SubmitOutcome::Correct { position }
            }
            Verdict::RoundComplete => {
                self.award(verdict);
                info!(length = self.state.sequence.len(), score = self.state.score, "Round complete");
                self.begin_round();
                SubmitOutcome::RoundComplete {
                    new_length: self.state.sequence.len(),
                }
            }
            Verdict::Mismatch {
                position,
                expected,
                actual,
            } => {
                info!(position, %expected, %actual, "Wrong signal");
                self.fail_round();
                SubmitOutcome::Mismatch {
                    position,
                    expected,
                    actual,
                }
            }
            Verdict::Overflow { position } => {
                warn!(position, "Signal past the end of the sequence");
                self.fail_round();
                SubmitOutcome::Overflow { position }
            }
        };

        assert_invariants(&self.state);
        outcome
    }

    /// Delivers a scheduler wake-up to playback.
    #[instrument(skip(self))]
    pub fn on_timer(&mut self, token: TimerToken) -> PlaybackProgress {
        let progress = self
            .playback
            .advance(token, &mut self.scheduler, &mut self.presenter);

        match progress {
            PlaybackProgress::Continuing => {
                self.state.turn_number = self.playback.turn_number();
            }
            PlaybackProgress::Completed => {
                self.state.turn_number = 0;
                self.state.turn_in_progress = false;
                self.state.phase = SessionPhase::AwaitingInput;
                debug!(length = self.state.sequence.len(), "Awaiting player input");
                self.presenter.input_ready();
            }
            PlaybackProgress::Stale => {}
        }

        assert_invariants(&self.state);
        progress
    }

    fn award(&mut self, verdict: Verdict) {
        let points = match (*self.rules.scoring(), verdict) {
            (ScoringMode::PerSignal, _) => 1,
            (ScoringMode::PerRound, Verdict::RoundComplete) => 1,
            (ScoringMode::PerRound, _) => 0,
        };
        if points > 0 {
            self.state.score += points;
            self.presenter.score_changed(self.state.score);
        }
    }

    fn fail_round(&mut self) {
        self.state.failures += 1;
        self.presenter.round_failed();

        if *self.rules.reset_score_on_failure() {
            self.state.score = 0;
            self.presenter.score_changed(0);
        }

        self.state.sequence.clear();
        self.begin_round();
    }

    fn begin_round(&mut self) {
        self.state.player_moves.clear();
        self.generator.extend(&mut self.state.sequence);

        self.state.phase = SessionPhase::Playing;
        self.state.turn_in_progress = true;
        self.state.turn_number = 0;
        self.playback
            .play(&self.state.sequence, &mut self.scheduler, &mut self.presenter);

        assert_invariants(&self.state);
    }
}

impl<P, V> GameSession<P, VirtualScheduler, V>
where
    P: SignalPicker,
    V: Presenter,
{
    /// Moves virtual time forward, firing every timer that falls due.
    ///
    /// Returns the number of timers fired.
    pub fn advance(&mut self, by: Duration) -> usize {
        let until = self.scheduler.now() + by;
        let mut fired = 0;
        while let Some(token) = self.scheduler.pop_due(until) {
            self.on_timer(token);
            fired += 1;
        }
        self.scheduler.settle(until);
        fired
    }

    /// Runs virtual time until the current playback completes.
    ///
    /// Returns the virtual time that elapsed.
    pub fn finish_playback(&mut self) -> Duration {
        let started = self.scheduler.now();
        while self.playback.is_active() {
            match self.scheduler.pop_due(Duration::MAX) {
                Some(token) => {
                    self.on_timer(token);
                }
                None => break,
            }
        }
        self.scheduler.now() - started
    }
}
