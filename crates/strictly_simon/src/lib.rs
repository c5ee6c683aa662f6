//! Strictly Simon - the memory-sequence game as a pure state machine.
//!
//! The machine plays an ever-growing sequence of signals; the player must
//! reproduce it exactly, and a mistake resets progress.
//!
//! # Architecture
//!
//! - **Signals**: the fixed set of four signals ([`SignalSet`])
//! - **Generator**: grows the sequence by one random signal per round
//! - **Playback**: timed replay through an injected [`Scheduler`]
//! - **Validator**: checks the player's reproduction signal by signal
//! - **Session**: [`GameSession`] owns all state and drives the round loop
//!
//! Nothing here blocks or owns a clock. Rendering goes through the
//! [`Presenter`] trait and time through the [`Scheduler`] trait, so the
//! same session runs under a tokio event loop or a [`VirtualScheduler`].
//!
//! # Example
//!
//! ```
//! use strictly_simon::{
//!     GameSession, RandomPicker, RecordingPresenter, SessionPhase, SubmitOutcome,
//!     VirtualScheduler,
//! };
//!
//! let mut session = GameSession::new(
//!     RandomPicker::seeded(7),
//!     VirtualScheduler::new(),
//!     RecordingPresenter::new(),
//! );
//! session.start();
//! session.finish_playback();
//! assert_eq!(session.phase(), SessionPhase::AwaitingInput);
//!
//! let first = session.sequence()[0];
//! assert!(matches!(
//!     session.submit_signal(first),
//!     SubmitOutcome::RoundComplete { new_length: 2 }
//! ));
//! assert_eq!(session.score(), 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod generator;
mod invariants;
mod playback;
mod presenter;
mod scheduler;
mod session;
mod signal;
mod validator;

// Crate-level exports - Signals
pub use signal::{Signal, SignalParseError, SignalSet, SignalSetError};

// Crate-level exports - Sequence generation
pub use generator::{RandomPicker, ScriptedPicker, SequenceGenerator, SignalPicker};

// Crate-level exports - Scheduling and playback
pub use playback::{DEFAULT_GAP, DEFAULT_HIGHLIGHT, PlaybackController, PlaybackProgress, PlaybackTiming};
pub use scheduler::{PlaybackId, Scheduler, TimerToken, VirtualScheduler};

// Crate-level exports - Input validation
pub use validator::{InputValidator, Verdict};

// Crate-level exports - Presentation
pub use presenter::{Presenter, PresenterEvent, RecordingPresenter};

// Crate-level exports - Session
pub use session::{GameSession, SessionPhase, SessionState, SubmitOutcome};

// Crate-level exports - Invariants
pub use invariants::{
    Invariant, InvariantSet, InvariantViolation, MovesPrefixInvariant, PlaybackGateInvariant,
    SessionInvariants, TurnNumberInvariant,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, RulesConfig, ScoringMode, SimonConfig, TimingConfig};
