//! First-class invariants over session state.
//!
//! Each invariant is a logical property of [`SessionState`] that must hold
//! after every transition. They are checked in debug builds and tested
//! independently.

use crate::session::SessionState;
use tracing::warn;

mod moves_prefix;
mod playback_gate;
mod turn_number;

pub use moves_prefix::MovesPrefixInvariant;
pub use playback_gate::PlaybackGateInvariant;
pub use turn_number::TurnNumberInvariant;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{description}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Invariants checked together as one tuple type.
pub trait InvariantSet<S> {
    /// Checks every member, collecting each violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, A, B, C> InvariantSet<S> for (A, B, C)
where
    A: Invariant<S>,
    B: Invariant<S>,
    C: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (A::holds(state), A::description()),
            (B::holds(state), B::description()),
            (C::holds(state), C::description()),
        ]
        .into_iter()
        .filter_map(|(holds, description)| (!holds).then(|| InvariantViolation::new(description)))
        .collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

/// All session invariants as a composable set.
pub type SessionInvariants = (
    MovesPrefixInvariant,
    TurnNumberInvariant,
    PlaybackGateInvariant,
);

/// Asserts that all session invariants hold (panics on violation in debug builds).
pub fn assert_invariants(state: &SessionState) {
    if cfg!(debug_assertions)
        && let Err(violations) = SessionInvariants::check_all(state)
    {
        for violation in &violations {
            warn!(%violation, "Session invariant violated");
        }
        panic!("Session invariants violated: {:?}", violations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionPhase;
    use crate::signal::Signal;

    fn awaiting(sequence: Vec<Signal>, moves: Vec<Signal>) -> SessionState {
        SessionState {
            phase: SessionPhase::AwaitingInput,
            sequence,
            player_moves: moves,
            ..SessionState::default()
        }
    }

    #[test]
    fn test_invariant_set_holds_for_fresh_state() {
        assert!(SessionInvariants::check_all(&SessionState::default()).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_mid_round() {
        let state = awaiting(vec![Signal::Red, Signal::Blue], vec![Signal::Red]);
        assert!(SessionInvariants::check_all(&state).is_ok());
    }

    #[test]
    fn test_invariant_set_collects_every_violation() {
        let mut state = awaiting(vec![Signal::Red], vec![Signal::Blue, Signal::Blue]);
        state.turn_number = 4;

        let violations = SessionInvariants::check_all(&state).expect_err("corrupted state");
        assert_eq!(
            violations,
            vec![
                InvariantViolation::new(MovesPrefixInvariant::description()),
                InvariantViolation::new(TurnNumberInvariant::description()),
            ]
        );
    }

    #[test]
    #[should_panic(expected = "Session invariants violated")]
    fn test_assert_invariants_panics_in_debug() {
        let state = awaiting(vec![Signal::Red], vec![Signal::Green]);
        assert_invariants(&state);
    }
}
