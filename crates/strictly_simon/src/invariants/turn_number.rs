//! Turn number invariant: zero unless playback is running.

use super::Invariant;
use crate::session::{SessionPhase, SessionState};

/// Invariant: the turn number is 0 outside playback and within the sequence during it.
pub struct TurnNumberInvariant;

impl Invariant<SessionState> for TurnNumberInvariant {
    fn holds(state: &SessionState) -> bool {
        match state.phase() {
            SessionPhase::Playing => *state.turn_number() <= state.sequence().len(),
            SessionPhase::Idle | SessionPhase::AwaitingInput => *state.turn_number() == 0,
        }
    }

    fn description() -> &'static str {
        "Turn number is 0 when not playing back and never exceeds the sequence"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Signal;

    #[test]
    fn test_idle_zero_holds() {
        assert!(TurnNumberInvariant::holds(&SessionState::default()));
    }

    #[test]
    fn test_playing_within_sequence_holds() {
        let state = SessionState {
            phase: SessionPhase::Playing,
            sequence: vec![Signal::Red, Signal::Green],
            turn_number: 1,
            turn_in_progress: true,
            ..SessionState::default()
        };
        assert!(TurnNumberInvariant::holds(&state));
    }

    #[test]
    fn test_awaiting_with_nonzero_turn_violates() {
        let state = SessionState {
            phase: SessionPhase::AwaitingInput,
            sequence: vec![Signal::Red, Signal::Green],
            turn_number: 1,
            ..SessionState::default()
        };
        assert!(!TurnNumberInvariant::holds(&state));
    }
}
