//! Input gate invariant: the busy flag tracks the playing phase.

use super::Invariant;
use crate::session::{SessionPhase, SessionState};

/// Invariant: `turn_in_progress` is set exactly while the session is playing back.
pub struct PlaybackGateInvariant;

impl Invariant<SessionState> for PlaybackGateInvariant {
    fn holds(state: &SessionState) -> bool {
        *state.turn_in_progress() == (*state.phase() == SessionPhase::Playing)
    }

    fn description() -> &'static str {
        "Input gate is closed exactly while playback runs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_matches_phase() {
        let state = SessionState {
            phase: SessionPhase::Playing,
            turn_in_progress: true,
            ..SessionState::default()
        };
        assert!(PlaybackGateInvariant::holds(&state));
    }

    #[test]
    fn test_open_gate_while_playing_violates() {
        let state = SessionState {
            phase: SessionPhase::Playing,
            turn_in_progress: false,
            ..SessionState::default()
        };
        assert!(!PlaybackGateInvariant::holds(&state));
    }
}
