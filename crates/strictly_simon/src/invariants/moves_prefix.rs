//! Player moves invariant: the attempt so far is a prefix of the sequence.

use super::Invariant;
use crate::session::SessionState;

/// Invariant: player moves never outrun or contradict the sequence.
///
/// Between submissions `len(player_moves) <= len(sequence)` and every move
/// equals the sequence entry at its index. A wrong move resets the round
/// before control returns, so a contradicting move is never observable.
pub struct MovesPrefixInvariant;

impl Invariant<SessionState> for MovesPrefixInvariant {
    fn holds(state: &SessionState) -> bool {
        let moves = state.player_moves();
        let sequence = state.sequence();
        moves.len() <= sequence.len() && sequence.starts_with(moves)
    }

    fn description() -> &'static str {
        "Player moves are a prefix of the sequence"
    }
}
