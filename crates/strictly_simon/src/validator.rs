//! Checks the player's reproduction one signal at a time.

use crate::signal::Signal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Result of checking one submitted signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Matches the sequence; more signals are expected.
    Correct {
        /// Index of the matched signal.
        position: usize,
    },
    /// Matches the sequence and completes it.
    RoundComplete,
    /// Disagrees with the sequence.
    Mismatch {
        /// Index of the wrong signal.
        position: usize,
        /// Signal the sequence holds there.
        expected: Signal,
        /// Signal the player gave.
        actual: Signal,
    },
    /// Submitted past the end of the sequence; nothing was expected there.
    Overflow {
        /// Index of the extra signal.
        position: usize,
    },
}

/// Stateless comparison of player moves against the sequence.
///
/// The caller owns the input gate: it must not submit while playback runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputValidator;

impl InputValidator {
    /// Appends `signal` to `player_moves` and compares it with `sequence`.
    ///
    /// A submission beyond the end of the sequence is a [`Verdict::Overflow`].
    #[instrument(skip(player_moves, sequence), fields(progress = player_moves.len(), len = sequence.len()))]
    pub fn submit(player_moves: &mut Vec<Signal>, sequence: &[Signal], signal: Signal) -> Verdict {
        player_moves.push(signal);
        let position = player_moves.len() - 1;

        let verdict = match sequence.get(position) {
            Some(&expected) if expected != signal => Verdict::Mismatch {
                position,
                expected,
                actual: signal,
            },
            Some(_) if player_moves.len() == sequence.len() => Verdict::RoundComplete,
            Some(_) => Verdict::Correct { position },
            None => Verdict::Overflow { position },
        };

        debug!(?verdict, "Checked player signal");
        verdict
    }
}
