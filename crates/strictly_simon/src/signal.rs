//! Signal identifiers and the fixed set a session plays with.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// One of the four stimuli the game can highlight or the player can activate.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    /// First button (top-left).
    #[display("green")]
    Green,
    /// Second button (top-right).
    #[display("red")]
    Red,
    /// Third button (bottom-left).
    #[display("yellow")]
    Yellow,
    /// Fourth button (bottom-right).
    #[display("blue")]
    Blue,
}

impl Signal {
    /// All signals in button order.
    pub const ALL: [Signal; 4] = [Signal::Green, Signal::Red, Signal::Yellow, Signal::Blue];

    /// Zero-based button index.
    pub fn index(self) -> usize {
        match self {
            Signal::Green => 0,
            Signal::Red => 1,
            Signal::Yellow => 2,
            Signal::Blue => 3,
        }
    }

    /// Creates a signal from its zero-based button index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Element identifier used by the presentation layer (`button1`..`button4`).
    pub fn id(self) -> &'static str {
        match self {
            Signal::Green => "button1",
            Signal::Red => "button2",
            Signal::Yellow => "button3",
            Signal::Blue => "button4",
        }
    }
}

/// Error returned when text does not name a signal.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Unknown signal: {input:?}")]
pub struct SignalParseError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for Signal {
    type Err = SignalParseError;

    /// Accepts `1`-`4`, `button1`-`button4`, or a colour name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();

        if let Ok(number) = trimmed.parse::<usize>() {
            return number
                .checked_sub(1)
                .and_then(Signal::from_index)
                .ok_or_else(|| SignalParseError { input: s.to_string() });
        }

        <Signal as strum::IntoEnumIterator>::iter()
            .find(|signal| signal.id() == trimmed || signal.to_string() == trimmed)
            .ok_or_else(|| SignalParseError { input: s.to_string() })
    }
}

/// Error building a [`SignalSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SignalSetError {
    /// The same signal appears more than once.
    #[display("Signal {_0} appears more than once")]
    Duplicate(#[error(not(source))] Signal),
}

/// The ordered, immutable set of signals available to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSet {
    signals: [Signal; 4],
}

impl SignalSet {
    /// Builds a set from a caller-chosen order, rejecting duplicates.
    #[instrument]
    pub fn new(signals: [Signal; 4]) -> Result<Self, SignalSetError> {
        for (i, signal) in signals.iter().enumerate() {
            if signals[..i].contains(signal) {
                return Err(SignalSetError::Duplicate(*signal));
            }
        }
        Ok(Self { signals })
    }

    /// Returns the signals in order.
    pub fn list(&self) -> &[Signal] {
        &self.signals
    }
}

impl Default for SignalSet {
    fn default() -> Self {
        Self {
            signals: Signal::ALL,
        }
    }
}
