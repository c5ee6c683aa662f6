//! Sequence growth: one random signal per round.

use crate::signal::{Signal, SignalSet};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Source of the next signal appended to the sequence.
pub trait SignalPicker {
    /// Picks one signal from the set.
    fn pick(&mut self, signals: &SignalSet) -> Signal;
}

/// Uniform picker backed by any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RandomPicker<R> {
    rng: R,
}

impl<R: Rng> RandomPicker<R> {
    /// Wraps a random number generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomPicker<StdRng> {
    /// Deterministic picker for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Picker seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> SignalPicker for RandomPicker<R> {
    fn pick(&mut self, signals: &SignalSet) -> Signal {
        // SignalSet always holds four entries
        signals
            .list()
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Signal::Green)
    }
}

/// Picker that replays a fixed script, cycling when it runs out.
///
/// Used to make sessions fully predictable.
#[derive(Debug, Clone)]
pub struct ScriptedPicker {
    script: VecDeque<Signal>,
}

impl ScriptedPicker {
    /// Creates a picker that yields `script` in order.
    ///
    /// An empty script falls back to the first signal of the set.
    pub fn new(script: impl IntoIterator<Item = Signal>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl SignalPicker for ScriptedPicker {
    fn pick(&mut self, signals: &SignalSet) -> Signal {
        match self.script.pop_front() {
            Some(signal) => {
                self.script.push_back(signal);
                signal
            }
            None => signals.list()[0],
        }
    }
}

/// Appends uniformly chosen signals to a sequence.
#[derive(Debug, Clone)]
pub struct SequenceGenerator<P> {
    signals: SignalSet,
    picker: P,
}

impl<P: SignalPicker> SequenceGenerator<P> {
    /// Creates a generator over a signal set.
    pub fn new(signals: SignalSet, picker: P) -> Self {
        Self { signals, picker }
    }

    /// Returns the signal set.
    pub fn signals(&self) -> &SignalSet {
        &self.signals
    }

    /// Appends one signal, keeping the existing prefix untouched.
    #[instrument(skip(self, sequence), fields(len = sequence.len()))]
    pub fn extend(&mut self, sequence: &mut Vec<Signal>) -> Signal {
        let signal = self.picker.pick(&self.signals);
        sequence.push(signal);
        debug!(%signal, new_len = sequence.len(), "Extended sequence");
        signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_extend_preserves_prefix() {
        let mut generator = SequenceGenerator::new(SignalSet::default(), RandomPicker::seeded(7));
        let mut sequence = vec![Signal::Blue, Signal::Red];
        generator.extend(&mut sequence);
        assert_eq!(sequence.len(), 3);
        assert_eq!(&sequence[..2], &[Signal::Blue, Signal::Red]);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SequenceGenerator::new(SignalSet::default(), RandomPicker::seeded(99));
        let mut b = SequenceGenerator::new(SignalSet::default(), RandomPicker::seeded(99));
        let (mut sa, mut sb) = (Vec::new(), Vec::new());
        for _ in 0..20 {
            a.extend(&mut sa);
            b.extend(&mut sb);
        }
        assert_eq!(sa, sb);
    }

    #[test]
    fn test_random_picker_covers_every_signal() {
        let mut picker = RandomPicker::seeded(1);
        let set = SignalSet::default();
        let mut counts: HashMap<Signal, usize> = HashMap::new();
        for _ in 0..4000 {
            *counts.entry(picker.pick(&set)).or_default() += 1;
        }
        assert_eq!(counts.len(), 4);
        // Uniform: each near 1000
        for count in counts.values() {
            assert!((800..1200).contains(count), "skewed count {count}");
        }
    }

    #[test]
    fn test_scripted_picker_cycles() {
        let mut picker = ScriptedPicker::new([Signal::Red, Signal::Blue]);
        let set = SignalSet::default();
        let picked: Vec<_> = (0..5).map(|_| picker.pick(&set)).collect();
        assert_eq!(
            picked,
            [Signal::Red, Signal::Blue, Signal::Red, Signal::Blue, Signal::Red]
        );
    }

    #[test]
    fn test_empty_script_uses_first_signal() {
        let set = SignalSet::new([Signal::Yellow, Signal::Green, Signal::Red, Signal::Blue])
            .expect("distinct");
        let mut picker = ScriptedPicker::new([]);
        assert_eq!(picker.pick(&set), Signal::Yellow);
    }
}
