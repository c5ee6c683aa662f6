//! Callbacks from the game core to whatever draws it.

use crate::signal::Signal;
use serde::{Deserialize, Serialize};

/// Presentation layer notified by the core.
///
/// All callbacks are fire-and-forget; none of them may block.
pub trait Presenter {
    /// A signal lights up.
    fn highlight_start(&mut self, signal: Signal);

    /// A lit signal goes dark.
    fn highlight_end(&mut self, signal: Signal);

    /// The displayed score should change.
    fn score_changed(&mut self, score: u32);

    /// The player submitted a wrong signal.
    fn round_failed(&mut self);

    /// Playback finished and the player may act.
    fn input_ready(&mut self) {}

    /// Input for `signal` is wired up. Called once per signal per session.
    fn listener_attached(&mut self, _signal: Signal) {}
}

/// A presenter callback, as recorded by [`RecordingPresenter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenterEvent {
    /// [`Presenter::highlight_start`].
    HighlightStart(Signal),
    /// [`Presenter::highlight_end`].
    HighlightEnd(Signal),
    /// [`Presenter::score_changed`].
    ScoreChanged(u32),
    /// [`Presenter::round_failed`].
    RoundFailed,
    /// [`Presenter::input_ready`].
    InputReady,
    /// [`Presenter::listener_attached`].
    ListenerAttached(Signal),
}

/// Presenter that keeps every callback in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    events: Vec<PresenterEvent>,
}

impl RecordingPresenter {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far.
    pub fn events(&self) -> &[PresenterEvent] {
        &self.events
    }

    /// Signals highlighted so far, in order.
    pub fn highlighted(&self) -> Vec<Signal> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::HighlightStart(signal) => Some(*signal),
                _ => None,
            })
            .collect()
    }

    /// Number of times `event` was recorded.
    pub fn count(&self, event: PresenterEvent) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }

    /// Most recent score reported, if any.
    pub fn last_score(&self) -> Option<u32> {
        self.events.iter().rev().find_map(|event| match event {
            PresenterEvent::ScoreChanged(score) => Some(*score),
            _ => None,
        })
    }
}

impl Presenter for RecordingPresenter {
    fn highlight_start(&mut self, signal: Signal) {
        self.events.push(PresenterEvent::HighlightStart(signal));
    }

    fn highlight_end(&mut self, signal: Signal) {
        self.events.push(PresenterEvent::HighlightEnd(signal));
    }

    fn score_changed(&mut self, score: u32) {
        self.events.push(PresenterEvent::ScoreChanged(score));
    }

    fn round_failed(&mut self) {
        self.events.push(PresenterEvent::RoundFailed);
    }

    fn input_ready(&mut self) {
        self.events.push(PresenterEvent::InputReady);
    }

    fn listener_attached(&mut self, signal: Signal) {
        self.events.push(PresenterEvent::ListenerAttached(signal));
    }
}
