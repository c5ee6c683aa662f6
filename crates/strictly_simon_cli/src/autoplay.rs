//! Simulated games on the virtual clock.

use crate::play::picker_for;
use derive_more::Display;
use std::time::Duration;
use strictly_simon::{GameSession, Presenter, Signal, SimonConfig, SubmitOutcome, VirtualScheduler};
use tracing::{debug, info, instrument};

/// Presenter that only tallies highlights, so long runs stay small.
#[derive(Debug, Clone, Copy, Default)]
pub struct TallyPresenter {
    shown: usize,
}

impl TallyPresenter {
    /// Highlights started so far.
    pub fn shown(&self) -> usize {
        self.shown
    }
}

impl Presenter for TallyPresenter {
    fn highlight_start(&mut self, _signal: Signal) {
        self.shown += 1;
    }

    fn highlight_end(&mut self, _signal: Signal) {}

    fn score_changed(&mut self, score: u32) {
        debug!(score, "Score changed");
    }

    fn round_failed(&mut self) {
        debug!("Round failed");
    }
}

/// Summary of a simulated game.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(
    "rounds completed: {rounds_completed}\nscore: {score}\nsequence length: {final_length}\nfailures: {failures}\nsignals shown: {signals_shown}\nvirtual time: {elapsed:?}"
)]
pub struct AutoplayReport {
    /// Rounds reproduced without a mistake.
    pub rounds_completed: usize,
    /// Score at the end.
    pub score: u32,
    /// Length of the sequence left playing.
    pub final_length: usize,
    /// Deliberate mistakes made.
    pub failures: u32,
    /// Highlights the presenter received.
    pub signals_shown: usize,
    /// Virtual time spent.
    pub elapsed: Duration,
}

/// Plays `rounds` rounds with perfect memory, slipping once when the sequence
/// reaches `fail_at` signals.
#[instrument(skip(config))]
pub fn run_autoplay(config: &SimonConfig, rounds: usize, fail_at: Option<usize>) -> AutoplayReport {
    let mut session = GameSession::from_config(
        config,
        picker_for(config),
        VirtualScheduler::new(),
        TallyPresenter::default(),
    );
    session.start();

    let mut rounds_completed = 0;
    let mut slipped = false;

    while rounds_completed < rounds {
        session.finish_playback();
        let sequence = session.sequence().to_vec();

        if !slipped && fail_at == Some(sequence.len()) {
            let expected = sequence[0];
            let wrong = Signal::ALL
                .into_iter()
                .find(|s| *s != expected)
                .unwrap_or(expected);
            session.submit_signal(wrong);
            slipped = true;
            info!(length = sequence.len(), "Made a deliberate mistake");
            continue;
        }

        for signal in sequence {
            if let SubmitOutcome::RoundComplete { .. } = session.submit_signal(signal) {
                rounds_completed += 1;
            }
        }
    }

    let report = AutoplayReport {
        rounds_completed,
        score: session.score(),
        final_length: session.sequence().len(),
        failures: *session.state().failures(),
        signals_shown: session.presenter().shown(),
        elapsed: session.scheduler().now(),
    };
    info!(?report, "Autoplay finished");
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimonConfig {
        SimonConfig::default().with_seed(Some(3))
    }

    #[test]
    fn test_perfect_run() {
        let report = run_autoplay(&config(), 5, None);
        assert_eq!(report.rounds_completed, 5);
        assert_eq!(report.score, 1 + 2 + 3 + 4 + 5);
        assert_eq!(report.final_length, 6);
        assert_eq!(report.failures, 0);
        assert_eq!(report.signals_shown, 15);
        assert_eq!(report.elapsed, Duration::from_millis(800 * 15));
    }

    #[test]
    fn test_one_slip_restarts_sequence_but_keeps_score() {
        let report = run_autoplay(&config(), 5, Some(3));
        assert_eq!(report.failures, 1);
        // Rounds of length 1, 2 then 1, 2, 3 after the slip
        assert_eq!(report.score, 3 + 6);
        assert_eq!(report.final_length, 4);
    }

    #[test]
    fn test_same_seed_same_report() {
        assert_eq!(run_autoplay(&config(), 4, Some(2)), run_autoplay(&config(), 4, Some(2)));
    }

    #[test]
    fn test_tally_presenter_counts_only_highlights() {
        let mut presenter = TallyPresenter::default();
        presenter.highlight_start(Signal::Red);
        presenter.highlight_end(Signal::Red);
        presenter.score_changed(1);
        presenter.round_failed();
        presenter.highlight_start(Signal::Blue);
        assert_eq!(presenter.shown(), 2);
    }

    #[test]
    fn test_long_run_counts_every_highlight() {
        let rounds = 200;
        let report = run_autoplay(&config(), rounds, None);
        assert_eq!(report.rounds_completed, rounds);
        assert_eq!(report.signals_shown, rounds * (rounds + 1) / 2);
        assert_eq!(report.final_length, rounds + 1);
    }

    #[test]
    fn test_report_display() {
        let text = run_autoplay(&config(), 1, None).to_string();
        assert!(text.contains("rounds completed: 1"));
        assert!(text.contains("score: 1"));
    }
}
