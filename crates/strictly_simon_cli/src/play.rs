//! Interactive game loop.

use crate::input::{PlayerCommand, parse_command};
use crate::terminal::{CONTROLS, TerminalPresenter};
use crate::timer::TokioScheduler;
use anyhow::Result;
use rand::rngs::StdRng;
use std::io::{Stdout, Write};
use strictly_simon::{GameSession, RandomPicker, Scheduler, SignalPicker, SimonConfig, SubmitOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};

type TerminalSession = GameSession<RandomPicker<StdRng>, TokioScheduler, TerminalPresenter<Stdout>>;

/// Builds the picker the config asks for.
pub fn picker_for(config: &SimonConfig) -> RandomPicker<StdRng> {
    match config.seed() {
        Some(seed) => {
            info!(seed, "Using seeded signal picker");
            RandomPicker::seeded(*seed)
        }
        None => RandomPicker::from_entropy(),
    }
}

/// Runs the game on the terminal until the player quits or stdin closes.
///
/// Timer wake-ups and typed lines are multiplexed on the current task, so
/// the session is only ever touched from here.
#[instrument(skip(config))]
pub async fn run_play(config: SimonConfig) -> Result<()> {
    let (scheduler, mut timers) = TokioScheduler::new();
    let presenter = TerminalPresenter::new(std::io::stdout());
    let mut session: TerminalSession =
        GameSession::from_config(&config, picker_for(&config), scheduler, presenter);

    session.presenter_mut().message("Watch the sequence, then repeat it.");
    session.presenter_mut().message(CONTROLS);
    session.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Some(token) = timers.recv() => {
                session.on_timer(token);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                if !handle_line(&mut session, &line) {
                    break;
                }
            }
        }
    }

    let score = session.score();
    session
        .presenter_mut()
        .message(&format!("Final score: {score}. Thanks for playing!"));
    info!(score, "Game ended");
    Ok(())
}

/// Applies one typed line. Returns false when the player wants to quit.
fn handle_line<P, S, W>(session: &mut GameSession<P, S, TerminalPresenter<W>>, line: &str) -> bool
where
    P: SignalPicker,
    S: Scheduler,
    W: Write,
{
    match parse_command(line) {
        Ok(PlayerCommand::Quit) => return false,
        Ok(PlayerCommand::NewGame) => session.start(),
        Ok(PlayerCommand::Help) => session.presenter_mut().message(CONTROLS),
        Ok(PlayerCommand::Empty) => {}
        Ok(PlayerCommand::Signals(signals)) => {
            for signal in signals {
                match session.submit_signal(signal) {
                    SubmitOutcome::Ignored => {
                        debug!(%signal, "Ignored: sequence still playing");
                    }
                    SubmitOutcome::Correct { .. } => {}
                    // Rest of the line belongs to a round that is over
                    SubmitOutcome::RoundComplete { .. }
                    | SubmitOutcome::Mismatch { .. }
                    | SubmitOutcome::Overflow { .. } => break,
                }
            }
        }
        Err(e) => session.presenter_mut().message(&format!("{e}. Type `help` for controls.")),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_simon::{ScriptedPicker, SessionPhase, Signal, VirtualScheduler};

    type TestSession = GameSession<ScriptedPicker, VirtualScheduler, TerminalPresenter<Vec<u8>>>;

    fn session(script: &[Signal]) -> TestSession {
        let mut session = GameSession::new(
            ScriptedPicker::new(script.iter().copied()),
            VirtualScheduler::new(),
            TerminalPresenter::new(Vec::new()),
        );
        session.start();
        session.finish_playback();
        session
    }

    fn output(session: &TestSession) -> String {
        String::from_utf8_lossy(session.presenter().writer()).into_owned()
    }

    #[test]
    fn test_rest_of_line_dropped_after_round_complete() {
        let mut session = session(&[Signal::Green, Signal::Red]);

        assert!(handle_line(&mut session, "1 1 2"));

        assert_eq!(session.score(), 1);
        assert_eq!(session.state().last_signal(), &Some(Signal::Green));
        assert_eq!(session.sequence(), &[Signal::Green, Signal::Red]);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert!(session.state().player_moves().is_empty());
        assert_eq!(*session.state().failures(), 0);
    }

    #[test]
    fn test_rest_of_line_dropped_after_mismatch() {
        let mut session = session(&[Signal::Green, Signal::Blue]);

        assert!(handle_line(&mut session, "2 1 1"));

        assert_eq!(*session.state().failures(), 1);
        assert_eq!(session.state().last_signal(), &Some(Signal::Red));
        assert_eq!(session.sequence(), &[Signal::Blue]);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_signals_during_playback_change_nothing() {
        let mut session = session(&[Signal::Green, Signal::Red]);
        assert!(handle_line(&mut session, "1"));
        let before = session.state().clone();

        assert!(handle_line(&mut session, "1 2"));

        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_new_restarts_mid_round() {
        let mut session = session(&[Signal::Yellow, Signal::Blue, Signal::Green]);
        assert!(handle_line(&mut session, "3"));
        session.finish_playback();
        assert!(handle_line(&mut session, "3"));
        assert_eq!(session.state().player_moves(), &[Signal::Yellow]);
        assert_eq!(session.score(), 2);

        assert!(handle_line(&mut session, "new"));

        assert_eq!(session.score(), 0);
        assert_eq!(session.sequence(), &[Signal::Green]);
        assert!(session.state().player_moves().is_empty());
        assert_eq!(session.phase(), SessionPhase::Playing);
    }

    #[test]
    fn test_parse_error_prints_hint_and_changes_nothing() {
        let mut session = session(&[Signal::Red]);
        let before = session.state().clone();

        assert!(handle_line(&mut session, "1 purple"));

        assert_eq!(session.state(), &before);
        assert!(output(&session).contains("Type `help` for controls."));
    }

    #[test]
    fn test_quit_stops_the_loop() {
        let mut session = session(&[Signal::Red]);
        assert!(!handle_line(&mut session, "quit"));
        assert!(handle_line(&mut session, ""));
        assert!(handle_line(&mut session, "help"));
        assert_eq!(session.phase(), SessionPhase::AwaitingInput);
        assert!(output(&session).ends_with(&format!("{CONTROLS}\n")));
    }
}
