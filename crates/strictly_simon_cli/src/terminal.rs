//! Line-oriented presenter that writes the game to a terminal.

use std::io::Write;
use strictly_simon::{Presenter, Signal};
use tracing::{debug, warn};

/// Controls summary shown at start and on `help`.
pub const CONTROLS: &str =
    "Controls: 1=green 2=red 3=yellow 4=blue (several per line ok), new = restart, quit = leave";

/// Presenter printing highlights, score and prompts as plain lines.
#[derive(Debug)]
pub struct TerminalPresenter<W> {
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    /// Creates a presenter writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Writes one line of free text.
    pub fn message(&mut self, text: &str) {
        self.line(format_args!("{text}"));
    }

    /// The underlying writer.
    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{args}").and_then(|()| self.out.flush()) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn highlight_start(&mut self, signal: Signal) {
        self.line(format_args!("  ({}) {}", signal.index() + 1, signal.to_string().to_uppercase()));
    }

    fn highlight_end(&mut self, signal: Signal) {
        debug!(%signal, "Highlight off");
    }

    fn score_changed(&mut self, score: u32) {
        self.line(format_args!("Score: {score}"));
    }

    fn round_failed(&mut self) {
        self.line(format_args!("Wrong move!"));
    }

    fn input_ready(&mut self) {
        self.line(format_args!("Your turn >"));
    }

    fn listener_attached(&mut self, signal: Signal) {
        debug!(%signal, id = signal.id(), "Input bound");
    }
}
