//! Parsing of typed player commands.

use strictly_simon::{Signal, SignalParseError};

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Signals to submit, in order.
    Signals(Vec<Signal>),
    /// Start over.
    NewGame,
    /// Print the controls.
    Help,
    /// Leave the game.
    Quit,
    /// Blank line.
    Empty,
}

/// Parses a line such as `1 3 2`, `red blue`, `new` or `quit`.
///
/// Signals may be separated by whitespace or commas, and digits may be run
/// together (`132`).
pub fn parse_command(line: &str) -> Result<PlayerCommand, SignalParseError> {
    let trimmed = line.trim().to_lowercase();

    match trimmed.as_str() {
        "" => return Ok(PlayerCommand::Empty),
        "n" | "new" | "restart" => return Ok(PlayerCommand::NewGame),
        "h" | "help" | "?" => return Ok(PlayerCommand::Help),
        "q" | "quit" | "exit" => return Ok(PlayerCommand::Quit),
        _ => {}
    }

    let mut signals = Vec::new();
    for word in trimmed.split(|c: char| c.is_whitespace() || c == ',') {
        if word.is_empty() {
            continue;
        }
        if word.chars().all(|c| c.is_ascii_digit()) {
            for digit in word.chars() {
                signals.push(digit.to_string().parse::<Signal>()?);
            }
        } else {
            signals.push(word.parse::<Signal>()?);
        }
    }
    Ok(PlayerCommand::Signals(signals))
}
