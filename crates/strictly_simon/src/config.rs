//! Game configuration loaded from TOML.

use crate::playback::{DEFAULT_GAP, DEFAULT_HIGHLIGHT, PlaybackTiming};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// How correct input is converted into score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// One point per correctly reproduced signal.
    #[default]
    #[display("per_signal")]
    PerSignal,
    /// One point per completed round.
    #[display("per_round")]
    PerRound,
}

/// Playback durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long each signal stays lit.
    highlight_ms: u64,
    /// Pause before each signal lights up.
    gap_ms: u64,
}

impl TimingConfig {
    /// Converts to playback durations.
    pub fn to_timing(&self) -> PlaybackTiming {
        PlaybackTiming::new(
            Duration::from_millis(self.highlight_ms),
            Duration::from_millis(self.gap_ms),
        )
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            highlight_ms: DEFAULT_HIGHLIGHT.as_millis() as u64,
            gap_ms: DEFAULT_GAP.as_millis() as u64,
        }
    }
}

/// Scoring and failure rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Score granularity.
    scoring: ScoringMode,
    /// Zero the score when the player makes a mistake.
    reset_score_on_failure: bool,
}

impl RulesConfig {
    /// Creates a rules section.
    pub fn new(scoring: ScoringMode, reset_score_on_failure: bool) -> Self {
        Self {
            scoring,
            reset_score_on_failure,
        }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct SimonConfig {
    /// Playback timing.
    timing: TimingConfig,
    /// Scoring rules.
    rules: RulesConfig,
    /// Seed for the signal picker; entropy when absent.
    seed: Option<u64>,
}

impl SimonConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(seed = ?config.seed, scoring = %config.rules.scoring, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with the seed replaced.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.highlight_ms == 0 {
            return Err(ConfigError::new(
                "timing.highlight_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = SimonConfig::from_toml_str("").expect("empty config");
        assert_eq!(config, SimonConfig::default());
        assert_eq!(config.timing().to_timing(), PlaybackTiming::default());
        assert_eq!(*config.rules().scoring(), ScoringMode::PerSignal);
        assert!(!config.rules().reset_score_on_failure());
    }

    #[test]
    fn test_partial_sections() {
        let config = SimonConfig::from_toml_str(
            r#"
            seed = 42

            [timing]
            gap_ms = 100

            [rules]
            scoring = "per_round"
            "#,
        )
        .expect("valid config");
        assert_eq!(*config.seed(), Some(42));
        assert_eq!(*config.timing().gap_ms(), 100);
        assert_eq!(*config.timing().highlight_ms(), 300);
        assert_eq!(*config.rules().scoring(), ScoringMode::PerRound);
    }

    #[test]
    fn test_unknown_scoring_mode_rejected() {
        let err = SimonConfig::from_toml_str("[rules]\nscoring = \"per_banana\"\n")
            .expect_err("invalid mode");
        assert!(err.message.contains("Failed to parse config"));
    }

    #[test]
    fn test_zero_highlight_rejected() {
        let err = SimonConfig::from_toml_str("[timing]\nhighlight_ms = 0\n").expect_err("invalid");
        assert!(err.message.contains("highlight_ms"));
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_seed_override_keeps_file_seed_when_absent() {
        let config = SimonConfig::default().with_seed(Some(5)).with_seed(None);
        assert_eq!(*config.seed(), Some(5));
    }
}
