//! Runtime configuration loaded from TOML.

use crate::error::ConfigError;
use arcade_games::GameSettings;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for the session manager and its sweeper.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct ArcadeConfig {
    /// Sessions older than this many seconds are evicted by the sweep.
    #[serde(default = "default_session_ttl_secs")]
    session_ttl_secs: u64,

    /// Seconds between sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    sweep_interval_secs: u64,

    /// Master seed; drawn from entropy when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// Per-game awards and tunables.
    #[serde(default)]
    games: GameSettings,
}

#[instrument]
fn default_session_ttl_secs() -> u64 {
    30 * 60
}

#[instrument]
fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: default_session_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            seed: None,
            games: GameSettings::default(),
        }
    }
}

impl ArcadeConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(
            ttl_secs = config.session_ttl_secs,
            interval_secs = config.sweep_interval_secs,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        if config.sweep_interval_secs == 0 {
            return Err(ConfigError::new("sweep_interval_secs must be positive"));
        }
        config
            .games
            .validate()
            .map_err(|e| ConfigError::new(format!("Invalid game settings: {}", e)))?;
        Ok(config)
    }

    /// Overrides the master seed.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    /// Maximum session age.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Time between sweeps.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ArcadeConfig::from_toml("").expect("empty is valid");
        assert_eq!(config, ArcadeConfig::default());
        assert_eq!(config.session_ttl(), Duration::from_secs(1800));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = ArcadeConfig::from_toml("sweep_interval_secs = 0").unwrap_err();
        assert!(err.message.contains("sweep_interval_secs"));
    }

    #[test]
    fn test_cli_seed_overrides_only_when_given() {
        let config = ArcadeConfig::from_toml("seed = 3").expect("valid");
        assert_eq!(*config.clone().with_seed(None).seed(), Some(3));
        assert_eq!(*config.with_seed(Some(9)).seed(), Some(9));
    }

    fn rejection(content: &str) -> String {
        ArcadeConfig::from_toml(content)
            .expect_err("settings should be rejected")
            .message
    }

    #[test]
    fn test_zero_quiz_questions_rejected() {
        let message = rejection("[games.quiz]\nquestions_per_game = 0");
        assert!(message.contains("questions_per_game"));
    }

    #[test]
    fn test_empty_quiz_pool_rejected() {
        let message = rejection("[games.quiz]\npool = []");
        assert!(message.contains("quiz.pool"));
    }

    #[test]
    fn test_out_of_range_correct_answer_rejected() {
        let message = rejection(
            r#"
            [[games.quiz.pool]]
            prompt = "Largest planet?"
            answers = ["Jupiter", "Saturn"]
            correct = 5
            "#,
        );
        assert!(message.contains("marks answer 5"));
    }

    #[test]
    fn test_empty_fleet_rejected() {
        let message = rejection("[games.battleship]\nships = []");
        assert!(message.contains("battleship.ships"));
    }

    #[test]
    fn test_zero_placement_attempts_rejected() {
        let message = rejection("[games.battleship]\nplacement_attempts = 0");
        assert!(message.contains("placement_attempts"));
    }

    #[test]
    fn test_nan_four_probability_rejected() {
        let message = rejection("[games.2048]\nfour_probability = nan");
        assert!(message.contains("four_probability"));
    }

    #[test]
    fn test_valid_game_overrides_accepted() {
        let config = ArcadeConfig::from_toml(
            r#"
            [games.battleship]
            ships = [2]
            placement_attempts = 10

            [games.2048]
            four_probability = 0.0
            "#,
        )
        .expect("valid");
        assert_eq!(config.games().battleship().ships(), &vec![2]);
    }
}
