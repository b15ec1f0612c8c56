//! Match configuration.
//!
//! Loaded from YAML; every section and field has a default, so an empty document is
//! a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::chance::TurnContext;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Match rules and engine limits.
    #[serde(default)]
    pub rules: MatchConfig,
    /// Dice stream selection.
    #[serde(default)]
    pub chance: ChanceConfig,
    /// Event log settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatchConfig {
    /// Match is over once a color reaches this score.
    #[serde(default = "default_winning_score")]
    pub winning_score: u32,
    /// Attempts a player gets to produce a legal move before forfeiting.
    #[serde(default = "default_max_move_attempts")]
    pub max_move_attempts: u32,
    /// Safety cap on turns in a single round.
    #[serde(default = "default_max_turns_per_round")]
    pub max_turns_per_round: u32,
}

fn default_winning_score() -> u32 {
    3
}

fn default_max_move_attempts() -> u32 {
    99
}

fn default_max_turns_per_round() -> u32 {
    10_000
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            winning_score: default_winning_score(),
            max_move_attempts: default_max_move_attempts(),
            max_turns_per_round: default_max_turns_per_round(),
        }
    }
}

/// Dice stream configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChanceConfig {
    #[serde(default)]
    pub kind: ChanceKind,
    /// Match seed (deterministic) or PRNG seed (rng).
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanceKind {
    /// Event-keyed dice, reproducible from the seed.
    #[default]
    Deterministic,
    /// Seeded PRNG stream.
    Rng,
}

impl Default for ChanceConfig {
    fn default() -> Self {
        Self {
            kind: ChanceKind::Deterministic,
            seed: 0,
        }
    }
}

impl ChanceConfig {
    pub fn turn_context(&self) -> TurnContext {
        match self.kind {
            ChanceKind::Deterministic => TurnContext::new_deterministic(self.seed),
            ChanceKind::Rng => TurnContext::new_rng(self.seed),
        }
    }
}

/// NDJSON event log configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Append events here. If None, events are not logged.
    #[serde(default)]
    pub events_path: Option<String>,
    /// Flush every N lines; 0 flushes only at the end of the match.
    #[serde(default)]
    pub flush_every_lines: u64,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yaml reads an empty document as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_yaml() {
        // Load the checked-in config file from the repo
        let config = Config::load("../../configs/default.yaml")
            .expect("Failed to load configs/default.yaml");

        assert_eq!(config.rules.winning_score, 3);
        assert_eq!(config.rules.max_move_attempts, 99);
        assert_eq!(config.chance.kind, ChanceKind::Deterministic);
        assert_eq!(config.chance.seed, 0);
        assert_eq!(config.logging.events_path, None);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_yaml_string() {
        let yaml = r#"
rules:
  winning_score: 5

chance:
  kind: rng
  seed: 17

logging:
  events_path: "logs/events.ndjson"
  flush_every_lines: 10
"#;

        let config = Config::from_yaml(yaml).expect("Failed to parse YAML");
        assert_eq!(config.rules.winning_score, 5);
        // Check defaults are applied
        assert_eq!(config.rules.max_move_attempts, 99);
        assert_eq!(config.rules.max_turns_per_round, 10_000);
        assert_eq!(config.chance.kind, ChanceKind::Rng);
        assert_eq!(config.chance.seed, 17);
        assert_eq!(
            config.logging.events_path.as_deref(),
            Some("logs/events.ndjson")
        );
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
        assert_eq!(Config::from_yaml("rules: {}").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_yaml_fails() {
        let invalid_yaml = "this is not: valid: yaml: {{{}}}";
        let result = Config::from_yaml(invalid_yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_chance_kind_fails() {
        assert!(Config::from_yaml("chance:\n  kind: loaded\n").is_err());
    }
}
