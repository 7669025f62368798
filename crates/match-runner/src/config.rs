//! Match configuration loading.
//!
//! Settings come from a TOML file with per-field defaults; command-line
//! flags override them afterwards. Limit values are validated before any
//! game starts.

use match_referee::{ConfigError as LimitsError, MatchLimits};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop a match before it starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Limits(#[from] LimitsError),

    #[error("unknown strategy `{0}`, expected first, random or script:<path>")]
    UnknownStrategy(String),
}

/// Game limits as written in the config file.
///
/// Kept as raw integers so values of zero or below surface as a
/// configuration error rather than a deserialization artifact.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GameSection {
    #[serde(default = "default_max_turns")]
    pub max_turns: i64,
    #[serde(default = "default_max_nested_turns")]
    pub max_nested_turns: i64,
}

fn default_max_turns() -> i64 {
    50
}

fn default_max_nested_turns() -> i64 {
    5
}

impl Default for GameSection {
    fn default() -> Self {
        GameSection {
            max_turns: default_max_turns(),
            max_nested_turns: default_max_nested_turns(),
        }
    }
}

/// Proposer selection for one side.
#[derive(Debug, Clone, Deserialize)]
pub struct SideSection {
    /// `first`, `random` or `script:<path>`.
    #[serde(default = "default_strategy")]
    pub strategy: String,
}

fn default_strategy() -> String {
    "random".to_string()
}

impl Default for SideSection {
    fn default() -> Self {
        SideSection {
            strategy: default_strategy(),
        }
    }
}

/// Full match configuration.
#[derive(Debug, Deserialize)]
pub struct MatchConfig {
    #[serde(default)]
    pub game: GameSection,
    #[serde(default)]
    pub white: SideSection,
    #[serde(default)]
    pub black: SideSection,
    /// Directory receiving PGN and JSON transcripts.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("games")
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            game: GameSection::default(),
            white: SideSection::default(),
            black: SideSection::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl MatchConfig {
    /// Loads the configuration from `path`, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Validated game limits.
    pub fn limits(&self) -> Result<MatchLimits, ConfigError> {
        Ok(MatchLimits::new(
            self.game.max_turns,
            self.game.max_nested_turns,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let text = r#"
output_dir = "out"

[game]
max_turns = 12
max_nested_turns = 2

[white]
strategy = "first"

[black]
strategy = "script:moves.txt"
"#;
        let config: MatchConfig = toml::from_str(text).unwrap();
        assert_eq!(config.game.max_turns, 12);
        assert_eq!(config.game.max_nested_turns, 2);
        assert_eq!(config.white.strategy, "first");
        assert_eq!(config.black.strategy, "script:moves.txt");
        assert_eq!(config.output_dir, PathBuf::from("out"));

        let limits = config.limits().unwrap();
        assert_eq!(limits.max_turns, 12);
        assert_eq!(limits.max_nested_turns, 2);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: MatchConfig = toml::from_str("").unwrap();
        assert_eq!(config.game.max_turns, 50);
        assert_eq!(config.game.max_nested_turns, 5);
        assert_eq!(config.white.strategy, "random");
        assert_eq!(config.black.strategy, "random");
        assert_eq!(config.output_dir, PathBuf::from("games"));
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: MatchConfig = toml::from_str("[game]\nmax_turns = 7\n").unwrap();
        assert_eq!(config.game.max_turns, 7);
        assert_eq!(config.game.max_nested_turns, 5);
    }

    #[test]
    fn nonpositive_limits_are_rejected() {
        let config: MatchConfig = toml::from_str("[game]\nmax_turns = 0\n").unwrap();
        assert!(matches!(config.limits(), Err(ConfigError::Limits(_))));

        let config: MatchConfig = toml::from_str("[game]\nmax_nested_turns = -2\n").unwrap();
        assert!(matches!(config.limits(), Err(ConfigError::Limits(_))));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = MatchConfig::load(Path::new("definitely-missing.toml")).unwrap();
        assert_eq!(config.game.max_turns, 50);
    }
}
