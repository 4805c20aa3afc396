//! Serializable match configuration.
//!
//! A match is a number of rounds between a fixed table of seats. Configs
//! come from a TOML file or are assembled from CLI flags:
//!
//! ```toml
//! rounds = 20
//! seed = 7
//!
//! [rules]
//! max_ticks = 150
//!
//! [[players]]
//! name = "alice"
//! policy = "starter"
//! ```

use std::io;
use std::path::{Path, PathBuf};

use figgie_core::rules::{check_player_count, GameRules, SetupError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bots::PolicyKind;

/// Content hash identifying a match config.
pub type MatchId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown policy '{0}', expected one of: starter, random, passive")]
    UnknownPolicy(String),

    #[error("rounds must be at least 1")]
    NoRounds,

    #[error(transparent)]
    Setup(#[from] SetupError),
}

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    pub policy: PolicyKind,
}

impl PlayerConfig {
    pub fn new(name: impl Into<String>, policy: PolicyKind) -> Self {
        Self {
            name: name.into(),
            policy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub rounds: u32,
    /// Master seed; every round's deal, shuffle and bot seeds derive from it.
    pub seed: u64,
    /// Run rounds on the rayon pool.
    pub parallel: bool,
    /// Where round logs are written. `None` keeps everything in memory.
    pub output_dir: Option<PathBuf>,
    pub rules: GameRules,
    pub players: Vec<PlayerConfig>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rounds: 10,
            seed: 42,
            parallel: true,
            output_dir: None,
            rules: GameRules::default(),
            players: Vec::new(),
        }
    }
}

impl MatchConfig {
    /// Seats named `Bot_1`, `Bot_2`, ... for each policy in order.
    pub fn with_policies(policies: &[PolicyKind]) -> Self {
        let players = policies
            .iter()
            .enumerate()
            .map(|(i, &policy)| PlayerConfig::new(format!("Bot_{}", i + 1), policy))
            .collect();
        Self {
            players,
            ..Self::default()
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        check_player_count(self.players.len())?;
        self.rules.validate()?;
        Ok(())
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn player_names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    /// Deterministic hash of everything that affects the games played.
    ///
    /// Two configs differing only in output directory or parallelism share
    /// an id, since they play identical games.
    pub fn match_id(&self) -> MatchId {
        let key = (
            self.rounds,
            self.seed,
            &self.rules,
            self.players
                .iter()
                .map(|p| (p.name.as_str(), p.policy))
                .collect::<Vec<_>>(),
        );
        let json = serde_json::to_vec(&key).unwrap_or_default();
        let hex = blake3::hash(&json).to_hex();
        hex.as_str()[..16].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        rounds = 20
        seed = 7
        parallel = false

        [rules]
        max_ticks = 150

        [[players]]
        name = "alice"
        policy = "starter"

        [[players]]
        name = "bob"
        policy = "random"

        [[players]]
        name = "carol"
        policy = "passive"

        [[players]]
        name = "dave"
        policy = "starter"
    "#;

    #[test]
    fn parses_toml_with_defaults() {
        let config = MatchConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.rounds, 20);
        assert_eq!(config.seed, 7);
        assert!(!config.parallel);
        assert_eq!(config.rules.max_ticks, 150);
        assert_eq!(config.rules.starting_money, 350);
        assert_eq!(config.players[1], PlayerConfig::new("bob", PolicyKind::Random));
        assert!(config.output_dir.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn rejects_unknown_policy_names() {
        let toml = SAMPLE.replace("\"random\"", "\"genius\"");
        assert!(matches!(MatchConfig::from_toml(&toml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn validate_checks_table_and_rounds() {
        let config = MatchConfig::with_policies(&[PolicyKind::Starter; 3]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Setup(SetupError::InvalidPlayerCount(3)))
        ));

        let config = MatchConfig {
            rounds: 0,
            ..MatchConfig::with_policies(&[PolicyKind::Passive; 4])
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoRounds)));
    }

    #[test]
    fn match_id_ignores_output_settings() {
        let a = MatchConfig::with_policies(&[PolicyKind::Starter; 5]);
        let b = MatchConfig {
            parallel: false,
            output_dir: Some(PathBuf::from("/tmp/logs")),
            ..a.clone()
        };
        assert_eq!(a.match_id(), b.match_id());

        let c = MatchConfig { seed: 43, ..a.clone() };
        assert_ne!(a.match_id(), c.match_id());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = MatchConfig::from_file(Path::new("/nonexistent/figgie.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/figgie.toml"));
    }
}
