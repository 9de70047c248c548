use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::GameError;
use crate::invariants::CheckMode;
use crate::player::{Chips, Seat};

/// Environment variable that overrides the deck seed.
pub const SEED_ENV: &str = "HOLDEM_SEED";

/// Hard ceiling on seats: 2 hole cards each plus a full board and three burns
/// must fit in one deck.
pub const MAX_SEATS: usize = 22;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TableConfig {
    pub starting_chips: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub min_players: usize,
    pub max_players: usize,
    /// Dealer seat for the first hand
    pub dealer_seat: Seat,
    pub seed: Option<u64>,
    pub invariant_mode: CheckMode,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            starting_chips: 1000,
            small_blind: 1,
            big_blind: 2,
            min_players: 2,
            max_players: 9,
            dealer_seat: 0,
            seed: None,
            invariant_mode: CheckMode::Enforce,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: TableConfig,
    pub seed_source: ValueSource,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for GameError {
    fn from(e: ConfigError) -> Self {
        GameError::Config(e.to_string())
    }
}

impl TableConfig {
    /// Parses a TOML document. Missing keys keep their defaults.
    ///
    /// ```
    /// use holdem_engine::config::TableConfig;
    ///
    /// let cfg = TableConfig::from_toml_str("small_blind = 5\nbig_blind = 10\n").unwrap();
    /// assert_eq!(cfg.big_blind, 10);
    /// assert_eq!(cfg.starting_chips, 1000);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: TableConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads `path`, then applies the environment override.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_with_sources(Some(path.as_ref())).map(|resolved| resolved.config)
    }

    /// Defaults, then the file if given, then `HOLDEM_SEED`.
    pub fn load_with_sources(path: Option<&Path>) -> Result<ConfigResolved, ConfigError> {
        let mut cfg = TableConfig::default();
        let mut seed_source = ValueSource::Default;
        if let Some(path) = path {
            let s = fs::read_to_string(path)?;
            cfg = toml::from_str(&s)?;
            if cfg.seed.is_some() {
                seed_source = ValueSource::File;
            }
        }
        if let Some(seed) = seed_from_env()? {
            cfg.seed = Some(seed);
            seed_source = ValueSource::Env;
        }
        cfg.validate()?;
        Ok(ConfigResolved {
            config: cfg,
            seed_source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.small_blind == 0 {
            return Err(ConfigError::Invalid("small_blind must be > 0".into()));
        }
        if self.big_blind <= self.small_blind {
            return Err(ConfigError::Invalid(format!(
                "big_blind ({}) must be greater than small_blind ({})",
                self.big_blind, self.small_blind
            )));
        }
        if self.min_players < 2 {
            return Err(ConfigError::Invalid("min_players must be >= 2".into()));
        }
        if self.max_players < self.min_players {
            return Err(ConfigError::Invalid(format!(
                "max_players ({}) must be >= min_players ({})",
                self.max_players, self.min_players
            )));
        }
        if self.max_players > MAX_SEATS {
            return Err(ConfigError::Invalid(format!(
                "max_players must be <= {}",
                MAX_SEATS
            )));
        }
        if self.starting_chips == 0 {
            return Err(ConfigError::Invalid("starting_chips must be > 0".into()));
        }
        let full_table = u64::from(self.starting_chips) * self.max_players as u64;
        if full_table > u64::from(Chips::MAX) {
            return Err(ConfigError::Invalid(format!(
                "starting_chips ({}) times max_players ({}) must not exceed {}",
                self.starting_chips,
                self.max_players,
                Chips::MAX
            )));
        }
        Ok(())
    }
}

fn seed_from_env() -> Result<Option<u64>, ConfigError> {
    match std::env::var(SEED_ENV) {
        Ok(seed) if !seed.is_empty() => seed
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{} is not a valid seed: {:?}", SEED_ENV, seed))),
        _ => Ok(None),
    }
}
