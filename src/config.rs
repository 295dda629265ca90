use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;

use crate::engine::Placement;

/// When a new tile is spawned after a directional input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpawnPolicy {
    /// After every directional input, even one that left the grid unchanged.
    Always,
    /// Only after a tilt that changed the grid.
    #[default]
    OnChange,
}

impl FromStr for SpawnPolicy {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(SpawnPolicy::Always),
            "on-change" => Ok(SpawnPolicy::OnChange),
            _ => Err(ParseChoiceError::new("spawn policy", s, "always, on-change")),
        }
    }
}

impl fmt::Display for SpawnPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SpawnPolicy::Always => "always",
            SpawnPolicy::OnChange => "on-change",
        })
    }
}

/// Game settings. Every field has a default, so an empty TOML file is valid.
///
/// ```toml
/// spawn_policy = "always"
/// placement = "rejection"
/// seed = 42
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub spawn_policy: SpawnPolicy,
    pub placement: Placement,
    /// Seed for the tile RNG. `None` seeds from OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Unknown value for a named setting.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} {value:?} (expected one of: {expected})")]
pub struct ParseChoiceError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl ParseChoiceError {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self { kind, value: value.to_string(), expected }
    }
}
