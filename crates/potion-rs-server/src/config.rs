use std::path::Path;

use potion_rs_command::UnknownEffectPolicy;
use serde::Deserialize;
use thiserror::Error;

use crate::world::GameMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub server: ServerSection,
    #[serde(default)]
    pub dispatch: DispatchSection,
    #[serde(default)]
    pub permissions: PermissionsSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    pub address: String,
    pub port: u16,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Game mode for players not listed in `[permissions] creative`.
    #[serde(default = "default_gamemode")]
    pub default_gamemode: String,
}

fn default_max_connections() -> usize {
    64
}

fn default_gamemode() -> String {
    "survival".into()
}

#[derive(Debug, Deserialize)]
pub struct DispatchSection {
    /// `silent` or `deny`.
    #[serde(default = "default_unknown_effect")]
    pub unknown_effect: String,
}

fn default_unknown_effect() -> String {
    "silent".into()
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            unknown_effect: default_unknown_effect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PermissionsSection {
    /// Players that join in creative mode.
    #[serde(default)]
    pub creative: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    pub level: String,
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate config text.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.unknown_effect_policy()?;
        config.default_gamemode()?;
        if config.server.max_connections == 0 {
            return Err(ConfigError::Invalid("max_connections must be > 0".into()));
        }
        Ok(config)
    }

    pub fn unknown_effect_policy(&self) -> Result<UnknownEffectPolicy, ConfigError> {
        self.dispatch
            .unknown_effect
            .parse()
            .map_err(ConfigError::Invalid)
    }

    pub fn default_gamemode(&self) -> Result<GameMode, ConfigError> {
        self.server
            .default_gamemode
            .parse()
            .map_err(ConfigError::Invalid)
    }

    /// Game mode a player gets on join.
    pub fn gamemode_for(&self, name: &str) -> GameMode {
        if self.permissions.creative.iter().any(|n| n == name) {
            GameMode::Creative
        } else {
            self.default_gamemode().unwrap_or_default()
        }
    }
}
