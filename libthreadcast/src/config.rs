//! Configuration management for Threadcast

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::directory::{InMemoryDirectory, PersonRecord};
use crate::error::{ConfigError, Result};
use crate::length::LengthPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    pub mastodon: Option<MastodonConfig>,
    /// People the author may mention with `@{Name}`
    #[serde(default)]
    pub people: Vec<PersonEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub platforms: Vec<String>,
    #[serde(default)]
    pub premium: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            platforms: vec!["twitter".to_string()],
            premium: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MastodonConfig {
    /// The character limit advertised by the author's instance
    pub character_limit: usize,
}

/// One `[[people]]` table in the config file
///
/// Identical to [`PersonRecord`] minus the generated fields, which are
/// assigned when the entry is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonEntry {
    pub name: String,
    pub display_name: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub bluesky: Option<String>,
    pub mastodon: Option<String>,
}

impl PersonEntry {
    fn into_record(self) -> PersonRecord {
        let mut record = PersonRecord::new(
            self.name.clone(),
            self.display_name.unwrap_or(self.name),
        );
        record.linkedin = self.linkedin;
        record.twitter = self.twitter;
        record.bluesky = self.bluesky;
        record.mastodon = self.mastodon;
        record
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            defaults: DefaultsConfig::default(),
            mastodon: None,
            people: Vec::new(),
        }
    }

    /// The length policy this configuration describes
    pub fn length_policy(&self) -> LengthPolicy {
        match &self.mastodon {
            Some(m) => LengthPolicy::with_mastodon_limit(m.character_limit),
            None => LengthPolicy::default(),
        }
    }

    /// Build the mention directory from the `[[people]]` entries
    pub fn directory(&self) -> InMemoryDirectory {
        InMemoryDirectory::from_records(
            self.people.iter().cloned().map(PersonEntry::into_record).collect(),
        )
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("THREADCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("threadcast").join("config.toml"))
}
