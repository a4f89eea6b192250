//! Settings read once at start-up from
//! `<config dir>/bedrock-lab/config.toml`.
//!
//! Every field is optional, a missing file means built-in defaults.


use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bedrock_lab_bedrock_model::DEFAULT_REGION;
use bedrock_lab_core::retrieval::Metric;
use bedrock_lab_model::SamplingConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR: &str = "bedrock-lab";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_PROFILE: &str = "udacity";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration directory not found")]
    DirectoryError,
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: String, reason: &'static str },
    #[error("credential profile `{0}` is not defined")]
    MissingProfile(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: &'static str) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// AWS region of the Bedrock runtime endpoint.
    pub region: String,
    /// Name of the entry of `profiles` holding the credential.
    pub profile: String,
    pub profiles: BTreeMap<String, Profile>,
    pub models: ModelsConfig,
    pub sampling: SamplingSettings,
    pub retrieval: RetrievalConfig,
}

/// A named Bedrock credential.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub api_key: String,
}

impl Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("api_key", &"<deducted>")
            .finish()
    }
}

/// Model ids per flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ModelsConfig {
    pub embedding: String,
    pub chat: String,
    pub rag: String,
    pub summarize: String,
}

/// Sampling parameters per flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplingSettings {
    pub chat: SamplingConfig,
    pub rag: SamplingConfig,
    pub summarize: SamplingConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Passages retrieved per question.
    pub top_k: usize,
    pub metric: Metric,
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            profiles: Default::default(),
            models: Default::default(),
            sampling: Default::default(),
            retrieval: Default::default(),
        }
    }
}

impl Default for ModelsConfig {
    #[inline]
    fn default() -> Self {
        Self {
            embedding: "amazon.titan-embed-text-v2:0".to_owned(),
            chat: "anthropic.claude-3-sonnet-20240229-v1:0".to_owned(),
            rag: "anthropic.claude-3-sonnet-20240229-v1:0".to_owned(),
            summarize: "ai21.jamba-1-5-large-v1:0".to_owned(),
        }
    }
}

impl Default for SamplingSettings {
    #[inline]
    fn default() -> Self {
        let creative = SamplingConfig {
            max_tokens: 1024,
            temperature: 0.7,
            top_p: 0.9,
        };
        Self {
            chat: creative,
            rag: SamplingConfig {
                max_tokens: 1024,
                temperature: 0.0,
                top_p: 0.002,
            },
            summarize: creative,
        }
    }
}

impl Default for RetrievalConfig {
    #[inline]
    fn default() -> Self {
        Self {
            top_k: 2,
            metric: Metric::default(),
        }
    }
}

impl Config {
    #[inline]
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(ConfigError::DirectoryError)
    }

    #[inline]
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Loads the configuration from the default location.
    #[inline]
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads and validates the configuration at `path`, falling back to
    /// the defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.trim().is_empty() {
            return Err(ConfigError::invalid("region", "cannot be empty"));
        }
        if self.profile.trim().is_empty() {
            return Err(ConfigError::invalid("profile", "cannot be empty"));
        }
        for (name, profile) in &self.profiles {
            if profile.api_key.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("profiles.{name}.api_key"),
                    "cannot be empty",
                ));
            }
        }

        let models = [
            ("embedding", &self.models.embedding),
            ("chat", &self.models.chat),
            ("rag", &self.models.rag),
            ("summarize", &self.models.summarize),
        ];
        for (flow, model) in models {
            if model.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("models.{flow}"),
                    "cannot be empty",
                ));
            }
        }

        let sampling = [
            ("chat", &self.sampling.chat),
            ("rag", &self.sampling.rag),
            ("summarize", &self.sampling.summarize),
        ];
        for (flow, sampling) in sampling {
            sampling.validate().map_err(|field| {
                ConfigError::invalid(
                    format!("sampling.{flow}.{field}"),
                    "out of range",
                )
            })?;
        }

        if self.retrieval.top_k == 0 {
            return Err(ConfigError::invalid(
                "retrieval.top_k",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Returns the API key of the selected profile.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.profiles
            .get(&self.profile)
            .map(|p| p.api_key.as_str())
            .ok_or_else(|| ConfigError::MissingProfile(self.profile.clone()))
    }
}
