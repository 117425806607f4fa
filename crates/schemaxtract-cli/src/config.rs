//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use schemaxtract_extractor::ExtractorConfig;
use schemaxtract_llm::openai::{
    DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
use schemaxtract_llm::OpenAiProvider;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Available profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    /// Chunking and request settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// File this configuration was loaded from
    #[serde(skip)]
    source: Option<PathBuf>,
}

/// LLM connection profile.
///
/// The API key itself is never stored; `api_key_env` names the environment
/// variable holding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Chat-completions base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Sampling temperature, provider default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Transport timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transient failures (0 = fail on first error)
    #[serde(default)]
    pub max_retries: u32,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".schemaxtract").join("config.toml"))
    }

    /// Load configuration from the default path or create default.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            debug!("Loaded config from {}", path.display());
            config
        } else {
            Self::default()
        };

        config
            .extractor
            .validate()
            .map_err(|e| CliError::Config(format!("[extractor] {}", e)))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Save configuration to the file it was loaded from.
    pub fn save(&self) -> Result<()> {
        let path = match &self.source {
            Some(path) => path.clone(),
            None => Self::path()?,
        };

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Get the active profile.
    pub fn get_active_profile(&self) -> Result<&Profile> {
        self.profiles
            .get(&self.active_profile)
            .ok_or_else(|| CliError::Config(format!("Profile '{}' not found", self.active_profile)))
    }

    /// Add or update a profile.
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        Ok(())
    }
}

impl Profile {
    /// Read the API key from the profile's environment variable.
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(CliError::MissingApiKey(self.api_key_env.clone())),
        }
    }

    /// Build the HTTP provider for this profile.
    pub fn build_provider(&self) -> Result<OpenAiProvider> {
        let mut provider = OpenAiProvider::with_timeout(
            &self.endpoint,
            &self.model,
            self.api_key()?,
            Duration::from_secs(self.timeout_secs),
        )?
        .with_max_retries(self.max_retries);

        if let Some(temperature) = self.temperature {
            provider = provider.with_temperature(temperature);
        }
        Ok(provider)
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert("default".to_string(), Profile::default());

        Self {
            active_profile: "default".to_string(),
            profiles,
            extractor: ExtractorConfig::default(),
            settings: Settings::default(),
            source: None,
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaxtract_extractor::RequestMode;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.active_profile, "default");
        assert!(config.settings.color);

        let profile = config.get_active_profile().unwrap();
        assert_eq!(profile.endpoint, "https://api.openai.com/v1");
        assert_eq!(profile.model, "gpt-4o-mini");
        assert_eq!(profile.api_key_env, "OPENAI_API_KEY");
        assert_eq!(profile.max_retries, 0);
    }

    #[test]
    fn test_profile_management() {
        let mut config = Config::default();

        let profile = Profile {
            endpoint: "http://localhost:11434/v1".to_string(),
            model: "llama3".to_string(),
            ..Profile::default()
        };

        config.set_profile("local".to_string(), profile);
        assert!(config.profiles.contains_key("local"));

        config.switch_profile("local".to_string()).unwrap();
        assert_eq!(config.active_profile, "local");
    }

    #[test]
    fn test_switch_to_nonexistent_profile() {
        let mut config = Config::default();
        let result = config.switch_profile("nonexistent".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.active_profile, "default");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::load_from(&path).unwrap();
        config.extractor.request_mode = RequestMode::PerChunk;
        config.settings.format = OutputFormat::Json;
        config.set_profile(
            "local".to_string(),
            Profile {
                temperature: Some(0.0),
                ..Profile::default()
            },
        );
        config.save().unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.extractor.request_mode, RequestMode::PerChunk);
        assert_eq!(reloaded.settings.format, OutputFormat::Json);
        assert_eq!(reloaded.profiles["local"].temperature, Some(0.0));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "active_profile = \"work\"\n\n[profiles.work]\nmodel = \"gpt-4o\"\n\n[extractor]\nmax_chunk_tokens = 2000\nchunk_overlap_tokens = 200\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        let profile = config.get_active_profile().unwrap();
        assert_eq!(profile.model, "gpt-4o");
        assert_eq!(profile.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.extractor.max_chunk_tokens, 2000);
        assert_eq!(config.extractor.max_prompt_tokens, 100_000);
    }

    #[test]
    fn test_invalid_extractor_section_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[extractor]\nmax_chunk_tokens = 100\nchunk_overlap_tokens = 100\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn test_missing_api_key() {
        let profile = Profile {
            api_key_env: "SCHEMAXTRACT_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Profile::default()
        };
        assert!(matches!(profile.api_key(), Err(CliError::MissingApiKey(_))));
    }
}
