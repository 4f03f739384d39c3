use crate::error::{MendError, Result};
use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MendConfig {
    #[serde(default)]
    pub default_provider: Option<String>,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider_type: ProviderType,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub default_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    Openrouter,
    Anthropic,
}

/// Tuning knobs for the fix engine's AI path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Hard timeout per model call, in seconds.
    #[serde(default = "default_timeout")]
    pub model_timeout_secs: u64,
    /// Retries after the initial attempt.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Base backoff delay in milliseconds; attempt N waits base * (N + 1).
    #[serde(default = "default_backoff")]
    pub backoff_base_ms: u64,
    /// Model ID used for fix generation.
    #[serde(default)]
    pub model: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}

fn default_backoff() -> u64 {
    1000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_timeout_secs: 30,
            max_retries: 3,
            backoff_base_ms: 1000,
            model: None,
        }
    }
}

impl Default for MendConfig {
    fn default() -> Self {
        Self {
            default_provider: None,
            providers: HashMap::new(),
            engine: EngineConfig::default(),
        }
    }
}

pub struct ConfigManager {
    config: MendConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_path_internal()?;
        let config = Self::load_or_default(&config_path)?;

        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn save(&self) -> Result<()> {
        let toml = toml::to_string_pretty(&self.config)
            .map_err(|e| MendError::Configuration(format!("Failed to serialize config: {}", e)))?;

        fs::write(&self.config_path, toml)
            .map_err(|e| MendError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> &MendConfig {
        &self.config
    }

    pub fn get_mut(&mut self) -> &mut MendConfig {
        &mut self.config
    }

    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.config.providers.get(name)
    }

    pub fn list_providers(&self) -> Vec<&String> {
        self.config.providers.keys().collect()
    }

    pub fn get_config_path(&self) -> Result<PathBuf> {
        Ok(self.config_path.clone())
    }

    fn get_config_path_internal() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "mend", "mend").ok_or_else(|| {
            MendError::Configuration("Could not determine config directory".to_string())
        })?;

        let config_dir = project_dirs.config_dir();
        fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    fn load_or_default(path: &PathBuf) -> Result<MendConfig> {
        if !path.exists() {
            return Ok(MendConfig::default());
        }

        let s = Config::builder()
            .add_source(File::from(path.clone()))
            .add_source(Environment::with_prefix("MEND"))
            .build()
            .map_err(|e| MendError::Configuration(format!("Failed to build config: {}", e)))?;

        let config: MendConfig = s.try_deserialize().map_err(|e| {
            MendError::Configuration(format!("Failed to deserialize config: {}", e))
        })?;

        Ok(config)
    }
}
