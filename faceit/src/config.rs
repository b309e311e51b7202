use std::path::{Path, PathBuf};

/// Environment variable that takes precedence over the `apikey` of the config file.
pub const API_KEY_ENV: &str = "FACEIT_API_KEY";

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub apikey: String,
    #[serde(default = "default_demos_dir")]
    pub demos_dir: PathBuf,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_data_url")]
    pub data_url: String,
    #[serde(default = "default_stats_url")]
    pub stats_url: String,
}

fn default_demos_dir() -> PathBuf {
    PathBuf::from("demos/")
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_data_url() -> String {
    crate::api::DATA_API_URL.to_owned()
}

fn default_stats_url() -> String {
    crate::api::STATS_API_URL.to_owned()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file {path:?} could not be read: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Configuration file {path:?} is not valid: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("No API key, set \"apikey\" in the configuration or {}", API_KEY_ENV)]
    MissingApiKey,
}

impl Config {
    pub fn from_json(content: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|source| ConfigError::Json {
            path: path.to_owned(),
            source,
        })
    }

    /// Reads the config file and applies the [`API_KEY_ENV`] override.
    #[tracing::instrument]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        let config = Self::from_json(&content, path)?.with_api_key(std::env::var(API_KEY_ENV).ok());
        config.validate()?;

        tracing::debug!(demos_dir = ?config.demos_dir, retries = config.retries, "Loaded configuration");

        Ok(config)
    }

    /// Replaces the api key if `key` is set and not blank.
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.apikey = key;
        }
        self.apikey = self.apikey.trim().to_owned();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.apikey.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.retry_delay_ms)
    }
}
