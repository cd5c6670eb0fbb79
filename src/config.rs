use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    constants::{CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH},
    core::errors::ConfigError,
};

/// Server-wide settings, read once at startup and shared read-only.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Low-privilege account that runs untrusted test code.
    pub tester_user: String,
    pub keeper_group: String,
    tester_home: Option<PathBuf>,
    /// Global test timeout in seconds.
    pub tests_timeout: u64,
    /// Global memory ceiling in megabytes.
    pub tests_memory_limit: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tester_user: "tester".to_string(),
            keeper_group: "keeper".to_string(),
            tester_home: None,
            tests_timeout: 300,
            tests_memory_limit: 1024,
        }
    }
}

impl Config {
    pub fn tester_home(&self) -> PathBuf {
        self.tester_home
            .clone()
            .unwrap_or_else(|| Path::new("/home").join(&self.tester_user))
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_tester_home<T: AsRef<Path>>(mut self, home: T) -> Self {
        self.tester_home = Some(home.as_ref().to_path_buf());
        self
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn from_file<T: AsRef<Path>>(path: T) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_yaml(&content)
    }

    /// Loads the file named by the environment, or the default location.
    /// A missing default file yields the built-in defaults.
    #[tracing::instrument]
    pub async fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_file(path).await,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH).await
            }
            Err(_) => {
                tracing::info!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tests_timeout == 0 {
            return Err(ConfigError::Invalid("tests_timeout must be positive".into()));
        }
        if self.tests_memory_limit == 0 {
            return Err(ConfigError::Invalid(
                "tests_memory_limit must be positive".into(),
            ));
        }
        if self.tester_user.is_empty() {
            return Err(ConfigError::Invalid("tester_user must not be empty".into()));
        }
        Ok(())
    }
}
