use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TreeConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// `"json"` or `"memory"`.
    pub backend: String,
    pub data_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3001,
            log_level: "info".into(),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = default_home_dir()
            .join("data")
            .to_string_lossy()
            .into_owned();
        Self {
            backend: "json".into(),
            data_dir,
        }
    }
}

/// Returns `~/.family-tree/`, or `./.family-tree/` when no home directory is known.
pub fn default_home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".family-tree")
}

/// Returns the default config file path: `~/.family-tree/config.toml`
pub fn default_config_path() -> PathBuf {
    default_home_dir().join("config.toml")
}

impl TreeConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            TreeConfig::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (FAMILY_TREE_DATA_DIR, FAMILY_TREE_LOG_LEVEL, FAMILY_TREE_HOST, PORT).
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("FAMILY_TREE_DATA_DIR") {
            self.storage.data_dir = val;
        }
        if let Ok(val) = std::env::var("FAMILY_TREE_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("FAMILY_TREE_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("PORT") {
            self.server.port = val
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {val}"))?;
        }
        Ok(())
    }

    /// Resolve the data directory, expanding `~` if needed.
    pub fn resolved_data_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.data_dir)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
