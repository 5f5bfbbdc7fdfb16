use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::sync::Semaphore;

/// Environment variable naming an optional YAML configuration file.
pub const CONFIG_ENV: &str = "SWITCHYARD_CONFIG";

/// Environment variable overriding `server.listen_addr`.
pub const LISTEN_ENV: &str = "LISTEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Upper bound on connections being served at the same time.
    pub max_workers: usize,
    pub read_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Document root every static target is resolved beneath.
    pub root: PathBuf,
    /// How long a non-application POST waits for another payload line.
    pub post_idle_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Targets starting with this prefix go to a named service.
    pub prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            max_workers: 10,
            read_timeout_secs: 30,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            post_idle_timeout_ms: 250,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prefix: "/app".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl StaticFilesConfig {
    pub fn post_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.post_idle_timeout_ms)
    }
}

impl Config {
    /// Builds the process configuration.
    ///
    /// Starts from the YAML file named by `SWITCHYARD_CONFIG` (or the
    /// defaults when unset), then applies the `LISTEN` override.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var(LISTEN_ENV) {
            config.server.listen_addr = listen_addr;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_yaml_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.max_workers == 0 {
            anyhow::bail!("server.max_workers must be at least 1");
        }

        // The pool drains with a single u32-sized acquire.
        let limit = Semaphore::MAX_PERMITS.min(u32::MAX as usize);
        if self.server.max_workers > limit {
            anyhow::bail!(
                "server.max_workers must be at most {}, got {}",
                limit,
                self.server.max_workers
            );
        }

        if !self.app.prefix.starts_with('/') {
            anyhow::bail!("app.prefix must start with '/', got {:?}", self.app.prefix);
        }

        Ok(())
    }
}
