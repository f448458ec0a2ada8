//! Application configuration loaded from `config.toml` and `IKUTSU_*` variables.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

/// Directory name used under the platform config and data roots.
pub const APP_DIR: &str = "ikutsu";

const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "IKUTSU";
const DEFAULT_TICK_RATE_MS: u64 = 250;

const DEFAULT_CONFIG: &str = r#"# ikutsu configuration

# Fix the random sequence of problems (omit for a fresh sequence every run).
# seed = 1234

# Where log files are written.
# log_dir = "/tmp/ikutsu/logs"

# Input poll interval in milliseconds.
tick_rate_ms = 250
"#;

/// Runtime settings. Problem bounds and the palette are not configurable.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Seed for reproducible problem sequences.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Directory receiving the log file.
    pub log_dir: PathBuf,
    /// Input poll interval for the terminal loop.
    pub tick_rate_ms: u64,
}

impl AppConfig {
    /// Load from the default config file, falling back to built-in defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from an explicit file, then `IKUTSU_*` variables. A missing
    /// file is not an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::layered(path.as_ref(), Some(environment()))
    }

    fn layered(path: &Path, environment: Option<config::Environment>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("tick_rate_ms", DEFAULT_TICK_RATE_MS)?
            .set_default("log_dir", default_log_dir().to_string_lossy().into_owned())?
            .add_source(config::File::from(path).required(false));
        if let Some(environment) = environment {
            builder = builder.add_source(environment);
        }
        let settings = builder
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        let config: Self = settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Poll interval as a [`Duration`], never zero.
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    /// Path of the log file inside `log_dir`.
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join("ikutsu.log")
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}

/// Location of the user config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("logs")
}

/// Write the commented default config if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    ensure_default_config_at(&path)?;
    Ok(path)
}

/// Write the default config to `path` unless a file is already there.
pub fn ensure_default_config_at(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}
