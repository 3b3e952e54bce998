use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{default_config_path, AppConfig};

/// Installs the global subscriber. `RUST_LOG` wins over `level`; `debug`
/// forces the debug level.
pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: Option<PathBuf>,
    pub found: bool,
}

impl LoadedConfig {
    /// Reports where the configuration came from once logging is up.
    pub fn log_source(&self) {
        match (&self.path, self.found) {
            (Some(path), true) => info!("Loaded configuration from: {}", path.display()),
            (Some(path), false) => warn!(
                "Config file not found, using defaults: {}",
                path.display()
            ),
            (None, _) => warn!("No configuration directory available, using defaults"),
        }
    }
}

/// Reads `config_path`, or the per-user config file when none is given.
/// A missing file yields defaults. Environment overrides apply either way.
pub async fn load_config(config_path: Option<&Path>) -> Result<LoadedConfig> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let (mut config, found) = match &path {
        Some(path) if path.exists() => {
            let content = fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config = AppConfig::from_yaml(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            (config, true)
        }
        _ => (AppConfig::default(), false),
    };
    config.apply_env_overrides();

    Ok(LoadedConfig {
        config,
        path,
        found,
    })
}
