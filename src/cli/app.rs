use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info};

use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::{init_logging, load_config};
use crate::app_context::AppContext;

pub async fn run() -> Result<()> {
    let cli = CliArgs::parse();

    let loaded = load_config(cli.config.as_deref()).await?;
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| loaded.config.log_level.clone());
    let debug_mode = cli.debug || loaded.config.debug;
    init_logging(&level, debug_mode)?;
    loaded.log_source();

    debug!("Starting prompt-favorites v{}", env!("CARGO_PKG_VERSION"));

    let mut config = loaded.config;
    config.debug = debug_mode;
    let ctx = AppContext::new(config);

    match dispatch(&cli, &ctx).await {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(err) => {
            error!("Command failed: {}", err);
            Err(err)
        }
    }
}
