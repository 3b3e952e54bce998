use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use settings_store::{export_settings, import_settings, parse_document};
use tokio::fs;
use tracing::info;

use super::output::OutputFormat;
use crate::app_context::AppContext;

#[derive(Args, Clone, Debug)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
pub struct ImportArgs {
    /// Exported settings document (JSON, or YAML)
    pub file: PathBuf,
}

pub async fn cmd_export(args: ExportArgs, ctx: &AppContext) -> Result<()> {
    let document = export_settings(ctx.store()).await?;
    let body = document.to_json_pretty()?;
    match args.out {
        Some(path) => {
            fs::write(&path, format!("{body}\n"))
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "settings exported");
            println!("Settings exported to {}", path.display());
        }
        None => println!("{body}"),
    }
    Ok(())
}

pub async fn cmd_import(args: ImportArgs, ctx: &AppContext, output: OutputFormat) -> Result<()> {
    let raw = fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let document = parse_document(&raw)
        .with_context(|| format!("Failed to import {}", args.file.display()))?;
    let summary = import_settings(ctx.store(), &document).await?;

    match output {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "prompts": summary.prompts,
                "siteConfigs": summary.sites,
            }))?
        ),
        OutputFormat::Human => println!(
            "Settings imported successfully: {} prompts, {} site configs",
            summary.prompts, summary.sites
        ),
    }
    Ok(())
}
