use anyhow::Result;

use super::commands::Commands;
use super::env::CliArgs;
use super::prompts::cmd_prompts;
use super::resolve::cmd_resolve;
use super::script::cmd_script;
use super::sites::cmd_sites;
use super::transfer::{cmd_export, cmd_import};
use crate::app_context::AppContext;

pub async fn dispatch(cli: &CliArgs, ctx: &AppContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Prompts(args) => cmd_prompts(args, ctx, cli.output).await,
        Commands::Sites(args) => cmd_sites(args, ctx, cli.output).await,
        Commands::Resolve(args) => cmd_resolve(args, ctx, cli.output).await,
        Commands::Script(args) => cmd_script(args, ctx).await,
        Commands::Export(args) => cmd_export(args, ctx).await,
        Commands::Import(args) => cmd_import(args, ctx, cli.output).await,
    }
}
