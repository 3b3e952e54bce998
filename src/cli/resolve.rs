use anyhow::Result;
use clap::Args;

use super::output::OutputFormat;
use super::render::render_preview;
use crate::app_context::AppContext;

#[derive(Args, Clone, Debug)]
pub struct ResolveArgs {
    /// Page URL to resolve
    pub url: String,
}

pub async fn cmd_resolve(args: ResolveArgs, ctx: &AppContext, output: OutputFormat) -> Result<()> {
    let preview = ctx.preview(&args.url).await?;
    print!("{}", render_preview(&preview, output)?);
    Ok(())
}
