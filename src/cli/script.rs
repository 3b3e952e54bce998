use anyhow::Result;
use clap::Args;
use favorites_core_types::PromptId;

use crate::app_context::AppContext;

#[derive(Args, Clone, Debug)]
pub struct ScriptArgs {
    pub prompt: String,
    /// Page URL the script will run on
    pub url: String,
}

pub async fn cmd_script(args: ScriptArgs, ctx: &AppContext) -> Result<()> {
    let script = ctx
        .page_script(&PromptId::from(args.prompt.as_str()), &args.url)
        .await?;
    println!("{script}");
    Ok(())
}
