use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use favorites_core_types::{InsertMode, PromptId, SiteId};
use settings_store::PromptDraft;

use super::output::OutputFormat;
use super::render::render_prompts;
use crate::app_context::AppContext;

#[derive(Args, Clone, Debug)]
pub struct PromptsArgs {
    #[command(subcommand)]
    pub command: PromptsCommand,
}

#[derive(Subcommand, Clone, Debug)]
pub enum PromptsCommand {
    /// List saved prompts
    List,
    /// Save a new prompt, enabled on every configured site
    Add(PromptFields),
    /// Change an existing prompt; omitted fields keep their value
    Edit(PromptEditArgs),
    /// Delete a prompt
    Delete { id: String },
    /// Enable or disable a prompt on one site
    Toggle(ToggleArgs),
}

#[derive(Args, Clone, Debug)]
pub struct PromptFields {
    #[arg(long)]
    pub title: Option<String>,
    /// Prompt text; kept verbatim, including trailing newlines
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,
    /// Read the prompt text from a file
    #[arg(long, value_name = "FILE")]
    pub content_file: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
}

#[derive(Args, Clone, Debug)]
pub struct PromptEditArgs {
    pub id: String,
    #[command(flatten)]
    pub fields: PromptFields,
}

#[derive(Args, Clone, Debug)]
pub struct ToggleArgs {
    pub prompt: String,
    pub site: String,
    /// Disable instead of enable
    #[arg(long)]
    pub off: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    Replace,
    InsertBefore,
    InsertAfter,
}

impl From<ModeArg> for InsertMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Replace => InsertMode::Replace,
            ModeArg::InsertBefore => InsertMode::InsertBefore,
            ModeArg::InsertAfter => InsertMode::InsertAfter,
        }
    }
}

pub async fn cmd_prompts(args: PromptsArgs, ctx: &AppContext, output: OutputFormat) -> Result<()> {
    let store = ctx.store();
    match args.command {
        PromptsCommand::List => {
            let cache = ctx.cache().await?;
            print!("{}", render_prompts(&cache, output)?);
        }
        PromptsCommand::Add(fields) => {
            let Some(title) = fields.title.clone() else {
                bail!("--title is required");
            };
            let Some(content) = read_content(&fields).await? else {
                bail!("--content or --content-file is required");
            };
            let mut draft = PromptDraft::new(title, content);
            draft.insert_mode = fields.mode.map(InsertMode::from);
            let prompt = store.add_prompt(draft).await?;
            println!("Prompt saved: {}", prompt.id);
        }
        PromptsCommand::Edit(edit) => {
            let id = PromptId::from(edit.id.as_str());
            let cache = ctx.cache().await?;
            let current = cache
                .prompt(&id)
                .with_context(|| format!("prompt {id} not found"))?;
            let title = edit
                .fields
                .title
                .clone()
                .unwrap_or_else(|| current.title.clone());
            let content = read_content(&edit.fields)
                .await?
                .unwrap_or_else(|| current.content.clone());
            let mut draft = PromptDraft::new(title, content);
            draft.insert_mode = edit.fields.mode.map(InsertMode::from);
            store.edit_prompt(&id, draft).await?;
            println!("Prompt updated: {id}");
        }
        PromptsCommand::Delete { id } => {
            store.delete_prompt(&PromptId::from(id.as_str())).await?;
            println!("Prompt deleted: {id}");
        }
        PromptsCommand::Toggle(toggle) => {
            let enabled = !toggle.off;
            store
                .set_prompt_enabled(
                    &PromptId::from(toggle.prompt.as_str()),
                    &SiteId::from(toggle.site.as_str()),
                    enabled,
                )
                .await?;
            println!(
                "Prompt {} {} on {}",
                toggle.prompt,
                if enabled { "enabled" } else { "disabled" },
                toggle.site
            );
        }
    }
    Ok(())
}

async fn read_content(fields: &PromptFields) -> Result<Option<String>> {
    if let Some(path) = &fields.content_file {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(Some(content));
    }
    Ok(fields.content.clone())
}
