use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use favorites_core_types::SiteId;
use settings_store::SiteDraft;

use super::output::OutputFormat;
use super::render::render_sites;
use crate::app_context::AppContext;

#[derive(Args, Clone, Debug)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Subcommand, Clone, Debug)]
pub enum SitesCommand {
    /// List site configurations
    List,
    /// Add a site; every saved prompt starts enabled on it
    Add(SiteAddArgs),
    /// Change a site; omitted fields keep their value
    Edit(SiteEditArgs),
    /// Delete a site and drop it from every prompt
    Delete { id: String },
}

#[derive(Args, Clone, Debug)]
pub struct SiteAddArgs {
    /// URL pattern, e.g. *://chat.example.com/*
    #[arg(long)]
    pub pattern: String,
    /// XPath of the element that receives prompts
    #[arg(long)]
    pub xpath: String,
    #[arg(long, default_value = "")]
    pub name: String,
}

#[derive(Args, Clone, Debug)]
pub struct SiteEditArgs {
    pub id: String,
    #[arg(long)]
    pub pattern: Option<String>,
    #[arg(long)]
    pub xpath: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
}

pub async fn cmd_sites(args: SitesArgs, ctx: &AppContext, output: OutputFormat) -> Result<()> {
    let store = ctx.store();
    match args.command {
        SitesCommand::List => {
            let cache = ctx.cache().await?;
            print!("{}", render_sites(&cache, output)?);
        }
        SitesCommand::Add(add) => {
            let site = store
                .add_site(SiteDraft::new(add.name, add.pattern, add.xpath))
                .await?;
            println!("Site saved: {}", site.id);
        }
        SitesCommand::Edit(edit) => {
            let id = SiteId::from(edit.id.as_str());
            let cache = ctx.cache().await?;
            let current = cache
                .site(&id)
                .with_context(|| format!("site configuration {id} not found"))?;
            let draft = SiteDraft::new(
                edit.name.unwrap_or_else(|| current.name.clone()),
                edit.pattern.unwrap_or_else(|| current.url_pattern.clone()),
                edit.xpath.unwrap_or_else(|| current.xpath.clone()),
            );
            store.edit_site(&id, draft).await?;
            println!("Site updated: {id}");
        }
        SitesCommand::Delete { id } => {
            store.delete_site(&SiteId::from(id.as_str())).await?;
            println!("Site deleted: {id}");
        }
    }
    Ok(())
}
