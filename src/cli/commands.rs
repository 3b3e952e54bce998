use clap::Subcommand;

use super::prompts::PromptsArgs;
use super::resolve::ResolveArgs;
use super::script::ScriptArgs;
use super::sites::SitesArgs;
use super::transfer::{ExportArgs, ImportArgs};

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Manage saved prompts
    Prompts(PromptsArgs),

    /// Manage site configurations
    Sites(SitesArgs),

    /// Show the site and context menu resolved for a URL
    Resolve(ResolveArgs),

    /// Print the page script that injects a prompt on a URL
    Script(ScriptArgs),

    /// Export all settings as a JSON document
    Export(ExportArgs),

    /// Replace all settings with the contents of an exported document
    Import(ImportArgs),
}
