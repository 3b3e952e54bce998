//! Text and JSON renderings of the settings, always from an explicit cache.

use std::fmt::Write as _;

use anyhow::Result;
use favorites_core_types::Prompt;
use settings_store::SettingsCache;

use super::output::OutputFormat;
use crate::app_context::MenuPreview;

const PREVIEW_CHARS: usize = 48;

pub fn render_prompts(cache: &SettingsCache, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(cache.prompts())?);
    }
    if cache.prompts().is_empty() {
        return Ok("No prompts saved yet.\n".to_string());
    }

    let mut out = String::new();
    for (index, prompt) in cache.prompts().iter().enumerate() {
        writeln!(
            out,
            "{}  {}  [{}]",
            prompt.menu_id(index),
            prompt.display_title(index),
            prompt.insert_mode
        )?;
        writeln!(out, "    {}", preview(&prompt.content))?;
        writeln!(out, "    sites: {}", site_states(cache, prompt))?;
    }
    Ok(out)
}

pub fn render_sites(cache: &SettingsCache, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(cache.sites())?);
    }
    if cache.sites().is_empty() {
        return Ok("No site configurations yet.\n".to_string());
    }

    let mut out = String::new();
    for site in cache.sites() {
        let enabled = cache
            .prompts()
            .iter()
            .filter(|prompt| prompt.is_enabled_for(&site.id))
            .count();
        writeln!(out, "{}  {}", site.id, site.label())?;
        writeln!(out, "    pattern: {}", site.url_pattern)?;
        writeln!(out, "    xpath:   {}", site.xpath)?;
        writeln!(
            out,
            "    prompts: {enabled}/{} enabled",
            cache.prompts().len()
        )?;
    }
    Ok(out)
}

pub fn render_preview(preview: &MenuPreview, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(preview)?);
    }

    let mut out = String::new();
    match &preview.site {
        Some(site) => writeln!(out, "{} -> {} ({})", preview.url, site.label(), site.id)?,
        None => writeln!(out, "{} -> no matching site", preview.url)?,
    }
    for entry in &preview.menu.entries {
        let indent = if entry.parent_id.is_some() { "    " } else { "  " };
        let state = if entry.enabled { "" } else { " (disabled)" };
        writeln!(out, "{indent}{}{state}", entry.title)?;
    }
    Ok(out)
}

fn site_states(cache: &SettingsCache, prompt: &Prompt) -> String {
    if cache.sites().is_empty() {
        return "-".to_string();
    }
    cache
        .sites()
        .iter()
        .map(|site| {
            let mark = if prompt.is_enabled_for(&site.id) { "on" } else { "off" };
            format!("{}={mark}", site.label())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn preview(content: &str) -> String {
    let flat = content.replace('\n', "\\n");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use favorites_core_types::{PromptId, SiteConfig, SiteId};

    fn cache() -> SettingsCache {
        let mut site = SiteConfig::new("", "*://chat.example.com/*", "//textarea");
        site.id = SiteId::from("config_1");
        let mut prompt = Prompt::new("Review", "Please review\nthe following:");
        prompt.id = PromptId::from("prompt_1");
        prompt.enabled_sites.insert(site.id.clone(), false);
        SettingsCache::new(vec![prompt], vec![site])
    }

    #[test]
    fn human_listing_shows_site_state() {
        let out = render_prompts(&cache(), OutputFormat::Human).unwrap();
        assert!(out.starts_with("prompt_1  Review  [replace]"));
        assert!(out.contains("Please review\\nthe following:"));
        assert!(out.contains("*://chat.example.com/*=off"));
    }

    #[test]
    fn json_listing_uses_wire_names() {
        let out = render_sites(&cache(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["urlPattern"], "*://chat.example.com/*");
    }

    #[test]
    fn empty_cache_renders_hint() {
        let empty = SettingsCache::default();
        assert_eq!(
            render_sites(&empty, OutputFormat::Human).unwrap(),
            "No site configurations yet.\n"
        );
    }

    #[test]
    fn long_content_is_shortened() {
        let text = "x".repeat(PREVIEW_CHARS + 10);
        assert_eq!(preview(&text).chars().count(), PREVIEW_CHARS + 3);
    }
}
