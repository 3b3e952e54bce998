//! Context-menu entries and the tree built for a resolved site.

use favorites_core_types::{Prompt, SiteConfig, SiteId};
use serde::{Deserialize, Serialize};

pub const PARENT_MENU_ID: &str = "promptInjectParent";
pub const NO_PROMPTS_MENU_ID: &str = "noPromptsForSite";
pub const NO_CONFIG_MENU_ID: &str = "noConfigForSite";

pub const PARENT_TITLE: &str = "Insert Prompt";
pub const NO_PROMPTS_TITLE: &str = "No prompts enabled for this site";
pub const NO_CONFIG_TITLE: &str = "Prompt Favorites (No config for this site)";

pub const EDITABLE_CONTEXT: &str = "editable";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub title: String,
    pub contexts: Vec<String>,
    pub enabled: bool,
}

impl MenuEntry {
    fn editable(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            title: title.into(),
            contexts: vec![EDITABLE_CONTEXT.to_string()],
            enabled: true,
        }
    }

    fn under_parent(mut self) -> Self {
        self.parent_id = Some(PARENT_MENU_ID.to_string());
        self
    }

    fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Placeholders exist only to explain an empty menu.
    pub fn is_placeholder(&self) -> bool {
        self.id == NO_PROMPTS_MENU_ID || self.id == NO_CONFIG_MENU_ID
    }
}

/// What a rebuild put in the menu.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSnapshot {
    pub site: Option<SiteId>,
    pub entries: Vec<MenuEntry>,
}

impl MenuSnapshot {
    /// Ids of the prompt entries, in menu order.
    pub fn prompt_entries(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.parent_id.is_some() && !entry.is_placeholder())
            .map(|entry| entry.id.as_str())
            .collect()
    }
}

/// Prompts shown for `site` in stored order, numbered by their position
/// among the shown ones.
pub fn enabled_prompts<'a>(
    site: &'a SiteConfig,
    prompts: &'a [Prompt],
) -> impl Iterator<Item = (usize, &'a Prompt)> + 'a {
    prompts
        .iter()
        .filter(move |prompt| prompt.is_enabled_for(&site.id))
        .enumerate()
}

/// Entries for the resolved site, parents first.
pub fn plan_menu(site: Option<&SiteConfig>, prompts: &[Prompt]) -> MenuSnapshot {
    let Some(site) = site else {
        return MenuSnapshot {
            site: None,
            entries: vec![MenuEntry::editable(NO_CONFIG_MENU_ID, NO_CONFIG_TITLE).disabled()],
        };
    };

    let mut entries = vec![MenuEntry::editable(PARENT_MENU_ID, PARENT_TITLE)];
    let enabled: Vec<(usize, &Prompt)> = enabled_prompts(site, prompts).collect();

    if enabled.is_empty() {
        entries.push(
            MenuEntry::editable(NO_PROMPTS_MENU_ID, NO_PROMPTS_TITLE)
                .under_parent()
                .disabled(),
        );
    } else {
        for (index, prompt) in enabled {
            entries.push(
                MenuEntry::editable(prompt.menu_id(index), prompt.display_title(index))
                    .under_parent(),
            );
        }
    }

    MenuSnapshot {
        site: Some(site.id.clone()),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use favorites_core_types::PromptId;

    fn site(id: &str) -> SiteConfig {
        let mut site = SiteConfig::new("Chat", "*://chat.example.com/*", "//textarea");
        site.id = SiteId::from(id);
        site
    }

    #[test]
    fn no_site_yields_disabled_placeholder() {
        let snapshot = plan_menu(None, &[]);
        assert_eq!(snapshot.entries.len(), 1);
        let entry = &snapshot.entries[0];
        assert_eq!(entry.id, NO_CONFIG_MENU_ID);
        assert_eq!(entry.title, NO_CONFIG_TITLE);
        assert!(!entry.enabled);
        assert_eq!(entry.contexts, vec![EDITABLE_CONTEXT]);
    }

    #[test]
    fn disabled_prompts_are_left_out() {
        let site = site("config_1");
        let mut on = Prompt::new("On", "a");
        on.id = PromptId::from("p_on");
        let mut off = Prompt::new("Off", "b");
        off.id = PromptId::from("p_off");
        off.enabled_sites.insert(site.id.clone(), false);
        let untouched = Prompt::new("Legacy", "c");

        let snapshot = plan_menu(Some(&site), &[off, on, untouched.clone()]);
        assert_eq!(snapshot.entries[0].id, PARENT_MENU_ID);
        assert_eq!(
            snapshot.prompt_entries(),
            vec!["p_on", untouched.id.as_str()]
        );
    }

    #[test]
    fn fallback_ids_and_titles_count_shown_prompts() {
        let site = site("config_1");
        let mut blank = Prompt::new("", "text");
        blank.id = PromptId::default();
        let snapshot = plan_menu(Some(&site), &[Prompt::new("First", "x"), blank]);
        let child = &snapshot.entries[2];
        assert_eq!(child.id, "prompt-1");
        assert_eq!(child.title, "Prompt 2");
        assert_eq!(child.parent_id.as_deref(), Some(PARENT_MENU_ID));
    }

    #[test]
    fn hidden_prompts_do_not_shift_fallback_numbering() {
        let site = site("config_1");
        let mut off = Prompt::new("Off", "b");
        off.enabled_sites.insert(site.id.clone(), false);
        let legacy = Prompt {
            content: "legacy text".into(),
            ..Prompt::default()
        };

        let snapshot = plan_menu(Some(&site), &[off, legacy]);
        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.entries[1].id, "prompt-0");
        assert_eq!(snapshot.entries[1].title, "Prompt 1");
    }

    #[test]
    fn all_disabled_shows_placeholder_child() {
        let site = site("config_1");
        let mut off = Prompt::new("Off", "b");
        off.enabled_sites.insert(site.id.clone(), false);
        let snapshot = plan_menu(Some(&site), &[off]);
        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.entries[1].id, NO_PROMPTS_MENU_ID);
        assert!(!snapshot.entries[1].enabled);
        assert!(snapshot.prompt_entries().is_empty());
    }
}
