//! The two persisted records and the edits the settings surface performs on
//! them.

use std::sync::Arc;

use async_trait::async_trait;
use favorites_core_types::{InsertMode, Prompt, PromptId, SiteConfig, SiteId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use site_matcher::looks_like_match_pattern;
use tracing::{debug, info, warn};

use crate::storage::KeyValueStore;
use crate::StoreError;

pub const PROMPTS_KEY: &str = "prompts";
pub const CONFIGS_KEY: &str = "siteConfigs";

/// Receives a notification after every successful write.
#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    async fn settings_changed(&self);
}

/// Fields accepted when creating or editing a prompt.
#[derive(Clone, Debug, Default)]
pub struct PromptDraft {
    pub title: String,
    pub content: String,
    pub insert_mode: Option<InsertMode>,
}

impl PromptDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            insert_mode: None,
        }
    }

    pub fn with_mode(mut self, mode: InsertMode) -> Self {
        self.insert_mode = Some(mode);
        self
    }

    /// Title is trimmed; content is only checked for blankness and is
    /// stored untouched so trailing newlines survive.
    fn validate(&self) -> Result<(String, String), StoreError> {
        let title = self.title.trim();
        if title.is_empty() || self.content.trim().is_empty() {
            return Err(StoreError::Validation(
                "Both title and content are required.".into(),
            ));
        }
        Ok((title.to_string(), self.content.clone()))
    }
}

/// Fields accepted when creating or editing a site configuration.
#[derive(Clone, Debug, Default)]
pub struct SiteDraft {
    pub name: String,
    pub url_pattern: String,
    pub xpath: String,
}

impl SiteDraft {
    pub fn new(
        name: impl Into<String>,
        url_pattern: impl Into<String>,
        xpath: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url_pattern: url_pattern.into(),
            xpath: xpath.into(),
        }
    }

    fn validate(&self) -> Result<(String, String, String), StoreError> {
        let url_pattern = self.url_pattern.trim();
        let xpath = self.xpath.trim();
        if url_pattern.is_empty() || xpath.is_empty() {
            return Err(StoreError::Validation(
                "URL Pattern and XPath are required.".into(),
            ));
        }
        if !looks_like_match_pattern(url_pattern) {
            warn!(
                pattern = url_pattern,
                "url pattern does not look like a standard match pattern (e.g. https://*.example.com/*)"
            );
        }
        Ok((
            self.name.trim().to_string(),
            url_pattern.to_string(),
            xpath.to_string(),
        ))
    }
}

/// Prompt and site records over a storage port.
#[derive(Clone)]
pub struct SettingsStore {
    storage: Arc<dyn KeyValueStore>,
    notifier: Option<Arc<dyn ChangeNotifier>>,
}

impl SettingsStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn ChangeNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub async fn prompts(&self) -> Result<Vec<Prompt>, StoreError> {
        self.read_list(PROMPTS_KEY).await
    }

    pub async fn site_configs(&self) -> Result<Vec<SiteConfig>, StoreError> {
        self.read_list(CONFIGS_KEY).await
    }

    /// Overwrites the prompt record wholesale.
    pub async fn save_prompts(&self, prompts: &[Prompt]) -> Result<(), StoreError> {
        self.write_list(PROMPTS_KEY, prompts).await?;
        self.notify().await;
        Ok(())
    }

    /// Overwrites the site configuration record wholesale.
    pub async fn save_site_configs(&self, sites: &[SiteConfig]) -> Result<(), StoreError> {
        self.write_list(CONFIGS_KEY, sites).await?;
        self.notify().await;
        Ok(())
    }

    /// Writes both records and notifies once.
    pub async fn replace_all(
        &self,
        prompts: &[Prompt],
        sites: &[SiteConfig],
    ) -> Result<(), StoreError> {
        self.write_list(PROMPTS_KEY, prompts).await?;
        self.write_list(CONFIGS_KEY, sites).await?;
        self.notify().await;
        Ok(())
    }

    pub async fn add_prompt(&self, draft: PromptDraft) -> Result<Prompt, StoreError> {
        let (title, content) = draft.validate()?;
        let sites = self.site_configs().await?;
        let mut prompts = self.prompts().await?;

        let mut prompt = Prompt::new(title, content);
        prompt.insert_mode = draft.insert_mode.unwrap_or_default();
        for site in &sites {
            prompt.enabled_sites.insert(site.id.clone(), true);
        }
        prompts.push(prompt.clone());

        self.save_prompts(&prompts).await?;
        info!(prompt = %prompt.id, "prompt saved");
        Ok(prompt)
    }

    /// Edits in place; position and site enablement are preserved. A draft
    /// without a mode keeps the stored one. Sites missing from the prompt's
    /// enablement map are recorded as enabled.
    pub async fn edit_prompt(&self, id: &PromptId, draft: PromptDraft) -> Result<Prompt, StoreError> {
        let (title, content) = draft.validate()?;
        let sites = self.site_configs().await?;
        let mut prompts = self.prompts().await?;
        let prompt = prompts
            .iter_mut()
            .find(|prompt| &prompt.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("prompt {id}")))?;
        prompt.title = title;
        prompt.content = content;
        if let Some(mode) = draft.insert_mode {
            prompt.insert_mode = mode;
        }
        for site in &sites {
            prompt.enabled_sites.entry(site.id.clone()).or_insert(true);
        }
        let updated = prompt.clone();

        self.save_prompts(&prompts).await?;
        info!(prompt = %id, "prompt updated");
        Ok(updated)
    }

    pub async fn delete_prompt(&self, id: &PromptId) -> Result<(), StoreError> {
        let mut prompts = self.prompts().await?;
        let before = prompts.len();
        prompts.retain(|prompt| &prompt.id != id);
        if prompts.len() == before {
            return Err(StoreError::NotFound(format!("prompt {id}")));
        }
        self.save_prompts(&prompts).await?;
        info!(prompt = %id, "prompt deleted");
        Ok(())
    }

    pub async fn set_prompt_enabled(
        &self,
        prompt_id: &PromptId,
        site_id: &SiteId,
        enabled: bool,
    ) -> Result<(), StoreError> {
        let sites = self.site_configs().await?;
        if !sites.iter().any(|site| &site.id == site_id) {
            return Err(StoreError::NotFound(format!("site configuration {site_id}")));
        }
        let mut prompts = self.prompts().await?;
        let prompt = prompts
            .iter_mut()
            .find(|prompt| &prompt.id == prompt_id)
            .ok_or_else(|| StoreError::NotFound(format!("prompt {prompt_id}")))?;
        prompt.enabled_sites.insert(site_id.clone(), enabled);

        self.save_prompts(&prompts).await?;
        debug!(prompt = %prompt_id, site = %site_id, enabled, "prompt enablement changed");
        Ok(())
    }

    /// New sites start enabled for every existing prompt.
    pub async fn add_site(&self, draft: SiteDraft) -> Result<SiteConfig, StoreError> {
        let (name, url_pattern, xpath) = draft.validate()?;
        let mut sites = self.site_configs().await?;
        let mut prompts = self.prompts().await?;

        let site = SiteConfig::new(name, url_pattern, xpath);
        sites.push(site.clone());
        for prompt in prompts.iter_mut() {
            prompt.enabled_sites.insert(site.id.clone(), true);
        }

        self.replace_all(&prompts, &sites).await?;
        info!(site = %site.id, pattern = %site.url_pattern, "site configuration saved");
        Ok(site)
    }

    pub async fn edit_site(&self, id: &SiteId, draft: SiteDraft) -> Result<SiteConfig, StoreError> {
        let (name, url_pattern, xpath) = draft.validate()?;
        let mut sites = self.site_configs().await?;
        let site = sites
            .iter_mut()
            .find(|site| &site.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("site configuration {id}")))?;
        site.name = name;
        site.url_pattern = url_pattern;
        site.xpath = xpath;
        let updated = site.clone();

        self.save_site_configs(&sites).await?;
        info!(site = %id, "site configuration updated");
        Ok(updated)
    }

    /// Removes the site and its id from every prompt's enablement map.
    pub async fn delete_site(&self, id: &SiteId) -> Result<(), StoreError> {
        let mut sites = self.site_configs().await?;
        let before = sites.len();
        sites.retain(|site| &site.id != id);
        if sites.len() == before {
            return Err(StoreError::NotFound(format!("site configuration {id}")));
        }
        let mut prompts = self.prompts().await?;
        for prompt in prompts.iter_mut() {
            prompt.enabled_sites.remove(id);
        }

        self.replace_all(&prompts, &sites).await?;
        info!(site = %id, "site configuration deleted");
        Ok(())
    }

    async fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        match self.storage.get(key).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value).map_err(|err| {
                StoreError::Codec(format!("record '{key}' is malformed: {err}"))
            }),
        }
    }

    async fn write_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let value = serde_json::to_value(items)?;
        self.storage.set(key, value).await
    }

    async fn notify(&self) {
        if let Some(notifier) = &self.notifier {
            notifier.settings_changed().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;

    fn store() -> SettingsStore {
        SettingsStore::new(Arc::new(InMemoryStorage::new()))
    }

    #[tokio::test]
    async fn prompt_content_is_not_trimmed() {
        let store = store();
        let prompt = store
            .add_prompt(PromptDraft::new("  Sign-off ", "Thanks!\n\n"))
            .await
            .unwrap();
        assert_eq!(prompt.title, "Sign-off");
        assert_eq!(prompt.content, "Thanks!\n\n");
        assert_eq!(store.prompts().await.unwrap()[0].content, "Thanks!\n\n");
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let store = store();
        let err = store
            .add_prompt(PromptDraft::new("title", "   \n"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        let err = store
            .add_site(SiteDraft::new("name", "*://a.com/*", " "))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn edits_preserve_order_and_mode() {
        let store = store();
        let first = store
            .add_prompt(PromptDraft::new("one", "1").with_mode(InsertMode::InsertAfter))
            .await
            .unwrap();
        store.add_prompt(PromptDraft::new("two", "2")).await.unwrap();

        store
            .edit_prompt(&first.id, PromptDraft::new("uno", "1!"))
            .await
            .unwrap();
        let prompts = store.prompts().await.unwrap();
        assert_eq!(prompts[0].title, "uno");
        assert_eq!(prompts[0].insert_mode, InsertMode::InsertAfter);
        assert_eq!(prompts[1].title, "two");
    }

    #[tokio::test]
    async fn unknown_ids_report_not_found() {
        let store = store();
        let missing = PromptId::from("nope");
        assert!(matches!(
            store.delete_prompt(&missing).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_site(&SiteId::from("nope")).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn malformed_record_surfaces_codec_error() {
        let storage = Arc::new(InMemoryStorage::new());
        storage
            .set(PROMPTS_KEY, serde_json::json!({"not": "a list"}))
            .await
            .unwrap();
        let store = SettingsStore::new(storage);
        assert!(matches!(store.prompts().await, Err(StoreError::Codec(_))));
    }
}
