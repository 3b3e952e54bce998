use favorites_core_types::{Prompt, PromptId, SiteConfig, SiteId};

use crate::store::SettingsStore;
use crate::StoreError;

/// Snapshot of both records held by a settings surface between refreshes.
///
/// Renderers take the cache by reference instead of reading shared state.
#[derive(Clone, Debug, Default)]
pub struct SettingsCache {
    prompts: Vec<Prompt>,
    sites: Vec<SiteConfig>,
}

impl SettingsCache {
    pub fn new(prompts: Vec<Prompt>, sites: Vec<SiteConfig>) -> Self {
        Self { prompts, sites }
    }

    pub async fn load(store: &SettingsStore) -> Result<Self, StoreError> {
        let mut cache = Self::default();
        cache.refresh(store).await?;
        Ok(cache)
    }

    pub async fn refresh(&mut self, store: &SettingsStore) -> Result<(), StoreError> {
        self.prompts = store.prompts().await?;
        self.sites = store.site_configs().await?;
        Ok(())
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn sites(&self) -> &[SiteConfig] {
        &self.sites
    }

    pub fn prompt(&self, id: &PromptId) -> Option<&Prompt> {
        self.prompts.iter().find(|prompt| &prompt.id == id)
    }

    pub fn site(&self, id: &SiteId) -> Option<&SiteConfig> {
        self.sites.iter().find(|site| &site.id == id)
    }

    /// Sites the prompt shows up on, in stored order.
    pub fn enabled_sites_for(&self, prompt: &Prompt) -> Vec<&SiteConfig> {
        self.sites
            .iter()
            .filter(|site| prompt.is_enabled_for(&site.id))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty() && self.sites.is_empty()
    }
}
