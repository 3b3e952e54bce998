//! Wiring shared by the CLI and by browser hosts.

use std::sync::Arc;

use favorites_core_types::{PromptId, SiteConfig};
use menu_sync::{
    plan_menu, ActiveTabRefresher, ContextMenuPort, Coordinator, MenuSnapshot, MenuSynchronizer,
    TabsPort,
};
use serde::Serialize;
use settings_store::{JsonFileStorage, KeyValueStore, SettingsCache, SettingsStore};
use text_injector::{
    page_script, EvaluatingScriptPort, InjectionRequest, ScriptEvaluator, ScriptPort,
};
use tokio::sync::broadcast;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::AppError;

const EVENT_BUS_CAPACITY: usize = 64;

/// What the context menu would show on a URL.
#[derive(Clone, Debug, Serialize)]
pub struct MenuPreview {
    pub url: String,
    pub site: Option<SiteConfig>,
    pub menu: MenuSnapshot,
}

/// Background side for a browser host: the coordinator plus a settings
/// store whose edits refresh the active tab's menu.
pub struct Background {
    pub store: SettingsStore,
    pub coordinator: Arc<Coordinator>,
}

pub struct AppContext {
    config: Arc<AppConfig>,
    store: SettingsStore,
}

impl AppContext {
    /// Settings kept in the JSON file named by the configuration.
    pub fn new(config: AppConfig) -> Self {
        let path = config.storage_path();
        debug!(path = %path.display(), "using settings file");
        Self::with_storage(config, Arc::new(JsonFileStorage::new(path)))
    }

    pub fn with_storage(config: AppConfig, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            config: Arc::new(config),
            store: SettingsStore::new(storage),
        }
    }

    pub fn config(&self) -> &AppConfig {
        self.config.as_ref()
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub async fn cache(&self) -> Result<SettingsCache, AppError> {
        Ok(SettingsCache::load(&self.store).await?)
    }

    pub async fn preview(&self, url: &str) -> Result<MenuPreview, AppError> {
        let cache = self.cache().await?;
        let site = site_matcher::resolve(cache.sites(), url);
        Ok(MenuPreview {
            url: url.to_string(),
            site: site.cloned(),
            menu: plan_menu(site, cache.prompts()),
        })
    }

    /// Page script that injects `prompt_id` on `url`, under the same rules a
    /// menu click follows.
    pub async fn page_script(&self, prompt_id: &PromptId, url: &str) -> Result<String, AppError> {
        let cache = self.cache().await?;
        let prompt = cache
            .prompt(prompt_id)
            .ok_or_else(|| AppError::not_found(format!("prompt {prompt_id}")))?;
        if prompt.content.is_empty() {
            return Err(AppError::Rejected(format!("prompt {prompt_id} has no content")));
        }
        let site = site_matcher::resolve(cache.sites(), url)
            .filter(|site| !site.xpath.is_empty())
            .ok_or_else(|| AppError::not_found(format!("site config for {url}")))?;
        if !prompt.is_enabled_for(&site.id) {
            return Err(AppError::Rejected(format!(
                "prompt {prompt_id} is disabled for {}",
                site.label()
            )));
        }

        let request = InjectionRequest::new(
            prompt.content.clone(),
            site.xpath.clone(),
            prompt.insert_mode,
            url,
        );
        Ok(page_script::render(
            &request,
            &self.config.editor_quirks(),
            self.config.debug,
        )?)
    }

    /// Script port for hosts that can only evaluate script source in a
    /// frame. Rendered scripts carry the configured quirks and debug flag.
    pub fn evaluating_port<E: ScriptEvaluator>(&self, evaluator: E) -> EvaluatingScriptPort<E> {
        EvaluatingScriptPort::new(evaluator, self.config.editor_quirks())
            .with_debug(self.config.debug)
    }

    pub fn background(
        &self,
        menus: Arc<dyn ContextMenuPort>,
        tabs: Arc<dyn TabsPort>,
        scripts: Arc<dyn ScriptPort>,
    ) -> Background {
        let sync = MenuSynchronizer::new(self.store.clone(), menus);
        let refresher = ActiveTabRefresher::new(sync.clone(), Arc::clone(&tabs));
        let store = self.store.clone().with_notifier(Arc::new(refresher));
        let (events, _) = broadcast::channel(EVENT_BUS_CAPACITY);
        let coordinator = Coordinator::new(store.clone(), sync, tabs, scripts, events);
        Background { store, coordinator }
    }
}
