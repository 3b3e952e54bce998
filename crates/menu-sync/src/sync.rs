use std::sync::Arc;

use async_trait::async_trait;
use settings_store::{ChangeNotifier, SettingsStore};
use tracing::{debug, error, info, instrument};

use crate::errors::MenuError;
use crate::menu::{plan_menu, MenuSnapshot};
use crate::ports::{ContextMenuPort, TabsPort};

/// Rebuilds the whole context menu from stored settings on every trigger.
#[derive(Clone)]
pub struct MenuSynchronizer {
    store: SettingsStore,
    menus: Arc<dyn ContextMenuPort>,
}

impl MenuSynchronizer {
    pub fn new(store: SettingsStore, menus: Arc<dyn ContextMenuPort>) -> Self {
        Self { store, menus }
    }

    /// Clears the menu and recreates it for `url`. Any failure leaves the
    /// menu empty and is returned.
    #[instrument(skip(self))]
    pub async fn rebuild(&self, url: &str) -> Result<MenuSnapshot, MenuError> {
        match self.try_rebuild(url).await {
            Ok(snapshot) => {
                info!(
                    site = snapshot.site.as_ref().map(|s| s.as_str()).unwrap_or("-"),
                    entries = snapshot.entries.len(),
                    "context menu rebuilt"
                );
                Ok(snapshot)
            }
            Err(err) => {
                error!("context menu rebuild failed: {err}");
                self.clear().await;
                Err(err)
            }
        }
    }

    async fn try_rebuild(&self, url: &str) -> Result<MenuSnapshot, MenuError> {
        self.menus.remove_all().await?;

        let sites = self.store.site_configs().await?;
        let site = site_matcher::resolve(&sites, url);
        let prompts = match site {
            Some(_) => self.store.prompts().await?,
            None => Vec::new(),
        };

        let snapshot = plan_menu(site, &prompts);
        for entry in &snapshot.entries {
            self.menus.create(entry).await?;
        }
        Ok(snapshot)
    }

    /// Best-effort removal of every entry.
    pub async fn clear(&self) {
        if let Err(err) = self.menus.remove_all().await {
            error!("failed to clear context menu: {err}");
        } else {
            debug!("context menu cleared");
        }
    }

    /// Rebuilds for the active tab, or clears the menu when there is none.
    pub async fn refresh_active(&self, tabs: &dyn TabsPort) -> Option<MenuSnapshot> {
        let active = match tabs.query_active().await {
            Ok(tab) => tab,
            Err(err) => {
                error!("active tab query failed: {err}");
                None
            }
        };
        match active.and_then(|tab| tab.url) {
            Some(url) => self.rebuild(&url).await.ok(),
            None => {
                self.clear().await;
                None
            }
        }
    }
}

/// Keeps the menu current after settings edits, like the options surface
/// asking the background to refresh.
pub struct ActiveTabRefresher {
    sync: MenuSynchronizer,
    tabs: Arc<dyn TabsPort>,
}

impl ActiveTabRefresher {
    pub fn new(sync: MenuSynchronizer, tabs: Arc<dyn TabsPort>) -> Self {
        Self { sync, tabs }
    }
}

#[async_trait]
impl ChangeNotifier for ActiveTabRefresher {
    async fn settings_changed(&self) {
        self.sync.refresh_active(self.tabs.as_ref()).await;
    }
}
