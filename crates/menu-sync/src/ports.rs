use async_trait::async_trait;
use favorites_core_types::TabId;
use serde::{Deserialize, Serialize};

use crate::errors::MenuError;
use crate::menu::MenuEntry;

#[async_trait]
pub trait ContextMenuPort: Send + Sync {
    async fn remove_all(&self) -> Result<(), MenuError>;
    async fn create(&self, entry: &MenuEntry) -> Result<(), MenuError>;
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl Tab {
    pub fn new(id: TabId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: Some(url.into()),
            active: true,
        }
    }
}

#[async_trait]
pub trait TabsPort: Send + Sync {
    async fn get(&self, tab: TabId) -> Result<Option<Tab>, MenuError>;

    /// Active tab of the current window.
    async fn query_active(&self) -> Result<Option<Tab>, MenuError>;
}
