//! Background event handling: keeps the menu in step with the active tab and
//! turns menu clicks into injections.

use std::fmt;
use std::sync::Arc;

use favorites_core_types::{FrameId, Prompt, PromptId, SiteConfig, TabId};
use serde::{Deserialize, Serialize};
use settings_store::{SettingsStore, StoreError};
use text_injector::{InjectReport, InjectionRequest, ScriptPort};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, instrument, warn};

use crate::menu::{enabled_prompts, MenuSnapshot, NO_CONFIG_MENU_ID, NO_PROMPTS_MENU_ID, PARENT_MENU_ID};
use crate::ports::{Tab, TabsPort};
use crate::sync::MenuSynchronizer;

pub const UPDATE_MENU_ACTION: &str = "updateContextMenu";
pub const STATUS_COMPLETE: &str = "complete";

/// Browser notifications the coordinator reacts to.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BrowserEvent {
    #[serde(rename_all = "camelCase")]
    TabActivated { tab_id: TabId },
    #[serde(rename_all = "camelCase")]
    TabUpdated {
        tab_id: TabId,
        #[serde(default)]
        status: Option<String>,
        tab: Tab,
    },
    Installed { reason: String },
    MenuClicked {
        click: MenuClick,
        #[serde(default)]
        tab: Option<Tab>,
    },
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuClick {
    pub menu_item_id: String,
    #[serde(default)]
    pub parent_menu_item_id: Option<String>,
    #[serde(default)]
    pub frame_id: Option<FrameId>,
}

impl MenuClick {
    pub fn prompt(menu_item_id: impl Into<String>) -> Self {
        Self {
            menu_item_id: menu_item_id.into(),
            parent_menu_item_id: Some(PARENT_MENU_ID.to_string()),
            frame_id: None,
        }
    }

    pub fn in_frame(mut self, frame: FrameId) -> Self {
        self.frame_id = Some(frame);
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RuntimeMessage {
    pub action: String,
}

impl RuntimeMessage {
    pub fn update_context_menu() -> Self {
        Self {
            action: UPDATE_MENU_ACTION.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MessageAck {
    pub success: bool,
}

/// Why a prompt click did not lead to an injection.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    PromptNotFound(String),
    EmptyContent(PromptId),
    NoConfigForUrl(String),
    PromptDisabled(PromptId),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::PromptNotFound(id) => write!(f, "clicked prompt {id} not found"),
            SkipReason::EmptyContent(id) => write!(f, "prompt {id} has no content"),
            SkipReason::NoConfigForUrl(url) => {
                write!(f, "no site config with an xpath matches {url}")
            }
            SkipReason::PromptDisabled(id) => {
                write!(f, "prompt {id} is disabled for the matching site")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    /// Not a prompt entry, or the click carried no usable tab.
    Ignored,
    Skipped(SkipReason),
    Injected(InjectReport),
    Failed(String),
}

pub type CoordinatorEventBus = broadcast::Sender<CoordinatorEvent>;

/// Events emitted to observers.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CoordinatorEvent {
    MenuRebuilt { snapshot: MenuSnapshot },
    MenuCleared,
    PromptInjected {
        tab: TabId,
        prompt: PromptId,
        report: InjectReport,
    },
    ClickSkipped { reason: SkipReason },
    InjectionFailed { tab: TabId, error: String },
}

pub struct Coordinator {
    store: SettingsStore,
    sync: MenuSynchronizer,
    tabs: Arc<dyn TabsPort>,
    scripts: Arc<dyn ScriptPort>,
    events: CoordinatorEventBus,
}

impl Coordinator {
    pub fn new(
        store: SettingsStore,
        sync: MenuSynchronizer,
        tabs: Arc<dyn TabsPort>,
        scripts: Arc<dyn ScriptPort>,
        events: CoordinatorEventBus,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            sync,
            tabs,
            scripts,
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.events.subscribe()
    }

    /// Handles events one at a time until every sender is dropped.
    pub async fn run(self: Arc<Self>, mut inbox: mpsc::Receiver<BrowserEvent>) {
        while let Some(event) = inbox.recv().await {
            self.handle_event(event).await;
        }
        debug!("browser event stream closed");
    }

    pub async fn handle_event(&self, event: BrowserEvent) {
        match event {
            BrowserEvent::TabActivated { tab_id } => self.on_tab_activated(tab_id).await,
            BrowserEvent::TabUpdated {
                tab_id,
                status,
                tab,
            } => {
                let complete = status.as_deref() == Some(STATUS_COMPLETE);
                match tab.url {
                    Some(url) if complete && tab.active => {
                        debug!(tab_id = %tab_id, url = %url, "tab finished loading");
                        self.rebuild(&url).await;
                    }
                    _ => {}
                }
            }
            BrowserEvent::Installed { reason } => {
                info!(reason = %reason, "extension installed or updated");
                self.clear().await;
            }
            BrowserEvent::MenuClicked { click, tab } => {
                self.handle_click(&click, tab.as_ref()).await;
            }
        }
    }

    /// Replies only to actions it understands.
    pub async fn handle_message(&self, message: &RuntimeMessage) -> Option<MessageAck> {
        if message.action != UPDATE_MENU_ACTION {
            return None;
        }
        debug!("menu refresh requested by settings surface");
        match self.sync.refresh_active(self.tabs.as_ref()).await {
            Some(snapshot) => self.publish(CoordinatorEvent::MenuRebuilt { snapshot }),
            None => self.publish(CoordinatorEvent::MenuCleared),
        }
        Some(MessageAck { success: true })
    }

    #[instrument(skip(self, click, tab), fields(menu_item = %click.menu_item_id))]
    pub async fn handle_click(&self, click: &MenuClick, tab: Option<&Tab>) -> ClickOutcome {
        let Some((tab_id, url)) = tab.and_then(|tab| tab.url.as_deref().map(|url| (tab.id, url)))
        else {
            return ClickOutcome::Ignored;
        };
        if click.menu_item_id == NO_PROMPTS_MENU_ID
            || click.menu_item_id == NO_CONFIG_MENU_ID
            || click.parent_menu_item_id.as_deref() != Some(PARENT_MENU_ID)
        {
            return ClickOutcome::Ignored;
        }

        let (prompts, sites) = match self.load_settings().await {
            Ok(records) => records,
            Err(err) => {
                error!("could not read settings for menu click: {err}");
                self.publish(CoordinatorEvent::InjectionFailed {
                    tab: tab_id,
                    error: err.to_string(),
                });
                return ClickOutcome::Failed(err.to_string());
            }
        };
        let (prompt_id, request) = match prepare(&prompts, &sites, &click.menu_item_id, url) {
            Ok(prepared) => prepared,
            Err(reason) => {
                warn!("{reason}");
                self.publish(CoordinatorEvent::ClickSkipped {
                    reason: reason.clone(),
                });
                return ClickOutcome::Skipped(reason);
            }
        };
        let frame = click.frame_id.unwrap_or(FrameId::MAIN);
        info!(
            tab_id = %tab_id,
            prompt_id = %prompt_id,
            mode = %request.mode,
            "injecting prompt"
        );

        match self.scripts.inject(tab_id, frame, &request).await {
            Ok(report) => {
                if !report.is_injected() {
                    warn!(outcome = ?report.outcome, "prompt was not injected");
                }
                for step in &report.errors {
                    debug!(step = ?step.step, "injection step failed: {}", step.message);
                }
                self.publish(CoordinatorEvent::PromptInjected {
                    tab: tab_id,
                    prompt: prompt_id,
                    report: report.clone(),
                });
                ClickOutcome::Injected(report)
            }
            Err(err) => {
                error!("error executing injection script: {err}");
                self.publish(CoordinatorEvent::InjectionFailed {
                    tab: tab_id,
                    error: err.to_string(),
                });
                ClickOutcome::Failed(err.to_string())
            }
        }
    }

    async fn load_settings(&self) -> Result<(Vec<Prompt>, Vec<SiteConfig>), StoreError> {
        Ok((self.store.prompts().await?, self.store.site_configs().await?))
    }

    async fn on_tab_activated(&self, tab_id: TabId) {
        debug!(tab_id = %tab_id, "tab activated");
        match self.tabs.get(tab_id).await {
            Ok(Some(Tab { url: Some(url), .. })) => self.rebuild(&url).await,
            Ok(_) => self.clear().await,
            Err(err) => {
                error!(tab_id = %tab_id, "tab lookup failed: {err}");
                self.clear().await;
            }
        }
    }

    async fn rebuild(&self, url: &str) {
        match self.sync.rebuild(url).await {
            Ok(snapshot) => self.publish(CoordinatorEvent::MenuRebuilt { snapshot }),
            Err(_) => self.publish(CoordinatorEvent::MenuCleared),
        }
    }

    async fn clear(&self) {
        self.sync.clear().await;
        self.publish(CoordinatorEvent::MenuCleared);
    }

    fn publish(&self, event: CoordinatorEvent) {
        let _ = self.events.send(event);
    }
}

/// Looks up the clicked prompt and the site for `url`.
///
/// Prompts are matched by id first; legacy prompts without one are matched
/// by their `prompt-<index>` id among the prompts shown for the site.
fn prepare(
    prompts: &[Prompt],
    sites: &[SiteConfig],
    menu_item_id: &str,
    url: &str,
) -> Result<(PromptId, InjectionRequest), SkipReason> {
    let site = site_matcher::resolve(sites, url).filter(|site| !site.xpath.is_empty());
    let prompt = prompts
        .iter()
        .find(|prompt| !prompt.id.is_empty() && prompt.id.as_str() == menu_item_id)
        .or_else(|| {
            let site = site?;
            enabled_prompts(site, prompts)
                .find(|(index, prompt)| prompt.menu_id(*index) == menu_item_id)
                .map(|(_, prompt)| prompt)
        })
        .ok_or_else(|| SkipReason::PromptNotFound(menu_item_id.to_string()))?;
    if prompt.content.is_empty() {
        return Err(SkipReason::EmptyContent(prompt.id.clone()));
    }

    let site = site.ok_or_else(|| SkipReason::NoConfigForUrl(url.to_string()))?;
    if !prompt.is_enabled_for(&site.id) {
        return Err(SkipReason::PromptDisabled(prompt.id.clone()));
    }

    let request = InjectionRequest::new(
        prompt.content.clone(),
        site.xpath.clone(),
        prompt.insert_mode,
        url,
    );
    Ok((prompt.id.clone(), request))
}
