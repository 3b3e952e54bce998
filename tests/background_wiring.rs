use std::sync::Arc;

use async_trait::async_trait;
use favorites_core_types::{FrameId, InsertMode, TabId};
use menu_sync::{
    BrowserEvent, ClickOutcome, ContextMenuPort, MenuClick, MenuEntry, MenuError, Tab, TabsPort,
};
use parking_lot::Mutex;
use prompt_favorites::{AppConfig, AppContext, AppError};
use serde_json::{json, Value};
use settings_store::{InMemoryStorage, PromptDraft, SiteDraft};
use text_injector::{
    InjectError, MemoryDocument, MemoryElement, MemoryPageHost, ScriptEvaluator,
};

const CLAUDE_URL: &str = "https://claude.ai/chat/1";
const EDITOR: &str = "//div[@contenteditable='true']";

#[derive(Clone, Default)]
struct RecordingMenus {
    entries: Arc<Mutex<Vec<MenuEntry>>>,
}

#[async_trait]
impl ContextMenuPort for RecordingMenus {
    async fn remove_all(&self) -> Result<(), MenuError> {
        self.entries.lock().clear();
        Ok(())
    }

    async fn create(&self, entry: &MenuEntry) -> Result<(), MenuError> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }
}

struct SingleTab(Tab);

#[async_trait]
impl TabsPort for SingleTab {
    async fn get(&self, tab: TabId) -> Result<Option<Tab>, MenuError> {
        Ok((tab == self.0.id).then(|| self.0.clone()))
    }

    async fn query_active(&self) -> Result<Option<Tab>, MenuError> {
        Ok(Some(self.0.clone()))
    }
}

#[derive(Default)]
struct RecordingEvaluator {
    sources: Mutex<Vec<String>>,
}

#[async_trait]
impl ScriptEvaluator for RecordingEvaluator {
    async fn evaluate(
        &self,
        _tab: TabId,
        _frame: FrameId,
        source: &str,
    ) -> Result<Value, InjectError> {
        self.sources.lock().push(source.to_string());
        Ok(json!({
            "outcome": "injected",
            "mode": "replace",
            "finalLen": 5,
            "cursor": 5,
            "events": ["input", "change", "blur", "focus"],
            "errors": []
        }))
    }
}

fn context() -> AppContext {
    AppContext::with_storage(AppConfig::default(), Arc::new(InMemoryStorage::new()))
}

#[tokio::test]
async fn settings_edits_and_clicks_drive_the_page() {
    let ctx = context();
    let menus = RecordingMenus::default();
    let pages = MemoryPageHost::new(ctx.config().editor_quirks());
    pages.load(
        TabId(3),
        FrameId::MAIN,
        MemoryDocument::new().with_element(EDITOR, MemoryElement::content_editable("Draft")),
    );
    let background = ctx.background(
        Arc::new(menus.clone()),
        Arc::new(SingleTab(Tab::new(TabId(3), CLAUDE_URL))),
        Arc::new(pages.clone()),
    );

    background
        .store
        .add_site(SiteDraft::new("Claude", "*://claude.ai/*", EDITOR))
        .await
        .unwrap();
    let prompt = background
        .store
        .add_prompt(PromptDraft::new("Sign-off", "\nThanks!\n").with_mode(InsertMode::InsertAfter))
        .await
        .unwrap();

    // the edit above refreshed the active tab's menu
    let ids: Vec<String> = menus.entries.lock().iter().map(|e| e.id.clone()).collect();
    assert_eq!(ids, vec!["promptInjectParent".to_string(), prompt.id.to_string()]);

    let outcome = background
        .coordinator
        .handle_click(
            &MenuClick::prompt(prompt.id.as_str()),
            Some(&Tab::new(TabId(3), CLAUDE_URL)),
        )
        .await;
    let ClickOutcome::Injected(report) = outcome else {
        panic!("unexpected outcome: {outcome:?}");
    };
    assert!(report.is_injected());
    assert_eq!(report.events, vec!["input", "change", "blur", "focus"]);

    let doc = pages.document(TabId(3), FrameId::MAIN).unwrap();
    assert_eq!(
        doc.element(EDITOR).unwrap().inner_html(),
        Some("Draft<br>Thanks!<br><br>")
    );
}

#[tokio::test]
async fn install_event_clears_menu() {
    let ctx = context();
    let menus = RecordingMenus::default();
    menus
        .entries
        .lock()
        .push(MenuEntry {
            id: "stale".into(),
            parent_id: None,
            title: "stale".into(),
            contexts: vec!["editable".into()],
            enabled: true,
        });
    let background = ctx.background(
        Arc::new(menus.clone()),
        Arc::new(SingleTab(Tab::new(TabId(1), CLAUDE_URL))),
        Arc::new(MemoryPageHost::default()),
    );

    background
        .coordinator
        .handle_event(BrowserEvent::Installed {
            reason: "install".into(),
        })
        .await;
    assert!(menus.entries.lock().is_empty());
}

#[tokio::test]
async fn page_script_follows_click_rules() {
    let ctx = context();
    let site = ctx
        .store()
        .add_site(SiteDraft::new("Claude", "*://claude.ai/*", EDITOR))
        .await
        .unwrap();
    let prompt = ctx
        .store()
        .add_prompt(PromptDraft::new("Hi", "hello"))
        .await
        .unwrap();

    let script = ctx.page_script(&prompt.id, CLAUDE_URL).await.unwrap();
    assert!(script.contains(r#""focusCycle":true"#));

    let missing = ctx.page_script(&prompt.id, "https://elsewhere.org/").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    ctx.store()
        .set_prompt_enabled(&prompt.id, &site.id, false)
        .await
        .unwrap();
    let disabled = ctx.page_script(&prompt.id, CLAUDE_URL).await;
    assert!(matches!(disabled, Err(AppError::Rejected(_))));

    let preview = ctx.preview(CLAUDE_URL).await.unwrap();
    assert_eq!(preview.site.map(|s| s.id), Some(site.id));
    assert!(preview.menu.prompt_entries().is_empty());
}

#[tokio::test]
async fn evaluating_port_renders_with_config_debug_flag() {
    let config = AppConfig {
        debug: true,
        ..AppConfig::default()
    };
    let ctx = AppContext::with_storage(config, Arc::new(InMemoryStorage::new()));
    let port = Arc::new(ctx.evaluating_port(RecordingEvaluator::default()));
    let background = ctx.background(
        Arc::new(RecordingMenus::default()),
        Arc::new(SingleTab(Tab::new(TabId(5), CLAUDE_URL))),
        port.clone(),
    );
    background
        .store
        .add_site(SiteDraft::new("Claude", "*://claude.ai/*", EDITOR))
        .await
        .unwrap();
    let prompt = background
        .store
        .add_prompt(PromptDraft::new("Hi", "hello"))
        .await
        .unwrap();

    let outcome = background
        .coordinator
        .handle_click(
            &MenuClick::prompt(prompt.id.as_str()),
            Some(&Tab::new(TabId(5), CLAUDE_URL)),
        )
        .await;
    assert!(matches!(outcome, ClickOutcome::Injected(_)));

    let sources = port.evaluator().sources.lock();
    assert_eq!(sources.len(), 1);
    assert!(sources[0].contains("const debug = true;"));
    assert!(sources[0].contains(r#""focusCycle":true"#));
}
