use std::sync::Arc;

use async_trait::async_trait;
use favorites_core_types::{FrameId, InsertMode, TabId};
use parking_lot::Mutex;
use serde_json::{json, Value};
use text_injector::{
    inject, DomOp, EditorQuirks, EvaluatingScriptPort, InjectError, InjectOutcome, InjectStep,
    InjectionRequest, MemoryDocument, MemoryElement, MemoryPageHost, ScriptEvaluator, ScriptPort,
};

const FIELD: &str = "//textarea[@id='prompt']";
const EDITOR: &str = "//div[@contenteditable='true']";

fn request(text: &str, locator: &str, mode: InsertMode) -> InjectionRequest {
    InjectionRequest::new(text, locator, mode, "https://example.com/chat")
}

#[test]
fn replace_into_empty_field_places_cursor_at_end() {
    let mut doc = MemoryDocument::new().with_element(FIELD, MemoryElement::textarea(""));
    let report = inject(
        &mut doc,
        &request("hello", FIELD, InsertMode::Replace),
        &EditorQuirks::none(),
    );

    assert_eq!(report.outcome, InjectOutcome::Injected);
    assert_eq!(report.final_len, 5);
    assert_eq!(report.cursor, Some(5));
    assert_eq!(report.events, vec!["input", "change"]);
    assert!(report.errors.is_empty());

    let field = doc.element(FIELD).unwrap();
    assert_eq!(field.text(), "hello");
    assert_eq!(field.selection(), Some((5, 5)));
    assert!(field.is_focused());
    assert_eq!(field.events(), ["focus", "input", "change"]);
}

#[test]
fn insert_modes_combine_with_current_value() {
    let mut doc = MemoryDocument::new().with_element(FIELD, MemoryElement::input("foo"));
    inject(
        &mut doc,
        &request("bar", FIELD, InsertMode::InsertAfter),
        &EditorQuirks::none(),
    );
    assert_eq!(doc.element(FIELD).unwrap().text(), "foobar");

    inject(
        &mut doc,
        &request(">> ", FIELD, InsertMode::InsertBefore),
        &EditorQuirks::none(),
    );
    assert_eq!(doc.element(FIELD).unwrap().text(), ">> foobar");
}

#[test]
fn cursor_offset_counts_utf16_units() {
    let mut doc = MemoryDocument::new().with_element(FIELD, MemoryElement::input(""));
    let report = inject(
        &mut doc,
        &request("hi 👋", FIELD, InsertMode::Replace),
        &EditorQuirks::none(),
    );
    assert_eq!(report.cursor, Some(5));
}

#[test]
fn rich_text_gets_line_break_markup() {
    let mut doc =
        MemoryDocument::new().with_element(EDITOR, MemoryElement::content_editable("old"));
    let report = inject(
        &mut doc,
        &request("line one\nline two\n", EDITOR, InsertMode::InsertAfter),
        &EditorQuirks::none(),
    );

    let editor = doc.element(EDITOR).unwrap();
    assert_eq!(
        editor.inner_html(),
        Some("oldline one<br>line two<br><br>")
    );
    assert!(editor.caret_at_end());
    assert_eq!(report.final_len, dom_len("oldline oneline two"));
    assert_eq!(report.cursor, Some(report.final_len));
}

#[test]
fn rich_text_escapes_markup() {
    let mut doc = MemoryDocument::new().with_element(EDITOR, MemoryElement::content_editable(""));
    inject(
        &mut doc,
        &request("<img src=x onerror=alert(1)>", EDITOR, InsertMode::Replace),
        &EditorQuirks::none(),
    );
    let editor = doc.element(EDITOR).unwrap();
    assert_eq!(
        editor.inner_html(),
        Some("&lt;img src=x onerror=alert(1)&gt;")
    );
    assert_eq!(editor.text(), "<img src=x onerror=alert(1)>");
}

#[test]
fn cursor_failure_still_writes_and_dispatches() {
    let element = MemoryElement::textarea("").failing(DomOp::Selection);
    let mut doc = MemoryDocument::new().with_element(FIELD, element);
    let report = inject(
        &mut doc,
        &request("hello", FIELD, InsertMode::Replace),
        &EditorQuirks::none(),
    );

    assert_eq!(report.outcome, InjectOutcome::Injected);
    assert_eq!(report.cursor, None);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].step, InjectStep::Cursor);
    assert_eq!(report.events, vec!["input", "change"]);
    assert_eq!(doc.element(FIELD).unwrap().text(), "hello");
}

#[test]
fn write_failure_is_reported() {
    let element = MemoryElement::input("keep").failing(DomOp::Write);
    let mut doc = MemoryDocument::new().with_element(FIELD, element);
    let report = inject(
        &mut doc,
        &request("new", FIELD, InsertMode::Replace),
        &EditorQuirks::none(),
    );
    assert_eq!(report.outcome, InjectOutcome::WriteFailed);
    assert!(report.errors.iter().any(|e| e.step == InjectStep::Write));
    assert_eq!(doc.element(FIELD).unwrap().text(), "keep");
}

#[test]
fn missing_target_changes_nothing() {
    let mut doc = MemoryDocument::new().with_element(FIELD, MemoryElement::input("keep"));
    let report = inject(
        &mut doc,
        &request("x", "//input[@name='q']", InsertMode::Replace),
        &EditorQuirks::none(),
    );
    assert_eq!(report.outcome, InjectOutcome::TargetNotFound);
    assert!(report.events.is_empty());
    assert_eq!(doc.element(FIELD).unwrap().text(), "keep");
    assert!(!doc.element(FIELD).unwrap().is_focused());
}

#[test]
fn non_editable_target_is_left_alone() {
    let mut doc = MemoryDocument::new().with_element("//span", MemoryElement::plain("SPAN", "label"));
    let report = inject(
        &mut doc,
        &request("x", "//span", InsertMode::Replace),
        &EditorQuirks::none(),
    );
    assert_eq!(report.outcome, InjectOutcome::NotEditable);
    assert_eq!(doc.element("//span").unwrap().text(), "label");
}

#[test]
fn known_rich_editor_gets_focus_cycle() {
    let mut doc = MemoryDocument::new().with_element(EDITOR, MemoryElement::content_editable(""));
    let request = InjectionRequest::new("hi", EDITOR, InsertMode::Replace, "https://claude.ai/new");
    let report = inject(&mut doc, &request, &EditorQuirks::default());

    assert_eq!(report.events, vec!["input", "change", "blur", "focus"]);
    let editor = doc.element(EDITOR).unwrap();
    assert!(editor.is_focused());
    assert_eq!(editor.events(), ["focus", "input", "change", "blur", "focus"]);
}

#[tokio::test]
async fn memory_host_requires_loaded_document() {
    let host = MemoryPageHost::new(EditorQuirks::none());
    let result = host
        .inject(TabId(7), FrameId::MAIN, &request("x", FIELD, InsertMode::Replace))
        .await;
    assert!(matches!(result, Err(InjectError::NoDocument(TabId(7)))));

    host.load(
        TabId(7),
        FrameId(3),
        MemoryDocument::new().with_element(FIELD, MemoryElement::textarea("")),
    );
    let report = host
        .inject(TabId(7), FrameId(3), &request("x", FIELD, InsertMode::Replace))
        .await
        .unwrap();
    assert!(report.is_injected());
    let doc = host.document(TabId(7), FrameId(3)).unwrap();
    assert_eq!(doc.element(FIELD).unwrap().text(), "x");
}

#[derive(Clone)]
struct RecordingEvaluator {
    sources: Arc<Mutex<Vec<(TabId, FrameId, String)>>>,
    reply: Value,
}

#[async_trait]
impl ScriptEvaluator for RecordingEvaluator {
    async fn evaluate(
        &self,
        tab: TabId,
        frame: FrameId,
        source: &str,
    ) -> Result<Value, InjectError> {
        self.sources.lock().push((tab, frame, source.to_string()));
        Ok(self.reply.clone())
    }
}

#[tokio::test]
async fn evaluating_port_decodes_page_report() {
    let evaluator = RecordingEvaluator {
        sources: Arc::default(),
        reply: json!({
            "outcome": "injected",
            "mode": "insertBefore",
            "finalLen": 12,
            "cursor": 12,
            "events": ["input", "change"],
            "errors": [{ "step": "focus", "message": "blocked" }]
        }),
    };
    let sources = evaluator.sources.clone();
    let port = EvaluatingScriptPort::new(evaluator, EditorQuirks::none());

    let report = port
        .inject(
            TabId(1),
            FrameId(2),
            &request("note: ", FIELD, InsertMode::InsertBefore),
        )
        .await
        .unwrap();

    assert_eq!(report.mode, InsertMode::InsertBefore);
    assert_eq!(report.cursor, Some(12));
    assert_eq!(report.errors[0].step, InjectStep::Focus);
    let recorded = sources.lock();
    assert_eq!(recorded.len(), 1);
    assert_eq!((recorded[0].0, recorded[0].1), (TabId(1), FrameId(2)));
    assert!(recorded[0].2.contains(r#""text":"note: ""#));
}

#[tokio::test]
async fn evaluating_port_rejects_malformed_result() {
    let evaluator = RecordingEvaluator {
        sources: Arc::default(),
        reply: json!(true),
    };
    let port = EvaluatingScriptPort::new(evaluator, EditorQuirks::none());
    let result = port
        .inject(TabId(1), FrameId::MAIN, &request("x", FIELD, InsertMode::Replace))
        .await;
    assert!(matches!(result, Err(InjectError::Decode(_))));
}

fn dom_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}
