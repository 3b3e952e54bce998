use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use favorites_core_types::{FrameId, TabId};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::InjectError;
use crate::memory::MemoryDocument;
use crate::model::{InjectReport, InjectionRequest};
use crate::page_script;
use crate::quirks::EditorQuirks;
use crate::runner;

/// Runs an injection inside a specific frame of a tab.
#[async_trait]
pub trait ScriptPort: Send + Sync {
    async fn inject(
        &self,
        tab: TabId,
        frame: FrameId,
        request: &InjectionRequest,
    ) -> Result<InjectReport, InjectError>;
}

/// Evaluates a script source in a frame and hands back its JSON result.
#[async_trait]
pub trait ScriptEvaluator: Send + Sync {
    async fn evaluate(&self, tab: TabId, frame: FrameId, source: &str)
        -> Result<Value, InjectError>;
}

/// [`ScriptPort`] over any script evaluator: renders the page script and
/// decodes the report it returns.
pub struct EvaluatingScriptPort<E> {
    evaluator: E,
    quirks: EditorQuirks,
    debug: bool,
}

impl<E: ScriptEvaluator> EvaluatingScriptPort<E> {
    pub fn new(evaluator: E, quirks: EditorQuirks) -> Self {
        Self {
            evaluator,
            quirks,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }
}

#[async_trait]
impl<E: ScriptEvaluator> ScriptPort for EvaluatingScriptPort<E> {
    #[instrument(skip_all, fields(tab = %tab, frame = frame.0))]
    async fn inject(
        &self,
        tab: TabId,
        frame: FrameId,
        request: &InjectionRequest,
    ) -> Result<InjectReport, InjectError> {
        let source = page_script::render(request, &self.quirks, self.debug)?;
        let value = self.evaluator.evaluate(tab, frame, &source).await?;
        let report: InjectReport =
            serde_json::from_value(value).map_err(|err| InjectError::Decode(err.to_string()))?;
        debug!(outcome = ?report.outcome, "page script returned");
        Ok(report)
    }
}

/// In-process pages, one [`MemoryDocument`] per tab and frame, injected
/// with the native runner.
#[derive(Clone, Default)]
pub struct MemoryPageHost {
    documents: Arc<Mutex<HashMap<(TabId, FrameId), MemoryDocument>>>,
    quirks: EditorQuirks,
}

impl MemoryPageHost {
    pub fn new(quirks: EditorQuirks) -> Self {
        Self {
            documents: Arc::default(),
            quirks,
        }
    }

    pub fn load(&self, tab: TabId, frame: FrameId, document: MemoryDocument) {
        self.documents.lock().insert((tab, frame), document);
    }

    /// Copy of the document as it stands now.
    pub fn document(&self, tab: TabId, frame: FrameId) -> Option<MemoryDocument> {
        self.documents.lock().get(&(tab, frame)).cloned()
    }
}

#[async_trait]
impl ScriptPort for MemoryPageHost {
    async fn inject(
        &self,
        tab: TabId,
        frame: FrameId,
        request: &InjectionRequest,
    ) -> Result<InjectReport, InjectError> {
        let mut documents = self.documents.lock();
        let document = documents
            .get_mut(&(tab, frame))
            .ok_or(InjectError::NoDocument(tab))?;
        Ok(runner::inject(document, request, &self.quirks))
    }
}
