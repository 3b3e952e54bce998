use favorites_core_types::InsertMode;
use serde::{Deserialize, Serialize};

use crate::errors::DomError;

/// Everything a single injection needs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionRequest {
    pub text: String,
    pub locator: String,
    pub mode: InsertMode,
    pub page_url: String,
}

impl InjectionRequest {
    pub fn new(
        text: impl Into<String>,
        locator: impl Into<String>,
        mode: InsertMode,
        page_url: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            locator: locator.into(),
            mode,
            page_url: page_url.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InjectOutcome {
    Injected,
    TargetNotFound,
    NotEditable,
    WriteFailed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InjectStep {
    Locate,
    Focus,
    Read,
    Write,
    Cursor,
    Dispatch,
    FocusCycle,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StepError {
    pub step: InjectStep,
    pub message: String,
}

/// What happened during one injection. Step failures are collected rather
/// than aborting, so a failed cursor move still leaves the text written.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectReport {
    pub outcome: InjectOutcome,
    pub mode: InsertMode,
    #[serde(default)]
    pub final_len: u32,
    #[serde(default)]
    pub cursor: Option<u32>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub errors: Vec<StepError>,
}

impl InjectReport {
    pub fn new(mode: InsertMode) -> Self {
        Self {
            outcome: InjectOutcome::Injected,
            mode,
            final_len: 0,
            cursor: None,
            events: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn record(&mut self, step: InjectStep, err: DomError) {
        self.errors.push(StepError {
            step,
            message: err.to_string(),
        });
    }

    pub fn is_injected(&self) -> bool {
        self.outcome == InjectOutcome::Injected
    }
}
