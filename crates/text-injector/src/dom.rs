//! The slice of the DOM the injector touches.

use serde::{Deserialize, Serialize};

use crate::errors::DomError;

/// Events fired after the write so page frameworks observe the change.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyntheticEvent {
    Input,
    Change,
}

impl SyntheticEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyntheticEvent::Input => "input",
            SyntheticEvent::Change => "change",
        }
    }
}

pub trait PageDocument {
    /// First node in document order matching the node-path query.
    fn evaluate_xpath(
        &mut self,
        locator: &str,
    ) -> Result<Option<&mut dyn EditableElement>, DomError>;
}

pub trait EditableElement {
    fn tag_name(&self) -> String;

    /// `Some` for form fields (`input`, `textarea`), whose `value` is a string.
    fn value(&self) -> Option<String>;

    fn is_content_editable(&self) -> bool;

    fn text_content(&self) -> Result<String, DomError>;

    fn set_value(&mut self, value: &str) -> Result<(), DomError>;

    fn set_inner_html(&mut self, html: &str) -> Result<(), DomError>;

    fn set_selection_range(&mut self, start: u32, end: u32) -> Result<(), DomError>;

    /// Collapses the page selection to the end of this element's content.
    fn collapse_selection_to_end(&mut self) -> Result<(), DomError>;

    fn focus(&mut self) -> Result<(), DomError>;

    fn blur(&mut self) -> Result<(), DomError>;

    fn dispatch_event(&mut self, event: SyntheticEvent) -> Result<(), DomError>;
}

/// How the injector treats an element.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ElementKind {
    FormField,
    RichText,
    Other,
}

pub fn classify(element: &dyn EditableElement) -> ElementKind {
    if element.value().is_some() {
        ElementKind::FormField
    } else if element.is_content_editable() {
        ElementKind::RichText
    } else {
        ElementKind::Other
    }
}

/// Offsets in selection APIs count UTF-16 code units.
pub fn dom_length(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}
