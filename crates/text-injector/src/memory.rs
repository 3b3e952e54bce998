//! Headless document used by tests and hosts that have no live page.

use std::collections::HashSet;

use crate::dom::{dom_length, EditableElement, PageDocument, SyntheticEvent};
use crate::errors::DomError;

/// DOM operations a [`MemoryElement`] can be told to fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DomOp {
    Focus,
    Blur,
    Read,
    Write,
    Selection,
    Dispatch,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Body {
    Field(String),
    Rich(String),
    Plain(String),
}

#[derive(Clone, Debug)]
pub struct MemoryElement {
    tag: String,
    body: Body,
    selection: Option<(u32, u32)>,
    caret_at_end: bool,
    focused: bool,
    events: Vec<String>,
    failures: HashSet<DomOp>,
}

impl MemoryElement {
    fn with_body(tag: &str, body: Body) -> Self {
        Self {
            tag: tag.to_string(),
            body,
            selection: None,
            caret_at_end: false,
            focused: false,
            events: Vec::new(),
            failures: HashSet::new(),
        }
    }

    pub fn input(value: &str) -> Self {
        Self::with_body("INPUT", Body::Field(value.to_string()))
    }

    pub fn textarea(value: &str) -> Self {
        Self::with_body("TEXTAREA", Body::Field(value.to_string()))
    }

    pub fn content_editable(html: &str) -> Self {
        Self::with_body("DIV", Body::Rich(html.to_string()))
    }

    pub fn plain(tag: &str, text: &str) -> Self {
        Self::with_body(tag, Body::Plain(text.to_string()))
    }

    pub fn failing(mut self, op: DomOp) -> Self {
        self.failures.insert(op);
        self
    }

    /// Current `value` for fields, rendered text otherwise.
    pub fn text(&self) -> String {
        match &self.body {
            Body::Field(value) => value.clone(),
            Body::Rich(html) => render_text(html),
            Body::Plain(text) => text.clone(),
        }
    }

    pub fn inner_html(&self) -> Option<&str> {
        match &self.body {
            Body::Rich(html) => Some(html),
            _ => None,
        }
    }

    pub fn selection(&self) -> Option<(u32, u32)> {
        self.selection
    }

    pub fn caret_at_end(&self) -> bool {
        self.caret_at_end
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    fn check(&self, op: DomOp) -> Result<(), DomError> {
        if self.failures.contains(&op) {
            Err(DomError::Exception(format!("{op:?} rejected by element")))
        } else {
            Ok(())
        }
    }
}

impl EditableElement for MemoryElement {
    fn tag_name(&self) -> String {
        self.tag.clone()
    }

    fn value(&self) -> Option<String> {
        match &self.body {
            Body::Field(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn is_content_editable(&self) -> bool {
        matches!(self.body, Body::Rich(_))
    }

    fn text_content(&self) -> Result<String, DomError> {
        self.check(DomOp::Read)?;
        Ok(self.text())
    }

    fn set_value(&mut self, value: &str) -> Result<(), DomError> {
        self.check(DomOp::Write)?;
        match &mut self.body {
            Body::Field(current) => {
                *current = value.to_string();
                Ok(())
            }
            _ => Err(DomError::Exception("element has no value property".into())),
        }
    }

    fn set_inner_html(&mut self, html: &str) -> Result<(), DomError> {
        self.check(DomOp::Write)?;
        self.body = match &self.body {
            Body::Field(_) => return Err(DomError::Exception("form fields keep a value".into())),
            Body::Rich(_) => Body::Rich(html.to_string()),
            Body::Plain(_) => Body::Plain(render_text(html)),
        };
        Ok(())
    }

    fn set_selection_range(&mut self, start: u32, end: u32) -> Result<(), DomError> {
        self.check(DomOp::Selection)?;
        let len = dom_length(&self.text());
        if start > len || end > len {
            return Err(DomError::Exception(format!(
                "selection {start}..{end} outside value of length {len}"
            )));
        }
        self.selection = Some((start, end));
        Ok(())
    }

    fn collapse_selection_to_end(&mut self) -> Result<(), DomError> {
        self.check(DomOp::Selection)?;
        self.caret_at_end = true;
        Ok(())
    }

    fn focus(&mut self) -> Result<(), DomError> {
        self.check(DomOp::Focus)?;
        if !self.focused {
            self.events.push("focus".into());
        }
        self.focused = true;
        Ok(())
    }

    fn blur(&mut self) -> Result<(), DomError> {
        self.check(DomOp::Blur)?;
        if self.focused {
            self.events.push("blur".into());
        }
        self.focused = false;
        Ok(())
    }

    fn dispatch_event(&mut self, event: SyntheticEvent) -> Result<(), DomError> {
        self.check(DomOp::Dispatch)?;
        self.events.push(event.as_str().into());
        Ok(())
    }
}

/// Elements keyed by the exact locator string that finds them.
#[derive(Clone, Debug, Default)]
pub struct MemoryDocument {
    nodes: Vec<(String, MemoryElement)>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, locator: &str, element: MemoryElement) -> Self {
        self.insert(locator, element);
        self
    }

    pub fn insert(&mut self, locator: &str, element: MemoryElement) {
        match self.nodes.iter_mut().find(|(key, _)| key == locator) {
            Some((_, existing)) => *existing = element,
            None => self.nodes.push((locator.to_string(), element)),
        }
    }

    pub fn element(&self, locator: &str) -> Option<&MemoryElement> {
        self.nodes
            .iter()
            .find(|(key, _)| key == locator)
            .map(|(_, element)| element)
    }
}

impl PageDocument for MemoryDocument {
    fn evaluate_xpath(
        &mut self,
        locator: &str,
    ) -> Result<Option<&mut dyn EditableElement>, DomError> {
        if locator.trim().is_empty() {
            return Err(DomError::InvalidLocator("empty expression".into()));
        }
        Ok(self
            .nodes
            .iter_mut()
            .find(|(key, _)| key == locator)
            .map(|(_, element)| element as &mut dyn EditableElement))
    }
}

/// `textContent` of the markup: tags dropped and entities decoded.
fn render_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
