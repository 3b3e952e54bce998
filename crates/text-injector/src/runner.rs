use tracing::{debug, instrument, warn};

use crate::dom::{classify, dom_length, ElementKind, PageDocument, SyntheticEvent};
use crate::markup::line_break_markup;
use crate::model::{InjectOutcome, InjectReport, InjectStep, InjectionRequest};
use crate::quirks::EditorQuirks;

/// Writes the request's text into the element its locator resolves to.
///
/// Steps:
/// 1. Resolve the locator; a miss ends the injection
/// 2. Focus the element
/// 3. Read the current value (form field) or text content (rich text)
/// 4. Combine with the injected text per the insert mode
/// 5. Write back, as `value` or as line-break markup
/// 6. Move the cursor to the end of the written content
/// 7. Fire `input` and `change`, plus a blur/focus cycle on known rich editors
///
/// Every DOM failure after step 1 is recorded in the report and the remaining
/// steps still run.
#[instrument(skip_all, fields(mode = %request.mode, locator = %request.locator))]
pub fn inject(
    document: &mut dyn PageDocument,
    request: &InjectionRequest,
    quirks: &EditorQuirks,
) -> InjectReport {
    let mut report = InjectReport::new(request.mode);

    let element = match document.evaluate_xpath(&request.locator) {
        Ok(Some(element)) => element,
        Ok(None) => {
            warn!("target element not found for locator");
            report.outcome = InjectOutcome::TargetNotFound;
            return report;
        }
        Err(err) => {
            warn!("locator evaluation failed: {err}");
            report.record(InjectStep::Locate, err);
            report.outcome = InjectOutcome::TargetNotFound;
            return report;
        }
    };

    if let Err(err) = element.focus() {
        report.record(InjectStep::Focus, err);
    }

    let kind = classify(&*element);
    if kind == ElementKind::Other {
        warn!(
            tag = %element.tag_name(),
            "target is neither a form field nor contentEditable; value not set"
        );
        report.outcome = InjectOutcome::NotEditable;
        return report;
    }

    let current = match kind {
        ElementKind::FormField => element.value().unwrap_or_default(),
        _ => match element.text_content() {
            Ok(text) => text,
            Err(err) => {
                report.record(InjectStep::Read, err);
                String::new()
            }
        },
    };
    let final_text = request.mode.compose(&request.text, &current);
    debug!(
        current_len = current.len(),
        final_len = final_text.len(),
        "computed final text"
    );

    let written = match kind {
        ElementKind::FormField => element.set_value(&final_text).map(|_| {
            dom_length(&element.value().unwrap_or_else(|| final_text.clone()))
        }),
        _ => {
            let html = line_break_markup(&final_text, &request.text);
            element.set_inner_html(&html).map(|_| {
                element
                    .text_content()
                    .map(|text| dom_length(&text))
                    .unwrap_or_else(|_| dom_length(&final_text))
            })
        }
    };
    let length = match written {
        Ok(length) => length,
        Err(err) => {
            warn!("writing injected text failed: {err}");
            report.record(InjectStep::Write, err);
            report.outcome = InjectOutcome::WriteFailed;
            0
        }
    };
    report.final_len = length;

    let cursor = match kind {
        ElementKind::FormField => element.set_selection_range(length, length),
        _ => element.collapse_selection_to_end(),
    };
    match cursor {
        Ok(()) => report.cursor = Some(length),
        Err(err) => {
            debug!("could not place cursor: {err}");
            report.record(InjectStep::Cursor, err);
        }
    }

    for event in [SyntheticEvent::Input, SyntheticEvent::Change] {
        match element.dispatch_event(event) {
            Ok(()) => report.events.push(event.as_str().to_string()),
            Err(err) => report.record(InjectStep::Dispatch, err),
        }
    }

    if quirks.needs_focus_cycle(&request.page_url) {
        match element.blur() {
            Ok(()) => {
                report.events.push("blur".to_string());
                match element.focus() {
                    Ok(()) => report.events.push("focus".to_string()),
                    Err(err) => report.record(InjectStep::FocusCycle, err),
                }
            }
            Err(err) => report.record(InjectStep::FocusCycle, err),
        }
    }

    debug!(outcome = ?report.outcome, errors = report.errors.len(), "injection finished");
    report
}
