//! Self-contained page script performing the injection inside a live tab.
//!
//! The script runs the same steps as [`crate::runner::inject`] and returns an
//! object that deserializes into [`InjectReport`](crate::model::InjectReport).

use serde::Serialize;

use crate::errors::InjectError;
use crate::model::InjectionRequest;
use crate::quirks::EditorQuirks;

const INJECT_TEXT_SCRIPT: &str = include_str!("scripts/inject_text.js");

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScriptArgs<'a> {
    text: &'a str,
    locator: &'a str,
    mode: &'a str,
    focus_cycle: bool,
}

/// Renders the script for one request. All user data travels as a JSON
/// literal, so prompt text cannot break out of the script.
pub fn render(
    request: &InjectionRequest,
    quirks: &EditorQuirks,
    debug: bool,
) -> Result<String, InjectError> {
    let args = ScriptArgs {
        text: &request.text,
        locator: &request.locator,
        mode: request.mode.as_str(),
        focus_cycle: quirks.needs_focus_cycle(&request.page_url),
    };
    let literal = serde_json::to_string(&args)
        .map_err(|err| InjectError::Script(format!("encode script arguments: {err}")))?;
    Ok(INJECT_TEXT_SCRIPT
        .replace("__DEBUG__", if debug { "true" } else { "false" })
        .replace("__ARGS__", &literal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use favorites_core_types::InsertMode;

    #[test]
    fn arguments_are_embedded_as_json() {
        let request = InjectionRequest::new(
            "say \"hi\"\n</script>",
            "//div[@id='box']",
            InsertMode::InsertAfter,
            "https://claude.ai/new",
        );
        let script = render(&request, &EditorQuirks::default(), false).unwrap();
        assert!(script.contains(r#""text":"say \"hi\"\n</script>""#));
        assert!(script.contains(r#""locator":"//div[@id='box']""#));
        assert!(script.contains(r#""mode":"insertAfter""#));
        assert!(script.contains(r#""focusCycle":true"#));
        assert!(script.contains("const debug = false;"));
        assert!(!script.contains("__ARGS__"));
    }

    #[test]
    fn focus_cycle_follows_quirks() {
        let request = InjectionRequest::new("x", "//input", InsertMode::Replace, "https://a.com/");
        let script = render(&request, &EditorQuirks::none(), true).unwrap();
        assert!(script.contains(r#""focusCycle":false"#));
        assert!(script.contains("const debug = true;"));
    }
}
