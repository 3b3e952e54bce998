//! Plain text to contentEditable markup.

/// Escapes markup characters and turns `\n` into `<br>`.
///
/// Prompt text is never parsed as HTML: `&`, `<` and `>` show up literally
/// in the editor, so a prompt holding `<b>` inserts those three characters
/// rather than bold text.
///
/// When the injected text itself ends in a newline the markup has to end in
/// `<br><br>` for the blank trailing line to render. This is an observed
/// browser behaviour, not a rule; some editors render it differently.
pub fn line_break_markup(final_text: &str, injected: &str) -> String {
    let mut html = String::with_capacity(final_text.len() + 16);
    for ch in final_text.chars() {
        match ch {
            '&' => html.push_str("&amp;"),
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            '\n' => html.push_str("<br>"),
            other => html.push(other),
        }
    }

    if injected.ends_with('\n') && final_text.ends_with('\n') && !html.ends_with("<br><br>") {
        if html.ends_with("<br>") {
            html.push_str("<br>");
        } else {
            html.push_str("<br><br>");
        }
    }
    html
}
