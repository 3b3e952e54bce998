//! Simplified match-pattern support.
//!
//! Patterns are a subset of browser match patterns: `*` is a lazy wildcard and
//! a leading `*:` scheme stands for `http` or `https` only. A pattern without
//! `://` is treated as `*://<pattern>`.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::MatchError;

const SCHEME_SEPARATOR: &str = "://";
const WILDCARD_SCHEME: &str = "*://";
const SCHEME_ALTERNATION: &str = "(?:http|https):";
const CACHE_LIMIT: usize = 256;

static COMPILED: Lazy<DashMap<String, Option<Regex>>> = Lazy::new(DashMap::new);

/// Tests `url` against `pattern`. Empty inputs and patterns that fail to
/// compile never match.
pub fn matches(pattern: &str, url: &str) -> bool {
    if pattern.is_empty() || url.is_empty() {
        return false;
    }

    if let Some(entry) = COMPILED.get(pattern) {
        return entry.value().as_ref().is_some_and(|re| re.is_match(url));
    }

    let compiled = match compile(pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            warn!(target: "site-matcher", pattern, "invalid pattern for matching: {err}");
            None
        }
    };
    let hit = compiled.as_ref().is_some_and(|re| re.is_match(url));

    if COMPILED.len() >= CACHE_LIMIT {
        COMPILED.clear();
    }
    COMPILED.insert(pattern.to_string(), compiled);
    hit
}

/// Builds the anchored regular expression for a pattern.
pub fn compile(pattern: &str) -> Result<Regex, MatchError> {
    if pattern.is_empty() {
        return Err(MatchError::EmptyPattern);
    }
    let source = to_regex_source(pattern);
    Regex::new(&source).map_err(|err| MatchError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}

/// Regex source for a pattern, anchored at both ends.
pub fn to_regex_source(pattern: &str) -> String {
    let processed = if pattern.contains(SCHEME_SEPARATOR) {
        pattern.to_string()
    } else {
        format!("{WILDCARD_SCHEME}{pattern}")
    };

    let escaped = escape_literals(&processed);
    let schemed = match escaped.strip_prefix("*:") {
        Some(rest) => format!("{SCHEME_ALTERNATION}{rest}"),
        None => escaped,
    };
    let body = schemed.replace('*', ".*?");
    format!("^{body}$")
}

/// True when the pattern looks like a conventional match pattern. Anything
/// else is still accepted; callers only warn about it.
pub fn looks_like_match_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.starts_with("http://") || pattern.starts_with("https://")
}

fn escape_literals(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() * 2);
    for ch in raw.chars() {
        if matches!(
            ch,
            '.' | '+' | '?' | '^' | '$' | '{' | '}' | '(' | ')' | '|' | '[' | ']' | '\\'
        ) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
