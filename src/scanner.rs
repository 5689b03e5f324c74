//! Lexical scan of stylesheet text for `animation` and `transition`
//! declarations.
//!
//! This is not a CSS parser. Text is split on `}` and each chunk on its first
//! `{`, so comments, strings and nested blocks are not understood. An
//! `@media (...) { .a { ... } }` block yields the `@media` prelude as the
//! selector. Only the first `animation:` and first `transition:` of each
//! chunk are reported.

use crate::artifacts::{AnimationEntry, ParsedCss};
use regex::Regex;
use std::sync::OnceLock;

fn animation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"animation:\s*([^;]+);").expect("valid regex"))
}

fn transition_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"transition:\s*([^;]+);").expect("valid regex"))
}

fn first_value(re: &Regex, body: &str) -> Option<String> {
    re.captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Scan one stylesheet's text. `source` is recorded on every entry.
pub fn scan_stylesheet(source: &str, text: &str) -> Vec<AnimationEntry> {
    text.split('}')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .filter_map(|chunk| {
            let (selector, body) = chunk.split_once('{')?;
            let animation = first_value(animation_re(), body);
            let transition = first_value(transition_re(), body);
            if animation.is_none() && transition.is_none() {
                return None;
            }
            Some(AnimationEntry {
                selector: selector.trim().to_string(),
                animation,
                transition,
                source: source.to_string(),
            })
        })
        .collect()
}

/// Scan every fetched stylesheet, in the mapping's insertion order.
pub fn scan_animations(parsed: &ParsedCss) -> Vec<AnimationEntry> {
    parsed
        .iter()
        .flat_map(|(url, text)| scan_stylesheet(url, text))
        .collect()
}
