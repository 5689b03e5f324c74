//! Plain data produced by one inspection of a page.
//!
//! Everything here is request-scoped: it is built once per page load,
//! handed to the renderer and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Design facts collected from a page's DOM and computed styles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSet {
    /// Computed `font-family` values, deduplicated, first-seen order
    pub fonts: Vec<String>,
    /// Text colors followed by background colors, each group deduplicated
    pub colors: Vec<String>,
    /// Resolved `src` of every `<img>`
    pub images: Vec<String>,
    /// Resolved `href` of every `<link rel="stylesheet">`
    #[serde(rename = "externalCSSLinks")]
    pub external_css_links: Vec<String>,
    /// Outer markup of every `<svg>` element
    #[serde(rename = "inlineSVGs")]
    pub inline_svgs: Vec<String>,
    /// Images whose URL ends in `.svg`
    #[serde(rename = "svgImages")]
    pub svg_images: Vec<String>,
}

/// Stylesheet URL to raw text, in insertion order.
///
/// Only successful fetches are present. Re-inserting a URL replaces its text
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCss {
    entries: Vec<(String, String)>,
}

impl ParsedCss {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, text: impl Into<String>) {
        let url = url.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(u, _)| *u == url) {
            Some(entry) => entry.1 = text,
            None => self.entries.push((url, text)),
        }
    }

    pub fn get(&self, url: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, t)| t.as_str())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.get(url).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(url, text)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(u, t)| (u.as_str(), t.as_str()))
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(u, _)| u.as_str())
    }
}

/// Stylesheets fetched while a page loaded: every URL requested, in
/// document order, and the text of those that came back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedStylesheets {
    pub requested: Vec<String>,
    pub sheets: ParsedCss,
}

impl LinkedStylesheets {
    /// Whether exactly `urls` were requested, in the same order.
    pub fn covers(&self, urls: &[String]) -> bool {
        self.requested == urls
    }
}

impl<U: Into<String>, T: Into<String>> FromIterator<(U, T)> for ParsedCss {
    fn from_iter<I: IntoIterator<Item = (U, T)>>(iter: I) -> Self {
        let mut css = ParsedCss::new();
        for (u, t) in iter {
            css.insert(u, t);
        }
        css
    }
}

/// One `animation`/`transition` declaration found by the rule scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationEntry {
    pub selector: String,
    pub animation: Option<String>,
    pub transition: Option<String>,
    /// URL of the stylesheet the rule came from
    pub source: String,
}

/// Output of one full pass: extraction, stylesheet fetch and scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub artifacts: ArtifactSet,
    pub parsed_css: ParsedCss,
    pub animations: Vec<AnimationEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_css_keeps_insertion_order() {
        let mut css = ParsedCss::new();
        css.insert("b.css", "b{}");
        css.insert("a.css", "a{}");
        css.insert("b.css", "b{color:red}");
        let urls: Vec<_> = css.urls().collect();
        assert_eq!(urls, vec!["b.css", "a.css"]);
        assert_eq!(css.get("b.css"), Some("b{color:red}"));
        assert!(!css.contains("c.css"));
    }

    #[test]
    fn artifact_set_serializes_with_wire_names() {
        let set = ArtifactSet {
            external_css_links: vec!["https://x/s.css".into()],
            ..Default::default()
        };
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.get("externalCSSLinks").is_some());
        assert!(json.get("inlineSVGs").is_some());
        assert!(json.get("svgImages").is_some());
        assert!(json.get("fonts").is_some());
    }
}
