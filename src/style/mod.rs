//! Computed styles for a static HTML document.
//!
//! A [`StyledDocument`] is an owned snapshot of a parsed page: every element
//! in document order, its attributes, its parent, and the computed
//! `font-family`, `color` and `background-color` the cascade resolves for it.
//! It stands in for `getComputedStyle` when no browser is available.

pub mod cascade;
pub mod color;
pub mod sheet;

use crate::artifacts::ParsedCss;
use crate::{Error, Result};
use cascade::{Applied, Origin, Resolved, Specificity};
use log::debug;
use scraper::{ElementRef, Html, Selector};
use sheet::{parse_declarations, parse_stylesheet, split_commas, Declaration};

/// Built-in defaults applied below every author stylesheet.
pub const USER_AGENT_CSS: &str = r#"
a[href] { color: #0000ee; }
code, kbd, pre, samp, tt { font-family: monospace; }
mark { background-color: yellow; color: black; }
"#;

/// Computed values of one element, serialized as `getComputedStyle` would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedStyle {
    pub font_family: String,
    pub color: String,
    pub background_color: String,
}

impl From<&Resolved> for ComputedStyle {
    fn from(r: &Resolved) -> Self {
        ComputedStyle {
            font_family: r.font_family.clone(),
            color: r.color.to_css(),
            background_color: r.background_color.to_css(),
        }
    }
}

/// Index of an element in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

#[derive(Debug, Clone)]
pub struct ElementNode {
    /// Lowercase local name
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub parent: Option<ElementId>,
    pub style: ComputedStyle,
    /// Outer markup, kept only for `<svg>` roots
    pub outer_html: Option<String>,
}

impl ElementNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

struct CompiledRule {
    selectors: Vec<(Selector, Specificity)>,
    declarations: Vec<Declaration>,
    origin: Origin,
    order: usize,
}

fn compile_sheet(css: &str, origin: Origin, next_order: &mut usize, out: &mut Vec<CompiledRule>) {
    for rule in parse_stylesheet(css) {
        let selectors: Vec<_> = split_commas(&rule.selector)
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .filter_map(|part| match Selector::parse(part) {
                Ok(sel) => {
                    let specificity = Specificity::of(&sel);
                    Some((sel, specificity))
                }
                Err(_) => {
                    debug!("skipping unsupported selector {:?}", part);
                    None
                }
            })
            .collect();
        if selectors.is_empty() || rule.declarations.is_empty() {
            continue;
        }
        out.push(CompiledRule {
            selectors,
            declarations: rule.declarations,
            origin,
            order: *next_order,
        });
        *next_order += 1;
    }
}

fn is_stylesheet_link(el: &ElementRef) -> bool {
    el.value().name() == "link"
        && el
            .value()
            .attr("rel")
            .map(|rel| rel.split_ascii_whitespace().any(|t| t.eq_ignore_ascii_case("stylesheet")))
            .unwrap_or(false)
}

/// Resolve `href` against `base`, falling back to the raw value.
pub fn resolve_url(base: Option<&url::Url>, href: &str) -> String {
    match base {
        Some(base) => base.join(href).map(|u| u.to_string()).unwrap_or_else(|_| href.to_string()),
        None => href.to_string(),
    }
}

/// Document-order traversal of every element with its parent index.
fn walk(document: &Html) -> Vec<(ElementRef<'_>, Option<usize>)> {
    let mut out = Vec::new();
    let mut stack: Vec<(ElementRef, Option<usize>)> = vec![(document.root_element(), None)];
    while let Some((node, parent_idx)) = stack.pop() {
        let idx = out.len();
        out.push((node, parent_idx));
        // Push children in reverse order so the traversal preserves document order.
        let children: Vec<_> = node.children().filter_map(ElementRef::wrap).collect();
        for child in children.into_iter().rev() {
            stack.push((child, Some(idx)));
        }
    }
    out
}

/// URLs of stylesheets the document links, resolved against `base_url`.
pub fn linked_stylesheet_urls(html: &str, base_url: Option<&str>) -> Vec<String> {
    let document = Html::parse_document(html);
    let base = base_url.and_then(|u| url::Url::parse(u).ok());
    walk(&document)
        .into_iter()
        .filter(|(el, _)| is_stylesheet_link(el))
        .filter_map(|(el, _)| el.value().attr("href").map(|h| resolve_url(base.as_ref(), h)))
        .collect()
}

/// Owned snapshot of a page with computed styles.
#[derive(Debug, Clone)]
pub struct StyledDocument {
    html: String,
    base: Option<url::Url>,
    title: String,
    elements: Vec<ElementNode>,
}

impl StyledDocument {
    /// Parse `html` and run the cascade.
    ///
    /// `linked` supplies the text of `<link rel="stylesheet">` targets that
    /// were fetched; links missing from it contribute nothing.
    pub fn build(html: &str, base_url: Option<&str>, linked: &ParsedCss, default_font_family: &str) -> Self {
        let document = Html::parse_document(html);
        let base = base_url.and_then(|u| url::Url::parse(u).ok());
        let nodes = walk(&document);

        let mut order = 0usize;
        let mut rules = Vec::new();
        compile_sheet(USER_AGENT_CSS, Origin::UserAgent, &mut order, &mut rules);
        for (el, _) in &nodes {
            if el.value().name() == "style" {
                let text = el.text().collect::<String>();
                compile_sheet(&text, Origin::Author, &mut order, &mut rules);
            } else if is_stylesheet_link(el) {
                if let Some(href) = el.value().attr("href") {
                    let url = resolve_url(base.as_ref(), href);
                    if let Some(text) = linked.get(&url) {
                        compile_sheet(text, Origin::Author, &mut order, &mut rules);
                    }
                }
            }
        }
        debug!("cascade: {} rules over {} elements", rules.len(), nodes.len());

        let initial = Resolved::initial(default_font_family);
        let mut resolved: Vec<Resolved> = Vec::with_capacity(nodes.len());
        let mut elements = Vec::with_capacity(nodes.len());

        for (el, parent_idx) in &nodes {
            let inline = el.value().attr("style").map(parse_declarations).unwrap_or_default();

            let mut applied: Vec<Applied> = Vec::new();
            for rule in &rules {
                let matched = rule
                    .selectors
                    .iter()
                    .filter(|(sel, _)| sel.matches(el))
                    .map(|(_, spec)| *spec)
                    .max();
                if let Some(specificity) = matched {
                    applied.extend(rule.declarations.iter().map(|declaration| Applied {
                        declaration,
                        origin: rule.origin,
                        specificity,
                        order: rule.order,
                    }));
                }
            }
            applied.extend(inline.iter().map(|declaration| Applied {
                declaration,
                origin: Origin::Inline,
                specificity: Specificity::default(),
                order,
            }));
            cascade::sort_cascade(&mut applied);

            let parent = parent_idx.map(|p| &resolved[p]).unwrap_or(&initial);
            let values = cascade::resolve(&applied, parent, &initial);

            let tag = el.value().name().to_ascii_lowercase();
            let outer_html = (tag == "svg").then(|| el.html());
            elements.push(ElementNode {
                attributes: el
                    .value()
                    .attrs()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                parent: parent_idx.map(ElementId),
                style: ComputedStyle::from(&values),
                outer_html,
                tag,
            });
            resolved.push(values);
        }

        let title = elements
            .iter()
            .zip(&nodes)
            .find(|(node, _)| node.tag == "title")
            .map(|(_, (el, _))| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        StyledDocument {
            html: html.to_string(),
            base,
            title,
            elements,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> Option<&str> {
        self.base.as_ref().map(|u| u.as_str())
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Every element in document order (the `querySelectorAll('*')` view)
    pub fn elements(&self) -> &[ElementNode] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&ElementNode> {
        self.elements.get(id.0)
    }

    pub fn computed_style(&self, id: ElementId) -> Option<&ComputedStyle> {
        self.element(id).map(|e| &e.style)
    }

    pub fn resolve_url(&self, href: &str) -> String {
        resolve_url(self.base.as_ref(), href)
    }

    /// Elements matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementId>> {
        let sel = Selector::parse(selector)
            .map_err(|e| Error::Other(format!("Invalid selector {:?}: {:?}", selector, e)))?;
        let document = Html::parse_document(&self.html);
        Ok(walk(&document)
            .into_iter()
            .enumerate()
            .filter(|(_, (el, _))| sel.matches(el))
            .map(|(i, _)| ElementId(i))
            .collect())
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<ElementId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(html: &str) -> StyledDocument {
        StyledDocument::build(html, Some("https://example.test/dir/page.html"), &ParsedCss::new(), "Times New Roman")
    }

    fn style_of<'a>(doc: &'a StyledDocument, selector: &str) -> &'a ComputedStyle {
        let id = doc.query_selector(selector).unwrap().expect("element");
        doc.computed_style(id).unwrap()
    }

    #[test]
    fn defaults_apply_without_styles() {
        let doc = styled("<html><head><title> T </title></head><body><p>x</p></body></html>");
        assert_eq!(doc.title(), "T");
        let p = style_of(&doc, "p");
        assert_eq!(p.font_family, "Times New Roman");
        assert_eq!(p.color, "rgb(0, 0, 0)");
        assert_eq!(p.background_color, "rgba(0, 0, 0, 0)");
    }

    #[test]
    fn cascade_honors_specificity_order_and_inheritance() {
        let html = r#"<html><head><style>
            body { font-family: 'Open Sans', sans-serif; color: #333; }
            .note { color: red; }
            p { color: blue; background: #fafafa; }
            #main p { color: green !important; }
        </style></head><body>
            <div id="main"><p class="note" style="color: purple">a</p></div>
            <p class="note">b</p>
            <span>c</span>
        </body></html>"#;
        let doc = styled(html);

        let ids = doc.query_selector_all("p").unwrap();
        let first = doc.computed_style(ids[0]).unwrap();
        assert_eq!(first.color, "rgb(0, 128, 0)");
        assert_eq!(first.background_color, "rgb(250, 250, 250)");
        assert_eq!(first.font_family, "\"Open Sans\", sans-serif");

        let second = doc.computed_style(ids[1]).unwrap();
        assert_eq!(second.color, "rgb(255, 0, 0)");

        let span = style_of(&doc, "span");
        assert_eq!(span.color, "rgb(51, 51, 51)");
        assert_eq!(span.background_color, "rgba(0, 0, 0, 0)");
    }

    #[test]
    fn quoted_brackets_do_not_inflate_attribute_specificity() {
        let html = r#"<style>
            .b .note { color: red; }
            [data-x="a]b"] p { color: blue; }
        </style><div class="b" data-x="a]b"><p class="note">x</p></div>"#;
        let doc = styled(html);
        assert_eq!(style_of(&doc, "p").color, "rgb(255, 0, 0)");
    }

    #[test]
    fn inline_style_beats_selectors() {
        let doc = styled(r#"<style>#x{color:red}</style><b id="x" style="color: blue">x</b>"#);
        assert_eq!(style_of(&doc, "#x").color, "rgb(0, 0, 255)");
    }

    #[test]
    fn custom_properties_and_current_color() {
        let html = r#"<style>
            :root { --brand: #112233; }
            .a { color: var(--brand); background-color: currentColor; }
        </style><div class="a">x</div>"#;
        let doc = styled(html);
        let a = style_of(&doc, ".a");
        assert_eq!(a.color, "rgb(17, 34, 51)");
        assert_eq!(a.background_color, "rgb(17, 34, 51)");
    }

    #[test]
    fn linked_sheets_are_applied_when_fetched() {
        let html = r#"<link rel="stylesheet" href="../s.css"><p>x</p>"#;
        let mut linked = ParsedCss::new();
        linked.insert("https://example.test/s.css", "p { color: white }");
        let doc = StyledDocument::build(html, Some("https://example.test/dir/page.html"), &linked, "serif");
        assert_eq!(style_of(&doc, "p").color, "rgb(255, 255, 255)");
        assert_eq!(
            linked_stylesheet_urls(html, Some("https://example.test/dir/page.html")),
            vec!["https://example.test/s.css".to_string()]
        );
    }

    #[test]
    fn keeps_svg_markup_and_resolves_urls() {
        let doc = styled(r#"<svg viewBox="0 0 1 1"><path d="M0 0"/></svg><img src="a.svg">"#);
        let svg = doc.query_selector("svg").unwrap().unwrap();
        assert!(doc.element(svg).unwrap().outer_html.as_deref().unwrap().starts_with("<svg"));
        assert_eq!(doc.resolve_url("a.svg"), "https://example.test/dir/a.svg");
    }
}
