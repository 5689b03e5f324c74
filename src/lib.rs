//! stylescout
//!
//! Design-asset reporting for web pages: the fonts, colors, images, CSS
//! animations and transitions, and SVG icons a page uses, plus a hover
//! inspector that shows the computed font and colors of any element.
//!
//! # Pipeline
//!
//! 1. A [`PageSource`] loads a page and computes element styles.
//! 2. [`extract::collect_artifacts`] walks the styled document.
//! 3. Linked stylesheets are fetched again as raw text.
//! 4. [`scanner::scan_animations`] finds `animation`/`transition`
//!    declarations in that text.
//! 5. [`rendering::Report`] turns the results into HTML fragments.
//!
//! # Example
//!
//! ```no_run
//! use stylescout::{PageSource, ScoutConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScoutConfig {
//!     hide_generic_fonts: true,
//!     ..Default::default()
//! };
//!
//! let mut source = stylescout::new_source(config.clone())?;
//! source.load_url("https://example.com")?;
//! let audit = stylescout::audit(&source)?;
//! println!("{} fonts, {} animations", audit.artifacts.fonts.len(), audit.animations.len());
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

pub mod error;
pub use error::{Error, Result};

pub mod artifacts;
pub mod extract;
pub mod inspector;
pub mod rendering;
pub mod scanner;
pub mod style;

// Network-backed pieces: stylesheet fetching, the static page host and the
// async facade all need reqwest.
#[cfg(feature = "net")]
pub mod fetch;

#[cfg(feature = "net")]
pub mod static_engine;

#[cfg(feature = "net")]
pub mod async_api;

pub use artifacts::{AnimationEntry, ArtifactSet, Audit, LinkedStylesheets, ParsedCss};
pub use rendering::{ContainerId, RenderOptions, Report};
pub use style::StyledDocument;

#[cfg(feature = "net")]
pub use async_api::Scout;

/// Configuration for a page source
///
/// The defaults mirror what a freshly opened browser tab would do: linked
/// stylesheets take part in the cascade and text falls back to a serif face.
///
/// # Examples
///
/// ```
/// let cfg = stylescout::ScoutConfig::default();
/// assert!(cfg.user_agent.contains("stylescout"));
/// assert!(cfg.apply_linked_styles);
/// ```
#[derive(Debug, Clone)]
pub struct ScoutConfig {
    /// User agent string to send with requests
    pub user_agent: String,
    /// Timeout for page loads in milliseconds
    pub timeout_ms: u64,
    /// Timeout for each stylesheet fetch; `None` waits indefinitely
    pub stylesheet_timeout_ms: Option<u64>,
    /// Custom HTTP headers, sent with page and stylesheet requests
    pub headers: HashMap<String, String>,
    /// Whether linked stylesheets are fetched at load time for the cascade
    pub apply_linked_styles: bool,
    /// Whether generic families (`serif`, `system-ui`, ...) are left out of
    /// the rendered fonts list
    pub hide_generic_fonts: bool,
    /// Initial `font-family` of the root element
    pub default_font_family: String,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/115.0 stylescout/0.1".to_string(),
            timeout_ms: 30000,
            stylesheet_timeout_ms: None,
            headers: HashMap::new(),
            apply_linked_styles: true,
            hide_generic_fonts: false,
            default_font_family: "\"Times New Roman\"".to_string(),
        }
    }
}

impl ScoutConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            hide_generic_fonts: self.hide_generic_fonts,
        }
    }
}

/// Short description of a loaded page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    /// Page title, empty when the page has none
    pub title: String,
    /// URL the page was loaded from, after redirects
    pub url: String,
    /// Number of elements in the document
    pub element_count: usize,
}

impl PageSummary {
    pub fn of(document: &StyledDocument) -> Self {
        PageSummary {
            title: document.title().to_string(),
            url: document.url().unwrap_or_default().to_string(),
            element_count: document.elements().len(),
        }
    }
}

/// Core trait for page hosts: anything that can load a page, compute its
/// styles and fetch stylesheet text.
pub trait PageSource {
    /// Create a new source with the given configuration
    fn new(config: ScoutConfig) -> Result<Self>
    where
        Self: Sized;

    /// Load a URL and compute styles
    fn load_url(&mut self, url: &str) -> Result<()>;

    /// Load markup directly. Relative URLs resolve against `base_url`.
    fn load_html(&mut self, html: &str, base_url: Option<&str>) -> Result<()>;

    /// The loaded document, or `RenderError` before anything is loaded
    fn styled_document(&self) -> Result<&StyledDocument>;

    fn summary(&self) -> Result<PageSummary> {
        Ok(PageSummary::of(self.styled_document()?))
    }

    /// Walk the loaded document and collect its design artifacts
    fn collect_artifacts(&self) -> Result<ArtifactSet> {
        Ok(extract::collect_artifacts(self.styled_document()?))
    }

    /// Fetch stylesheet text for each URL. Failed URLs are left out.
    fn fetch_stylesheets(&self, urls: &[String]) -> ParsedCss;

    /// Stylesheets already fetched while loading the current page
    fn linked_stylesheets(&self) -> Option<&LinkedStylesheets> {
        None
    }

    /// Register a callback to be invoked when a page finishes loading.
    fn on_load<F>(&mut self, cb: F)
    where
        F: Fn(&PageSummary) + Send + Sync + 'static;

    /// Remove previously registered on_load callback if any
    fn clear_on_load(&mut self);

    /// Close the source and clean up resources
    fn close(self) -> Result<()>;
}

/// Run the full audit on the loaded page: collect artifacts, fetch the
/// linked stylesheets, and scan them for animations and transitions.
///
/// Sheets the source fetched at load time are reused when they cover the
/// same URLs; otherwise every link is fetched again.
pub fn audit<S: PageSource>(source: &S) -> Result<Audit> {
    let artifacts = source.collect_artifacts()?;
    let parsed_css = match source.linked_stylesheets() {
        Some(linked) if linked.covers(&artifacts.external_css_links) => {
            log::debug!("audit: reusing {} stylesheets fetched at load", linked.sheets.len());
            linked.sheets.clone()
        }
        _ => source.fetch_stylesheets(&artifacts.external_css_links),
    };
    let animations = scanner::scan_animations(&parsed_css);
    log::debug!(
        "audit: {} fonts, {} colors, {} stylesheets, {} animation entries",
        artifacts.fonts.len(),
        artifacts.colors.len(),
        parsed_css.len(),
        animations.len()
    );
    Ok(Audit {
        artifacts,
        parsed_css,
        animations,
    })
}

/// Audit the loaded page and render every report container.
pub fn report<S: PageSource>(source: &S, options: &RenderOptions) -> Result<Report> {
    let audit = audit(source)?;
    let summary = source.summary()?;
    Ok(Report::build(&audit, &summary.title, &summary.url, options))
}

/// Create a new page source with the default backend
#[cfg(feature = "net")]
pub fn new_source(config: ScoutConfig) -> Result<impl PageSource> {
    static_engine::StaticEngine::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Offline source with canned stylesheet text.
    struct FixtureSource {
        config: ScoutConfig,
        document: Option<StyledDocument>,
        sheets: ParsedCss,
        linked: Option<LinkedStylesheets>,
        fetches: Cell<usize>,
    }

    impl PageSource for FixtureSource {
        fn new(config: ScoutConfig) -> Result<Self> {
            Ok(Self {
                config,
                document: None,
                sheets: ParsedCss::new(),
                linked: None,
                fetches: Cell::new(0),
            })
        }

        fn load_url(&mut self, url: &str) -> Result<()> {
            Err(Error::LoadError(format!("offline: {}", url)))
        }

        fn load_html(&mut self, html: &str, base_url: Option<&str>) -> Result<()> {
            self.document = Some(StyledDocument::build(
                html,
                base_url,
                &self.sheets,
                &self.config.default_font_family,
            ));
            Ok(())
        }

        fn styled_document(&self) -> Result<&StyledDocument> {
            self.document
                .as_ref()
                .ok_or_else(|| Error::RenderError("No document loaded".into()))
        }

        fn fetch_stylesheets(&self, urls: &[String]) -> ParsedCss {
            self.fetches.set(self.fetches.get() + 1);
            urls.iter()
                .filter_map(|u| self.sheets.get(u).map(|t| (u.clone(), t.to_string())))
                .collect()
        }

        fn linked_stylesheets(&self) -> Option<&LinkedStylesheets> {
            self.linked.as_ref()
        }

        fn on_load<F>(&mut self, _cb: F)
        where
            F: Fn(&PageSummary) + Send + Sync + 'static,
        {
        }

        fn clear_on_load(&mut self) {}

        fn close(self) -> Result<()> {
            Ok(())
        }
    }

    fn fixture() -> FixtureSource {
        let mut source = FixtureSource::new(ScoutConfig::default()).unwrap();
        source
            .sheets
            .insert("https://x.test/a.css", "body{font-family:Inter} .a{transition: all 1s;}");
        source
    }

    #[test]
    fn test_default_config() {
        let config = ScoutConfig::default();
        assert_eq!(config.timeout_ms, 30000);
        assert_eq!(config.stylesheet_timeout_ms, None);
        assert_eq!(config.default_font_family, "\"Times New Roman\"");
        assert!(!config.hide_generic_fonts);
    }

    #[test]
    fn audit_needs_a_document() {
        let source = fixture();
        assert!(matches!(audit(&source), Err(Error::RenderError(_))));
    }

    #[test]
    fn audit_runs_extract_fetch_and_scan() {
        let mut source = fixture();
        source
            .load_html(
                r#"<html><head><title>T</title>
                <link rel="stylesheet" href="/a.css">
                <link rel="stylesheet" href="/missing.css"></head>
                <body><p class="a">x</p></body></html>"#,
                Some("https://x.test/page"),
            )
            .unwrap();

        let audit = audit(&source).unwrap();
        assert_eq!(
            audit.artifacts.external_css_links,
            vec!["https://x.test/a.css", "https://x.test/missing.css"]
        );
        assert_eq!(audit.parsed_css.len(), 1);
        assert_eq!(audit.animations.len(), 1);
        assert_eq!(audit.animations[0].selector, ".a");
        assert!(audit.artifacts.fonts.contains(&"Inter".to_string()));
    }

    #[test]
    fn report_uses_page_title() {
        let mut source = fixture();
        source
            .load_html("<title>Hello</title><p>x</p>", Some("https://x.test/"))
            .unwrap();
        let report = report(&source, &RenderOptions::default()).unwrap();
        assert_eq!(report.title, "Hello");
        assert_eq!(report.url, "https://x.test/");
        assert_eq!(
            report.fragment(ContainerId::Animations),
            "<p>No animations or transitions found.</p>"
        );
    }

    #[test]
    fn audit_reuses_sheets_fetched_at_load() {
        let mut source = fixture();
        source
            .load_html(r#"<link rel="stylesheet" href="/a.css"><p>x</p>"#, Some("https://x.test/"))
            .unwrap();
        let mut sheets = ParsedCss::new();
        sheets.insert("https://x.test/a.css", ".b { animation: pulse 1s; }");
        source.linked = Some(LinkedStylesheets {
            requested: vec!["https://x.test/a.css".to_string()],
            sheets,
        });

        let audit = audit(&source).unwrap();
        assert_eq!(source.fetches.get(), 0);
        assert_eq!(audit.animations[0].selector, ".b");
    }

    #[test]
    fn audit_refetches_when_links_differ_from_load() {
        let mut source = fixture();
        source
            .load_html(r#"<link rel="stylesheet" href="/a.css"><p>x</p>"#, Some("https://x.test/"))
            .unwrap();
        source.linked = Some(LinkedStylesheets::default());

        let audit = audit(&source).unwrap();
        assert_eq!(source.fetches.get(), 1);
        assert_eq!(audit.animations[0].selector, ".a");
    }
}
