//! StaticEngine: HTTP-backed page host without a script runtime.
//!
//! Pages are fetched with `reqwest::blocking`, parsed with `scraper`, and
//! styled by the built-in cascade. Linked stylesheets are fetched at load
//! time so they take part in the cascade, and kept for the audit.

use crate::artifacts::{LinkedStylesheets, ParsedCss};
use crate::fetch::StylesheetFetcher;
use crate::style::{linked_stylesheet_urls, StyledDocument};
use crate::{Error, PageSource, PageSummary, Result, ScoutConfig};
use log::debug;
use reqwest::blocking::Client;
use std::sync::Arc;
use std::time::Duration;

type OnLoadHandler = Arc<dyn Fn(&PageSummary) + Send + Sync>;

pub struct StaticEngine {
    client: Client,
    fetcher: StylesheetFetcher,
    config: ScoutConfig,
    document: Option<StyledDocument>,
    linked: Option<LinkedStylesheets>,
    on_load: Option<OnLoadHandler>,
}

impl StaticEngine {
    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    fn install(&mut self, html: &str, base_url: Option<&str>) {
        let linked = if self.config.apply_linked_styles {
            let requested = linked_stylesheet_urls(html, base_url);
            debug!("fetching {} linked stylesheets for the cascade", requested.len());
            let sheets = self.fetcher.fetch_all(&requested);
            Some(LinkedStylesheets { requested, sheets })
        } else {
            None
        };
        let empty = ParsedCss::new();
        let sheets = linked.as_ref().map_or(&empty, |l| &l.sheets);

        let document = StyledDocument::build(html, base_url, sheets, &self.config.default_font_family);
        let summary = PageSummary::of(&document);
        debug!("loaded {:?}: {} elements", summary.url, summary.element_count);
        self.document = Some(document);
        self.linked = linked;

        if let Some(cb) = &self.on_load {
            cb(&summary);
        }
    }
}

impl PageSource for StaticEngine {
    fn new(config: ScoutConfig) -> Result<Self>
    where
        Self: Sized,
    {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::InitializationError(format!("Failed to build HTTP client: {}", e)))?;
        let fetcher = StylesheetFetcher::new(&config)?;

        Ok(Self {
            client,
            fetcher,
            config,
            document: None,
            linked: None,
            on_load: None,
        })
    }

    fn load_url(&mut self, url: &str) -> Result<()> {
        let mut request = self
            .client
            .get(url)
            .header("User-Agent", self.config.user_agent.clone());
        for (name, value) in &self.config.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let resp = request
            .send()
            .map_err(|e| Error::LoadError(format!("Failed to fetch {}: {}", url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::LoadError(format!("Failed to fetch {}: HTTP {}", url, status)));
        }
        let final_url = resp.url().to_string();

        let body = resp
            .text()
            .map_err(|e| Error::LoadError(format!("Failed to read response body: {}", e)))?;

        self.install(&body, Some(&final_url));
        Ok(())
    }

    fn load_html(&mut self, html: &str, base_url: Option<&str>) -> Result<()> {
        if let Some(base) = base_url {
            url::Url::parse(base)
                .map_err(|e| Error::ConfigError(format!("Invalid base URL {}: {}", base, e)))?;
        }
        self.install(html, base_url);
        Ok(())
    }

    fn styled_document(&self) -> Result<&StyledDocument> {
        self.document
            .as_ref()
            .ok_or_else(|| Error::RenderError("No document loaded".to_string()))
    }

    fn fetch_stylesheets(&self, urls: &[String]) -> ParsedCss {
        self.fetcher.fetch_all(urls)
    }

    fn linked_stylesheets(&self) -> Option<&LinkedStylesheets> {
        self.linked.as_ref()
    }

    fn on_load<F>(&mut self, cb: F)
    where
        F: Fn(&PageSummary) + Send + Sync + 'static,
    {
        self.on_load = Some(Arc::new(cb));
    }

    fn clear_on_load(&mut self) {
        self.on_load = None;
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}
