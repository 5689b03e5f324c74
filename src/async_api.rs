use crate::inspector::{hover_once, DocumentHost};
use crate::static_engine::StaticEngine;
use crate::{
    ArtifactSet, Audit, Error, PageSource, PageSummary, ParsedCss, RenderOptions, Report, Result,
    ScoutConfig,
};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Goto(String, oneshot::Sender<Result<PageSummary>>),
    LoadHtml(String, Option<String>, oneshot::Sender<Result<PageSummary>>),
    Collect(oneshot::Sender<Result<ArtifactSet>>),
    FetchStylesheets(Vec<String>, oneshot::Sender<ParsedCss>),
    Audit(oneshot::Sender<Result<Audit>>),
    Report(RenderOptions, oneshot::Sender<Result<Report>>),
    Inspect(String, oneshot::Sender<Result<Option<String>>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly page host backed by a dedicated worker thread.
///
/// The worker thread owns a synchronous `StaticEngine` and executes commands
/// sent from async tasks, so callers get an awaitable interface while all
/// blocking HTTP work stays off the runtime.
#[derive(Clone)]
pub struct Scout {
    cmd_tx: Sender<Command>,
    options: RenderOptions,
}

/// A handle to the page loaded in the worker.
#[derive(Clone)]
pub struct Page {
    cmd_tx: Sender<Command>,
    options: RenderOptions,
}

/// Send `cmd` and wait for the reply carried by its oneshot.
async fn request<T>(
    cmd_tx: &Sender<Command>,
    name: &str,
    make: impl FnOnce(oneshot::Sender<T>) -> Command,
) -> Result<T> {
    let (tx, rx) = oneshot::channel();
    cmd_tx
        .send(make(tx))
        .map_err(|_| Error::Other(format!("{} failed: worker has shut down", name)))?;
    rx.await
        .map_err(|e| Error::Other(format!("{} canceled: {}", name, e)))
}

fn inspect(engine: &StaticEngine, selector: &str) -> Result<Option<String>> {
    let document = engine.styled_document()?;
    let Some(target) = document.query_selector(selector)? else {
        return Ok(None);
    };
    let mut host = DocumentHost::new(document.clone());
    hover_once(&mut host, target)
}

impl Scout {
    /// Create a new scout (spawns a background thread that owns the engine).
    pub async fn new(config: Option<ScoutConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();
        let options = config.render_options();

        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::spawn(move || {
            let mut engine = match StaticEngine::new(config) {
                Ok(e) => e,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };

            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Goto(url, resp) => {
                        let res = engine.load_url(&url).and_then(|_| engine.summary());
                        let _ = resp.send(res);
                    }
                    Command::LoadHtml(html, base, resp) => {
                        let res = engine
                            .load_html(&html, base.as_deref())
                            .and_then(|_| engine.summary());
                        let _ = resp.send(res);
                    }
                    Command::Collect(resp) => {
                        let _ = resp.send(engine.collect_artifacts());
                    }
                    Command::FetchStylesheets(urls, resp) => {
                        let _ = resp.send(engine.fetch_stylesheets(&urls));
                    }
                    Command::Audit(resp) => {
                        let _ = resp.send(crate::audit(&engine));
                    }
                    Command::Report(options, resp) => {
                        let _ = resp.send(crate::report(&engine, &options));
                    }
                    Command::Inspect(selector, resp) => {
                        let _ = resp.send(inspect(&engine, &selector));
                    }
                    Command::Close(resp) => {
                        let res = engine.close();
                        let _ = resp.send(res);
                        break;
                    }
                }
            }
        });

        // Wait for the worker to report initialization success or failure
        let init_res = init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))?;
        init_res?;

        Ok(Self { cmd_tx, options })
    }

    /// Open a page handle backed by the same worker thread.
    pub async fn new_page(&self) -> Result<Page> {
        Ok(Page {
            cmd_tx: self.cmd_tx.clone(),
            options: self.options.clone(),
        })
    }

    /// Shutdown the background worker.
    pub async fn close(self) -> Result<()> {
        request(&self.cmd_tx, "Close", Command::Close).await?
    }
}

impl Page {
    /// Navigate to a URL
    pub async fn goto(&self, url: &str) -> Result<PageSummary> {
        let url = url.to_string();
        request(&self.cmd_tx, "Goto", |tx| Command::Goto(url, tx)).await?
    }

    /// Load markup directly, resolving relative URLs against `base_url`
    pub async fn load_html(&self, html: &str, base_url: Option<&str>) -> Result<PageSummary> {
        let html = html.to_string();
        let base = base_url.map(|s| s.to_string());
        request(&self.cmd_tx, "LoadHtml", |tx| Command::LoadHtml(html, base, tx)).await?
    }

    pub async fn collect(&self) -> Result<ArtifactSet> {
        request(&self.cmd_tx, "Collect", Command::Collect).await?
    }

    pub async fn fetch_stylesheets(&self, urls: &[String]) -> Result<ParsedCss> {
        let urls = urls.to_vec();
        request(&self.cmd_tx, "FetchStylesheets", |tx| Command::FetchStylesheets(urls, tx)).await
    }

    pub async fn audit(&self) -> Result<Audit> {
        request(&self.cmd_tx, "Audit", Command::Audit).await?
    }

    /// Audit the page and render the report with the scout's options
    pub async fn report(&self) -> Result<Report> {
        let options = self.options.clone();
        request(&self.cmd_tx, "Report", |tx| Command::Report(options, tx)).await?
    }

    /// Hover the first element matching `selector` with the inspector and
    /// return its tooltip text. `None` when nothing matches.
    pub async fn inspect(&self, selector: &str) -> Result<Option<String>> {
        let selector = selector.to_string();
        request(&self.cmd_tx, "Inspect", |tx| Command::Inspect(selector, tx)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> Option<ScoutConfig> {
        Some(ScoutConfig {
            apply_linked_styles: false,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn load_collect_and_inspect() {
        let scout = Scout::new(offline()).await.unwrap();
        let page = scout.new_page().await.unwrap();

        let summary = page
            .load_html(
                r#"<title>A</title><p style="color:#fff;background-color:#123456;font-family:Inter">x</p>"#,
                Some("https://x.test/"),
            )
            .await
            .unwrap();
        assert_eq!(summary.title, "A");

        let artifacts = page.collect().await.unwrap();
        assert!(artifacts.fonts.contains(&"Inter".to_string()));

        let tooltip = page.inspect("p").await.unwrap().unwrap();
        assert_eq!(
            tooltip,
            "Font: Inter\nColor: rgb(255, 255, 255)\nBackground: rgb(18, 52, 86)"
        );
        assert_eq!(page.inspect("table").await.unwrap(), None);

        scout.close().await.unwrap();
    }

    #[tokio::test]
    async fn commands_fail_after_close() {
        let scout = Scout::new(offline()).await.unwrap();
        let page = scout.new_page().await.unwrap();
        scout.close().await.unwrap();
        assert!(matches!(page.collect().await, Err(Error::Other(_))));
    }

    #[tokio::test]
    async fn audit_before_load_is_a_render_error() {
        let scout = Scout::new(offline()).await.unwrap();
        let page = scout.new_page().await.unwrap();
        assert!(matches!(page.audit().await, Err(Error::RenderError(_))));
        scout.close().await.unwrap();
    }
}
