//! Sequential stylesheet fetching.

use crate::artifacts::ParsedCss;
use crate::{Error, Result, ScoutConfig};
use log::{debug, warn};
use reqwest::blocking::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Downloads stylesheet text one URL at a time.
///
/// Failures never abort the batch: a URL that errors or answers with a
/// non-success status is logged and left out of the result.
pub struct StylesheetFetcher {
    client: Client,
    user_agent: String,
    headers: HashMap<String, String>,
}

impl StylesheetFetcher {
    pub fn new(config: &ScoutConfig) -> Result<Self> {
        let mut builder = Client::builder();
        builder = match config.stylesheet_timeout_ms {
            Some(ms) => builder.timeout(Duration::from_millis(ms)),
            None => builder.timeout(None::<Duration>),
        };
        let client = builder
            .build()
            .map_err(|e| Error::InitializationError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            headers: config.headers.clone(),
        })
    }

    /// Fetch one stylesheet. Errors here are what `fetch_all` logs and skips.
    pub fn fetch(&self, url: &str) -> Result<String> {
        let mut request = self.client.get(url).header("User-Agent", self.user_agent.clone());
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let resp = request
            .send()
            .map_err(|e| Error::NetworkError(format!("Failed to fetch {}: {}", url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::NetworkError(format!("Failed to fetch {}: HTTP {}", url, status)));
        }

        resp.text()
            .map_err(|e| Error::NetworkError(format!("Failed to read {}: {}", url, e)))
    }

    /// Fetch every URL in order, each completing before the next starts.
    pub fn fetch_all<S: AsRef<str>>(&self, urls: &[S]) -> ParsedCss {
        let mut parsed = ParsedCss::new();
        for url in urls {
            let url = url.as_ref();
            match self.fetch(url) {
                Ok(text) => {
                    debug!("fetched stylesheet {} ({} bytes)", url, text.len());
                    parsed.insert(url, text);
                }
                Err(e) => warn!("skipping stylesheet: {}", e),
            }
        }
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_successful_fetches() {
        if std::env::var("CI").is_ok() {
            return;
        }

        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        std::thread::spawn(move || {
            for request in server.incoming_requests() {
                let response = match request.url() {
                    "/a.css" => tiny_http::Response::from_string(".a{color:red}"),
                    _ => tiny_http::Response::from_string("Not Found").with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });

        let fetcher = StylesheetFetcher::new(&ScoutConfig::default()).expect("fetcher");
        let a = format!("http://{}/a.css", addr);
        let b = format!("http://{}/b.css", addr);
        let parsed = fetcher.fetch_all(&[a.clone(), b.clone()]);

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get(&a), Some(".a{color:red}"));
        assert!(!parsed.contains(&b));
    }

    #[test]
    fn unreachable_hosts_are_skipped() {
        let fetcher = StylesheetFetcher::new(&ScoutConfig {
            stylesheet_timeout_ms: Some(2000),
            ..Default::default()
        })
        .expect("fetcher");
        let parsed = fetcher.fetch_all(&["http://127.0.0.1:1/nothing.css"]);
        assert!(parsed.is_empty());
    }
}
