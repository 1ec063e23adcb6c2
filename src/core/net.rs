// src/core/net.rs
// Blocking HTTP GET returning a parsed document. Called from engine worker threads.

use reqwest::blocking::Client;
use tracing::debug;

use crate::config::options::ScrapeOptions;
use crate::error::{FetchError, ScrapeError};
use super::html::Document;

/// Anything that can turn a URL into a parsed page.
/// The engine shares one client across its worker threads.
pub trait DocumentClient: Sync {
    fn fetch(&self, url: &str) -> Result<Document, FetchError>;
}

pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn new(opts: &ScrapeOptions) -> Result<Self, ScrapeError> {
        let inner = Client::builder()
            .user_agent(opts.user_agent.as_str())
            .timeout(opts.request_timeout)
            .build()
            .map_err(|e| ScrapeError::Client(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl DocumentClient for HttpClient {
    fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        debug!(url, "GET");
        let resp = self.inner.get(url).send().map_err(|e| FetchError::Network {
            url: s!(url),
            message: e.to_string(),
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), url: s!(url) });
        }

        let body = resp.text().map_err(|e| FetchError::Body {
            url: s!(url),
            message: e.to_string(),
        })?;
        Ok(Document::parse(&body))
    }
}
