use std::error::Error as _;
use std::time::{Duration, Instant};

use reqwest::{Client, ClientBuilder};
use tracing::{debug, warn};
use url::Url;

use crate::config::ExtractConfig;
use crate::error::{Result, ScrapeError};

/// Single-shot HTML downloader. Holds one pooled client; safe to share
/// across concurrent requests.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(config: &ExtractConfig) -> std::result::Result<Self, reqwest::Error> {
        let client = ClientBuilder::new()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout(),
        })
    }

    /// GETs `url` once and returns the body. Non-2xx responses are failures.
    pub async fn fetch_html(&self, url: &Url) -> Result<String> {
        let fetch_start = Instant::now();

        // The client timeout does not cover reading a slow body, so bound the whole thing.
        let html = match tokio::time::timeout(self.timeout, self.get_body(url)).await {
            Ok(Ok(html)) => html,
            Ok(Err(e)) => {
                let err = classify(e);
                warn!(url = %url, kind = err.kind(), error = %err, "HTML fetch failed");
                return Err(err);
            }
            Err(_) => {
                warn!(url = %url, timeout = ?self.timeout, "HTML fetch timed out");
                return Err(ScrapeError::Timeout);
            }
        };

        debug!(url = %url, bytes = html.len(), elapsed = ?fetch_start.elapsed(), "HTML fetch successful");
        Ok(html)
    }

    async fn get_body(&self, url: &Url) -> reqwest::Result<String> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        response.text().await
    }
}

fn classify(err: reqwest::Error) -> ScrapeError {
    if err.is_timeout() {
        ScrapeError::Timeout
    } else if is_dns_failure(&err) {
        ScrapeError::HostNotFound
    } else {
        ScrapeError::FetchFailed(transport_message(&err))
    }
}

/// reqwest's own message names the request but not the cause, so append the
/// innermost error in the chain ("Connection refused", "URL scheme is not allowed").
fn transport_message(err: &reqwest::Error) -> String {
    let message = err.to_string();
    let mut root = None;
    let mut source = err.source();
    while let Some(cause) = source {
        root = Some(cause);
        source = cause.source();
    }
    match root.map(|cause| cause.to_string()) {
        Some(cause) if !message.contains(&cause) => format!("{message}: {cause}"),
        _ => message,
    }
}

/// hyper reports resolver failures as a connect error whose cause chain
/// contains a "dns error"; there is no typed accessor for it.
fn is_dns_failure(err: &reqwest::Error) -> bool {
    if !err.is_connect() {
        return false;
    }
    let mut source = err.source();
    while let Some(cause) = source {
        let message = cause.to_string();
        if message.contains("dns error") || message.contains("failed to lookup address") {
            return true;
        }
        source = cause.source();
    }
    false
}
