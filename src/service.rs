use tracing::{error, info};
use url::Url;

use crate::api::models::{ScrapeRequest, ScrapeResult};
use crate::config::ExtractConfig;
use crate::error::{Result, ScrapeError};
use crate::extract::{extract_document, parse_selector};
use crate::fetcher::Fetcher;

/// validate → fetch → parse → scope → extract, failing fast at each step.
#[derive(Debug, Clone)]
pub struct Extractor {
    fetcher: Fetcher,
    config: ExtractConfig,
}

impl Extractor {
    pub fn new(config: ExtractConfig) -> std::result::Result<Self, reqwest::Error> {
        Ok(Self {
            fetcher: Fetcher::new(&config)?,
            config,
        })
    }

    pub async fn extract(&self, request: &ScrapeRequest) -> Result<ScrapeResult> {
        let url = validate_url(&request.url)?;

        info!(url = %url, selector = request.scope_selector().unwrap_or(""), "scraping page");
        let html = self.fetcher.fetch_html(&url).await?;

        let scope = request.scope_selector().map(parse_selector).transpose()?;

        // scraper::Html is not Send; parse on the blocking pool.
        let min_paragraph_length = self.config.min_paragraph_length;
        tokio::task::spawn_blocking(move || {
            extract_document(&html, &url, scope.as_ref(), min_paragraph_length)
        })
        .await
        .map_err(|e| {
            error!(error = %e, "extraction task failed");
            ScrapeError::Unexpected
        })?
    }
}

/// Accepts absolute URLs with a host. Schemes the client cannot fetch are
/// left for the fetch to reject.
pub fn validate_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ScrapeError::InvalidInput("URL is required".to_string()));
    }

    let invalid = || ScrapeError::InvalidInput("Invalid URL format".to_string());
    let url = Url::parse(raw).map_err(|_| invalid())?;
    if !url.has_host() {
        return Err(invalid());
    }
    Ok(url)
}
