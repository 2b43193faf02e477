pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod service;

use std::sync::Arc;
use service::Extractor;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<Extractor>,
}

impl AppState {
    pub fn new(extractor: Extractor) -> Self {
        Self {
            extractor: Arc::new(extractor),
        }
    }
}
