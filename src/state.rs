//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::HybridExtractor;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    extractor: Arc<HybridExtractor>,
}

impl AppState {
    pub fn new(config: Config, extractor: Arc<HybridExtractor>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, extractor }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the page extractor
    pub fn extractor(&self) -> &Arc<HybridExtractor> {
        &self.inner.extractor
    }
}
