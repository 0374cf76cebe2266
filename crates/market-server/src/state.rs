//! Shared handler state

use market_ner::EntityExtractor;
use market_scripts::MarketScripts;
use std::sync::Arc;

/// Services shared by every request
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<EntityExtractor>,
    pub scripts: Arc<dyn MarketScripts>,
}

impl AppState {
    pub fn new(extractor: EntityExtractor, scripts: Arc<dyn MarketScripts>) -> Self {
        Self {
            extractor: Arc::new(extractor),
            scripts,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}
