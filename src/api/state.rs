use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::services::title_search::DEFAULT_MIN_SCORE;
use crate::services::MetadataProvider;

/// Request defaults and bounds for the query endpoints
#[derive(Debug, Clone, Copy)]
pub struct QuerySettings {
    pub search_limit: usize,
    pub min_match_score: u8,
    pub default_recommendations: usize,
    pub max_recommendations: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            search_limit: 8,
            min_match_score: DEFAULT_MIN_SCORE,
            default_recommendations: 10,
            max_recommendations: 20,
        }
    }
}

impl From<&Config> for QuerySettings {
    fn from(config: &Config) -> Self {
        Self {
            search_limit: config.search_limit,
            min_match_score: config.min_match_score,
            default_recommendations: config.default_recommendations,
            max_recommendations: config.max_recommendations,
        }
    }
}

/// Shared application state
///
/// The catalog is loaded once before the server starts and never mutated, so
/// handlers read it without locking.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub provider: Arc<dyn MetadataProvider>,
    pub settings: QuerySettings,
}

impl AppState {
    pub fn new(
        catalog: Arc<Catalog>,
        provider: Arc<dyn MetadataProvider>,
        settings: QuerySettings,
    ) -> Self {
        Self {
            catalog,
            provider,
            settings,
        }
    }
}
