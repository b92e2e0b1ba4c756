//! Application state for the HTTP server.

use std::sync::Arc;

use super::dto::RenderResponse;
use crate::config::AppConfig;
use crate::db::repository::FullRepository;
use crate::models::{Clock, SystemClock};
use crate::notion::NotionDataSource;
use crate::services::RenderCache;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for heatmap and connection storage
    pub repository: Arc<dyn FullRepository>,
    /// Where heatmap records are read from
    pub notion: Arc<dyn NotionDataSource>,
    pub render_cache: RenderCache<RenderResponse>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// State on the system clock, with the cache TTL taken from `config`.
    pub fn new(
        repository: Arc<dyn FullRepository>,
        notion: Arc<dyn NotionDataSource>,
        config: AppConfig,
    ) -> Self {
        Self::with_clock(repository, notion, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        repository: Arc<dyn FullRepository>,
        notion: Arc<dyn NotionDataSource>,
        config: AppConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let render_cache = RenderCache::new(Arc::clone(&clock), config.cache_ttl());
        Self {
            repository,
            notion,
            render_cache,
            clock,
            config: Arc::new(config),
        }
    }
}
