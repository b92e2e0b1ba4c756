//! Notion Heatmap HTTP Server Binary
//!
//! Main entry point for the heatmap REST API. Loads configuration, wires the
//! repository and the Notion client into the router and starts serving.
//!
//! # Usage
//!
//! ```bash
//! # Run with the in-memory repository (default features)
//! cargo run --bin heatmap-server
//!
//! # Use a specific config file
//! cargo run --bin heatmap-server -- path/to/heatmap.toml
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`, `PORT`: bind address (default: 0.0.0.0:8080)
//! - `APP_URL`: front-end origin OAuth callbacks return to
//! - `NOTION_CLIENT_ID`, `NOTION_CLIENT_SECRET`: enable the OAuth flow
//! - `RENDER_CACHE_TTL_SECS`: lifetime of cached renders
//! - `RUST_LOG`: log filter (default: info)

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use notion_heatmap::config::AppConfig;
use notion_heatmap::db::repository::FullRepository;
use notion_heatmap::db::{services as db_services, LocalRepository};
use notion_heatmap::http::{create_router, AppState};
use notion_heatmap::models::{Clock, SystemClock};
use notion_heatmap::notion::{NotionClient, NotionDataSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; `log` records from the library are forwarded too
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Notion Heatmap server");

    let config_path = env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;
    if config.oauth_settings().is_none() {
        info!("NOTION_CLIENT_ID/NOTION_CLIENT_SECRET not set, OAuth disabled");
    }

    let clock = Arc::new(SystemClock) as Arc<dyn Clock>;
    let repository =
        Arc::new(LocalRepository::with_clock(Arc::clone(&clock))) as Arc<dyn FullRepository>;
    info!("Repository initialized successfully");

    let notion = NotionClient::new(&config.notion.api_base, &config.notion.version)
        .with_oauth(config.oauth_settings());
    let notion = Arc::new(notion) as Arc<dyn NotionDataSource>;

    let addr: SocketAddr = config.bind_address().parse()?;
    let state = AppState::with_clock(repository, notion, config, clock);

    // Drop expired renders and abandoned OAuth states
    let cache = state.render_cache.clone();
    let repository = Arc::clone(&state.repository);
    let clock = Arc::clone(&state.clock);
    let purge_every = cache
        .ttl()
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(300))
        .max(std::time::Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(purge_every);
        loop {
            interval.tick().await;
            let purged = cache.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "purged expired renders");
            }
            if let Err(e) =
                db_services::purge_expired_oauth_states(repository.as_ref(), clock.now()).await
            {
                tracing::warn!(error = %e, "failed to purge OAuth states");
            }
        }
    });

    let app = create_router(state);

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
