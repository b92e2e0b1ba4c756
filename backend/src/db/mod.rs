//! Configuration store for heatmaps and Notion connections.
//!
//! The store is reached through repository traits so the backend can be
//! swapped without touching callers.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API)                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Business Logic           │
//! │  - Validation and display ordering                      │
//! │  - OAuth state expiry, token resolution                 │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod checksum;
pub mod models;
pub mod repositories;
pub mod repository;
pub mod services;

pub use checksum::api_key_fingerprint;
pub use models::{HeatmapRecord, HeatmapUpdate, NewHeatmap, NotionConnection, OAuthState};
pub use repositories::LocalRepository;
pub use repository::{
    ConnectionRepository, ErrorContext, FullRepository, HeatmapRepository, RepositoryError,
    RepositoryResult,
};
