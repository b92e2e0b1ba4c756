//! HTTP server module.
//!
//! Exposes heatmap management, rendering, public embeds and the Notion
//! connection flow as a REST API. Handlers stay thin: storage rules live in
//! [`crate::db::services`], rendering in [`crate::services`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - Render cache, embed headers, OAuth redirects           │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────────┐
//! ┌───────▼────────────────┐ ┌────────▼─────────────────────┐
//! │  db::services           │ │  notion + services pipeline  │
//! │  - heatmap storage      │ │  - fetch records             │
//! │  - OAuth state          │ │  - extract, aggregate,       │
//! │  - token resolution     │ │    render, stats             │
//! └─────────────────────────┘ └──────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
