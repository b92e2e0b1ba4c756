//! # Notion Heatmap
//!
//! Turns a Notion database into a GitHub-style contribution heatmap.
//!
//! Each page of the database contributes one dated value. Values are summed
//! per calendar day, laid out as a grid of week columns, bucketed into
//! intensity levels and summarized by a few statistics. Heatmaps can be kept
//! private or published for embedding.
//!
//! ## Architecture
//!
//! - [`models`]: domain types (dates, raw properties, grid, stats)
//! - [`services`]: the render pipeline (extract, aggregate, render, stats),
//!   the render cache and OAuth helpers
//! - [`notion`]: the Notion data source and its REST client
//! - [`db`]: heatmap and connection storage behind repository traits
//! - [`config`]: server configuration from TOML and the environment
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`api`]: the types most callers need, in one place

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod notion;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
