//! Heatmap pipeline and the services around it.
//!
//! The pipeline stages are pure functions: [`extractor`] turns source records
//! into dated values, [`aggregator`] folds them into one value per day,
//! [`grid`] lays the days out as week columns and [`stats`] summarizes them.
//! [`pipeline`] chains the four. [`render_cache`] and [`oauth`] support the
//! HTTP layer.

pub mod aggregator;
pub mod extractor;
pub mod grid;
pub mod oauth;
pub mod pipeline;
pub mod render_cache;
pub mod stats;

pub use aggregator::aggregate;
pub use extractor::{extract, extract_all, ExtractionBatch, ExtractionError};
pub use grid::{intensity_bucket, render, RenderError};
pub use pipeline::build_heatmap;
pub use render_cache::{RenderCache, RenderKey};
pub use stats::compute_stats;

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod extractor_tests;

#[cfg(test)]
#[path = "grid_tests.rs"]
mod grid_tests;
