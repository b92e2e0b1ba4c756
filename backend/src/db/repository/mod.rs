//! Repository trait definitions for the configuration store.
//!
//! - [`error`]: Error types for repository operations
//! - [`heatmap`]: CRUD and ordering of heatmap configurations
//! - [`connection`]: OAuth state and Notion connection storage
//!
//! # Convenience Trait Bound
//!
//! Functions needing both capabilities take a [`FullRepository`]:
//!
//! ```ignore
//! async fn my_service<R: FullRepository>(repo: &R) -> RepositoryResult<()> {
//!     let heatmap = repo.get_heatmap(id).await?;
//!     let connection = repo.get_connection(&heatmap.user_id).await?;
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod error;
pub mod heatmap;

pub use connection::ConnectionRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use heatmap::HeatmapRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Implemented automatically for any type implementing both repository traits.
pub trait FullRepository: HeatmapRepository + ConnectionRepository {}

impl<T> FullRepository for T where T: HeatmapRepository + ConnectionRepository {}
