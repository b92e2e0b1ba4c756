//! Heatmap configuration repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::{HeatmapRecord, HeatmapUpdate, NewHeatmap};
use crate::models::{HeatmapId, UserId};

/// Storage of heatmap configurations.
///
/// Implementations persist what they are given; validation and ordering
/// rules live in [`crate::db::services`].
#[async_trait]
pub trait HeatmapRepository: Send + Sync {
    /// Store a new heatmap at `display_order` and return it with its id.
    async fn insert_heatmap(
        &self,
        heatmap: &NewHeatmap,
        display_order: i32,
    ) -> RepositoryResult<HeatmapRecord>;

    /// # Errors
    /// `RepositoryError::NotFound` if no heatmap has this id.
    async fn get_heatmap(&self, id: HeatmapId) -> RepositoryResult<HeatmapRecord>;

    /// Apply `update` and bump `updated_at`.
    async fn update_heatmap(
        &self,
        id: HeatmapId,
        update: &HeatmapUpdate,
    ) -> RepositoryResult<HeatmapRecord>;

    async fn delete_heatmap(&self, id: HeatmapId) -> RepositoryResult<()>;

    /// Heatmaps owned by `user_id`, ascending by display order then id.
    async fn list_heatmaps_for_user(&self, user_id: &UserId)
        -> RepositoryResult<Vec<HeatmapRecord>>;

    /// Set each heatmap's display order to its position in `ordered_ids`.
    async fn set_display_order(
        &self,
        user_id: &UserId,
        ordered_ids: &[HeatmapId],
    ) -> RepositoryResult<()>;
}
