//! In-memory local repository implementation.
//!
//! Stores everything in `HashMap`s behind a single lock. Used by the server
//! in development and by the test suites, which rely on it being fast,
//! deterministic and isolated per instance. Timestamps come from the
//! repository's [`Clock`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::models::{HeatmapRecord, HeatmapUpdate, NewHeatmap, NotionConnection, OAuthState};
use crate::db::repository::*;
use crate::models::{Clock, HeatmapId, SystemClock, UserId};

/// In-memory local repository.
///
/// # Example
/// ```
/// use notion_heatmap::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// assert_eq!(repo.heatmap_count(), 0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    clock: Arc<dyn Clock>,
}

struct LocalData {
    heatmaps: HashMap<HeatmapId, HeatmapRecord>,
    oauth_states: HashMap<String, OAuthState>,
    connections: HashMap<UserId, NotionConnection>,
    next_heatmap_id: HeatmapId,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            heatmaps: HashMap::new(),
            oauth_states: HashMap::new(),
            connections: HashMap::new(),
            next_heatmap_id: HeatmapId(1),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository stamped with the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            clock,
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data, keeping the health flag.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    pub fn heatmap_count(&self) -> usize {
        self.data.read().heatmaps.len()
    }

    pub fn pending_state_count(&self) -> usize {
        self.data.read().oauth_states.len()
    }

    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Repository is not healthy"));
        }
        Ok(())
    }

    fn heatmap_not_found(operation: &str, id: HeatmapId) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Heatmap {} not found", id),
            ErrorContext::new(operation)
                .with_entity("heatmap")
                .with_entity_id(id),
        )
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HeatmapRepository for LocalRepository {
    async fn insert_heatmap(
        &self,
        heatmap: &NewHeatmap,
        display_order: i32,
    ) -> RepositoryResult<HeatmapRecord> {
        self.check_health()?;
        let mut data = self.data.write();
        let id = data.next_heatmap_id;
        data.next_heatmap_id = HeatmapId(id.0 + 1);

        let now = self.clock.now();
        let record = HeatmapRecord {
            id,
            user_id: heatmap.user_id.clone(),
            name: heatmap.name.clone(),
            description: heatmap.description.clone(),
            notion_api_key: heatmap.notion_api_key.clone(),
            database_id: heatmap.database_id.clone(),
            mapping: heatmap.mapping.clone(),
            color_theme: heatmap.color_theme,
            week_start: heatmap.week_start,
            is_public: heatmap.is_public,
            insights: heatmap.insights,
            display_order,
            created_at: now,
            updated_at: now,
        };
        data.heatmaps.insert(id, record.clone());
        Ok(record)
    }

    async fn get_heatmap(&self, id: HeatmapId) -> RepositoryResult<HeatmapRecord> {
        self.check_health()?;
        self.data
            .read()
            .heatmaps
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::heatmap_not_found("get_heatmap", id))
    }

    async fn update_heatmap(
        &self,
        id: HeatmapId,
        update: &HeatmapUpdate,
    ) -> RepositoryResult<HeatmapRecord> {
        self.check_health()?;
        let mut data = self.data.write();
        let record = data
            .heatmaps
            .get_mut(&id)
            .ok_or_else(|| Self::heatmap_not_found("update_heatmap", id))?;
        update.apply_to(record);
        record.updated_at = self.clock.now();
        Ok(record.clone())
    }

    async fn delete_heatmap(&self, id: HeatmapId) -> RepositoryResult<()> {
        self.check_health()?;
        self.data
            .write()
            .heatmaps
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::heatmap_not_found("delete_heatmap", id))
    }

    async fn list_heatmaps_for_user(
        &self,
        user_id: &UserId,
    ) -> RepositoryResult<Vec<HeatmapRecord>> {
        self.check_health()?;
        let data = self.data.read();
        let mut heatmaps: Vec<HeatmapRecord> = data
            .heatmaps
            .values()
            .filter(|h| &h.user_id == user_id)
            .cloned()
            .collect();
        heatmaps.sort_by_key(|h| (h.display_order, h.id));
        Ok(heatmaps)
    }

    async fn set_display_order(
        &self,
        user_id: &UserId,
        ordered_ids: &[HeatmapId],
    ) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write();
        for id in ordered_ids {
            match data.heatmaps.get(id) {
                Some(h) if &h.user_id == user_id => {}
                _ => return Err(Self::heatmap_not_found("set_display_order", *id)),
            }
        }
        let now = self.clock.now();
        for (position, id) in ordered_ids.iter().enumerate() {
            if let Some(record) = data.heatmaps.get_mut(id) {
                record.display_order = position as i32;
                record.updated_at = now;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ConnectionRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn store_oauth_state(&self, state: &OAuthState) -> RepositoryResult<()> {
        self.check_health()?;
        self.data
            .write()
            .oauth_states
            .insert(state.state.clone(), state.clone());
        Ok(())
    }

    async fn take_oauth_state(&self, state: &str) -> RepositoryResult<Option<OAuthState>> {
        self.check_health()?;
        Ok(self.data.write().oauth_states.remove(state))
    }

    async fn purge_expired_oauth_states(&self, now: DateTime<Utc>) -> RepositoryResult<usize> {
        self.check_health()?;
        let mut data = self.data.write();
        let before = data.oauth_states.len();
        data.oauth_states.retain(|_, pending| pending.expires_at > now);
        Ok(before - data.oauth_states.len())
    }

    async fn upsert_connection(&self, connection: &NotionConnection) -> RepositoryResult<()> {
        self.check_health()?;
        self.data
            .write()
            .connections
            .insert(connection.user_id.clone(), connection.clone());
        Ok(())
    }

    async fn get_connection(
        &self,
        user_id: &UserId,
    ) -> RepositoryResult<Option<NotionConnection>> {
        self.check_health()?;
        Ok(self.data.read().connections.get(user_id).cloned())
    }
}
