//! OAuth state and Notion connection repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::db::models::{NotionConnection, OAuthState};
use crate::models::UserId;

#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    async fn health_check(&self) -> RepositoryResult<bool>;

    async fn store_oauth_state(&self, state: &OAuthState) -> RepositoryResult<()>;

    /// Remove and return the pending state, if any. A state can be taken once.
    async fn take_oauth_state(&self, state: &str) -> RepositoryResult<Option<OAuthState>>;

    /// Drop every pending state whose `expires_at` is at or before `now`.
    /// Returns the number of states removed.
    async fn purge_expired_oauth_states(&self, now: DateTime<Utc>) -> RepositoryResult<usize>;

    /// Insert or replace the connection of `connection.user_id`.
    async fn upsert_connection(&self, connection: &NotionConnection) -> RepositoryResult<()>;

    async fn get_connection(&self, user_id: &UserId) -> RepositoryResult<Option<NotionConnection>>;
}
