//! High-level configuration-store operations.
//!
//! These functions work with any [`FullRepository`] and hold the rules the
//! store itself does not enforce: input validation, display ordering, OAuth
//! state expiry and credential resolution.
//!
//! # Usage
//!
//! ```no_run
//! use notion_heatmap::db::{services, repositories::LocalRepository};
//! use notion_heatmap::models::UserId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let heatmaps = services::list_heatmaps(&repo, &UserId::new("user-1")).await?;
//!     println!("Found {} heatmaps", heatmaps.len());
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use log::{info, warn};
use std::collections::HashSet;

use super::models::{HeatmapRecord, HeatmapUpdate, NewHeatmap, NotionConnection, OAuthState};
use super::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};
use crate::models::{ColumnMapping, HeatmapId, UserId};
use crate::services::oauth;

// ==================== Health ====================

pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Validation ====================

fn invalid(operation: &str, field: &str, message: impl Into<String>) -> RepositoryError {
    RepositoryError::validation_with_context(
        message,
        ErrorContext::new(operation)
            .with_entity("heatmap")
            .with_details(format!("field={}", field)),
    )
}

fn require_non_empty(operation: &str, field: &str, value: &str) -> RepositoryResult<()> {
    if value.trim().is_empty() {
        return Err(invalid(operation, field, format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Both columns must be named; a filter needs both its column and its value.
pub fn validate_mapping(operation: &str, mapping: &ColumnMapping) -> RepositoryResult<()> {
    require_non_empty(operation, "date_column", &mapping.date_column)?;
    require_non_empty(operation, "value_column", &mapping.value_column)?;

    let column = mapping.filter_column.as_deref().map(str::trim).unwrap_or("");
    let value = mapping.filter_value.as_deref().map(str::trim).unwrap_or("");
    if column.is_empty() != value.is_empty() {
        return Err(invalid(
            operation,
            "filter",
            "filter_column and filter_value must be set together",
        ));
    }
    Ok(())
}

pub fn validate_new_heatmap(heatmap: &NewHeatmap) -> RepositoryResult<()> {
    const OP: &str = "create_heatmap";
    require_non_empty(OP, "user_id", heatmap.user_id.as_str())?;
    require_non_empty(OP, "name", &heatmap.name)?;
    require_non_empty(OP, "database_id", &heatmap.database_id)?;
    validate_mapping(OP, &heatmap.mapping)
}

fn validate_record(operation: &str, record: &HeatmapRecord) -> RepositoryResult<()> {
    require_non_empty(operation, "name", &record.name)?;
    require_non_empty(operation, "database_id", &record.database_id)?;
    validate_mapping(operation, &record.mapping)
}

fn normalize_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn normalize_mapping(mapping: &ColumnMapping) -> ColumnMapping {
    ColumnMapping {
        date_column: mapping.date_column.trim().to_string(),
        value_column: mapping.value_column.trim().to_string(),
        filter_column: normalize_optional(&mapping.filter_column),
        filter_value: normalize_optional(&mapping.filter_value),
    }
}

// ==================== Heatmap Operations ====================

/// Validate and store a new heatmap at the end of its owner's list.
pub async fn create_heatmap<R: FullRepository + ?Sized>(
    repo: &R,
    heatmap: &NewHeatmap,
) -> RepositoryResult<HeatmapRecord> {
    let mut heatmap = heatmap.clone();
    heatmap.name = heatmap.name.trim().to_string();
    heatmap.database_id = heatmap.database_id.trim().to_string();
    heatmap.description = normalize_optional(&heatmap.description);
    heatmap.notion_api_key = normalize_optional(&heatmap.notion_api_key);
    heatmap.mapping = normalize_mapping(&heatmap.mapping);
    validate_new_heatmap(&heatmap)?;

    let existing = repo.list_heatmaps_for_user(&heatmap.user_id).await?;
    let display_order = existing
        .iter()
        .map(|h| h.display_order)
        .max()
        .map_or(0, |max| max + 1);

    let record = repo.insert_heatmap(&heatmap, display_order).await?;
    info!(
        "Created heatmap {} '{}' for user {} at position {}",
        record.id, record.name, record.user_id, record.display_order
    );
    Ok(record)
}

pub async fn get_heatmap<R: FullRepository + ?Sized>(
    repo: &R,
    id: HeatmapId,
) -> RepositoryResult<HeatmapRecord> {
    repo.get_heatmap(id).await
}

/// Fetch a heatmap for anonymous viewing. Private heatmaps read as missing.
pub async fn get_public_heatmap<R: FullRepository + ?Sized>(
    repo: &R,
    id: HeatmapId,
) -> RepositoryResult<HeatmapRecord> {
    let record = repo.get_heatmap(id).await?;
    if !record.is_public {
        return Err(RepositoryError::not_found_with_context(
            format!("Heatmap {} not found", id),
            ErrorContext::new("get_public_heatmap")
                .with_entity("heatmap")
                .with_entity_id(id),
        ));
    }
    Ok(record)
}

pub async fn list_heatmaps<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: &UserId,
) -> RepositoryResult<Vec<HeatmapRecord>> {
    repo.list_heatmaps_for_user(user_id).await
}

/// Apply `update` if the resulting heatmap is still valid.
pub async fn update_heatmap<R: FullRepository + ?Sized>(
    repo: &R,
    id: HeatmapId,
    update: &HeatmapUpdate,
) -> RepositoryResult<HeatmapRecord> {
    let mut update = update.clone();
    update.name = update.name.map(|n| n.trim().to_string());
    update.database_id = update.database_id.map(|d| d.trim().to_string());
    update.mapping = update.mapping.as_ref().map(normalize_mapping);

    let mut preview = repo.get_heatmap(id).await?;
    update.apply_to(&mut preview);
    validate_record("update_heatmap", &preview)?;

    let record = repo.update_heatmap(id, &update).await?;
    info!("Updated heatmap {}", id);
    Ok(record)
}

pub async fn delete_heatmap<R: FullRepository + ?Sized>(
    repo: &R,
    id: HeatmapId,
) -> RepositoryResult<()> {
    repo.delete_heatmap(id).await?;
    info!("Deleted heatmap {}", id);
    Ok(())
}

/// Reorder a user's heatmaps. `ordered_ids` lists the new order from first
/// to last; ids must be unique and owned by `user_id`. Heatmaps left out of
/// the list follow the listed ones, keeping their current relative order.
pub async fn reorder_heatmaps<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: &UserId,
    ordered_ids: &[HeatmapId],
) -> RepositoryResult<()> {
    let mut seen = HashSet::new();
    if let Some(dup) = ordered_ids.iter().find(|id| !seen.insert(**id)) {
        return Err(RepositoryError::validation_with_context(
            format!("Heatmap {} listed more than once", dup),
            ErrorContext::new("reorder_heatmaps").with_entity_id(dup),
        ));
    }

    let current: Vec<HeatmapId> = repo
        .list_heatmaps_for_user(user_id)
        .await?
        .into_iter()
        .map(|h| h.id)
        .collect();
    if let Some(foreign) = ordered_ids.iter().find(|id| !current.contains(*id)) {
        warn!("User {} tried to reorder heatmap {} they do not own", user_id, foreign);
        return Err(RepositoryError::forbidden_with_context(
            format!("Heatmap {} does not belong to user {}", foreign, user_id),
            ErrorContext::new("reorder_heatmaps")
                .with_entity("heatmap")
                .with_entity_id(foreign),
        ));
    }

    let full_order: Vec<HeatmapId> = ordered_ids
        .iter()
        .copied()
        .chain(current.into_iter().filter(|id| !seen.contains(id)))
        .collect();
    repo.set_display_order(user_id, &full_order).await
}

// ==================== OAuth & Connections ====================

/// Issue and persist a fresh OAuth state for `user_id`.
pub async fn begin_oauth<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: &UserId,
    now: DateTime<Utc>,
) -> RepositoryResult<OAuthState> {
    require_non_empty("begin_oauth", "user_id", user_id.as_str())?;
    let state = OAuthState {
        state: oauth::generate_state(),
        user_id: user_id.clone(),
        expires_at: oauth::state_expires_at(now),
    };
    repo.store_oauth_state(&state).await?;
    Ok(state)
}

/// Redeem an OAuth state and return the user it was issued to.
///
/// # Errors
/// `ValidationError` if the state is unknown, already used or expired.
pub async fn consume_oauth_state<R: FullRepository + ?Sized>(
    repo: &R,
    state: &str,
    now: DateTime<Utc>,
) -> RepositoryResult<UserId> {
    let context = || ErrorContext::new("consume_oauth_state").with_entity("oauth_state");
    let pending = repo
        .take_oauth_state(state)
        .await?
        .ok_or_else(|| RepositoryError::validation_with_context("Unknown OAuth state", context()))?;

    if pending.expires_at <= now {
        warn!("OAuth state for user {} expired at {}", pending.user_id, pending.expires_at);
        return Err(RepositoryError::validation_with_context(
            "OAuth state expired",
            context(),
        ));
    }
    Ok(pending.user_id)
}

/// Drop pending OAuth states that can no longer be redeemed.
pub async fn purge_expired_oauth_states<R: FullRepository + ?Sized>(
    repo: &R,
    now: DateTime<Utc>,
) -> RepositoryResult<usize> {
    let removed = repo.purge_expired_oauth_states(now).await?;
    if removed > 0 {
        info!("Purged {} expired OAuth state(s)", removed);
    }
    Ok(removed)
}

pub async fn store_connection<R: FullRepository + ?Sized>(
    repo: &R,
    connection: &NotionConnection,
) -> RepositoryResult<()> {
    if connection.access_token.trim().is_empty() {
        return Err(RepositoryError::validation_with_context(
            "access_token must not be empty",
            ErrorContext::new("store_connection").with_entity("connection"),
        ));
    }
    repo.upsert_connection(connection).await?;
    info!(
        "Stored Notion connection for user {} (workspace {})",
        connection.user_id,
        connection.workspace_name.as_deref().unwrap_or("unknown")
    );
    Ok(())
}

/// Token used to read `heatmap`'s database: its own API key, otherwise the
/// owner's OAuth connection.
pub async fn resolve_access_token<R: FullRepository + ?Sized>(
    repo: &R,
    heatmap: &HeatmapRecord,
) -> RepositoryResult<String> {
    if let Some(key) = heatmap.notion_api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        return Ok(key.to_string());
    }
    match repo.get_connection(&heatmap.user_id).await? {
        Some(connection) => Ok(connection.access_token),
        None => Err(RepositoryError::validation_with_context(
            format!(
                "Heatmap {} has no API key and user {} has not connected Notion",
                heatmap.id, heatmap.user_id
            ),
            ErrorContext::new("resolve_access_token")
                .with_entity("heatmap")
                .with_entity_id(heatmap.id),
        )),
    }
}
