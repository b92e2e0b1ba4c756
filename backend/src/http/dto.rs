//! Data Transfer Objects for the HTTP API.
//!
//! Request bodies for heatmap creation and updates reuse
//! [`NewHeatmap`](crate::db::NewHeatmap) and
//! [`HeatmapUpdate`](crate::db::HeatmapUpdate) directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{api_key_fingerprint, HeatmapRecord};
use crate::models::{
    ColorTheme, ColumnMapping, HeatmapConfig, HeatmapId, HeatmapView, Insight, InsightToggles,
    UserId, WeekStart,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Repository status: `connected`, `disconnected` or `error: ...`
    pub database: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

/// `?year=2024` selects a calendar year; no parameter means the trailing window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YearQuery {
    #[serde(default)]
    pub year: Option<i32>,
}

/// A stored heatmap as returned to clients. The API key never leaves the
/// server; only its fingerprint does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapDto {
    pub id: HeatmapId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub database_id: String,
    pub mapping: ColumnMapping,
    pub color_theme: ColorTheme,
    pub week_start: WeekStart,
    pub is_public: bool,
    pub insights: InsightToggles,
    pub display_order: i32,
    pub api_key_fingerprint: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<HeatmapRecord> for HeatmapDto {
    fn from(record: HeatmapRecord) -> Self {
        Self {
            api_key_fingerprint: record.notion_api_key.as_deref().map(api_key_fingerprint),
            id: record.id,
            user_id: record.user_id,
            name: record.name,
            description: record.description,
            database_id: record.database_id,
            mapping: record.mapping,
            color_theme: record.color_theme,
            week_start: record.week_start,
            is_public: record.is_public,
            insights: record.insights,
            display_order: record.display_order,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapListResponse {
    pub heatmaps: Vec<HeatmapDto>,
    pub total: usize,
}

impl From<Vec<HeatmapRecord>> for HeatmapListResponse {
    fn from(records: Vec<HeatmapRecord>) -> Self {
        let heatmaps: Vec<HeatmapDto> = records.into_iter().map(Into::into).collect();
        Self {
            total: heatmaps.len(),
            heatmaps,
        }
    }
}

/// New display order for a user's heatmaps, first to last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub user_id: UserId,
    pub heatmap_ids: Vec<HeatmapId>,
}

/// One rendered heatmap: presentation settings, grid, stats and the
/// enabled insight rows.
#[derive(Debug, Clone, Serialize)]
pub struct RenderResponse {
    pub name: String,
    pub description: Option<String>,
    pub config: HeatmapConfig,
    pub view: HeatmapView,
    pub insights: Vec<Insight>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub api_key: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthStartQuery {
    pub user_id: String,
}

/// Query string Notion appends when redirecting back after consent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthCallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Set instead of `code` when the user declined.
    #[serde(default)]
    pub error: Option<String>,
}
