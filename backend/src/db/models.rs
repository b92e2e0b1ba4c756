//! Persistent records owned by the configuration store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    ColorTheme, ColumnMapping, HeatmapConfig, HeatmapId, InsightToggles, UserId, WeekStart,
};

/// A stored heatmap configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapRecord {
    pub id: HeatmapId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    /// Integration token supplied by the user. Falls back to the owner's
    /// OAuth connection when absent.
    pub notion_api_key: Option<String>,
    pub database_id: String,
    pub mapping: ColumnMapping,
    pub color_theme: ColorTheme,
    pub week_start: WeekStart,
    pub is_public: bool,
    pub insights: InsightToggles,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HeatmapRecord {
    /// Presentation settings consumed by the render pipeline.
    pub fn config(&self) -> HeatmapConfig {
        HeatmapConfig {
            id: self.id,
            color_theme: self.color_theme,
            week_start: self.week_start,
            insights: self.insights,
        }
    }
}

/// Fields supplied when creating a heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHeatmap {
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notion_api_key: Option<String>,
    pub database_id: String,
    pub mapping: ColumnMapping,
    #[serde(default)]
    pub color_theme: ColorTheme,
    #[serde(default)]
    pub week_start: WeekStart,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub insights: InsightToggles,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatmapUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notion_api_key: Option<String>,
    #[serde(default)]
    pub database_id: Option<String>,
    #[serde(default)]
    pub mapping: Option<ColumnMapping>,
    #[serde(default)]
    pub color_theme: Option<ColorTheme>,
    #[serde(default)]
    pub week_start: Option<WeekStart>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub insights: Option<InsightToggles>,
}

impl HeatmapUpdate {
    /// Apply the present fields to `record`. Timestamps are left to the store.
    pub fn apply_to(&self, record: &mut HeatmapRecord) {
        if let Some(ref name) = self.name {
            record.name = name.clone();
        }
        if let Some(ref description) = self.description {
            record.description = non_empty(description);
        }
        if let Some(ref key) = self.notion_api_key {
            record.notion_api_key = non_empty(key);
        }
        if let Some(ref database_id) = self.database_id {
            record.database_id = database_id.clone();
        }
        if let Some(ref mapping) = self.mapping {
            record.mapping = mapping.clone();
        }
        if let Some(theme) = self.color_theme {
            record.color_theme = theme;
        }
        if let Some(week_start) = self.week_start {
            record.week_start = week_start;
        }
        if let Some(is_public) = self.is_public {
            record.is_public = is_public;
        }
        if let Some(insights) = self.insights {
            record.insights = insights;
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Pending OAuth authorization waiting for its callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthState {
    pub state: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// A user's Notion workspace authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotionConnection {
    pub user_id: UserId,
    pub access_token: String,
    pub workspace_id: Option<String>,
    pub workspace_name: Option<String>,
    pub bot_id: Option<String>,
    pub connected_at: DateTime<Utc>,
}
