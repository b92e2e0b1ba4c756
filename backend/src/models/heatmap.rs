//! Heatmap configuration and render-output types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::property::AggregatedSeries;
use super::time::{CalendarDate, WeekStart};
use crate::define_id_type;

define_id_type!(i64, HeatmapId);

/// Identifier of the account owning heatmaps and Notion connections.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
    Brown,
    Gray,
    Lightgray,
}

impl FromStr for ColorTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "orange" => Ok(Self::Orange),
            "yellow" => Ok(Self::Yellow),
            "green" => Ok(Self::Green),
            "blue" => Ok(Self::Blue),
            "purple" => Ok(Self::Purple),
            "pink" => Ok(Self::Pink),
            "red" => Ok(Self::Red),
            "brown" => Ok(Self::Brown),
            "gray" | "grey" => Ok(Self::Gray),
            "lightgray" | "lightgrey" => Ok(Self::Lightgray),
            _ => Err(format!("Unknown color theme: {}", s)),
        }
    }
}

/// Which derived statistics a heatmap displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightToggles {
    #[serde(default = "default_true")]
    pub average_time: bool,
    #[serde(default = "default_true")]
    pub total_days: bool,
    #[serde(default = "default_true")]
    pub total_time: bool,
    #[serde(default)]
    pub standard_deviation: bool,
}

fn default_true() -> bool {
    true
}

impl Default for InsightToggles {
    fn default() -> Self {
        Self {
            average_time: true,
            total_days: true,
            total_time: true,
            standard_deviation: false,
        }
    }
}

/// Read-only presentation settings the pipeline needs from a stored heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapConfig {
    pub id: HeatmapId,
    pub color_theme: ColorTheme,
    pub week_start: WeekStart,
    pub insights: InsightToggles,
}

/// Span of days a grid covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeatmapPeriod {
    /// The 366 days ending today, both ends inclusive.
    Trailing365,
    /// January 1st through December 31st.
    Year { year: i32 },
}

impl HeatmapPeriod {
    pub fn year(year: i32) -> Self {
        Self::Year { year }
    }

    /// A `?year=` query parameter selects a calendar year, no parameter
    /// means the trailing window.
    pub fn from_year_param(year: Option<i32>) -> Self {
        year.map(Self::year).unwrap_or(Self::Trailing365)
    }
}

/// One cell of the grid. `date == None` marks alignment padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub date: Option<CalendarDate>,
    pub value: f64,
    pub intensity: u8,
}

impl GridCell {
    pub fn padding() -> Self {
        Self {
            date: None,
            value: 0.0,
            intensity: 0,
        }
    }

    pub fn is_padding(&self) -> bool {
        self.date.is_none()
    }
}

/// Placement of a month label above the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthLabel {
    pub month: String,
    pub week_offset: usize,
}

/// Complete calendar grid: week-columns of exactly seven cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapGrid {
    pub weeks: Vec<Vec<GridCell>>,
    pub month_labels: Vec<MonthLabel>,
}

impl HeatmapGrid {
    /// Cells that carry a date, in calendar order.
    pub fn days(&self) -> impl Iterator<Item = &GridCell> {
        self.weeks.iter().flatten().filter(|c| !c.is_padding())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedStats {
    pub average_time: f64,
    pub total_days: usize,
    pub total_time: f64,
    pub standard_deviation: f64,
}

/// A derived statistic formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// Everything one render pass produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapView {
    pub period: HeatmapPeriod,
    pub series: AggregatedSeries,
    pub grid: HeatmapGrid,
    pub stats: DerivedStats,
    pub skipped_records: usize,
}
