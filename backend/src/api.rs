//! Public API surface.
//!
//! Consolidates the types needed to run the render pipeline without reaching
//! into individual modules.

pub use crate::models::{
    AggregatedSeries, CalendarDate, Clock, ColorTheme, ColumnMapping, DataPoint, DerivedStats,
    FixedClock, FormulaValue, GridCell, HeatmapConfig, HeatmapGrid, HeatmapId, HeatmapPeriod,
    HeatmapView, Insight, InsightToggles, MonthLabel, RawProperty, RawRecord, SystemClock,
    Timestamp, UserId, WeekStart,
};
pub use crate::services::{
    aggregate, build_heatmap, compute_stats, extract, extract_all, intensity_bucket, render,
    ExtractionBatch, ExtractionError, RenderError,
};
