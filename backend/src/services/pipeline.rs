//! End-to-end render pass: records in, display model out.

use chrono::NaiveDate;
use log::{debug, info};

use super::aggregator::aggregate;
use super::extractor::extract_all;
use super::grid::{render, RenderError};
use super::stats::compute_stats;
use crate::models::{ColumnMapping, HeatmapPeriod, HeatmapView, RawRecord, WeekStart};

/// Run extraction, aggregation, grid rendering and statistics over `records`.
///
/// Records that fail extraction are dropped and counted in
/// `skipped_records`. Only an invalid period fails the whole pass.
/// Statistics cover the full aggregated series, not just the rendered period.
pub fn build_heatmap(
    records: &[RawRecord],
    mapping: &ColumnMapping,
    period: HeatmapPeriod,
    week_start: WeekStart,
    today: NaiveDate,
) -> Result<HeatmapView, RenderError> {
    let batch = extract_all(records, mapping);
    debug!(
        "Extracted {} points from {} records ({} skipped)",
        batch.points.len(),
        records.len(),
        batch.skipped
    );

    let series = aggregate(batch.points);
    let grid = render(&series, period, week_start, today)?;
    let stats = compute_stats(&series);

    info!(
        "Rendered heatmap: {} days with data, {} week columns",
        stats.total_days,
        grid.weeks.len()
    );

    Ok(HeatmapView {
        period,
        series,
        grid,
        stats,
        skipped_records: batch.skipped,
    })
}
