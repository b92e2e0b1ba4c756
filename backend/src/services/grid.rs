//! Calendar grid model for the heatmap.
//!
//! The grid is a list of week-columns, each exactly seven cells tall. Every
//! day of the requested period is present, days without data carry a zero
//! value, and the first and last columns are padded with date-less cells so
//! that each date sits in the row of its weekday.

use chrono::NaiveDate;

use crate::models::{
    AggregatedSeries, CalendarDate, GridCell, HeatmapGrid, HeatmapPeriod, MonthLabel, WeekStart,
};

/// Earliest calendar year a grid can be rendered for.
pub const MIN_YEAR: i32 = 1900;
/// Latest calendar year a grid can be rendered for.
pub const MAX_YEAR: i32 = 2200;
/// Days before today included in the trailing window (today makes it 366).
pub const TRAILING_WINDOW_DAYS: i64 = 365;
/// Highest intensity bucket.
pub const MAX_INTENSITY: u8 = 4;

const DAYS_PER_WEEK: usize = 7;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
}

/// First and last day (inclusive) covered by `period`.
pub fn resolve_period(
    period: HeatmapPeriod,
    today: NaiveDate,
) -> Result<(CalendarDate, CalendarDate), RenderError> {
    match period {
        HeatmapPeriod::Trailing365 => {
            let end = CalendarDate::new(today);
            let start = end.offset_days(-TRAILING_WINDOW_DAYS).ok_or_else(|| {
                RenderError::InvalidPeriod(format!("no trailing window before {}", end))
            })?;
            Ok((start, end))
        }
        HeatmapPeriod::Year { year } => {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                return Err(RenderError::InvalidPeriod(format!(
                    "year {} is outside {}..={}",
                    year, MIN_YEAR, MAX_YEAR
                )));
            }
            let start = CalendarDate::from_ymd(year, 1, 1);
            let end = CalendarDate::from_ymd(year, 12, 31);
            start.zip(end).ok_or_else(|| {
                RenderError::InvalidPeriod(format!("year {} is not representable", year))
            })
        }
    }
}

/// Build the grid for `period`.
///
/// `today` anchors the trailing window; callers get it from a
/// [`Clock`](crate::models::Clock).
pub fn render(
    series: &AggregatedSeries,
    period: HeatmapPeriod,
    week_start: WeekStart,
    today: NaiveDate,
) -> Result<HeatmapGrid, RenderError> {
    let (start, end) = resolve_period(period, today)?;

    let mut days: Vec<(CalendarDate, f64)> = Vec::with_capacity(367);
    let mut cursor = start;
    loop {
        days.push((cursor, series.value_on(cursor).unwrap_or(0.0)));
        if cursor >= end {
            break;
        }
        cursor = cursor
            .succ()
            .ok_or_else(|| RenderError::InvalidPeriod(format!("date overflow after {}", cursor)))?;
    }

    let (min, max) = days
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| {
            (lo.min(*v), hi.max(*v))
        });

    let lead = week_start.row_of(start.weekday());
    let week_count = (lead + days.len()).div_ceil(DAYS_PER_WEEK);
    let mut weeks: Vec<Vec<GridCell>> = Vec::with_capacity(week_count);
    let mut month_labels = Vec::new();
    let mut current: Vec<GridCell> = vec![GridCell::padding(); lead];
    let mut last_month: Option<(i32, u32)> = None;

    for (idx, (date, value)) in days.iter().enumerate() {
        let month = (date.year(), date.month());
        if last_month != Some(month) {
            month_labels.push(MonthLabel {
                month: MONTH_NAMES[(date.month() - 1) as usize].to_string(),
                week_offset: (lead + idx) / DAYS_PER_WEEK,
            });
            last_month = Some(month);
        }

        current.push(GridCell {
            date: Some(*date),
            value: *value,
            intensity: intensity_bucket(*value, min, max),
        });
        if current.len() == DAYS_PER_WEEK {
            weeks.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        current.resize(DAYS_PER_WEEK, GridCell::padding());
        weeks.push(current);
    }

    Ok(HeatmapGrid {
        weeks,
        month_labels,
    })
}

/// Logarithmic 0..=4 bucket of `value` relative to the rendered range.
///
/// Zero maps to 0; any other value maps to 1..=4. A flat range (`max == min`)
/// puts every nonzero value in bucket 1.
pub fn intensity_bucket(value: f64, min: f64, max: f64) -> u8 {
    if value == 0.0 {
        return 0;
    }
    if max <= 0.0 || max == min {
        return 1;
    }
    let ratio = value.ln_1p() / max.ln_1p();
    if !ratio.is_finite() {
        return 1;
    }
    (ratio * MAX_INTENSITY as f64).ceil().clamp(1.0, MAX_INTENSITY as f64) as u8
}
