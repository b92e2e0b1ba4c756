//! End-to-end tests of the render pipeline on Notion-shaped records.

use chrono::NaiveDate;

use notion_heatmap::api::{
    build_heatmap, CalendarDate, ColumnMapping, HeatmapPeriod, HeatmapView, InsightToggles,
    RawProperty, RawRecord, RenderError, WeekStart,
};

fn date(start: &str) -> RawProperty {
    RawProperty::Date {
        start: start.to_string(),
        end: None,
    }
}

fn number(value: f64) -> RawProperty {
    RawProperty::Number { value: Some(value) }
}

fn select(name: &str) -> RawProperty {
    RawProperty::Select {
        name: Some(name.to_string()),
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

fn cd(y: i32, m: u32, d: u32) -> CalendarDate {
    CalendarDate::from_ymd(y, m, d).unwrap()
}

fn sample_records() -> Vec<RawRecord> {
    vec![
        RawRecord::new("p1")
            .with_property("Date", date("2024-03-01"))
            .with_property("Hours", number(2.0))
            .with_property("Type", select("Reading")),
        // Same calendar day as written, despite the offset
        RawRecord::new("p2")
            .with_property("Date", date("2024-03-01T23:30:00+09:00"))
            .with_property("Hours", number(1.5))
            .with_property("Type", select("Reading")),
        RawRecord::new("p3")
            .with_property("Date", date("2024-03-05"))
            .with_property(
                "Hours",
                RawProperty::RichText {
                    plain_text: "2.5h".to_string(),
                },
            )
            .with_property("Type", select("Writing")),
        RawRecord::new("p4")
            .with_property("Date", date("2023-12-31"))
            .with_property("Hours", number(4.0))
            .with_property("Type", select("Reading")),
        // No date column: skipped
        RawRecord::new("broken").with_property("Hours", number(9.0)),
        // Empty date: skipped
        RawRecord::new("empty")
            .with_property("Date", date(""))
            .with_property("Hours", number(9.0)),
    ]
}

fn build(mapping: &ColumnMapping, period: HeatmapPeriod) -> Result<HeatmapView, RenderError> {
    build_heatmap(
        &sample_records(),
        mapping,
        period,
        WeekStart::Monday,
        today(),
    )
}

#[test]
fn test_year_render_sums_days_and_counts_skips() {
    let view = build(&ColumnMapping::new("Date", "Hours"), HeatmapPeriod::year(2024)).unwrap();

    assert_eq!(view.skipped_records, 2);
    assert_eq!(view.series.len(), 3);
    assert_eq!(view.series.value_on(cd(2024, 3, 1)), Some(3.5));
    assert_eq!(view.series.value_on(cd(2024, 3, 5)), Some(2.5));

    let days: Vec<_> = view.grid.days().collect();
    assert_eq!(days.len(), 366);
    assert_eq!(days[0].date, Some(cd(2024, 1, 1)));

    let march_first = days.iter().find(|c| c.date == Some(cd(2024, 3, 1))).unwrap();
    assert_eq!(march_first.value, 3.5);
    assert_eq!(march_first.intensity, 4);

    let march_fifth = days.iter().find(|c| c.date == Some(cd(2024, 3, 5))).unwrap();
    assert!((1..=4).contains(&march_fifth.intensity));

    let empty_days = days.iter().filter(|c| c.value == 0.0).count();
    assert_eq!(empty_days, 364);
    assert!(days
        .iter()
        .filter(|c| c.value == 0.0)
        .all(|c| c.intensity == 0));
}

#[test]
fn test_stats_cover_whole_series() {
    let view = build(&ColumnMapping::new("Date", "Hours"), HeatmapPeriod::year(2024)).unwrap();

    // 2023-12-31 is outside the grid but still counted
    assert_eq!(view.stats.total_days, 3);
    assert!((view.stats.total_time - 10.0).abs() < 1e-9);
    assert!((view.stats.average_time - 10.0 / 3.0).abs() < 1e-9);
    assert!((view.stats.standard_deviation - 0.6236).abs() < 1e-3);

    let insights = view.stats.insights(&InsightToggles::default());
    let values: Vec<_> = insights.iter().map(|i| i.value.as_str()).collect();
    assert_eq!(values, vec!["3.3h", "3", "10.0h"]);
}

#[test]
fn test_filter_keeps_matching_records_only() {
    let mapping = ColumnMapping::new("Date", "Hours").with_filter("Type", "Reading");
    let view = build(&mapping, HeatmapPeriod::year(2024)).unwrap();

    // Records without the filter column are rejected, not skipped
    assert_eq!(view.skipped_records, 0);
    assert_eq!(view.series.len(), 2);
    assert_eq!(view.series.value_on(cd(2024, 3, 5)), None);
    assert_eq!(view.stats.total_days, 2);
}

#[test]
fn test_trailing_window_ends_today() {
    let view = build(&ColumnMapping::new("Date", "Hours"), HeatmapPeriod::Trailing365).unwrap();

    let days: Vec<_> = view.grid.days().collect();
    assert_eq!(days.len(), 366);
    assert_eq!(days.last().unwrap().date, Some(cd(2024, 3, 10)));
    assert_eq!(days.first().unwrap().date, Some(cd(2023, 3, 11)));

    let new_year_eve = days.iter().find(|c| c.date == Some(cd(2023, 12, 31))).unwrap();
    assert_eq!(new_year_eve.value, 4.0);
    assert_eq!(new_year_eve.intensity, 4);
}

#[test]
fn test_every_week_has_seven_cells() {
    for week_start in [WeekStart::Monday, WeekStart::Sunday] {
        let view = build_heatmap(
            &sample_records(),
            &ColumnMapping::new("Date", "Hours"),
            HeatmapPeriod::year(2023),
            week_start,
            today(),
        )
        .unwrap();
        assert!(view.grid.weeks.iter().all(|w| w.len() == 7));
        assert_eq!(view.grid.days().count(), 365);
    }
}

#[test]
fn test_no_matching_records() {
    let mapping = ColumnMapping::new("Date", "Hours").with_filter("Type", "Cooking");
    let view = build(&mapping, HeatmapPeriod::year(2024)).unwrap();

    assert!(view.series.is_empty());
    assert_eq!(view.stats.total_days, 0);
    assert_eq!(view.stats.average_time, 0.0);
    assert!(view.grid.days().all(|c| c.intensity == 0));
}

#[test]
fn test_invalid_year_fails() {
    let err = build(&ColumnMapping::new("Date", "Hours"), HeatmapPeriod::year(1800)).unwrap_err();
    assert!(matches!(err, RenderError::InvalidPeriod(_)));
}
