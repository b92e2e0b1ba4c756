#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use proptest::prelude::*;

    use crate::models::{DataPoint, HeatmapGrid, HeatmapPeriod, WeekStart};
    use crate::services::aggregator::aggregate;
    use crate::services::grid::{intensity_bucket, render, RenderError};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn render_empty(
        period: HeatmapPeriod,
        week_start: WeekStart,
    ) -> Result<HeatmapGrid, RenderError> {
        render(&aggregate(vec![]), period, week_start, today())
    }

    fn point(date: &str, value: f64) -> DataPoint {
        DataPoint::new(date.parse().unwrap(), value)
    }

    fn assert_well_formed(grid: &HeatmapGrid) {
        for week in &grid.weeks {
            assert_eq!(week.len(), 7);
        }
        for cell in grid.weeks.iter().flatten() {
            if cell.is_padding() {
                assert_eq!(cell.value, 0.0);
                assert_eq!(cell.intensity, 0);
            }
        }
    }

    #[test]
    fn test_year_2024_monday_has_no_leading_padding() {
        let grid = render_empty(HeatmapPeriod::year(2024), WeekStart::Monday).unwrap();
        assert_well_formed(&grid);
        assert_eq!(grid.weeks.len(), 53);
        assert_eq!(grid.weeks[0][0].date.unwrap().to_string(), "2024-01-01");
        assert_eq!(grid.days().count(), 366);
        assert!(grid.days().all(|c| c.value == 0.0 && c.intensity == 0));
    }

    #[test]
    fn test_year_2024_sunday_pads_one_cell() {
        let grid = render_empty(HeatmapPeriod::year(2024), WeekStart::Sunday).unwrap();
        assert_well_formed(&grid);
        assert!(grid.weeks[0][0].is_padding());
        assert_eq!(grid.weeks[0][1].date.unwrap().to_string(), "2024-01-01");
        assert_eq!(grid.weeks.len(), 53);
    }

    #[test]
    fn test_year_2023_monday_alignment() {
        // 2023-01-01 is a Sunday: six padding cells, then it lands in the last row.
        let grid = render_empty(HeatmapPeriod::year(2023), WeekStart::Monday).unwrap();
        assert_well_formed(&grid);
        assert!(grid.weeks[0][..6].iter().all(|c| c.is_padding()));
        assert_eq!(grid.weeks[0][6].date.unwrap().to_string(), "2023-01-01");
        assert_eq!(grid.weeks.len(), 53);
        assert_eq!(grid.days().count(), 365);
        let last = grid.weeks.last().unwrap();
        assert_eq!(last[6].date.unwrap().to_string(), "2023-12-31");
    }

    #[test]
    fn test_trailing_window_covers_366_days() {
        let grid = render_empty(HeatmapPeriod::Trailing365, WeekStart::Monday).unwrap();
        assert_well_formed(&grid);
        let days: Vec<String> = grid.days().map(|c| c.date.unwrap().to_string()).collect();
        assert_eq!(days.len(), 366);
        assert_eq!(days.first().unwrap(), "2023-07-01");
        assert_eq!(days.last().unwrap(), "2024-06-30");
    }

    #[test]
    fn test_days_are_consecutive() {
        let grid = render_empty(HeatmapPeriod::Trailing365, WeekStart::Sunday).unwrap();
        let dates: Vec<_> = grid.days().map(|c| c.date.unwrap()).collect();
        for pair in dates.windows(2) {
            assert_eq!(pair[0].succ(), Some(pair[1]));
        }
    }

    #[test]
    fn test_gap_filling_and_values() {
        let series = aggregate(vec![point("2024-01-02", 5.0), point("2024-01-04", 1.0)]);
        let grid = render(&series, HeatmapPeriod::year(2024), WeekStart::Monday, today()).unwrap();
        let week = &grid.weeks[0];
        assert_eq!(week[0].value, 0.0);
        assert_eq!(week[1].value, 5.0);
        assert_eq!(week[2].value, 0.0);
        assert_eq!(week[3].value, 1.0);
        assert_eq!(week[1].intensity, 4);
        assert_eq!(week[0].intensity, 0);
        assert!(week[3].intensity >= 1 && week[3].intensity < 4);
    }

    #[test]
    fn test_points_outside_period_are_ignored() {
        let series = aggregate(vec![point("2023-12-31", 100.0), point("2024-01-01", 1.0)]);
        let grid = render(&series, HeatmapPeriod::year(2024), WeekStart::Monday, today()).unwrap();
        assert_eq!(grid.days().count(), 366);
        assert_eq!(grid.weeks[0][0].value, 1.0);
        assert_eq!(grid.weeks[0][0].intensity, 4);
    }

    #[test]
    fn test_month_labels_for_year() {
        let grid = render_empty(HeatmapPeriod::year(2023), WeekStart::Monday).unwrap();
        let months: Vec<&str> = grid.month_labels.iter().map(|l| l.month.as_str()).collect();
        assert_eq!(
            months,
            vec!["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"]
        );
        assert_eq!(grid.month_labels[0].week_offset, 0);
        // Feb 1st 2023 is day index 31, after six padding cells: column 5.
        assert_eq!(grid.month_labels[1].week_offset, 5);
        let feb_first = grid.weeks[5]
            .iter()
            .find(|c| c.date.map(|d| d.to_string()) == Some("2023-02-01".to_string()));
        assert!(feb_first.is_some());
    }

    #[test]
    fn test_trailing_month_labels_repeat_start_month() {
        let grid = render_empty(HeatmapPeriod::Trailing365, WeekStart::Monday).unwrap();
        assert_eq!(grid.month_labels.len(), 12);
        assert_eq!(grid.month_labels.first().unwrap().month, "Jul");
        assert_eq!(grid.month_labels.last().unwrap().month, "Jun");
    }

    #[test]
    fn test_invalid_year() {
        for year in [1800, 2201, -5] {
            let err = render_empty(HeatmapPeriod::year(year), WeekStart::Monday).unwrap_err();
            assert!(matches!(err, RenderError::InvalidPeriod(_)));
        }
    }

    #[test]
    fn test_intensity_bucket_edges() {
        assert_eq!(intensity_bucket(0.0, 0.0, 10.0), 0);
        assert_eq!(intensity_bucket(10.0, 0.0, 10.0), 4);
        assert_eq!(intensity_bucket(0.01, 0.0, 10.0), 1);
        // Flat range.
        assert_eq!(intensity_bucket(3.0, 3.0, 3.0), 1);
        // Negative inputs still land in a nonzero bucket.
        assert_eq!(intensity_bucket(-2.0, -2.0, 5.0), 1);
    }

    #[test]
    fn test_intensity_log_scale() {
        // ln(1+v)/ln(1+max) with max = 99: v=9 gives exactly 0.5 → bucket 2.
        assert_eq!(intensity_bucket(9.0, 0.0, 99.0), 2);
        assert_eq!(intensity_bucket(30.0, 0.0, 99.0), 3);
        assert_eq!(intensity_bucket(99.0, 0.0, 99.0), 4);
    }

    proptest! {
        #[test]
        fn prop_intensity_monotonic(
            a in 0.0f64..1000.0,
            b in 0.0f64..1000.0,
            max in 1.0f64..1000.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (lo, hi) = (lo.min(max), hi.min(max));
            prop_assert!(intensity_bucket(lo, 0.0, max) <= intensity_bucket(hi, 0.0, max));
        }

        #[test]
        fn prop_intensity_in_range(v in 0.0001f64..1000.0, max in 1.0f64..1000.0) {
            let bucket = intensity_bucket(v.min(max), 0.0, max);
            prop_assert!((1..=4).contains(&bucket));
        }
    }
}
