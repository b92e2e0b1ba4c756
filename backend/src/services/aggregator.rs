use std::collections::BTreeMap;

use crate::models::{AggregatedSeries, CalendarDate, DataPoint};

/// Sum values per calendar day and sort ascending by date.
pub fn aggregate<I>(points: I) -> AggregatedSeries
where
    I: IntoIterator<Item = DataPoint>,
{
    let mut by_date: BTreeMap<CalendarDate, f64> = BTreeMap::new();
    for point in points {
        *by_date.entry(point.date).or_insert(0.0) += point.value;
    }

    AggregatedSeries::from_sorted_unique(
        by_date
            .into_iter()
            .map(|(date, value)| DataPoint::new(date, value))
            .collect(),
    )
}
