//! Summary statistics over an aggregated series.

use crate::models::{AggregatedSeries, DerivedStats, Insight, InsightToggles};

/// Compute totals, the active-day average and the population standard
/// deviation of `series`.
///
/// `total_days` counts days with a positive value. The standard deviation
/// runs over every entry, zeros included.
pub fn compute_stats(series: &AggregatedSeries) -> DerivedStats {
    if series.is_empty() {
        return DerivedStats::default();
    }

    let total_time: f64 = series.iter().map(|p| p.value).sum();
    let total_days = series.iter().filter(|p| p.value > 0.0).count();
    let average_time = if total_days == 0 {
        0.0
    } else {
        total_time / total_days as f64
    };

    let n = series.len() as f64;
    let mean = total_time / n;
    let variance = series
        .iter()
        .map(|p| (p.value - mean).powi(2))
        .sum::<f64>()
        / n;

    DerivedStats {
        average_time,
        total_days,
        total_time,
        standard_deviation: variance.sqrt(),
    }
}

impl DerivedStats {
    /// Display rows for the statistics enabled in `toggles`, in a fixed order.
    pub fn insights(&self, toggles: &InsightToggles) -> Vec<Insight> {
        let mut out = Vec::with_capacity(4);
        if toggles.average_time {
            out.push(insight("average_time", "Average time", hours(self.average_time)));
        }
        if toggles.total_days {
            out.push(insight("total_days", "Total days", self.total_days.to_string()));
        }
        if toggles.total_time {
            out.push(insight("total_time", "Total time", hours(self.total_time)));
        }
        if toggles.standard_deviation {
            out.push(insight(
                "standard_deviation",
                "Standard deviation",
                hours(self.standard_deviation),
            ));
        }
        out
    }
}

fn insight(key: &str, label: &str, value: String) -> Insight {
    Insight {
        key: key.to_string(),
        label: label.to_string(),
        value,
    }
}

fn hours(value: f64) -> String {
    format!("{:.1}h", value)
}
