//! Source-record types consumed by the heatmap pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::time::CalendarDate;

/// Inner value of a computed (formula) property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormulaValue {
    Number { value: Option<f64> },
    String { value: Option<String> },
    Boolean { value: Option<bool> },
    Date { start: String, end: Option<String> },
}

/// One field value on a source record. Exactly one variant is active and
/// consumers match on it exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawProperty {
    Date { start: String, end: Option<String> },
    CreatedTime { timestamp: String },
    LastEditedTime { timestamp: String },
    Formula { value: FormulaValue },
    RichText { plain_text: String },
    Number { value: Option<f64> },
    Select { name: Option<String> },
    MultiSelect { names: Vec<String> },
    Title { plain_text: String },
    /// A property type the pipeline does not interpret (relation, rollup, ...).
    Unsupported { kind: String },
}

impl RawProperty {
    /// Source type name, used in error messages.
    pub fn kind(&self) -> &str {
        match self {
            RawProperty::Date { .. } => "date",
            RawProperty::CreatedTime { .. } => "created_time",
            RawProperty::LastEditedTime { .. } => "last_edited_time",
            RawProperty::Formula { .. } => "formula",
            RawProperty::RichText { .. } => "rich_text",
            RawProperty::Number { .. } => "number",
            RawProperty::Select { .. } => "select",
            RawProperty::MultiSelect { .. } => "multi_select",
            RawProperty::Title { .. } => "title",
            RawProperty::Unsupported { kind } => kind,
        }
    }
}

/// The named properties of one source record (a Notion page).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    pub properties: BTreeMap<String, RawProperty>,
}

impl RawRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, property: RawProperty) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    pub fn property(&self, name: &str) -> Option<&RawProperty> {
        self.properties.get(name)
    }
}

/// Which properties of a record supply the date and the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub date_column: String,
    pub value_column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_value: Option<String>,
}

impl ColumnMapping {
    pub fn new(date_column: impl Into<String>, value_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
            value_column: value_column.into(),
            filter_column: None,
            filter_value: None,
        }
    }

    pub fn with_filter(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter_column = Some(column.into());
        self.filter_value = Some(value.into());
        self
    }

    /// The record filter, present only when both column and value are set.
    pub fn filter(&self) -> Option<(&str, &str)> {
        match (&self.filter_column, &self.filter_value) {
            (Some(column), Some(value)) => Some((column.as_str(), value.as_str())),
            _ => None,
        }
    }
}

/// One extracted observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub date: CalendarDate,
    pub value: f64,
}

impl DataPoint {
    pub fn new(date: CalendarDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Points sorted ascending by date with at most one entry per date.
///
/// Only the aggregator builds these, which is what keeps the invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregatedSeries(Vec<DataPoint>);

impl AggregatedSeries {
    pub(crate) fn from_sorted_unique(points: Vec<DataPoint>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataPoint> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_points(self) -> Vec<DataPoint> {
        self.0
    }

    /// Value recorded for `date`, if any.
    pub fn value_on(&self, date: CalendarDate) -> Option<f64> {
        self.0
            .binary_search_by(|p| p.date.cmp(&date))
            .ok()
            .map(|idx| self.0[idx].value)
    }
}

impl<'a> IntoIterator for &'a AggregatedSeries {
    type Item = &'a DataPoint;
    type IntoIter = std::slice::Iter<'a, DataPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
