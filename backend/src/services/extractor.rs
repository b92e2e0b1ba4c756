//! Turns one source record into a dated value.
//!
//! The date column and value column are interpreted according to the
//! property variant the source delivered. Per-record failures are typed so
//! the batch layer can skip a bad record without aborting the heatmap.

use log::debug;

use crate::models::{ColumnMapping, DataPoint, FormulaValue, RawProperty, RawRecord, Timestamp};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractionError {
    #[error("record {record_id} has no property named '{column}'")]
    MissingColumn { record_id: String, column: String },

    #[error("record {record_id}: '{column}' is a {kind} property, which cannot supply a date")]
    UnsupportedDateType {
        record_id: String,
        column: String,
        kind: String,
    },

    #[error("record {record_id}: '{column}' is a {kind} property, which cannot supply a value")]
    UnsupportedValueType {
        record_id: String,
        column: String,
        kind: String,
    },

    #[error("record {record_id}: could not parse '{text}' as a date")]
    UnparseableDate { record_id: String, text: String },
}

/// Outcome of extracting a whole batch of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionBatch {
    pub points: Vec<DataPoint>,
    /// Records dropped because of an [`ExtractionError`]. Filtered-out records are not counted.
    pub skipped: usize,
}

/// Extract a `(date, value)` pair from `record`.
///
/// Returns `Ok(None)` when the mapping's filter rejects the record.
pub fn extract(
    record: &RawRecord,
    mapping: &ColumnMapping,
) -> Result<Option<DataPoint>, ExtractionError> {
    if let Some((column, expected)) = mapping.filter() {
        let matches = record
            .property(column)
            .is_some_and(|prop| filter_matches(prop, expected));
        if !matches {
            return Ok(None);
        }
    }

    let date_prop = lookup(record, &mapping.date_column)?;
    let value_prop = lookup(record, &mapping.value_column)?;

    let date = resolve_date(record, &mapping.date_column, date_prop)?;
    let value = resolve_value(record, &mapping.value_column, value_prop)?;

    Ok(Some(DataPoint::new(date.calendar_date(), value)))
}

/// Extract every record, dropping the ones that fail.
pub fn extract_all<'a, I>(records: I, mapping: &ColumnMapping) -> ExtractionBatch
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut batch = ExtractionBatch::default();
    for record in records {
        match extract(record, mapping) {
            Ok(Some(point)) => batch.points.push(point),
            Ok(None) => {}
            Err(e) => {
                debug!("Skipping record: {}", e);
                batch.skipped += 1;
            }
        }
    }
    batch
}

fn lookup<'r>(record: &'r RawRecord, column: &str) -> Result<&'r RawProperty, ExtractionError> {
    record
        .property(column)
        .ok_or_else(|| ExtractionError::MissingColumn {
            record_id: record.id.clone(),
            column: column.to_string(),
        })
}

fn parse_date_text(record: &RawRecord, text: &str) -> Result<Timestamp, ExtractionError> {
    Timestamp::parse_lenient(text).ok_or_else(|| ExtractionError::UnparseableDate {
        record_id: record.id.clone(),
        text: text.to_string(),
    })
}

fn resolve_date(
    record: &RawRecord,
    column: &str,
    prop: &RawProperty,
) -> Result<Timestamp, ExtractionError> {
    match prop {
        RawProperty::Date { start, .. }
        | RawProperty::Formula {
            value: FormulaValue::Date { start, .. },
        } => Timestamp::parse(start).ok_or_else(|| ExtractionError::UnparseableDate {
            record_id: record.id.clone(),
            text: start.clone(),
        }),
        RawProperty::CreatedTime { timestamp } | RawProperty::LastEditedTime { timestamp } => {
            Timestamp::parse(timestamp).ok_or_else(|| ExtractionError::UnparseableDate {
                record_id: record.id.clone(),
                text: timestamp.clone(),
            })
        }
        RawProperty::RichText { plain_text } => parse_date_text(record, plain_text),
        RawProperty::Formula { .. }
        | RawProperty::Number { .. }
        | RawProperty::Select { .. }
        | RawProperty::MultiSelect { .. }
        | RawProperty::Title { .. }
        | RawProperty::Unsupported { .. } => Err(ExtractionError::UnsupportedDateType {
            record_id: record.id.clone(),
            column: column.to_string(),
            kind: prop.kind().to_string(),
        }),
    }
}

fn resolve_value(
    record: &RawRecord,
    column: &str,
    prop: &RawProperty,
) -> Result<f64, ExtractionError> {
    let value = match prop {
        RawProperty::Number { value } => value.unwrap_or(0.0),
        RawProperty::Formula {
            value: FormulaValue::Number { value },
        } => value.unwrap_or(0.0),
        RawProperty::RichText { plain_text } => parse_leading_float(plain_text).unwrap_or(0.0),
        RawProperty::Date { start, end } => duration_hours(start, end.as_deref()),
        RawProperty::Formula { .. }
        | RawProperty::CreatedTime { .. }
        | RawProperty::LastEditedTime { .. }
        | RawProperty::Select { .. }
        | RawProperty::MultiSelect { .. }
        | RawProperty::Title { .. } => 0.0,
        RawProperty::Unsupported { kind } => {
            return Err(ExtractionError::UnsupportedValueType {
                record_id: record.id.clone(),
                column: column.to_string(),
                kind: kind.clone(),
            })
        }
    };

    Ok(if value.is_finite() { value } else { 0.0 })
}

/// Hours between the start and end of a date range; 0 without an end.
fn duration_hours(start: &str, end: Option<&str>) -> f64 {
    let Some(start) = Timestamp::parse(start) else {
        return 0.0;
    };
    match end.and_then(Timestamp::parse) {
        Some(end) => start.hours_until(&end),
        None => 0.0,
    }
}

/// Parse the longest numeric prefix of `text`: `"2.5h"` → 2.5, `"abc"` → `None`.
pub(crate) fn parse_leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    // Exponent only counts when followed by at least one digit.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}

fn filter_matches(prop: &RawProperty, expected: &str) -> bool {
    match prop {
        RawProperty::Title { plain_text } | RawProperty::RichText { plain_text } => {
            plain_text == expected
        }
        RawProperty::Select { name } => name.as_deref() == Some(expected),
        RawProperty::MultiSelect { names } => names.iter().any(|n| n == expected),
        RawProperty::Formula {
            value: FormulaValue::String { value },
        } => value.as_deref() == Some(expected),
        _ => false,
    }
}
