#[cfg(test)]
mod tests {
    use crate::models::{ColumnMapping, FormulaValue, RawProperty, RawRecord};
    use crate::services::extractor::{extract, extract_all, parse_leading_float, ExtractionError};

    fn mapping() -> ColumnMapping {
        ColumnMapping::new("Date", "Hours")
    }

    fn date_prop(start: &str, end: Option<&str>) -> RawProperty {
        RawProperty::Date {
            start: start.to_string(),
            end: end.map(str::to_string),
        }
    }

    fn number(value: f64) -> RawProperty {
        RawProperty::Number { value: Some(value) }
    }

    fn text(s: &str) -> RawProperty {
        RawProperty::RichText {
            plain_text: s.to_string(),
        }
    }

    fn record(date: RawProperty, value: RawProperty) -> RawRecord {
        RawRecord::new("page-1")
            .with_property("Date", date)
            .with_property("Hours", value)
    }

    #[test]
    fn test_date_and_number() {
        let point = extract(&record(date_prop("2024-01-05", None), number(2.0)), &mapping())
            .unwrap()
            .unwrap();
        assert_eq!(point.date.to_string(), "2024-01-05");
        assert_eq!(point.value, 2.0);
    }

    #[test]
    fn test_date_time_is_truncated() {
        let point = extract(
            &record(date_prop("2024-01-05T22:15:00.000+09:00", None), number(1.0)),
            &mapping(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(point.date.to_string(), "2024-01-05");
    }

    #[test]
    fn test_created_and_edited_time() {
        let created = RawProperty::CreatedTime {
            timestamp: "2023-11-02T08:00:00.000Z".to_string(),
        };
        let edited = RawProperty::LastEditedTime {
            timestamp: "2023-11-03T08:00:00.000Z".to_string(),
        };
        let a = extract(&record(created, number(1.0)), &mapping()).unwrap().unwrap();
        let b = extract(&record(edited, number(1.0)), &mapping()).unwrap().unwrap();
        assert_eq!(a.date.to_string(), "2023-11-02");
        assert_eq!(b.date.to_string(), "2023-11-03");
    }

    #[test]
    fn test_formula_date_on_date_column() {
        let prop = RawProperty::Formula {
            value: FormulaValue::Date {
                start: "2024-04-01".to_string(),
                end: None,
            },
        };
        let point = extract(&record(prop, number(3.0)), &mapping()).unwrap().unwrap();
        assert_eq!(point.date.to_string(), "2024-04-01");
    }

    #[test]
    fn test_rich_text_date() {
        let point = extract(&record(text("March 3, 2024"), number(1.0)), &mapping())
            .unwrap()
            .unwrap();
        assert_eq!(point.date.to_string(), "2024-03-03");
    }

    #[test]
    fn test_rich_text_unparseable_date() {
        let err = extract(&record(text("not a date"), number(1.0)), &mapping()).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::UnparseableDate { ref text, .. } if text == "not a date"
        ));
    }

    #[test]
    fn test_unsupported_date_type() {
        let err = extract(&record(number(5.0), number(1.0)), &mapping()).unwrap_err();
        match err {
            ExtractionError::UnsupportedDateType { kind, column, .. } => {
                assert_eq!(kind, "number");
                assert_eq!(column, "Date");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_columns() {
        let only_date = RawRecord::new("p").with_property("Date", date_prop("2024-01-01", None));
        let err = extract(&only_date, &mapping()).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::MissingColumn {
                record_id: "p".to_string(),
                column: "Hours".to_string()
            }
        );

        let only_value = RawRecord::new("q").with_property("Hours", number(1.0));
        assert!(matches!(
            extract(&only_value, &mapping()),
            Err(ExtractionError::MissingColumn { ref column, .. }) if column == "Date"
        ));
    }

    #[test]
    fn test_number_without_value_is_zero() {
        let point = extract(
            &record(date_prop("2024-01-01", None), RawProperty::Number { value: None }),
            &mapping(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(point.value, 0.0);
    }

    #[test]
    fn test_formula_number_value() {
        let prop = RawProperty::Formula {
            value: FormulaValue::Number { value: Some(1.75) },
        };
        let point = extract(&record(date_prop("2024-01-01", None), prop), &mapping())
            .unwrap()
            .unwrap();
        assert_eq!(point.value, 1.75);
    }

    #[test]
    fn test_formula_string_value_is_zero() {
        let prop = RawProperty::Formula {
            value: FormulaValue::String {
                value: Some("12".to_string()),
            },
        };
        let point = extract(&record(date_prop("2024-01-01", None), prop), &mapping())
            .unwrap()
            .unwrap();
        assert_eq!(point.value, 0.0);
    }

    #[test]
    fn test_rich_text_value_is_lenient() {
        let cases = [("2.5", 2.5), ("3h", 3.0), ("  -1.5e1 min", -15.0), ("abc", 0.0), ("", 0.0)];
        for (input, expected) in cases {
            let point = extract(&record(date_prop("2024-01-01", None), text(input)), &mapping())
                .unwrap()
                .unwrap();
            assert_eq!(point.value, expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_date_range_value_is_duration_in_hours() {
        let value = date_prop("2024-01-01T09:00", Some("2024-01-01T11:30"));
        let point = extract(&record(date_prop("2024-01-01", None), value), &mapping())
            .unwrap()
            .unwrap();
        assert!((point.value - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_date_value_without_end_is_zero() {
        let value = date_prop("2024-01-01T09:00", None);
        let point = extract(&record(date_prop("2024-01-01", None), value), &mapping())
            .unwrap()
            .unwrap();
        assert_eq!(point.value, 0.0);
    }

    #[test]
    fn test_select_value_is_zero() {
        let value = RawProperty::Select {
            name: Some("Deep work".to_string()),
        };
        let point = extract(&record(date_prop("2024-01-01", None), value), &mapping())
            .unwrap()
            .unwrap();
        assert_eq!(point.value, 0.0);
    }

    #[test]
    fn test_unsupported_value_type() {
        let value = RawProperty::Unsupported {
            kind: "relation".to_string(),
        };
        let err = extract(&record(date_prop("2024-01-01", None), value), &mapping()).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::UnsupportedValueType { ref kind, .. } if kind == "relation"
        ));
    }

    #[test]
    fn test_filter_select_match_and_reject() {
        let mapping = mapping().with_filter("Activity", "Reading");
        let base = record(date_prop("2024-01-01", None), number(1.0));

        let reading = base.clone().with_property(
            "Activity",
            RawProperty::Select {
                name: Some("Reading".to_string()),
            },
        );
        assert!(extract(&reading, &mapping).unwrap().is_some());

        let running = base.clone().with_property(
            "Activity",
            RawProperty::Select {
                name: Some("Running".to_string()),
            },
        );
        assert_eq!(extract(&running, &mapping).unwrap(), None);

        // No filter property at all: rejected, not an error.
        assert_eq!(extract(&base, &mapping).unwrap(), None);
    }

    #[test]
    fn test_filter_multi_select_membership() {
        let mapping = mapping().with_filter("Tags", "focus");
        let rec = record(date_prop("2024-01-01", None), number(1.0)).with_property(
            "Tags",
            RawProperty::MultiSelect {
                names: vec!["work".to_string(), "focus".to_string()],
            },
        );
        assert!(extract(&rec, &mapping).unwrap().is_some());
    }

    #[test]
    fn test_filter_title_exact_match() {
        let mapping = mapping().with_filter("Name", "Gym");
        let rec = record(date_prop("2024-01-01", None), number(1.0)).with_property(
            "Name",
            RawProperty::Title {
                plain_text: "Gym session".to_string(),
            },
        );
        assert_eq!(extract(&rec, &mapping).unwrap(), None);
    }

    #[test]
    fn test_filter_requires_both_fields() {
        let mut mapping = mapping();
        mapping.filter_column = Some("Activity".to_string());
        let rec = record(date_prop("2024-01-01", None), number(1.0));
        assert!(extract(&rec, &mapping).unwrap().is_some());
    }

    #[test]
    fn test_extract_all_skips_bad_records() {
        let records = vec![
            record(date_prop("2024-01-01", None), number(1.0)),
            record(text("not a date"), number(2.0)),
            RawRecord::new("empty"),
            record(date_prop("2024-01-02", None), number(3.0)),
        ];
        let batch = extract_all(&records, &mapping());
        assert_eq!(batch.points.len(), 2);
        assert_eq!(batch.skipped, 2);
        assert_eq!(batch.points[1].value, 3.0);
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("42"), Some(42.0));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float("x1"), None);
    }
}
