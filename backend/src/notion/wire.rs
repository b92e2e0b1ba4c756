//! Notion JSON shapes and their conversion into [`RawProperty`] values.
//!
//! Page properties arrive as `{"type": "<kind>", "<kind>": {...}}`. Each
//! known kind maps to one [`RawProperty`] variant; anything else becomes
//! [`RawProperty::Unsupported`] carrying the kind name.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::error::NotionError;
use crate::models::{FormulaValue, RawProperty, RawRecord};

/// Body of `POST /databases/{id}/query`.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    pub results: Vec<PageObject>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageObject {
    pub id: String,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

impl From<PageObject> for RawRecord {
    fn from(page: PageObject) -> Self {
        RawRecord {
            id: page.id,
            properties: page
                .properties
                .iter()
                .map(|(name, value)| (name.clone(), property_from_json(value)))
                .collect(),
        }
    }
}

/// Body of `GET /databases/{id}`.
#[derive(Debug, Deserialize)]
pub(crate) struct DatabaseObject {
    pub id: String,
    #[serde(default)]
    pub title: Vec<RichTextSegment>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchemaObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PropertySchemaObject {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RichTextSegment {
    #[serde(default)]
    pub plain_text: String,
}

/// Error body Notion sends with 4xx/5xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Decode `bytes` as `T`, reporting the JSON path of the first mismatch.
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, NotionError> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut de).map_err(|e| NotionError::Decode {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

pub(crate) fn plain_text(segments: &[RichTextSegment]) -> String {
    segments.iter().map(|s| s.plain_text.as_str()).collect()
}

fn text_of(value: &Value) -> String {
    value
        .as_array()
        .map(|segments| {
            segments
                .iter()
                .filter_map(|s| s["plain_text"].as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn string_of(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// `(start, end)` of a Notion date object. A null date has an empty start.
fn date_range(value: &Value) -> (String, Option<String>) {
    (
        value["start"].as_str().unwrap_or_default().to_string(),
        string_of(&value["end"]),
    )
}

fn formula_from_json(value: &Value) -> Option<FormulaValue> {
    let formula = match value["type"].as_str()? {
        "number" => FormulaValue::Number {
            value: value["number"].as_f64(),
        },
        "string" => FormulaValue::String {
            value: string_of(&value["string"]),
        },
        "boolean" => FormulaValue::Boolean {
            value: value["boolean"].as_bool(),
        },
        "date" => {
            let (start, end) = date_range(&value["date"]);
            FormulaValue::Date { start, end }
        }
        _ => return None,
    };
    Some(formula)
}

/// Convert one page-property object into a [`RawProperty`].
pub fn property_from_json(value: &Value) -> RawProperty {
    let kind = value["type"].as_str().unwrap_or("unknown");
    match kind {
        "date" => {
            let (start, end) = date_range(&value["date"]);
            RawProperty::Date { start, end }
        }
        "created_time" => RawProperty::CreatedTime {
            timestamp: string_of(&value["created_time"]).unwrap_or_default(),
        },
        "last_edited_time" => RawProperty::LastEditedTime {
            timestamp: string_of(&value["last_edited_time"]).unwrap_or_default(),
        },
        "formula" => match formula_from_json(&value["formula"]) {
            Some(formula) => RawProperty::Formula { value: formula },
            None => RawProperty::Unsupported {
                kind: "formula".to_string(),
            },
        },
        "rich_text" => RawProperty::RichText {
            plain_text: text_of(&value["rich_text"]),
        },
        "title" => RawProperty::Title {
            plain_text: text_of(&value["title"]),
        },
        "number" => RawProperty::Number {
            value: value["number"].as_f64(),
        },
        // Status columns carry the same `{name}` payload as selects.
        "select" | "status" => RawProperty::Select {
            name: string_of(&value[kind]["name"]),
        },
        "multi_select" => RawProperty::MultiSelect {
            names: value["multi_select"]
                .as_array()
                .map(|options| {
                    options
                        .iter()
                        .filter_map(|o| string_of(&o["name"]))
                        .collect()
                })
                .unwrap_or_default(),
        },
        other => RawProperty::Unsupported {
            kind: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_date_property() {
        let prop = property_from_json(&json!({
            "id": "a", "type": "date",
            "date": {
                "start": "2024-01-01T09:00:00.000+01:00",
                "end": "2024-01-01T11:30:00.000+01:00"
            }
        }));
        assert_eq!(
            prop,
            RawProperty::Date {
                start: "2024-01-01T09:00:00.000+01:00".to_string(),
                end: Some("2024-01-01T11:30:00.000+01:00".to_string()),
            }
        );
    }

    #[test]
    fn test_null_date_has_empty_start() {
        let prop = property_from_json(&json!({"type": "date", "date": null}));
        assert_eq!(
            prop,
            RawProperty::Date {
                start: String::new(),
                end: None
            }
        );
    }

    #[test]
    fn test_rich_text_concatenates_segments() {
        let prop = property_from_json(&json!({
            "type": "rich_text",
            "rich_text": [{"plain_text": "2."}, {"plain_text": "5h"}]
        }));
        assert_eq!(
            prop,
            RawProperty::RichText {
                plain_text: "2.5h".to_string()
            }
        );
    }

    #[test]
    fn test_formula_variants() {
        let number = property_from_json(&json!({
            "type": "formula", "formula": {"type": "number", "number": 1.5}
        }));
        assert_eq!(
            number,
            RawProperty::Formula {
                value: FormulaValue::Number { value: Some(1.5) }
            }
        );

        let date = property_from_json(&json!({
            "type": "formula",
            "formula": {"type": "date", "date": {"start": "2024-02-02", "end": null}}
        }));
        assert_eq!(
            date,
            RawProperty::Formula {
                value: FormulaValue::Date {
                    start: "2024-02-02".to_string(),
                    end: None
                }
            }
        );
    }

    #[test]
    fn test_select_status_and_multi_select() {
        let select = property_from_json(&json!({"type": "select", "select": {"name": "Reading"}}));
        assert_eq!(
            select,
            RawProperty::Select {
                name: Some("Reading".to_string())
            }
        );
        let empty = property_from_json(&json!({"type": "select", "select": null}));
        assert_eq!(empty, RawProperty::Select { name: None });
        let status = property_from_json(&json!({"type": "status", "status": {"name": "Done"}}));
        assert_eq!(
            status,
            RawProperty::Select {
                name: Some("Done".to_string())
            }
        );
        let multi = property_from_json(&json!({
            "type": "multi_select", "multi_select": [{"name": "a"}, {"name": "b"}]
        }));
        assert_eq!(
            multi,
            RawProperty::MultiSelect {
                names: vec!["a".to_string(), "b".to_string()]
            }
        );
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        let prop = property_from_json(&json!({"type": "relation", "relation": []}));
        assert_eq!(
            prop,
            RawProperty::Unsupported {
                kind: "relation".to_string()
            }
        );
    }

    #[test]
    fn test_decode_query_response() {
        let body = json!({
            "object": "list",
            "results": [{
                "object": "page",
                "id": "page-1",
                "properties": {
                    "Date": {"type": "date", "date": {"start": "2024-03-01", "end": null}},
                    "Hours": {"type": "number", "number": 2}
                }
            }],
            "has_more": true,
            "next_cursor": "cursor-2"
        });
        let parsed: QueryResponse = decode(body.to_string().as_bytes()).unwrap();
        assert!(parsed.has_more);
        assert_eq!(parsed.next_cursor.as_deref(), Some("cursor-2"));
        let record: RawRecord = parsed.results.into_iter().next().unwrap().into();
        assert_eq!(record.id, "page-1");
        assert_eq!(
            record.property("Hours"),
            Some(&RawProperty::Number { value: Some(2.0) })
        );
    }

    #[test]
    fn test_decode_error_reports_path() {
        let body = br#"{"results": [{"id": 5}]}"#;
        let err = decode::<QueryResponse>(body).unwrap_err();
        match err {
            NotionError::Decode { path, .. } => assert_eq!(path, "results[0].id"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
