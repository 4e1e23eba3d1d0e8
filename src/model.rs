use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A database row as returned by the query endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

impl Record {
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichTextRun>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichTextRun>,
    },
    Select {
        select: Option<SelectOption>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    Date {
        date: Option<DateValue>,
    },
    CreatedTime {
        created_time: Option<String>,
    },
    #[serde(other)]
    Unsupported,
}

impl PropertyValue {
    /// First text run of a title or rich-text property, when it carries any text.
    pub fn first_text(&self) -> Option<&str> {
        let runs = match self {
            PropertyValue::Title { title } => title,
            PropertyValue::RichText { rich_text } => rich_text,
            _ => return None,
        };
        runs.first()
            .map(|run| run.plain_text.as_str())
            .filter(|text| !text.is_empty())
    }

    pub fn select_name(&self) -> Option<&str> {
        match self {
            PropertyValue::Select {
                select: Some(option),
            } if !option.name.is_empty() => Some(option.name.as_str()),
            _ => None,
        }
    }

    pub fn multi_select_names(&self) -> Vec<&str> {
        match self {
            PropertyValue::MultiSelect { multi_select } => multi_select
                .iter()
                .map(|option| option.name.as_str())
                .filter(|name| !name.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Raw date text of a date (its `start`) or created-time property.
    pub fn date_text(&self) -> Option<&str> {
        let text = match self {
            PropertyValue::Date { date: Some(date) } => Some(date.start.as_str()),
            PropertyValue::CreatedTime {
                created_time: Some(stamp),
            } => Some(stamp.as_str()),
            _ => None,
        };
        text.filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RichTextRun {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateValue {
    pub start: String,
}

/// A block nested directly under a page.
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Block {
    pub fn is_child_database(&self) -> bool {
        self.kind == "child_database"
    }
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// Records of the nested database, split by kind.
#[derive(Debug, Clone, Default)]
pub struct ReportContent {
    pub visits: Vec<Record>,
    pub entries: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportInfo {
    pub date: NaiveDate,
    pub shift: String,
    pub colleagues: Vec<String>,
    pub comments: String,
    pub visits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub yard: String,
    pub state: String,
    pub observations: String,
    pub important: String,
}

/// Row layout of the entries CSV export.
#[derive(Debug, Serialize)]
pub struct EntryRow<'a> {
    #[serde(rename = "Nombre")]
    pub name: &'a str,
    #[serde(rename = "Patio")]
    pub yard: &'a str,
    #[serde(rename = "Estado")]
    pub state: &'a str,
    #[serde(rename = "Observaciones")]
    pub observations: &'a str,
    #[serde(rename = "Importante")]
    pub important: &'a str,
}

impl<'a> From<&'a Entry> for EntryRow<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self {
            name: &entry.name,
            yard: &entry.yard,
            state: &entry.state,
            observations: &entry.observations,
            important: &entry.important,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_properties_deserialize_by_type() {
        let record: Record = serde_json::from_value(json!({
            "object": "page",
            "id": "p1",
            "properties": {
                "Nombre": {"id": "title", "type": "title", "title": [{"plain_text": "Tom"}]},
                "Patio": {"id": "a", "type": "select", "select": {"id": "x", "name": "1"}},
                "Estado": {"id": "b", "type": "select", "select": null},
                "Compañeros": {"id": "c", "type": "multi_select", "multi_select": [{"name": "Ana"}]},
                "Día": {"id": "d", "type": "date", "date": {"start": "2024-05-10", "end": null}},
                "Foto": {"id": "e", "type": "files", "files": []}
            }
        }))
        .unwrap();

        assert_eq!(record.property("Nombre").unwrap().first_text(), Some("Tom"));
        assert_eq!(record.property("Patio").unwrap().select_name(), Some("1"));
        assert_eq!(record.property("Estado").unwrap().select_name(), None);
        assert_eq!(
            record.property("Compañeros").unwrap().multi_select_names(),
            vec!["Ana"]
        );
        assert_eq!(
            record.property("Día").unwrap().date_text(),
            Some("2024-05-10")
        );
        assert!(matches!(
            record.property("Foto"),
            Some(PropertyValue::Unsupported)
        ));
    }

    #[test]
    fn empty_runs_have_no_text() {
        let value: PropertyValue =
            serde_json::from_value(json!({"type": "rich_text", "rich_text": []})).unwrap();
        assert_eq!(value.first_text(), None);
        assert_eq!(value.select_name(), None);
    }

    #[test]
    fn list_response_without_cursor() {
        let page: ListResponse<Block> = serde_json::from_value(json!({
            "object": "list",
            "results": [{"id": "b1", "type": "child_database"}, {"id": "b2", "type": "paragraph"}],
            "has_more": false,
            "next_cursor": null
        }))
        .unwrap();
        assert_eq!(page.results.len(), 2);
        assert!(page.results[0].is_child_database());
        assert!(!page.results[1].is_child_database());
        assert!(page.next_cursor.is_none());
    }
}
