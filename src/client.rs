use crate::config::Config;
use crate::error::{ReportError, ReportResult, TransportError};
use crate::model::{Block, ListResponse, Record};
use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value as JsonValue, json};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Property the top-level database is filtered on when looking a day up.
pub const DATE_PROPERTY: &str = "Día";

/// Read access to a document database. The locator only talks to this trait.
pub trait RemoteStore {
    /// Records of `collection_id` created on `date`. A single request, no pagination.
    fn query_by_date(&self, collection_id: &str, date: NaiveDate) -> ReportResult<Vec<Record>>;

    /// Blocks nested directly under `record_id`.
    fn fetch_children(&self, record_id: &str) -> ReportResult<Vec<Block>>;

    /// Every record of `collection_id`, following the cursor until the last page.
    fn query_all(&self, collection_id: &str) -> ReportResult<Vec<Record>>;
}

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_size: Option<u32>,
}

pub struct NotionClient {
    client: Client,
    base_url: String,
    api_token: String,
    notion_version: String,
    page_size: u32,
}

impl NotionClient {
    pub fn try_new(config: &Config) -> ReportResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| ReportError::config(format!("cannot build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            notion_version: config.notion_version.clone(),
            page_size: config.page_size,
        })
    }

    fn query_url(&self, collection_id: &str) -> String {
        format!("{}/v1/databases/{}/query", self.base_url, collection_id)
    }

    fn children_url(&self, record_id: &str) -> String {
        format!("{}/v1/blocks/{}/children", self.base_url, record_id)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.api_token)
            .header("Notion-Version", &self.notion_version)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ReportResult<T> {
        let response = self.authorized(request).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json()?);
        }

        let body: JsonValue = response.json().unwrap_or(JsonValue::Null);
        let code = body
            .get("code")
            .and_then(JsonValue::as_str)
            .unwrap_or("unknown")
            .to_string();
        let message = body
            .get("message")
            .and_then(JsonValue::as_str)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"))
            .to_string();
        warn!(
            target: "parte::client",
            status = status.as_u16(),
            %code,
            %message,
            "remote service returned an error"
        );
        Err(TransportError::Api {
            status: status.as_u16(),
            code,
            message,
        }
        .into())
    }

    fn query_page(
        &self,
        collection_id: &str,
        filter: Option<JsonValue>,
        cursor: Option<&str>,
    ) -> ReportResult<ListResponse<Record>> {
        let body = QueryBody {
            filter,
            start_cursor: cursor,
            page_size: Some(self.page_size),
        };
        debug!(target: "parte::client", %collection_id, cursor = ?cursor, "querying database");
        self.send(self.client.post(self.query_url(collection_id)).json(&body))
    }

    fn children_page(
        &self,
        record_id: &str,
        cursor: Option<&str>,
    ) -> ReportResult<ListResponse<Block>> {
        let mut request = self
            .client
            .get(self.children_url(record_id))
            .query(&[("page_size", self.page_size.to_string())]);
        if let Some(cursor) = cursor {
            request = request.query(&[("start_cursor", cursor)]);
        }
        debug!(target: "parte::client", %record_id, cursor = ?cursor, "fetching children");
        self.send(request)
    }
}

/// Walks a cursor-paginated listing, concatenating pages in the order received.
pub fn collect_pages<T, F>(mut fetch: F) -> ReportResult<Vec<T>>
where
    F: FnMut(Option<&str>) -> ReportResult<ListResponse<T>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut seen: HashSet<String> = HashSet::new();
    let mut pages = 0usize;
    loop {
        let page = fetch(cursor.as_deref())?;
        pages += 1;
        items.extend(page.results);
        if !page.has_more {
            break;
        }
        match page.next_cursor {
            Some(next) if seen.insert(next.clone()) => cursor = Some(next),
            Some(_) => {
                return Err(TransportError::InvalidResponse(
                    "pagination cursor repeated".to_string(),
                )
                .into());
            }
            None => {
                return Err(TransportError::InvalidResponse(
                    "has_more is set but next_cursor is missing".to_string(),
                )
                .into());
            }
        }
    }
    debug!(target: "parte::client", pages, items = items.len(), "pagination finished");
    Ok(items)
}

pub fn date_filter(date: NaiveDate) -> JsonValue {
    json!({
        "property": DATE_PROPERTY,
        "created_time": { "equals": date.format("%Y-%m-%d").to_string() }
    })
}

impl RemoteStore for NotionClient {
    fn query_by_date(&self, collection_id: &str, date: NaiveDate) -> ReportResult<Vec<Record>> {
        let body = QueryBody {
            filter: Some(date_filter(date)),
            start_cursor: None,
            page_size: None,
        };
        debug!(target: "parte::client", %collection_id, %date, "querying database by date");
        let page: ListResponse<Record> =
            self.send(self.client.post(self.query_url(collection_id)).json(&body))?;
        Ok(page.results)
    }

    fn fetch_children(&self, record_id: &str) -> ReportResult<Vec<Block>> {
        collect_pages(|cursor| self.children_page(record_id, cursor))
    }

    fn query_all(&self, collection_id: &str) -> ReportResult<Vec<Record>> {
        collect_pages(|cursor| self.query_page(collection_id, None, cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(ids: &[u32], next: Option<&str>) -> ListResponse<u32> {
        ListResponse {
            results: ids.to_vec(),
            has_more: next.is_some(),
            next_cursor: next.map(str::to_string),
        }
    }

    #[test]
    fn collect_pages_follows_cursor_in_order() {
        let mut seen = Vec::new();
        let items = collect_pages(|cursor| {
            seen.push(cursor.map(str::to_string));
            Ok(match cursor {
                None => page(&[1, 2], Some("c1")),
                Some("c1") => page(&[3, 4], Some("c2")),
                _ => page(&[5], None),
            })
        })
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            seen,
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[test]
    fn collect_pages_rejects_missing_cursor() {
        let err = collect_pages(|_| {
            Ok(ListResponse::<u32> {
                results: vec![1],
                has_more: true,
                next_cursor: None,
            })
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ReportError::Transport(TransportError::InvalidResponse(_))
        ));
    }

    #[test]
    fn collect_pages_rejects_stuck_cursor() {
        let err = collect_pages(|_| Ok(page(&[1], Some("same")))).unwrap_err();
        assert!(matches!(
            err,
            ReportError::Transport(TransportError::InvalidResponse(_))
        ));
    }

    #[test]
    fn collect_pages_rejects_cycling_cursors() {
        let mut calls = 0;
        let err = collect_pages(|cursor| {
            calls += 1;
            Ok(match cursor {
                Some("c1") => page(&[2], Some("c2")),
                _ => page(&[1], Some("c1")),
            })
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ReportError::Transport(TransportError::InvalidResponse(ref msg)) if msg.contains("repeated")
        ));
        assert_eq!(calls, 3);
    }

    #[test]
    fn date_filter_uses_iso_date() {
        let filter = date_filter(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert_eq!(
            filter,
            json!({"property": "Día", "created_time": {"equals": "2024-05-10"}})
        );
    }
}
