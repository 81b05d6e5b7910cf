//! Notion REST client for the synced database.
//!
//! Uses the public API: https://developers.notion.com/reference

use reelsync_core::{NormalizedRecord, PendingEntry};
use serde_json::{Value, json};
use tracing::debug;

use crate::NotionError;
use crate::properties::PropertySchema;
use crate::store::{PageStore, TitleFilter};

const BASE_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 100;

pub struct NotionClient {
    api_key: String,
    database_id: String,
    schema: PropertySchema,
    client: reqwest::Client,
}

impl NotionClient {
    pub fn new(api_key: String, database_id: String, schema: PropertySchema) -> Self {
        Self {
            api_key,
            database_id,
            schema,
            client: reqwest::Client::new(),
        }
    }

    async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &Value,
    ) -> Result<Value, NotionError> {
        let url = format!("{BASE_URL}{path}");
        debug!(method = %method, url = %url, "Notion request");

        let resp = self
            .client
            .request(method, &url)
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| NotionError::Network(e.to_string()))?;

        let status = resp.status();
        let data: Result<Value, _> = resp.json().await;

        match data {
            Ok(data) if status.is_success() => Ok(data),
            Ok(data) => Err(api_error(status.as_u16(), &data)),
            Err(e) if status.is_success() => {
                Err(NotionError::Malformed(format!("parse JSON: {e}")))
            }
            Err(_) => Err(api_error(status.as_u16(), &Value::Null)),
        }
    }

    async fn patch_page(&self, page_id: &str, body: Value) -> Result<(), NotionError> {
        self.send_json(reqwest::Method::PATCH, &format!("/pages/{page_id}"), &body)
            .await
            .map(|_| ())
    }
}

#[async_trait::async_trait]
impl PageStore for NotionClient {
    async fn query(&self, filter: &TitleFilter) -> Result<Vec<PendingEntry>, NotionError> {
        let path = format!("/databases/{}/query", self.database_id);
        let mut entries = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({
                "filter": filter.to_json(self.schema.title_property()),
                "page_size": PAGE_SIZE,
            });
            if let Some(ref c) = cursor {
                body["start_cursor"] = json!(c);
            }

            let data = self.send_json(reqwest::Method::POST, &path, &body).await?;
            let (page, next) = parse_query_page(&data, self.schema.title_property())?;
            entries.extend(page);

            match next {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }

        debug!(count = entries.len(), "Notion query complete");
        Ok(entries)
    }

    async fn update_properties(
        &self,
        page_id: &str,
        record: &NormalizedRecord,
    ) -> Result<(), NotionError> {
        let properties = self.schema.encode(record);
        self.patch_page(page_id, json!({ "properties": properties }))
            .await
    }

    async fn set_icon(&self, page_id: &str, url: &str) -> Result<(), NotionError> {
        self.patch_page(page_id, json!({ "icon": external_file(url) }))
            .await
    }

    async fn set_cover(&self, page_id: &str, url: &str) -> Result<(), NotionError> {
        self.patch_page(page_id, json!({ "cover": external_file(url) }))
            .await
    }
}

fn external_file(url: &str) -> Value {
    json!({ "type": "external", "external": { "url": url } })
}

fn api_error(status: u16, data: &Value) -> NotionError {
    NotionError::Api {
        status,
        code: data["code"].as_str().unwrap_or("unknown").to_string(),
        message: data["message"].as_str().unwrap_or_default().to_string(),
    }
}

/// Parse one page of a database query.
///
/// Returns the entries and the cursor for the next page, if any. Pages
/// without an id are an error; pages without a title are skipped.
pub fn parse_query_page(
    data: &Value,
    title_property: &str,
) -> Result<(Vec<PendingEntry>, Option<String>), NotionError> {
    let results = data["results"]
        .as_array()
        .ok_or_else(|| NotionError::Malformed("query response has no results".into()))?;

    let mut entries = Vec::with_capacity(results.len());
    for page in results {
        let page_id = page["id"]
            .as_str()
            .ok_or_else(|| NotionError::Malformed("page without id".into()))?;
        let title = plain_title(&page["properties"][title_property]);
        if title.is_empty() {
            continue;
        }
        entries.push(PendingEntry::new(page_id, title));
    }

    let next = if data["has_more"].as_bool() == Some(true) {
        data["next_cursor"].as_str().map(str::to_string)
    } else {
        None
    };

    Ok((entries, next))
}

fn plain_title(property: &Value) -> String {
    property["title"]
        .as_array()
        .map(|segments| {
            segments
                .iter()
                .filter_map(|s| {
                    s["plain_text"]
                        .as_str()
                        .or_else(|| s["text"]["content"].as_str())
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: &str, segments: &[&str]) -> Value {
        let title: Vec<Value> = segments
            .iter()
            .map(|s| json!({ "type": "text", "text": { "content": s }, "plain_text": s }))
            .collect();
        json!({
            "object": "page",
            "id": id,
            "properties": { "Title": { "id": "title", "type": "title", "title": title } }
        })
    }

    #[test]
    fn parses_entries_and_cursor() {
        let data = json!({
            "object": "list",
            "results": [page("p1", &["Heat;"]), page("p2", &["The ", "Thing;"])],
            "has_more": true,
            "next_cursor": "cursor-2"
        });

        let (entries, next) = parse_query_page(&data, "Title").unwrap();
        assert_eq!(
            entries,
            vec![
                PendingEntry::new("p1", "Heat;"),
                PendingEntry::new("p2", "The Thing;")
            ]
        );
        assert_eq!(next.as_deref(), Some("cursor-2"));
    }

    #[test]
    fn last_page_has_no_cursor() {
        let data = json!({
            "results": [page("p1", &["Heat;"])],
            "has_more": false,
            "next_cursor": null
        });

        let (_, next) = parse_query_page(&data, "Title").unwrap();
        assert!(next.is_none());
    }

    #[test]
    fn untitled_pages_are_skipped() {
        let data = json!({ "results": [page("p1", &[])], "has_more": false });
        let (entries, _) = parse_query_page(&data, "Title").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn missing_results_is_malformed() {
        let err = parse_query_page(&json!({ "object": "error" }), "Title").unwrap_err();
        assert!(matches!(err, NotionError::Malformed(_)));
    }

    #[test]
    fn api_error_carries_code_and_message() {
        let err = api_error(
            400,
            &json!({ "object": "error", "code": "validation_error", "message": "bad select" }),
        );
        assert_eq!(
            err.to_string(),
            "notion API error 400 (validation_error): bad select"
        );
    }
}
