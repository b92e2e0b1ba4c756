//! reqwest-backed Notion API client.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::error::NotionError;
use super::wire::{self, ApiErrorBody, DatabaseObject, QueryResponse};
use super::{DatabaseSchema, NotionDataSource, OAuthToken, PropertySchema};
use crate::models::RawRecord;
use crate::services::oauth::OAuthSettings;

pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
/// Largest page size the query endpoint accepts.
pub const PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct NotionClient {
    http: Client,
    api_base: String,
    version: String,
    oauth: Option<OAuthSettings>,
}

impl NotionClient {
    pub fn new(api_base: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            version: version.into(),
            oauth: None,
        }
    }

    pub fn with_oauth(mut self, oauth: Option<OAuthSettings>) -> Self {
        self.oauth = oauth;
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, NotionError> {
        let response = request.header("Notion-Version", &self.version).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body: ApiErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
            warn!(
                "Notion returned {}: {} {}",
                status.as_u16(),
                body.code,
                body.message
            );
            return Err(NotionError::Api {
                status: status.as_u16(),
                code: if body.code.is_empty() {
                    "unknown".to_string()
                } else {
                    body.code
                },
                message: body.message,
            });
        }

        wire::decode(&bytes)
    }
}

impl Default for NotionClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, DEFAULT_NOTION_VERSION)
    }
}

#[async_trait]
impl NotionDataSource for NotionClient {
    async fn query_database(
        &self,
        token: &str,
        database_id: &str,
    ) -> Result<Vec<RawRecord>, NotionError> {
        let url = self.url(&format!("databases/{}/query", database_id));
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "page_size": PAGE_SIZE });
            if let Some(ref c) = cursor {
                body["start_cursor"] = json!(c);
            }
            let page: QueryResponse = self
                .send(self.http.post(&url).bearer_auth(token).json(&body))
                .await?;
            records.extend(page.results.into_iter().map(RawRecord::from));

            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        debug!("Fetched {} pages from database {}", records.len(), database_id);
        Ok(records)
    }

    async fn retrieve_database(
        &self,
        token: &str,
        database_id: &str,
    ) -> Result<DatabaseSchema, NotionError> {
        let url = self.url(&format!("databases/{}", database_id));
        let database: DatabaseObject = self.send(self.http.get(&url).bearer_auth(token)).await?;

        Ok(DatabaseSchema {
            id: database.id,
            title: wire::plain_text(&database.title),
            properties: database
                .properties
                .into_iter()
                .map(|(name, schema)| PropertySchema {
                    name,
                    kind: schema.kind,
                })
                .collect(),
        })
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<OAuthToken, NotionError> {
        let oauth = self.oauth.as_ref().ok_or(NotionError::OAuthNotConfigured)?;
        let body = json!({
            "grant_type": "authorization_code",
            "code": code,
            "redirect_uri": redirect_uri,
        });
        let request = self
            .http
            .post(self.url("oauth/token"))
            .basic_auth(&oauth.client_id, Some(&oauth.client_secret))
            .json(&body);
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = NotionClient::new("https://api.notion.com/v1/", DEFAULT_NOTION_VERSION);
        assert_eq!(client.api_base(), "https://api.notion.com/v1");
        assert_eq!(
            client.url("/databases/abc/query"),
            "https://api.notion.com/v1/databases/abc/query"
        );
    }

    #[tokio::test]
    async fn test_exchange_without_oauth_settings() {
        let client = NotionClient::default();
        let err = client.exchange_code("code", "http://localhost/cb").await.unwrap_err();
        assert!(matches!(err, NotionError::OAuthNotConfigured));
    }
}
