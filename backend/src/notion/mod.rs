//! Notion as a data source for heatmaps.
//!
//! [`NotionDataSource`] is the seam the HTTP layer depends on;
//! [`NotionClient`] implements it over the public REST API and tests swap in
//! their own implementation.

pub mod client;
pub mod error;
pub mod wire;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::RawRecord;

pub use client::NotionClient;
pub use error::NotionError;

/// One column of a Notion database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    pub name: String,
    /// Notion property type, e.g. `date`, `number`, `rich_text`.
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    pub id: String,
    pub title: String,
    /// Columns sorted by name.
    pub properties: Vec<PropertySchema>,
}

/// Result of redeeming an OAuth authorization code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub workspace_name: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
}

/// Read access to Notion databases plus the OAuth code exchange.
#[async_trait]
pub trait NotionDataSource: Send + Sync {
    /// Every page of `database_id`, following pagination to the end.
    async fn query_database(
        &self,
        token: &str,
        database_id: &str,
    ) -> Result<Vec<RawRecord>, NotionError>;

    async fn retrieve_database(
        &self,
        token: &str,
        database_id: &str,
    ) -> Result<DatabaseSchema, NotionError>;

    async fn exchange_code(&self, code: &str, redirect_uri: &str)
        -> Result<OAuthToken, NotionError>;
}
