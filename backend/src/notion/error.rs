//! Errors raised while talking to the Notion API.

#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    /// Transport failure: DNS, TLS, connection reset, body read.
    #[error("HTTP error talking to Notion: {0}")]
    Http(#[from] reqwest::Error),

    /// Notion answered with a non-success status.
    #[error("Notion API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("Failed to decode Notion response at '{path}': {message}")]
    Decode { path: String, message: String },

    #[error("Notion OAuth is not configured")]
    OAuthNotConfigured,
}

impl NotionError {
    /// True when Notion rejected the credentials or the database is not
    /// shared with the integration.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            NotionError::Api { status: 401, .. }
                | NotionError::Api { status: 403, .. }
                | NotionError::Api { status: 404, .. }
        )
    }
}
