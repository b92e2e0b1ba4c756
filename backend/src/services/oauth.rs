//! Helpers for the Notion OAuth authorization-code flow.

use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long an issued `state` value stays redeemable.
pub const STATE_TTL_MINUTES: i64 = 10;

/// Credentials of the public Notion integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Fresh opaque value binding an authorization request to its callback.
pub fn generate_state() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Expiry instant for a state issued at `issued_at`.
pub fn state_expires_at(issued_at: DateTime<Utc>) -> DateTime<Utc> {
    issued_at + Duration::minutes(STATE_TTL_MINUTES)
}

/// Notion consent-screen URL for `state`.
pub fn authorize_url(
    api_base: &str,
    settings: &OAuthSettings,
    state: &str,
) -> Result<Url, String> {
    let base = format!("{}/oauth/authorize", api_base.trim_end_matches('/'));
    let mut url = Url::parse(&base)
        .map_err(|e| format!("Invalid Notion API base '{}': {}", base, e))?;
    url.query_pairs_mut()
        .append_pair("client_id", &settings.client_id)
        .append_pair("response_type", "code")
        .append_pair("owner", "user")
        .append_pair("redirect_uri", &settings.redirect_uri)
        .append_pair("state", state);
    Ok(url)
}
