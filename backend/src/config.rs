//! Server configuration.
//!
//! Settings come from an optional TOML file (`heatmap.toml` by default) and
//! are then overridden by environment variables:
//!
//! - `HOST`, `PORT`: bind address (default `0.0.0.0:8080`)
//! - `APP_URL`: front-end origin used for OAuth redirects (default `http://localhost:3000`)
//! - `NOTION_API_BASE`, `NOTION_VERSION`: Notion API endpoint and version header
//! - `NOTION_CLIENT_ID`, `NOTION_CLIENT_SECRET`, `NOTION_REDIRECT_URI`: OAuth integration
//! - `RENDER_CACHE_TTL_SECS`: lifetime of cached renders (default 300)

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::notion::client::{DEFAULT_API_BASE, DEFAULT_NOTION_VERSION};
use crate::services::oauth::OAuthSettings;
use crate::services::render_cache::DEFAULT_TTL_SECS;

pub const DEFAULT_CONFIG_FILE: &str = "heatmap.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {message}")]
    InvalidEnv { key: String, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub notion: NotionSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Front-end origin; OAuth callbacks redirect back here.
    #[serde(default = "default_app_url")]
    pub app_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotionSettings {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_notion_version")]
    pub version: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_notion_version() -> String {
    DEFAULT_NOTION_VERSION.to_string()
}

fn default_redirect_uri() -> String {
    "http://localhost:8080/v1/notion/callback".to_string()
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS as u64
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            app_url: default_app_url(),
        }
    }
}

impl Default for NotionSettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            version: default_notion_version(),
            client_id: None,
            client_secret: None,
            redirect_uri: default_redirect_uri(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// Non-empty value of `key`, if set.
fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidEnv {
        key: key.to_string(),
        message: e.to_string(),
    })
}

impl AppConfig {
    /// Parse a TOML config file. Missing sections and keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults overridden by the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load `path` (or `heatmap.toml` in the working directory when present),
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(host) = env_value("HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_value("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        if let Some(url) = env_value("APP_URL") {
            self.server.app_url = url;
        }
        if let Some(base) = env_value("NOTION_API_BASE") {
            self.notion.api_base = base;
        }
        if let Some(version) = env_value("NOTION_VERSION") {
            self.notion.version = version;
        }
        if let Some(id) = env_value("NOTION_CLIENT_ID") {
            self.notion.client_id = Some(id);
        }
        if let Some(secret) = env_value("NOTION_CLIENT_SECRET") {
            self.notion.client_secret = Some(secret);
        }
        if let Some(uri) = env_value("NOTION_REDIRECT_URI") {
            self.notion.redirect_uri = uri;
        }
        if let Some(ttl) = env_value("RENDER_CACHE_TTL_SECS") {
            self.cache.ttl_secs = parse_env("RENDER_CACHE_TTL_SECS", &ttl)?;
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Front-end origin without a trailing slash.
    pub fn app_url(&self) -> &str {
        self.server.app_url.trim_end_matches('/')
    }

    /// OAuth credentials, present only when both client id and secret are set.
    pub fn oauth_settings(&self) -> Option<OAuthSettings> {
        let client_id = self.notion.client_id.as_deref().filter(|s| !s.is_empty())?;
        let client_secret = self
            .notion
            .client_secret
            .as_deref()
            .filter(|s| !s.is_empty())?;
        Some(OAuthSettings {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: self.notion.redirect_uri.clone(),
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::seconds(self.cache.ttl_secs.min(i64::MAX as u64) as i64)
    }
}
