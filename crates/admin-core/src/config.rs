//! API Configuration
//!
//! Where the backend lives and where the browser goes when the session ends.

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::error::{ApiError, Result};

const DEFAULT_API_URL: &str = "http://localhost:3000/api/";
const DEFAULT_APP_NAME: &str = "Shop Admin";
const DEFAULT_LOGIN_PATH: &str = "/login";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto
    #[serde(deserialize_with = "deserialize_base_url")]
    pub base_url: Url,
    /// Display name for the panel
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Login entry point used after the session is torn down
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            app_name: default_app_name(),
            login_path: default_login_path(),
        })
    }

    /// Build from `ADMIN_API_URL` / `ADMIN_APP_NAME` baked in at compile time.
    ///
    /// The front end ships as a static bundle, so there is no process
    /// environment to read at run time.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(option_env!("ADMIN_API_URL").unwrap_or(DEFAULT_API_URL))?;
        if let Some(name) = option_env!("ADMIN_APP_NAME") {
            config.app_name = name.to_string();
        }
        Ok(config)
    }

    /// Resolve an endpoint path (leading slash optional) against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }
}

fn deserialize_base_url<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Url, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_base_url(&raw).map_err(serde::de::Error::custom)
}

/// Parse a base URL, forcing a trailing slash so `join` appends instead of
/// replacing the last segment.
fn parse_base_url(raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
}
