//! Console runtime configuration.

use serde::Deserialize;

use crate::credential::ACCESS_TOKEN_KEY;
use crate::error::{Error, Result};

fn default_api_url() -> String {
    "http://localhost:50002".to_string()
}

fn default_access_token_key() -> String {
    ACCESS_TOKEN_KEY.to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Settings the console's service clients are built from.
///
/// Loaded either from the environment ([`from_env`](Self::from_env)) or from
/// the JSON document the console is served with
/// ([`from_json_str`](Self::from_json_str)). Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the API gateway.
    #[serde(default = "default_api_url", alias = "api")]
    pub api_url: String,
    /// Storage key the access token is read from.
    #[serde(default = "default_access_token_key")]
    pub access_token_key: String,
    /// Organization management calls act on, if one is selected.
    #[serde(default)]
    pub org_id: Option<String>,
    /// Preferred language sent with every call.
    #[serde(default)]
    pub language: Option<String>,
    /// `tracing` filter directive.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            access_token_key: default_access_token_key(),
            org_id: None,
            language: None,
            log_filter: default_log_filter(),
        }
    }
}

impl ConsoleConfig {
    /// Reads `CONSOLE_API_URL`, `CONSOLE_ACCESS_TOKEN_KEY`, `CONSOLE_ORG_ID`,
    /// `CONSOLE_LANGUAGE` and `RUST_LOG`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Parses a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let parsed: serde_json::Result<Self> = serde_json::from_str(json);
        let config = parsed.map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let config = Self {
            api_url: non_empty("CONSOLE_API_URL").unwrap_or(defaults.api_url),
            access_token_key: non_empty("CONSOLE_ACCESS_TOKEN_KEY")
                .unwrap_or(defaults.access_token_key),
            org_id: non_empty("CONSOLE_ORG_ID"),
            language: non_empty("CONSOLE_LANGUAGE"),
            log_filter: non_empty("RUST_LOG").unwrap_or(defaults.log_filter),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        if self.access_token_key.trim().is_empty() {
            return Err(Error::Config("access_token_key must not be empty".into()));
        }
        Ok(())
    }
}
