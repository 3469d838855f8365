//! Session Configuration

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tagscan_html::{ErrorPolicy, ParserConfig};
use tagscan_net::FetchConfig;

use crate::Error;

/// Session configuration options
///
/// Every field is optional in the JSON form; missing ones take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// User agent string
    pub user_agent: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum requests per one-minute window
    pub requests_per_minute: u32,

    /// Minimum gap between requests, in milliseconds
    pub min_request_interval_ms: u64,

    /// Fail or continue on malformed markup
    pub error_policy: ErrorPolicy,

    /// Detailed tokenizer error messages
    pub exact_errors: bool,
}

impl Config {
    /// Load a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn parser(&self) -> ParserConfig {
        ParserConfig {
            error_policy: self.error_policy,
            exact_errors: self.exact_errors,
        }
    }

    pub fn fetch(&self) -> FetchConfig {
        FetchConfig {
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            requests_per_minute: self.requests_per_minute,
            min_interval: Duration::from_millis(self.min_request_interval_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let fetch = FetchConfig::default();
        Self {
            user_agent: format!("tagscan/{}", crate::VERSION),
            timeout_secs: fetch.timeout.as_secs(),
            requests_per_minute: fetch.requests_per_minute,
            min_request_interval_ms: 0,
            error_policy: ErrorPolicy::Strict,
            exact_errors: false,
        }
    }
}
