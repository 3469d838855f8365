//! tagscan networking
//!
//! Fetches documents over HTTP and keeps request rates in check.

pub mod fetcher;
pub mod rate_limit;

pub use fetcher::{FetchConfig, Fetcher, Request};
pub use rate_limit::{RateLimiter, Throttle};
pub use url::Url;

/// Network error
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No URL specified")]
    MissingUrl,

    #[error("No form data specified")]
    MissingForm,

    #[error("Rate limit reached")]
    RateLimited,
}
