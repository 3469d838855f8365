//! Document fetcher
//!
//! Blocking HTTP GET and form POST behind the rate limiter.

use std::time::{Duration, Instant};

use url::Url;

use crate::rate_limit::{RateLimiter, DEFAULT_REQUESTS_PER_MINUTE};
use crate::NetError;

/// Fetcher settings
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string
    pub user_agent: String,
    /// Whole-request timeout
    pub timeout: Duration,
    pub requests_per_minute: u32,
    /// Minimum gap between two requests
    pub min_interval: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("tagscan/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            min_interval: Duration::ZERO,
        }
    }
}

/// Request to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Get(Url),
    PostForm(Url, Vec<(String, String)>),
}

impl Request {
    pub fn get(url: &str) -> Result<Self, NetError> {
        Ok(Self::Get(parse_url(url)?))
    }

    pub fn post_form(url: &str, form: &[(String, String)]) -> Result<Self, NetError> {
        if form.is_empty() {
            return Err(NetError::MissingForm);
        }
        Ok(Self::PostForm(parse_url(url)?, form.to_vec()))
    }

    pub fn url(&self) -> &Url {
        match self {
            Request::Get(url) | Request::PostForm(url, _) => url,
        }
    }
}

fn parse_url(url: &str) -> Result<Url, NetError> {
    if url.trim().is_empty() {
        return Err(NetError::MissingUrl);
    }
    let parsed = Url::parse(url).map_err(|e| NetError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(NetError::InvalidUrl(format!("unsupported scheme {other}"))),
    }
}

/// Fetches documents over HTTP
pub struct Fetcher {
    client: reqwest::blocking::Client,
    limiter: RateLimiter,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self, NetError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|e| NetError::Request(e.to_string()))?;

        Ok(Self {
            client,
            limiter: RateLimiter::new(config.requests_per_minute, config.min_interval),
        })
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// GET `url` and return the body text.
    pub fn get(&mut self, url: &str, wait_for_rate_limiting: bool) -> Result<String, NetError> {
        let request = Request::get(url)?;
        self.send(request, wait_for_rate_limiting)
    }

    /// POST `form` urlencoded to `url` and return the body text.
    pub fn post_form(
        &mut self,
        url: &str,
        form: &[(String, String)],
        wait_for_rate_limiting: bool,
    ) -> Result<String, NetError> {
        let request = Request::post_form(url, form)?;
        self.send(request, wait_for_rate_limiting)
    }

    /// Send a request through the rate limiter.
    ///
    /// Only successful requests count against the limits.
    pub fn send(&mut self, request: Request, wait_for_rate_limiting: bool) -> Result<String, NetError> {
        if !self.limiter.check(wait_for_rate_limiting) {
            return Err(NetError::RateLimited);
        }

        let started = Instant::now();
        let body = self.execute(&request)?;
        self.limiter.record(started);
        Ok(body)
    }

    fn execute(&self, request: &Request) -> Result<String, NetError> {
        let builder = match request {
            Request::Get(url) => {
                tracing::info!("HTTP GET {}", url);
                self.client.get(url.clone())
            }
            Request::PostForm(url, form) => {
                tracing::info!("HTTP POST {}", url);
                tracing::debug!("form data: {:?}", form);
                self.client.post(url.clone()).form(form)
            }
        };

        let response = builder.send().map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(map_reqwest_error)?;
        tracing::debug!("received {} bytes from {}", body.len(), request.url());
        Ok(body)
    }
}

fn map_reqwest_error(error: reqwest::Error) -> NetError {
    if error.is_timeout() {
        NetError::Timeout
    } else {
        NetError::Request(error.to_string())
    }
}
