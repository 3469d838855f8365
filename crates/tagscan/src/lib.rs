//! tagscan
//!
//! Parse HTML from text, files or URLs into a tag tree and search its
//! flattened tag list.
//!
//! # Example
//! ```rust,ignore
//! use tagscan::{Config, Session};
//!
//! let mut session = Session::new(Config::default())?;
//! session.parse_url("https://example.com", true)?;
//! let title = session.find_first_tag("title", None, None);
//! ```

mod config;
mod session;

pub use config::Config;
pub use session::Session;

// Re-export sub-crates for advanced usage
pub use tagscan_html as html;
pub use tagscan_net as net;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Session error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] tagscan_html::ParseError),

    #[error(transparent)]
    Net(#[from] tagscan_net::NetError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
