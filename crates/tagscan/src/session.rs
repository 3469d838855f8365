//! Parsing session
//!
//! Obtains markup from a string, a file or a URL and hands it to the parser.

use std::path::Path;
use std::time::Instant;

use tagscan_html::{Attribute, Document, HtmlParser, Tag, TagList};
use tagscan_net::Fetcher;

use crate::{Config, Error};

/// One parser plus the fetcher that feeds it.
pub struct Session {
    parser: HtmlParser,
    fetcher: Fetcher,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, Error> {
        Ok(Self {
            parser: HtmlParser::with_config(config.parser()),
            fetcher: Fetcher::new(config.fetch())?,
        })
    }

    /// Parse markup text.
    pub fn parse(&mut self, markup: &str) -> Result<(), Error> {
        self.parser.parse(markup)?;
        Ok(())
    }

    /// Read and parse an HTML file.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        tracing::info!("Parsing the file: {}", path.display());
        let markup = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.parse(&markup)
    }

    /// Download and parse a URL.
    pub fn parse_url(&mut self, url: &str, wait_for_rate_limiting: bool) -> Result<(), Error> {
        tracing::info!("Parsing the url: {}", url);
        let started = Instant::now();
        let markup = self.fetcher.get(url, wait_for_rate_limiting)?;
        tracing::debug!("fetched in {:?}", started.elapsed());
        self.parse(&markup)
    }

    /// Submit a form by POST and parse the response.
    pub fn parse_url_with_post_form(
        &mut self,
        url: &str,
        form: &[(String, String)],
        wait_for_rate_limiting: bool,
    ) -> Result<(), Error> {
        tracing::info!("Parsing the url with POST form: {}", url);
        let markup = self.fetcher.post_form(url, form, wait_for_rate_limiting)?;
        self.parse(&markup)
    }

    pub fn document(&self) -> &Document {
        self.parser.document()
    }

    pub fn tags(&self) -> &TagList {
        self.parser.tags()
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn find_first_tag(
        &self,
        kind: &str,
        attributes: Option<&[Attribute]>,
        text: Option<&str>,
    ) -> Option<usize> {
        self.parser.find_first_tag(kind, attributes, text)
    }

    pub fn find_next_tag(
        &self,
        kind: &str,
        attributes: Option<&[Attribute]>,
        text: Option<&str>,
        start: usize,
    ) -> Option<usize> {
        self.parser.find_next_tag(kind, attributes, text, start)
    }

    pub fn get_tag(&self, index: usize) -> Option<&Tag> {
        self.parser.get_tag(index)
    }
}
