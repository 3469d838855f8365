//! tagscan HTML parser
//!
//! Builds a tag tree from markup with html5ever's tokenizer, flattens it in
//! pre-order and answers linear tag searches over the flat list.
//!
//! # Example
//! ```rust
//! use tagscan_html::{HtmlParser, TagQuery};
//!
//! let mut parser = HtmlParser::new();
//! parser.parse("<b>my data</b><i>test</i><br/>")?;
//! let bold = parser.tags().find_first(&TagQuery::new("b")).unwrap();
//! assert_eq!(parser.get_tag(bold).unwrap().text.as_deref(), Some("my data"));
//! # Ok::<(), tagscan_html::ParseError>(())
//! ```

mod builder;
mod escape;
mod flatten;
mod node;
mod parser;
mod query;
mod tokenizer;

use serde::Deserialize;

pub use builder::TreeBuilder;
pub use escape::{escape_text, unescape_text};
pub use flatten::{PreOrder, Tag};
pub use node::{kind, Attribute, Node, NodeId, Tree};
pub use parser::{Document, HtmlParser};
pub use query::{TagList, TagQuery};
pub use tokenizer::{FeedReport, MarkupError, MarkupSink, MarkupTokenizer};

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    let mut parser = HtmlParser::new();
    parser.parse(html)?;
    Ok(parser.document().clone())
}

/// What to do when the tokenizer reports malformed markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Fail the whole parse on the first error.
    #[default]
    Strict,
    /// Log the error and keep going.
    Lenient,
}

/// Parser settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserConfig {
    pub error_policy: ErrorPolicy,
    /// Report detailed tokenizer error messages.
    pub exact_errors: bool,
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed markup at line {line}: {message}")]
    Malformed { line: u64, message: String },
}
