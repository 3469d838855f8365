//! HTML parser session
//!
//! Feeds markup through the tokenizer into a [`TreeBuilder`] and keeps the
//! resulting tree together with its flattened tag list.

use crate::builder::TreeBuilder;
use crate::flatten::Tag;
use crate::node::{Attribute, Tree};
use crate::query::{TagList, TagQuery};
use crate::tokenizer::MarkupTokenizer;
use crate::{ParseError, ParserConfig};

/// A parsed document: the tag tree and its pre-order tag list.
#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree,
    tags: TagList,
    error_count: usize,
}

impl Document {
    /// A document holding only the root.
    pub fn empty() -> Self {
        Self::from_tree(Tree::new())
    }

    /// Derive the tag list from a finished tree.
    pub fn from_tree(tree: Tree) -> Self {
        let tags = TagList::from_tree(&tree);
        Self {
            tree,
            tags,
            error_count: 0,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tags(&self) -> &TagList {
        &self.tags
    }

    /// Tokenizer errors tolerated while parsing (lenient policy only).
    pub fn error_count(&self) -> usize {
        self.error_count
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

/// HTML parser
///
/// Every call to [`HtmlParser::parse`] replaces the previous document.
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    config: ParserConfig,
    document: Document,
}

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with explicit settings
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            document: Document::empty(),
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse markup, replacing the current document.
    ///
    /// On error the parser is left holding an empty document.
    pub fn parse(&mut self, markup: &str) -> Result<(), ParseError> {
        tracing::info!("Parsing HTML markup ({} bytes)", markup.len());
        self.document = Document::empty();
        if markup.is_empty() {
            return Ok(());
        }

        // `</>` is read as a closing anchor.
        let markup = markup.replace("</>", "</a>");

        let mut builder = TreeBuilder::new();
        let report = MarkupTokenizer::new(self.config.clone()).feed(&markup, &mut builder)?;

        let mut document = Document::from_tree(builder.finish());
        document.error_count = report.errors.len();
        tracing::debug!("{} tags processed", document.tags.len());
        self.document = document;
        Ok(())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tree(&self) -> &Tree {
        self.document.tree()
    }

    pub fn tags(&self) -> &TagList {
        self.document.tags()
    }

    /// Number of flattened tags, root included
    pub fn len(&self) -> usize {
        self.document.tags.len()
    }

    /// Never true: the root is always present.
    pub fn is_empty(&self) -> bool {
        self.document.tags.is_empty()
    }

    /// Index of the first tag matching type, attributes and text.
    pub fn find_first_tag(
        &self,
        kind: &str,
        attributes: Option<&[Attribute]>,
        text: Option<&str>,
    ) -> Option<usize> {
        self.find_next_tag(kind, attributes, text, 0)
    }

    /// Index of the next matching tag at or after `start`.
    pub fn find_next_tag(
        &self,
        kind: &str,
        attributes: Option<&[Attribute]>,
        text: Option<&str>,
        start: usize,
    ) -> Option<usize> {
        let mut query = TagQuery::new(kind);
        if let Some(attributes) = attributes {
            query = query.attributes(attributes.iter().cloned());
        }
        if let Some(text) = text {
            query = query.text(text);
        }
        self.document.tags.find_next(&query, start)
    }

    pub fn get_tag(&self, index: usize) -> Option<&Tag> {
        self.document.tags.get(index)
    }
}
