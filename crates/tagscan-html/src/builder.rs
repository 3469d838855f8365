//! Tree builder
//!
//! Turns the markup event stream into a [`Tree`] by moving a single cursor:
//! a start tag opens a child and descends, an end tag closes the cursor and
//! climbs back to its parent. Nothing here checks that end tags match.

use crate::node::{kind, Attribute, Node, NodeId, Tree};
use crate::tokenizer::MarkupSink;

/// Builds one tag tree from markup events.
#[derive(Debug)]
pub struct TreeBuilder {
    tree: Tree,
    cursor: NodeId,
}

impl TreeBuilder {
    /// Create a builder positioned at a fresh root.
    pub fn new() -> Self {
        Self {
            tree: Tree::new(),
            cursor: NodeId::ROOT,
        }
    }

    /// Drop everything built so far and start over at a fresh root.
    pub fn reset(&mut self) {
        self.tree = Tree::new();
        self.cursor = NodeId::ROOT;
    }

    /// The node currently open.
    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    /// The tree under construction.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Finish construction and hand over the tree.
    ///
    /// Nodes left open (and the root, if text arrived at top level) get their
    /// pending fragments joined here.
    pub fn finish(mut self) -> Tree {
        if self.cursor != NodeId::ROOT {
            tracing::debug!("finishing with cursor at {}, unclosed tags kept open", self.cursor);
        }
        self.tree.materialize_all();
        self.tree
    }

    fn current(&mut self) -> &mut Node {
        self.tree.node_mut(self.cursor)
    }

    fn append_leaf(&mut self, node: Node) -> NodeId {
        self.tree.append(self.cursor, node)
    }
}

/// Remove every `\r` and `\n`; `None` when nothing is left.
fn strip_newlines(data: &str) -> Option<String> {
    let cleaned: String = data.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupSink for TreeBuilder {
    fn start_tag(&mut self, name: &str, attributes: Vec<Attribute>) {
        tracing::debug!("start tag - {} / {:?}", name, attributes);
        let node = Node::new(name).with_attributes(attributes).with_text("");
        self.cursor = self.tree.append(self.cursor, node);
    }

    fn end_tag(&mut self, name: &str) {
        tracing::debug!("end tag - {}", name);
        let Some(parent) = self.tree.get(self.cursor).and_then(Node::parent) else {
            // Unbalanced end tag: tolerated, the cursor stays at the root.
            tracing::warn!("ignoring end tag </{}> with no open element", name);
            return;
        };

        let materialized = self.current().materialize();
        // Emphasis folds back into the surrounding text.
        let folded = (name == "em").then(|| materialized.to_owned());
        if let Some(text) = folded {
            self.tree.node_mut(parent).push_fragment(text);
        }
        self.cursor = parent;
    }

    fn self_closing_tag(&mut self, name: &str, attributes: Vec<Attribute>) {
        tracing::debug!("start/end tag - {} / {:?}", name, attributes);
        if name == "br" {
            self.current().push_fragment(" ");
        }
        self.append_leaf(Node::new(name).with_attributes(attributes));
    }

    fn text(&mut self, data: &str) {
        tracing::debug!("data - {:?}", data);
        if let Some(cleaned) = strip_newlines(data) {
            self.current().push_fragment(cleaned);
        }
    }

    fn comment(&mut self, data: &str) {
        tracing::debug!("comment - {:?}", data);
        if let Some(cleaned) = strip_newlines(data) {
            self.append_leaf(Node::new(kind::COMMENT).with_text(cleaned));
        }
    }

    fn declaration(&mut self, data: &str) {
        tracing::debug!("declaration - {:?}", data);
        if let Some(cleaned) = strip_newlines(data) {
            self.append_leaf(Node::new(kind::DECLARATION).with_text(cleaned));
        }
    }

    fn unknown_declaration(&mut self, data: &str) {
        tracing::debug!("unknown declaration - {:?}", data);
        if let Some(cleaned) = strip_newlines(data) {
            self.append_leaf(Node::new(kind::UNKNOWN_DECLARATION).with_text(cleaned));
        }
    }
}
