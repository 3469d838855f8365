//! Pre-order flattening of a tag tree

use crate::node::{Attribute, Node, NodeId, Tree};

/// One flattened entry: name, attributes and text of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub attributes: Option<Vec<Attribute>>,
    pub text: Option<String>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: None,
            text: None,
        }
    }

    /// Attribute value by name, first match wins.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .as_deref()?
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }
}

impl From<&Node> for Tag {
    fn from(node: &Node) -> Self {
        Self {
            name: node.name().to_owned(),
            attributes: node.attributes().map(<[Attribute]>::to_vec),
            text: node.text().map(str::to_owned),
        }
    }
}

/// Depth-first pre-order walk over a [`Tree`].
///
/// Uses an explicit stack, so depth is bounded by memory only. Cloning the
/// iterator, or calling [`Tree::flatten`] again, restarts the walk.
#[derive(Debug, Clone)]
pub struct PreOrder<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl<'t> PreOrder<'t> {
    pub(crate) fn new(tree: &'t Tree, start: NodeId) -> Self {
        let stack = if tree.get(start).is_some() { vec![start] } else { Vec::new() };
        Self { tree, stack }
    }
}

impl<'t> Iterator for PreOrder<'t> {
    type Item = (NodeId, &'t Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.get(id)?;
        // Reversed so the leftmost child is popped first.
        self.stack.extend(node.children().iter().rev().copied());
        Some((id, node))
    }
}

impl Tree {
    /// Walk the whole tree, root first.
    pub fn walk(&self) -> PreOrder<'_> {
        PreOrder::new(self, NodeId::ROOT)
    }

    /// Walk the subtree rooted at `start`.
    pub fn walk_from(&self, start: NodeId) -> PreOrder<'_> {
        PreOrder::new(self, start)
    }

    /// Lazily produce the flattened tags, root first.
    pub fn flatten(&self) -> impl Iterator<Item = Tag> + Clone + '_ {
        self.walk().map(|(_, node)| Tag::from(node))
    }
}
