//! Tag tree (arena-based allocation)
//!
//! Nodes live in a single `Vec` owned by the [`Tree`]. Children are held as
//! ids in document order and the parent link is a plain id, so ownership only
//! ever flows from the tree down to its nodes.

use std::fmt;

/// Names of the synthetic node kinds.
pub mod kind {
    /// The document root created for every parse.
    pub const ROOT: &str = "root";
    /// `<!-- ... -->`
    pub const COMMENT: &str = "comment";
    /// `<!DOCTYPE ...>`
    pub const DECLARATION: &str = "declaration";
    /// `<![...]>` constructs such as marked sections.
    pub const UNKNOWN_DECLARATION: &str = "unknown_declaration";
}

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single `key="value"` pair, kept in source order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Attribute {
    fn from((name, value): (K, V)) -> Self {
        Self::new(name, value)
    }
}

/// One element of the tag tree: a real tag or one of the [`kind`] names.
///
/// Text is collected as fragments while the node is open and joined once when
/// it closes, see [`Node::materialize`].
#[derive(Debug, Clone, Default)]
pub struct Node {
    name: String,
    attributes: Option<Vec<Attribute>>,
    text: Option<String>,
    fragments: Vec<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Create a detached node with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the attribute list.
    pub fn with_attributes<I, A>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attribute>,
    {
        self.attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Set the materialized text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> Option<&[Attribute]> {
        self.attributes.as_deref()
    }

    /// Text as materialized at close time. `None` for nodes that never had
    /// a text slot (the root, self-closing tags).
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Fragments received so far that have not been materialized yet.
    pub fn pending(&self) -> &[String] {
        &self.fragments
    }

    /// Materialized text followed by any pending fragments, joined on demand.
    pub fn accumulated_text(&self) -> String {
        let mut out = String::with_capacity(
            self.text.as_ref().map_or(0, String::len)
                + self.fragments.iter().map(String::len).sum::<usize>(),
        );
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for fragment in &self.fragments {
            out.push_str(fragment);
        }
        out
    }

    pub(crate) fn push_fragment(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    /// Join pending fragments into the final text.
    ///
    /// Called when the node stops being the cursor. A node that never held
    /// text and has nothing pending keeps `None`.
    pub(crate) fn materialize(&mut self) -> &str {
        if !self.fragments.is_empty() || self.text.is_some() {
            let joined = self.fragments.concat();
            self.fragments.clear();
            match &mut self.text {
                Some(text) => text.push_str(&joined),
                None => self.text = Some(joined),
            }
        }
        self.text.as_deref().unwrap_or("")
    }
}

/// Arena-based tag tree
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a tree holding only a `root` node.
    pub fn new() -> Self {
        Self::with_root(Node::new(kind::ROOT))
    }

    /// Create a tree whose root is the given node.
    pub fn with_root(mut root: Node) -> Self {
        root.parent = None;
        root.children.clear();
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[NodeId::ROOT.index()]
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Mutable access for ids handed out by this tree.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Append `node` as the last child of `parent` and return its id.
    ///
    /// Any parent/children links already on `node` are replaced; the tree
    /// is the only place links are made.
    ///
    /// # Panics
    /// If `parent` does not belong to this tree.
    pub fn append(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        assert!(parent.index() < self.nodes.len(), "unknown parent {parent}");
        let id = NodeId(self.nodes.len() as u32);
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Number of nodes in the tree, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Materialize every node that still has pending fragments.
    pub(crate) fn materialize_all(&mut self) {
        for node in &mut self.nodes {
            if !node.fragments.is_empty() {
                node.materialize();
            }
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
