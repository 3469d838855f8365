//! Flat tag list and linear tag search
//!
//! Matching rules:
//! - the tag type is compared case-insensitively and must be non-empty;
//! - attributes, when given and non-empty, must equal the candidate's list
//!   exactly, same pairs in the same order;
//! - text, when given and non-empty, must equal the candidate's text.
//!
//! A candidate without attributes (or without text), such as the root or a
//! self-closing tag, fails any non-empty constraint on that field.

use crate::flatten::Tag;
use crate::node::{Attribute, Tree};

/// Search criteria for [`TagList::find_first`] / [`TagList::find_next`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagQuery {
    kind: String,
    attributes: Option<Vec<Attribute>>,
    text: Option<String>,
}

impl TagQuery {
    /// Match tags of the given type.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into().to_lowercase(),
            ..Default::default()
        }
    }

    /// Require this exact, ordered attribute list.
    pub fn attributes<I, A>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attribute>,
    {
        self.attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Require this exact text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Whether `tag` satisfies the query.
    pub fn matches(&self, tag: &Tag) -> bool {
        if self.kind.is_empty() || tag.name.to_lowercase() != self.kind {
            return false;
        }
        if let Some(wanted) = self.attribute_constraint() {
            if tag.attributes.as_deref() != Some(wanted) {
                return false;
            }
        }
        if let Some(wanted) = self.text_constraint() {
            if tag.text.as_deref() != Some(wanted) {
                return false;
            }
        }
        true
    }

    fn attribute_constraint(&self) -> Option<&[Attribute]> {
        self.attributes.as_deref().filter(|attrs| !attrs.is_empty())
    }

    fn text_constraint(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.is_empty())
    }
}

/// Flattened tags of one document, in pre-order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
    tags: Vec<Tag>,
}

impl TagList {
    /// Flatten `tree`, root first.
    pub fn from_tree(tree: &Tree) -> Self {
        tree.flatten().collect()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    /// Index of the first matching tag.
    pub fn find_first(&self, query: &TagQuery) -> Option<usize> {
        self.find_next(query, 0)
    }

    /// Index of the first matching tag at or after `start`.
    pub fn find_next(&self, query: &TagQuery, start: usize) -> Option<usize> {
        tracing::debug!(?query, start, "find next tag");
        if query.kind.is_empty() {
            tracing::warn!("empty tag type matches nothing");
            return None;
        }
        let found = self
            .tags
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, tag)| query.matches(tag))
            .map(|(index, _)| index);
        match found {
            Some(index) => tracing::debug!("matching tag index: {}", index),
            None => tracing::warn!("tag not found"),
        }
        found
    }

    /// Every matching index, in order.
    pub fn find_all<'a>(&'a self, query: &'a TagQuery) -> impl Iterator<Item = usize> + 'a {
        let mut next = 0;
        std::iter::from_fn(move || {
            let index = self.find_next(query, next)?;
            next = index + 1;
            Some(index)
        })
    }

    /// Tag at `index`; `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&Tag> {
        let tag = self.tags.get(index);
        if tag.is_none() {
            tracing::warn!(index, len = self.tags.len(), "index out of range");
        }
        tag
    }
}

impl FromIterator<Tag> for TagList {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}
