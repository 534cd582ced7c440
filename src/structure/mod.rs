//! Structural fingerprinting
//!
//! An element's fingerprint is its tag path: its own tag plus up to four
//! ancestor tags, root-most first, stopping below `<body>`. Elements with
//! equal paths are considered to hold the same kind of value.

mod locator;
mod matcher;

pub use locator::*;
pub use matcher::*;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::MAX_PATH_DEPTH;
use crate::document::{Document, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagPath(Vec<String>);

impl TagPath {
    pub fn new(tags: Vec<String>) -> Self {
        Self(tags)
    }

    pub fn tags(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TagPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" > "))
    }
}

/// Compute the tag path of `id`, walking upward until the body container,
/// the document root, or `max_depth` tags (never more than `MAX_PATH_DEPTH`).
pub fn tag_path(doc: &Document, id: NodeId, max_depth: usize) -> TagPath {
    let max_depth = max_depth.min(MAX_PATH_DEPTH);
    let mut tags = Vec::with_capacity(max_depth);
    let mut current = Some(id);

    while let Some(node) = current {
        if tags.len() >= max_depth || Some(node) == doc.body() {
            break;
        }
        if let Some(tag) = doc.tag(node) {
            tags.push(tag.to_string());
        }
        current = doc.parent(node);
    }

    tags.reverse();
    TagPath(tags)
}
