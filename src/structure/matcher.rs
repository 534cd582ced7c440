//! Structural matcher
//!
//! Full scan of the document for elements sharing a tag path. Documents are
//! single pages and selections are user-triggered, so nothing is indexed.

use std::collections::HashSet;

use crate::config::ExtractorConfig;
use crate::document::{Document, NodeId};

use super::{tag_path, TagPath};

/// Elements whose tag path equals `path`, in document order
pub fn structural_matches(doc: &Document, path: &TagPath, config: &ExtractorConfig) -> Vec<NodeId> {
    doc.elements()
        .filter(|id| tag_path(doc, *id, config.max_path_depth) == *path)
        .collect()
}

/// Trimmed, non-empty, deduplicated text of every structural match.
///
/// Order is document order of first occurrence. Never empty: when nothing
/// matches, the trimmed selection itself is returned.
pub fn match_all(
    doc: &Document,
    path: &TagPath,
    selected_text: &str,
    config: &ExtractorConfig,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut texts = Vec::new();

    for id in structural_matches(doc, path, config) {
        let text = doc.text_content(id).trim().to_string();
        if !text.is_empty() && seen.insert(text.clone()) {
            texts.push(text);
        }
    }

    if texts.is_empty() {
        tracing::debug!(path = %path, "no structural matches, falling back to selection");
        texts.push(selected_text.trim().to_string());
    } else {
        tracing::debug!(path = %path, matches = texts.len(), "structural matches");
    }

    texts
}
