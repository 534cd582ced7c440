//! Selection locator
//!
//! Maps a piece of selected text back to the tightest element that holds it.

use crate::config::ExtractorConfig;
use crate::document::{Document, NodeId};
use crate::error::{ExtractError, Result};

use super::{tag_path, TagPath};

/// Element a selection was found in, with its fingerprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub target: NodeId,
    pub path: TagPath,
}

/// Trim a selection and reject it when it is below the minimum length
pub fn validate_selection<'a>(selected_text: &'a str, config: &ExtractorConfig) -> Result<&'a str> {
    let trimmed = selected_text.trim();
    let len = trimmed.chars().count();
    if len == 0 || len < config.min_selection_chars {
        return Err(ExtractError::SelectionTooShort {
            len,
            min: config.min_selection_chars,
        });
    }
    Ok(trimmed)
}

/// Find the element enclosing `selected_text` and compute its tag path.
///
/// The first text node (in document order) containing the selection wins
/// and its parent element is the target. A selection that crosses markup is
/// not inside any single text node; then the deepest element whose text
/// contains it is used instead.
pub fn locate(doc: &Document, selected_text: &str, config: &ExtractorConfig) -> Option<Located> {
    let needle = validate_selection(selected_text, config).ok()?;
    if !doc.is_structured() {
        return None;
    }

    let target = enclosing_text_parent(doc, needle).or_else(|| deepest_enclosing(doc, needle))?;
    let path = tag_path(doc, target, config.max_path_depth);

    tracing::debug!(
        target_tag = doc.tag(target).unwrap_or_default(),
        path = %path,
        "located selection"
    );

    Some(Located { target, path })
}

/// Like `locate`, but says why nothing was found
pub fn find_enclosing(doc: &Document, selected_text: &str, config: &ExtractorConfig) -> Result<Located> {
    validate_selection(selected_text, config)?;
    locate(doc, selected_text, config).ok_or(ExtractError::NoEnclosingElementFound)
}

fn enclosing_text_parent(doc: &Document, needle: &str) -> Option<NodeId> {
    doc.text_nodes()
        .find(|id| doc.text_content(*id).contains(needle))
        .and_then(|id| doc.parent(id))
}

fn deepest_enclosing(doc: &Document, needle: &str) -> Option<NodeId> {
    let root = doc.root();
    if !doc.text_content(root).contains(needle) {
        return None;
    }

    let mut current = root;
    while let Some(child) = doc
        .children(current)
        .iter()
        .copied()
        .filter(|c| doc.node(*c).is_element())
        .find(|c| doc.text_content(*c).contains(needle))
    {
        current = child;
    }
    Some(current)
}
