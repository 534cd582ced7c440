//! Highlight compositor
//!
//! Wraps every matched text of every field in a colored `<mark>` inside a copy
//! of the raw document. Longer texts are wrapped first so a short match can
//! only ever nest inside a longer one. Replacements run on text segments of
//! the working copy only; inserted markers are never searched again.

use regex::Regex;

use crate::schema::{ExtractedField, PaletteColor, PendingSelection};

const HIGHLIGHT_CLASS: &str = "fx-highlight";
const PENDING_CLASS: &str = "fx-pending";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Open {
        seq: usize,
        color: PaletteColor,
        pending: bool,
    },
    Close,
}

/// Raw document split into text and highlight markers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HighlightedDocument {
    segments: Vec<Segment>,
}

impl HighlightedDocument {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of wrapped occurrences
    pub fn highlight_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Open { .. }))
            .count()
    }

    /// Text with all markers removed; identical to the raw input
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Open { seq, color, pending } => {
                    out.push_str(&format!(
                        r#"<mark class="{}{}" data-seq="{}" style="background-color: {}">"#,
                        HIGHLIGHT_CLASS,
                        if *pending { format!(" {PENDING_CLASS}") } else { String::new() },
                        seq,
                        color.hex()
                    ));
                }
                Segment::Close => out.push_str("</mark>"),
            }
        }
        out
    }
}

struct Highlight<'a> {
    text: &'a str,
    color: PaletteColor,
    pending: bool,
    seq: usize,
}

/// Render `raw` with every confirmed and pending match wrapped in a marker
pub fn render(raw: &str, fields: &[ExtractedField], pending: Option<&PendingSelection>) -> String {
    compose(raw, fields, pending).to_markup()
}

/// Build the segment list behind `render`.
///
/// One highlight per matched text per field, then one per pending text.
/// Each keeps its position in that list as sequence index. Highlights are
/// applied longest text first; equal lengths keep list order, so between two
/// overlapping equal-length texts the earlier one wins.
pub fn compose(
    raw: &str,
    fields: &[ExtractedField],
    pending: Option<&PendingSelection>,
) -> HighlightedDocument {
    let confirmed = fields.iter().flat_map(|field| {
        field
            .matched_texts
            .iter()
            .map(move |text| (text.as_str(), field.color, false))
    });
    let in_progress = pending.into_iter().flat_map(|p| {
        p.matched_texts
            .iter()
            .map(move |text| (text.as_str(), p.color, true))
    });

    let mut highlights: Vec<Highlight> = confirmed
        .chain(in_progress)
        .enumerate()
        .map(|(seq, (text, color, pending))| Highlight {
            text,
            color,
            pending,
            seq,
        })
        .collect();
    // Stable: ties stay in insertion order
    highlights.sort_by(|a, b| b.text.len().cmp(&a.text.len()));

    let mut segments = vec![Segment::Text(raw.to_string())];
    for highlight in &highlights {
        if highlight.text.is_empty() {
            continue;
        }
        // Very long texts can exceed the regex size limit; search literally then
        let pattern = match Regex::new(&regex::escape(highlight.text)) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::debug!(seq = highlight.seq, error = %e, "literal search for highlight");
                None
            }
        };

        let mut next = Vec::with_capacity(segments.len());
        for segment in segments {
            match segment {
                Segment::Text(text) => wrap_matches(text, pattern.as_ref(), highlight, &mut next),
                marker => next.push(marker),
            }
        }
        segments = next;
        tracing::trace!(seq = highlight.seq, len = highlight.text.len(), "applied highlight");
    }

    HighlightedDocument { segments }
}

/// Non-overlapping byte ranges of `literal` in `text`, left to right
fn find_ranges(text: &str, pattern: Option<&Regex>, literal: &str) -> Vec<(usize, usize)> {
    match pattern {
        Some(re) => re.find_iter(text).map(|m| (m.start(), m.end())).collect(),
        None => text
            .match_indices(literal)
            .map(|(start, s)| (start, start + s.len()))
            .collect(),
    }
}

fn wrap_matches(
    text: String,
    pattern: Option<&Regex>,
    highlight: &Highlight,
    out: &mut Vec<Segment>,
) {
    let ranges = find_ranges(&text, pattern, highlight.text);
    if ranges.is_empty() {
        out.push(Segment::Text(text));
        return;
    }

    let mut last = 0;
    for (start, end) in ranges {
        if start > last {
            out.push(Segment::Text(text[last..start].to_string()));
        }
        out.push(Segment::Open {
            seq: highlight.seq,
            color: highlight.color,
            pending: highlight.pending,
        });
        out.push(Segment::Text(text[start..end].to_string()));
        out.push(Segment::Close);
        last = end;
    }
    if last < text.len() {
        out.push(Segment::Text(text[last..].to_string()));
    }
}
