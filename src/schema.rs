//! Extraction schema builder
//!
//! A schema is an ordered list of named fields, each holding the texts that
//! matched one structural selection and a display color.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::DEFAULT_SCHEMA_NAME;
use crate::error::{Result, ValidationError};
use crate::structure::TagPath;

/// Display color assigned to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteColor {
    Blue,
    Emerald,
    Amber,
    Red,
    Violet,
    Pink,
    Cyan,
    Lime,
}

impl PaletteColor {
    pub fn name(self) -> &'static str {
        match self {
            PaletteColor::Blue => "blue",
            PaletteColor::Emerald => "emerald",
            PaletteColor::Amber => "amber",
            PaletteColor::Red => "red",
            PaletteColor::Violet => "violet",
            PaletteColor::Pink => "pink",
            PaletteColor::Cyan => "cyan",
            PaletteColor::Lime => "lime",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            PaletteColor::Blue => "#3b82f6",
            PaletteColor::Emerald => "#10b981",
            PaletteColor::Amber => "#f59e0b",
            PaletteColor::Red => "#ef4444",
            PaletteColor::Violet => "#8b5cf6",
            PaletteColor::Pink => "#ec4899",
            PaletteColor::Cyan => "#06b6d4",
            PaletteColor::Lime => "#84cc16",
        }
    }
}

pub const PALETTE: [PaletteColor; 8] = [
    PaletteColor::Blue,
    PaletteColor::Emerald,
    PaletteColor::Amber,
    PaletteColor::Red,
    PaletteColor::Violet,
    PaletteColor::Pink,
    PaletteColor::Cyan,
    PaletteColor::Lime,
];

/// Palette entry for the nth created field
pub fn palette_color(n: usize) -> PaletteColor {
    PALETTE[n % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(Uuid);

impl FieldId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One column of an extraction schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub id: FieldId,
    pub name: String,
    pub preview_snippet: String,
    pub matched_texts: Vec<String>,
    pub color: PaletteColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredSchema")]
pub struct ExtractionSchema {
    pub name: String,
    fields: Vec<ExtractedField>,
    /// Successful additions so far; drives palette rotation
    created: usize,
}

/// Persisted form; the counter may be missing from older payloads
#[derive(Deserialize)]
struct StoredSchema {
    name: String,
    fields: Vec<ExtractedField>,
    #[serde(default)]
    created: Option<usize>,
}

impl From<StoredSchema> for ExtractionSchema {
    fn from(stored: StoredSchema) -> Self {
        // Never behind the fields already present
        let created = stored.created.unwrap_or(0).max(stored.fields.len());
        Self {
            name: stored.name,
            fields: stored.fields,
            created,
        }
    }
}

impl Default for ExtractionSchema {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEMA_NAME)
    }
}

impl ExtractionSchema {
    pub fn new(placeholder_name: &str) -> Self {
        Self {
            name: placeholder_name.to_string(),
            fields: Vec::new(),
            created: 0,
        }
    }

    pub fn fields(&self) -> &[ExtractedField] {
        &self.fields
    }

    pub fn field(&self, id: FieldId) -> Option<&ExtractedField> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn rename(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Color the next added field will get
    pub fn next_color(&self) -> PaletteColor {
        palette_color(self.created)
    }

    /// Append a named field. An empty or blank name is rejected and the
    /// schema is left untouched.
    pub fn add_field(
        &mut self,
        name: &str,
        preview_snippet: &str,
        matched_texts: Vec<String>,
    ) -> Result<ExtractedField> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyFieldName.into());
        }

        let field = ExtractedField {
            id: FieldId::new(),
            name: name.to_string(),
            preview_snippet: preview_snippet.to_string(),
            matched_texts,
            color: self.next_color(),
        };
        self.created += 1;
        self.fields.push(field.clone());

        tracing::debug!(
            field = %field.name,
            matches = field.matched_texts.len(),
            color = field.color.name(),
            "added field"
        );
        Ok(field)
    }

    /// Remove a field by id. Returns whether anything was removed.
    pub fn remove_field(&mut self, id: FieldId) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.id != id);
        let removed = self.fields.len() != before;
        if removed {
            tracing::debug!(%id, "removed field");
        }
        removed
    }

    /// Check the schema can be handed to persistence: it needs at least one
    /// field and a name other than the placeholder.
    pub fn validate_for_save(&self, placeholder_name: &str) -> Result<()> {
        if self.fields.is_empty() {
            return Err(ValidationError::EmptySchema.into());
        }
        let name = self.name.trim();
        if name.is_empty() || name == placeholder_name {
            return Err(ValidationError::UnnamedSchema.into());
        }
        Ok(())
    }
}

/// Match set of the latest selection, waiting for a field name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSelection {
    pub selection_text: String,
    /// `None` when no enclosing element was found and the selection stands alone
    pub tag_path: Option<TagPath>,
    pub matched_texts: Vec<String>,
    /// Color of the next palette slot at selection time
    pub color: PaletteColor,
}

/// Trimmed selection cut to `max_chars`, with "..." appended when cut
pub fn preview_snippet(selection: &str, max_chars: usize) -> String {
    let trimmed = selection.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    trimmed.chars().take(max_chars).collect::<String>() + "..."
}
