//! Extraction session
//!
//! Owns everything one select → confirm → accumulate cycle touches: the
//! raw document and its parse, the schema being built, and the selection
//! currently waiting for a name.

use crate::config::ExtractorConfig;
use crate::document::{parse, Document, DocumentFormat};
use crate::error::{ExtractError, Result};
use crate::highlight;
use crate::schema::{preview_snippet, ExtractedField, ExtractionSchema, FieldId, PendingSelection};
use crate::structure::{find_enclosing, match_all};

/// Receives a schema once it passes save validation
pub trait SchemaSink {
    fn save_schema(&mut self, schema: &ExtractionSchema);
}

impl<F> SchemaSink for F
where
    F: FnMut(&ExtractionSchema),
{
    fn save_schema(&mut self, schema: &ExtractionSchema) {
        self(schema)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    config: ExtractorConfig,
    raw: String,
    document: Document,
    schema: ExtractionSchema,
    pending: Option<PendingSelection>,
}

impl Session {
    pub fn new(raw: impl Into<String>, format: DocumentFormat, config: ExtractorConfig) -> Self {
        let raw = raw.into();
        let document = parse(&raw, format);
        let schema = ExtractionSchema::new(&config.default_schema_name);
        Self {
            config,
            raw,
            document,
            schema,
            pending: None,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn schema(&self) -> &ExtractionSchema {
        &self.schema
    }

    pub fn pending(&self) -> Option<&PendingSelection> {
        self.pending.as_ref()
    }

    pub fn rename_schema(&mut self, name: &str) {
        self.schema.rename(name);
    }

    /// Turn a text selection into a pending match set.
    ///
    /// Too-short selections are rejected and leave the session untouched.
    /// When no element encloses the selection (or the document has no
    /// structure) the selection alone becomes the match set.
    pub fn select(&mut self, selected_text: &str) -> Result<&PendingSelection> {
        let (tag_path, matched_texts) =
            match find_enclosing(&self.document, selected_text, &self.config) {
                Ok(located) => {
                    let texts = match_all(&self.document, &located.path, selected_text, &self.config);
                    (Some(located.path), texts)
                }
                Err(ExtractError::NoEnclosingElementFound) => {
                    tracing::debug!(
                        structured = self.document.is_structured(),
                        "no enclosing element, using selection as its own match"
                    );
                    (None, vec![selected_text.trim().to_string()])
                }
                Err(e) => return Err(e),
            };

        Ok(self.pending.insert(PendingSelection {
            selection_text: selected_text.trim().to_string(),
            tag_path,
            matched_texts,
            color: self.schema.next_color(),
        }))
    }

    /// Drop the pending selection without consuming a palette color
    pub fn cancel(&mut self) -> Option<PendingSelection> {
        self.pending.take()
    }

    /// Name the pending selection and add it to the schema. On failure the
    /// pending selection is kept so the caller can retry with another name.
    pub fn confirm(&mut self, name: &str) -> Result<ExtractedField> {
        let pending = self.pending.as_ref().ok_or(ExtractError::NoPendingSelection)?;
        let preview = preview_snippet(&pending.selection_text, self.config.preview_max_chars);
        let field = self
            .schema
            .add_field(name, &preview, pending.matched_texts.clone())?;
        self.pending = None;
        Ok(field)
    }

    pub fn remove_field(&mut self, id: FieldId) -> bool {
        self.schema.remove_field(id)
    }

    /// Raw document with confirmed and pending matches highlighted
    pub fn render(&self) -> String {
        highlight::render(&self.raw, self.schema.fields(), self.pending.as_ref())
    }

    /// Validate the schema and hand it to `sink`
    pub fn save<S: SchemaSink>(&self, sink: &mut S) -> Result<()> {
        self.schema
            .validate_for_save(&self.config.default_schema_name)?;
        tracing::debug!(
            schema = %self.schema.name,
            fields = self.schema.len(),
            "saving schema"
        );
        sink.save_schema(&self.schema);
        Ok(())
    }
}
