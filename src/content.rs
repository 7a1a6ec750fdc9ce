//! Round-trip content model for service descriptions
//!
//! The same shape is produced when parsing an existing Word document and
//! consumed when regenerating one, so repeated open/edit/save cycles must
//! not drift. Parsing and rendering themselves are external collaborators;
//! this module only owns the structured content in between.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::normalize::strip_number_prefix;

/// Error raised when externally-parsed content cannot seed the editor
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    /// The parser produced a document with no usable content. This is a
    /// hard stop: silently defaulting would let a save overwrite a real
    /// document with empty fields.
    #[error("Parsed document contained no content")]
    EmptyDocument,
}

/// A free-form service definition subsection (subtitle + opaque rich text)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinitionSection {
    /// Client-side token for list stability only; never persisted as
    /// document content and regenerated on every load.
    #[serde(skip_serializing, default = "fresh_section_id")]
    pub id: String,
    pub subtitle: String,
    /// Rich-text HTML, opaque to validation (no word limit)
    pub content: String,
}

impl ServiceDefinitionSection {
    pub fn new(subtitle: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: fresh_section_id(),
            subtitle: subtitle.into(),
            content: content.into(),
        }
    }
}

fn fresh_section_id() -> String {
    Uuid::new_v4().to_string()
}

/// Structured representation of a service description under editing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalContent {
    pub title: String,
    pub description: String,
    pub features: Vec<String>,
    pub benefits: Vec<String>,
    pub service_definition: Vec<ServiceDefinitionSection>,
}

/// Parsed-document input supplied by the external document parser
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub service_definition: Vec<ParsedSection>,
}

/// A service definition block as the parser hands it over (no id)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedSection {
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub content: String,
}

/// Generation-request output consumed by the external document generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub title: String,
    pub description: String,
    pub features: Vec<String>,
    pub benefits: Vec<String>,
    pub service_definition: Vec<GeneratedSection>,
    pub save_as_draft: bool,
}

/// A service definition block on the generation wire (ids stay client-side)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSection {
    pub subtitle: String,
    pub content: String,
}

impl Default for ProposalContent {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposalContent {
    /// Empty editable state for the "create new" entry point.
    ///
    /// Features and benefits start with a single blank placeholder so the
    /// editor always has a row to type into; placeholders are filtered out
    /// before any word-count or save operation.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            features: vec![String::new()],
            benefits: vec![String::new()],
            service_definition: Vec::new(),
        }
    }

    /// Build editable state from an externally-parsed document.
    ///
    /// Every feature and benefit passes through the numbered-prefix
    /// normalizer even though the parser is expected to have stripped
    /// markers already: prefixes leak through from Word auto-numbering, and
    /// without the defensive strip a load/save/reload cycle would
    /// mis-validate on the second pass. Service definition ids are
    /// regenerated on every load so a stale id from a previous session can
    /// never collide with fresh content.
    pub fn from_parsed(doc: ParsedDocument) -> Result<Self, ContentError> {
        if is_empty_document(&doc) {
            return Err(ContentError::EmptyDocument);
        }

        let features = editable_items(doc.features);
        let benefits = editable_items(doc.benefits);
        let service_definition = doc
            .service_definition
            .into_iter()
            .map(|section| ServiceDefinitionSection::new(section.subtitle, section.content))
            .collect();

        Ok(Self {
            title: doc.title,
            description: doc.description,
            features,
            benefits,
            service_definition,
        })
    }

    /// Feature entries with blank placeholders filtered out
    pub fn valid_features(&self) -> Vec<&str> {
        non_blank(&self.features)
    }

    /// Benefit entries with blank placeholders filtered out
    pub fn valid_benefits(&self) -> Vec<&str> {
        non_blank(&self.benefits)
    }

    /// Assemble the handoff object for the document generator.
    ///
    /// Blank list entries are dropped, subtitles are trimmed, and rich-text
    /// content passes through untouched.
    pub fn to_generation_request(&self, save_as_draft: bool) -> GenerationRequest {
        GenerationRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            features: self.valid_features().iter().map(|s| s.to_string()).collect(),
            benefits: self.valid_benefits().iter().map(|s| s.to_string()).collect(),
            service_definition: self
                .service_definition
                .iter()
                .map(|section| GeneratedSection {
                    subtitle: section.subtitle.trim().to_string(),
                    content: section.content.clone(),
                })
                .collect(),
            save_as_draft,
        }
    }
}

fn is_empty_document(doc: &ParsedDocument) -> bool {
    doc.title.trim().is_empty()
        && doc.description.trim().is_empty()
        && doc.features.iter().all(|item| item.trim().is_empty())
        && doc.benefits.iter().all(|item| item.trim().is_empty())
        && doc.service_definition.is_empty()
}

/// Strip prefixes, then restore the single blank placeholder if nothing
/// non-blank survived (the editor never renders an empty list).
fn editable_items(items: Vec<String>) -> Vec<String> {
    let stripped: Vec<String> = items
        .into_iter()
        .filter(|item| !item.trim().is_empty())
        .map(|item| strip_number_prefix(&item))
        .collect();

    if stripped.is_empty() {
        vec![String::new()]
    } else {
        stripped
    }
}

fn non_blank(items: &[String]) -> Vec<&str> {
    items
        .iter()
        .map(|item| item.as_str())
        .filter(|item| !item.trim().is_empty())
        .collect()
}

/// Owner guard for the "change metadata" branch of the proposal flow.
///
/// Case-insensitive, whitespace-trimmed comparison. A blank stored owner
/// matches anyone (legacy documents without owner metadata).
pub fn owner_matches(stored: &str, current: &str) -> bool {
    let stored = stored.trim();
    if stored.is_empty() {
        return true;
    }
    stored.to_lowercase() == current.trim().to_lowercase()
}
