//! Field validators for proposal content
//!
//! Validation failure is data, not an error: every validator returns a
//! [`FieldValidation`] with a human-readable message so the frontend can
//! render it without type inspection. Validators are pure and safe to call
//! on every keystroke; the submit gate re-runs them all as the source of
//! truth.

use serde::{Deserialize, Serialize};

use crate::content::ProposalContent;
use crate::normalize::{strip_number_prefix, word_count};

/// Maximum words in a service title
pub const MAX_TITLE_WORDS: usize = 10;
/// Maximum words in the service summary
pub const MAX_DESCRIPTION_WORDS: usize = 50;
/// Maximum feature/benefit entries per list
pub const MAX_LIST_ITEMS: usize = 10;
/// Maximum words per feature/benefit entry (after prefix stripping)
pub const MAX_ITEM_WORDS: usize = 10;

/// Uniform single-field validation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    pub is_valid: bool,
    pub message: String,
}

impl FieldValidation {
    pub fn valid(message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// Which fixed list field a list validation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Features,
    Benefits,
}

impl ListKind {
    pub fn singular(&self) -> &'static str {
        match self {
            ListKind::Features => "feature",
            ListKind::Benefits => "benefit",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            ListKind::Features => "features",
            ListKind::Benefits => "benefits",
        }
    }
}

/// Validate the service title: required, at most 10 words.
pub fn validate_title(title: &str) -> FieldValidation {
    if title.trim().is_empty() {
        return FieldValidation::invalid("Title is required");
    }

    let count = word_count(title);
    if count > MAX_TITLE_WORDS {
        return FieldValidation::invalid(format!(
            "Title should be concise: currently {} words (max {})",
            count, MAX_TITLE_WORDS
        ));
    }

    FieldValidation::valid("Valid service name")
}

/// Validate the service summary: at most 50 words, empty allowed.
pub fn validate_description(description: &str) -> FieldValidation {
    let count = word_count(description);
    if count > MAX_DESCRIPTION_WORDS {
        return FieldValidation::invalid(format!(
            "Description is {} words (max {})",
            count, MAX_DESCRIPTION_WORDS
        ));
    }

    FieldValidation::valid(format!("Valid ({}/{} words)", count, MAX_DESCRIPTION_WORDS))
}

/// Validate a features or benefits list.
///
/// Blank entries (the editor's placeholder rows) are filtered before any
/// check. Word counts apply after prefix stripping, and only the first
/// over-long item is reported.
pub fn validate_list_items(items: &[String], kind: ListKind) -> FieldValidation {
    let valid_items: Vec<&String> = items.iter().filter(|item| !item.trim().is_empty()).collect();

    if valid_items.is_empty() {
        return FieldValidation::invalid(format!("At least one {} is required", kind.singular()));
    }

    if valid_items.len() > MAX_LIST_ITEMS {
        return FieldValidation::invalid(format!(
            "Maximum {} {} allowed ({} provided)",
            MAX_LIST_ITEMS,
            kind.plural(),
            valid_items.len()
        ));
    }

    for item in &valid_items {
        let count = word_count(&strip_number_prefix(item));
        if count > MAX_ITEM_WORDS {
            return FieldValidation::invalid(format!(
                "Each {} must be {} words or fewer (found {} words)",
                kind.singular(),
                MAX_ITEM_WORDS,
                count
            ));
        }
    }

    FieldValidation::valid(format!(
        "Valid ({}/{} {})",
        valid_items.len(),
        MAX_LIST_ITEMS,
        kind.plural()
    ))
}

/// Generic word-count validation result for section-level rules. Unlike
/// [`FieldValidation`], this serializes with snake_case keys to match the
/// document-generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCountValidation {
    pub is_valid: bool,
    pub word_count: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub min_words: Option<usize>,
    pub max_words: Option<usize>,
}

/// Validate free-text content against optional min/max word bounds.
///
/// Content within 10% of either bound gets a warning so authors see they
/// are close to a limit before they cross it.
pub fn validate_word_count(
    content: &str,
    min_words: Option<usize>,
    max_words: Option<usize>,
) -> WordCountValidation {
    let count = word_count(content);
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Some(min) = min_words {
        if count < min {
            errors.push(format!(
                "Content has {} words but requires at least {} words",
                count, min
            ));
        } else if (count as f64) < (min as f64) * 1.1 {
            warnings.push(format!(
                "Content is close to minimum word count ({}/{})",
                count, min
            ));
        }
    }

    if let Some(max) = max_words {
        if count > max {
            errors.push(format!(
                "Content has {} words but must not exceed {} words",
                count, max
            ));
        } else if (count as f64) > (max as f64) * 0.9 {
            warnings.push(format!(
                "Content is approaching maximum word count ({}/{})",
                count, max
            ));
        }
    }

    WordCountValidation {
        is_valid: errors.is_empty(),
        word_count: count,
        errors,
        warnings,
        min_words,
        max_words,
    }
}

/// Submit gate: re-validate every field and return the blocking failures.
///
/// An empty result means the proposal may be handed to the document
/// generator; otherwise all messages are surfaced and the submit is
/// blocked. Live keystroke feedback is never trusted here.
pub fn validate_proposal(content: &ProposalContent) -> Vec<FieldValidation> {
    [
        validate_title(&content.title),
        validate_description(&content.description),
        validate_list_items(&content.features, ListKind::Features),
        validate_list_items(&content.benefits, ListKind::Benefits),
    ]
    .into_iter()
    .filter(|validation| !validation.is_valid)
    .collect()
}
