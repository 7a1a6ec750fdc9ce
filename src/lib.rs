//! Content validation and questionnaire core for G-Cloud proposal
//! management.
//!
//! Everything here is synchronous and side-effect free apart from the
//! draft store: validators run on every keystroke and again on submit,
//! numbered prefixes are stripped before every word count, and the
//! questionnaire session enforces locking before any answer mutation.
//! Document parsing, rendering, storage, and auth are external
//! collaborators.

// Module declarations
pub mod config;
pub mod content;
pub mod normalize;
pub mod questionnaire;
pub mod store;
pub mod validators;

// Re-export the frontend-facing surface
pub use content::{
    owner_matches, ContentError, GeneratedSection, GenerationRequest, ParsedDocument,
    ParsedSection, ProposalContent, ServiceDefinitionSection,
};
pub use normalize::{normalize_spaces, strip_number_prefix, word_count};
pub use questionnaire::{
    AnswerError, AnswerValue, Lot, LotParseError, Question, QuestionAnswer, QuestionType,
    QuestionnaireData, QuestionnaireSchema, QuestionnaireSession, SaveResponseRequest,
    DEFAULT_GCLOUD_VERSION,
};
pub use store::{
    DraftKey, DraftRecord, DraftStore, FileDraftStore, MemoryDraftStore, StoreError, StoreResult,
};
pub use validators::{
    validate_description, validate_list_items, validate_proposal, validate_title,
    validate_word_count, FieldValidation, ListKind, WordCountValidation, MAX_DESCRIPTION_WORDS,
    MAX_ITEM_WORDS, MAX_LIST_ITEMS, MAX_TITLE_WORDS,
};
