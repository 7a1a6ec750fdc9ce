//! Capabilities questionnaire: schema, answers, and the session walker
//!
//! A questionnaire instance is identified by service name + lot + G-Cloud
//! version. The schema (sections of typed questions, in a fixed order)
//! arrives from an external source; this module tracks answers against it,
//! enforces locking, and assembles the save request.

pub mod answer;
pub mod schema;
pub mod session;

pub use answer::AnswerValue;
pub use schema::{
    Lot, LotParseError, Question, QuestionType, QuestionnaireSchema, DEFAULT_GCLOUD_VERSION,
};
pub use session::{AnswerError, QuestionnaireSession};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Questionnaire payload supplied by the backend: schema plus any
/// previously saved answers and lifecycle flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionnaireData {
    pub service_name: String,
    pub lot: String,
    #[serde(default = "default_gcloud_version")]
    pub gcloud_version: String,
    pub sections: HashMap<String, Vec<Question>>,
    pub section_order: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_answers: Option<HashMap<String, Value>>,
    #[serde(default = "default_true")]
    pub is_draft: bool,
    #[serde(default)]
    pub is_locked: bool,
}

/// One answered question on the save wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question_text: String,
    pub question_type: QuestionType,
    /// String for radio/text/textarea, array for checkbox/list
    pub answer: Value,
    pub section_name: String,
}

/// Request to persist questionnaire responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResponseRequest {
    pub service_name: String,
    pub lot: String,
    #[serde(default = "default_gcloud_version")]
    pub gcloud_version: String,
    pub answers: Vec<QuestionAnswer>,
    #[serde(default = "default_true")]
    pub is_draft: bool,
    #[serde(default)]
    pub is_locked: bool,
}

fn default_gcloud_version() -> String {
    DEFAULT_GCLOUD_VERSION.to_string()
}

fn default_true() -> bool {
    true
}
