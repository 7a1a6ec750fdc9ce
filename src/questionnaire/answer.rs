//! Answer values for questionnaire responses
//!
//! The wire carries answers as untyped JSON (a string or an array,
//! depending on the question); the question type decides how a value is
//! interpreted, so conversion is always driven by [`QuestionType`] rather
//! than by the JSON shape alone.

use serde_json::Value;
use std::collections::BTreeSet;

use super::schema::QuestionType;

/// A typed answer to a single question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    /// radio / text / textarea: a single replaceable string
    Scalar(String),
    /// checkbox: set of selected option strings, order not significant
    Selection(BTreeSet<String>),
    /// list: ordered sequence of free-text items
    Items(Vec<String>),
}

impl AnswerValue {
    /// Empty value of the right shape for a question type
    pub fn empty_for(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::Radio | QuestionType::Text | QuestionType::Textarea => {
                AnswerValue::Scalar(String::new())
            }
            QuestionType::Checkbox => AnswerValue::Selection(BTreeSet::new()),
            QuestionType::List => AnswerValue::Items(Vec::new()),
        }
    }

    /// Whether this value matches the shape a question type expects
    pub fn matches(&self, question_type: QuestionType) -> bool {
        matches!(
            (self, question_type),
            (
                AnswerValue::Scalar(_),
                QuestionType::Radio | QuestionType::Text | QuestionType::Textarea
            ) | (AnswerValue::Selection(_), QuestionType::Checkbox)
                | (AnswerValue::Items(_), QuestionType::List)
        )
    }

    /// Per-type emptiness rule: empty string, empty set, or all-blank list
    /// items all count as unanswered.
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Scalar(text) => text.trim().is_empty(),
            AnswerValue::Selection(options) => options.is_empty(),
            AnswerValue::Items(items) => items.iter().all(|item| item.trim().is_empty()),
        }
    }

    /// Interpret a saved JSON value according to the question type.
    ///
    /// Returns None for shapes that cannot belong to the type (e.g. an
    /// object where a string is expected) so callers can skip corrupt
    /// entries instead of failing the whole restore.
    pub fn from_json(question_type: QuestionType, value: &Value) -> Option<Self> {
        match question_type {
            QuestionType::Radio | QuestionType::Text | QuestionType::Textarea => {
                value.as_str().map(|s| AnswerValue::Scalar(s.to_string()))
            }
            QuestionType::Checkbox => string_array(value)
                .map(|items| AnswerValue::Selection(items.into_iter().collect())),
            QuestionType::List => string_array(value).map(AnswerValue::Items),
        }
    }

    /// Emit the wire representation (plain string or array)
    pub fn to_json(&self) -> Value {
        match self {
            AnswerValue::Scalar(text) => Value::String(text.clone()),
            AnswerValue::Selection(options) => {
                Value::Array(options.iter().cloned().map(Value::String).collect())
            }
            AnswerValue::Items(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

fn string_array(value: &Value) -> Option<Vec<String>> {
    let array = value.as_array()?;
    array
        .iter()
        .map(|entry| entry.as_str().map(|s| s.to_string()))
        .collect()
}
