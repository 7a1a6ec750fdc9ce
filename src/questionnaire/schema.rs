//! Questionnaire schema types
//!
//! The schema is supplied externally (parsed out of the framework's
//! question export) and is read-only here: sections keyed by name with an
//! explicit order that must be preserved exactly as supplied.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Default G-Cloud framework version
pub const DEFAULT_GCLOUD_VERSION: &str = "15";

/// How a question is rendered and answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Radio,
    Checkbox,
    Text,
    Textarea,
    List,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Radio => "radio",
            QuestionType::Checkbox => "checkbox",
            QuestionType::Text => "text",
            QuestionType::Textarea => "textarea",
            QuestionType::List => "list",
        }
    }
}

/// A single question as supplied by the schema source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question_text: String,
    pub question_type: QuestionType,
    /// Options for radio/checkbox questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_options: Option<Vec<String>>,
    /// Short inline hint shown next to the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_hint: Option<String>,
    /// Longer guidance shown on demand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_advice: Option<String>,
}

/// Read-only lookup structure: section name -> ordered questions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireSchema {
    pub sections: HashMap<String, Vec<Question>>,
    /// Section presentation order, significant and preserved as supplied
    pub section_order: Vec<String>,
}

impl QuestionnaireSchema {
    pub fn new(sections: HashMap<String, Vec<Question>>, section_order: Vec<String>) -> Self {
        Self {
            sections,
            section_order,
        }
    }

    /// Questions for a named section, in supplied order
    pub fn section_questions(&self, section_name: &str) -> Option<&[Question]> {
        self.sections.get(section_name).map(|qs| qs.as_slice())
    }

    /// Find a question by text, returning its section name too
    pub fn find_question(&self, question_text: &str) -> Option<(&str, &Question)> {
        for section_name in &self.section_order {
            if let Some(questions) = self.sections.get(section_name) {
                if let Some(question) =
                    questions.iter().find(|q| q.question_text == question_text)
                {
                    return Some((section_name.as_str(), question));
                }
            }
        }
        None
    }

    /// Total number of questions across all sections
    pub fn question_count(&self) -> usize {
        self.section_order
            .iter()
            .filter_map(|name| self.sections.get(name))
            .map(|questions| questions.len())
            .sum()
    }

    /// Iterate sections in presentation order
    pub fn ordered_sections(&self) -> impl Iterator<Item = (&str, &[Question])> {
        self.section_order.iter().filter_map(|name| {
            self.sections
                .get(name)
                .map(|questions| (name.as_str(), questions.as_slice()))
        })
    }
}

/// G-Cloud framework lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lot {
    /// IaaS / PaaS (Lot 2a)
    #[serde(rename = "2a")]
    Lot2a,
    /// SaaS (Lot 2b)
    #[serde(rename = "2b")]
    Lot2b,
    /// Cloud support services (Lot 3)
    #[serde(rename = "3")]
    Lot3,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid LOT: {0}. Must be '2a', '2b', or '3'")]
pub struct LotParseError(pub String);

impl Lot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lot::Lot2a => "2a",
            Lot::Lot2b => "2b",
            Lot::Lot3 => "3",
        }
    }
}

impl FromStr for Lot {
    type Err = LotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "2a" => Ok(Lot::Lot2a),
            "2b" => Ok(Lot::Lot2b),
            "3" => Ok(Lot::Lot3),
            other => Err(LotParseError(other.to_string())),
        }
    }
}

impl std::fmt::Display for Lot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
