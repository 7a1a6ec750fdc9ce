//! Questionnaire session walker
//!
//! Drives a section-paginated view over a [`QuestionnaireSchema`]: clamped
//! navigation, per-type answer mutation, per-question list validation, and
//! completion accounting. Locking is a hard gate checked before every
//! mutation, not a UI hint.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;

use super::answer::AnswerValue;
use super::schema::{Lot, LotParseError, QuestionType, QuestionnaireSchema};
use super::{QuestionAnswer, QuestionnaireData, SaveResponseRequest};
use crate::normalize::{strip_number_prefix, word_count};
use crate::validators::{FieldValidation, MAX_ITEM_WORDS, MAX_LIST_ITEMS};

/// Why an answer mutation was rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnswerError {
    #[error("Responses are locked and can no longer be edited")]
    Locked,

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Question '{question}' expects a {expected} answer")]
    TypeMismatch {
        question: String,
        expected: &'static str,
    },
}

/// Editable state for one questionnaire instance.
///
/// Identified by service name + lot + G-Cloud version; created on first
/// answer, mutated until locked, then immutable.
#[derive(Debug, Clone)]
pub struct QuestionnaireSession {
    pub service_name: String,
    pub lot: Lot,
    pub gcloud_version: String,
    schema: QuestionnaireSchema,
    answers: HashMap<String, AnswerValue>,
    /// Validation failures for list-type questions, keyed by question text
    /// so multiple list questions can show independent errors.
    list_errors: HashMap<String, FieldValidation>,
    current_section: usize,
    is_draft: bool,
    is_locked: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl QuestionnaireSession {
    /// Build a session from questionnaire data, restoring any saved
    /// answers. The lot must be a recognised framework lot; saved entries
    /// that no longer match a known question or its answer shape are
    /// skipped with a warning rather than failing the whole restore.
    pub fn new(data: QuestionnaireData) -> Result<Self, LotParseError> {
        let lot: Lot = data.lot.parse()?;
        let schema = QuestionnaireSchema::new(data.sections, data.section_order);
        let now = Utc::now();

        let mut session = Self {
            service_name: data.service_name,
            lot,
            gcloud_version: data.gcloud_version,
            schema,
            answers: HashMap::new(),
            list_errors: HashMap::new(),
            current_section: 0,
            is_draft: data.is_draft,
            is_locked: data.is_locked,
            created_at: now,
            updated_at: now,
        };

        if let Some(saved) = data.saved_answers {
            for (question_text, value) in saved {
                let Some((_, question)) = session.schema.find_question(&question_text) else {
                    log::warn!("Skipping saved answer for unknown question: {question_text}");
                    continue;
                };
                let question_type = question.question_type;
                match AnswerValue::from_json(question_type, &value) {
                    Some(answer) => {
                        if question_type == QuestionType::List {
                            if let AnswerValue::Items(items) = &answer {
                                session.record_list_validation(&question_text, items);
                            }
                        }
                        session.answers.insert(question_text, answer);
                    }
                    None => {
                        log::warn!(
                            "Skipping saved answer with wrong shape for '{question_text}' ({})",
                            question_type.as_str()
                        );
                    }
                }
            }
        }

        Ok(session)
    }

    pub fn schema(&self) -> &QuestionnaireSchema {
        &self.schema
    }

    pub fn is_draft(&self) -> bool {
        self.is_draft
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // ------------------------------------------------------------------
    // Section navigation
    // ------------------------------------------------------------------

    pub fn section_count(&self) -> usize {
        self.schema.section_order.len()
    }

    pub fn current_section_index(&self) -> usize {
        self.current_section
    }

    pub fn current_section_name(&self) -> Option<&str> {
        self.schema
            .section_order
            .get(self.current_section)
            .map(|name| name.as_str())
    }

    /// Move forward one section. No wraparound; a no-op at the last
    /// section or when locked. Returns the resulting index.
    pub fn next_section(&mut self) -> usize {
        if !self.is_locked {
            self.current_section = (self.current_section + 1).min(self.max_section_index());
        }
        self.current_section
    }

    /// Move back one section. No wraparound; a no-op at the first section
    /// or when locked. Returns the resulting index.
    pub fn previous_section(&mut self) -> usize {
        if !self.is_locked {
            self.current_section = self.current_section.saturating_sub(1);
        }
        self.current_section
    }

    /// Jump to a section index, clamped into range. No-op when locked.
    pub fn go_to_section(&mut self, index: usize) -> usize {
        if !self.is_locked {
            self.current_section = index.min(self.max_section_index());
        }
        self.current_section
    }

    fn max_section_index(&self) -> usize {
        self.section_count().saturating_sub(1)
    }

    // ------------------------------------------------------------------
    // Answer mutation
    // ------------------------------------------------------------------

    pub fn answer(&self, question_text: &str) -> Option<&AnswerValue> {
        self.answers.get(question_text)
    }

    /// Replace the answer for a question with a value of the matching
    /// shape. List answers are validated and their result recorded under
    /// the question text.
    pub fn set_answer(
        &mut self,
        question_text: &str,
        value: AnswerValue,
    ) -> Result<(), AnswerError> {
        let question_type = self.mutable_question_type(question_text)?;
        if !value.matches(question_type) {
            return Err(AnswerError::TypeMismatch {
                question: question_text.to_string(),
                expected: question_type.as_str(),
            });
        }

        if let AnswerValue::Items(items) = &value {
            self.record_list_validation(question_text, items);
        }

        self.answers.insert(question_text.to_string(), value);
        self.touch();
        Ok(())
    }

    /// Convenience for radio/text/textarea questions.
    pub fn set_scalar(
        &mut self,
        question_text: &str,
        value: impl Into<String>,
    ) -> Result<(), AnswerError> {
        self.set_answer(question_text, AnswerValue::Scalar(value.into()))
    }

    /// Toggle membership of an option in a checkbox answer set. Removing
    /// the last selected option removes the answer entirely, so a double
    /// toggle restores the original state.
    pub fn toggle_checkbox(
        &mut self,
        question_text: &str,
        option: &str,
        checked: bool,
    ) -> Result<(), AnswerError> {
        let question_type = self.mutable_question_type(question_text)?;
        if question_type != QuestionType::Checkbox {
            return Err(AnswerError::TypeMismatch {
                question: question_text.to_string(),
                expected: question_type.as_str(),
            });
        }

        let entry = self
            .answers
            .entry(question_text.to_string())
            .or_insert_with(|| AnswerValue::empty_for(QuestionType::Checkbox));
        let mut now_empty = false;
        if let AnswerValue::Selection(options) = entry {
            if checked {
                options.insert(option.to_string());
            } else {
                options.remove(option);
            }
            now_empty = options.is_empty();
        }
        if now_empty {
            self.answers.remove(question_text);
        }

        self.touch();
        Ok(())
    }

    /// Replace a list-type answer, returning the validation result so the
    /// caller can render live feedback.
    pub fn set_list_answer(
        &mut self,
        question_text: &str,
        items: Vec<String>,
    ) -> Result<FieldValidation, AnswerError> {
        let question_type = self.mutable_question_type(question_text)?;
        if question_type != QuestionType::List {
            return Err(AnswerError::TypeMismatch {
                question: question_text.to_string(),
                expected: question_type.as_str(),
            });
        }

        let validation = self.record_list_validation(question_text, &items);
        self.answers
            .insert(question_text.to_string(), AnswerValue::Items(items));
        self.touch();
        Ok(validation)
    }

    /// Lock check + question lookup shared by every mutator. The lock is
    /// checked first so a locked session rejects even unknown questions.
    fn mutable_question_type(&self, question_text: &str) -> Result<QuestionType, AnswerError> {
        if self.is_locked {
            return Err(AnswerError::Locked);
        }
        self.schema
            .find_question(question_text)
            .map(|(_, question)| question.question_type)
            .ok_or_else(|| AnswerError::UnknownQuestion(question_text.to_string()))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // ------------------------------------------------------------------
    // List validation (per-question variant of the fixed-field rule)
    // ------------------------------------------------------------------

    /// Validate list items for one question and record the failure under
    /// its text (or clear a previous one). Unlike the fixed
    /// features/benefits fields there is no minimum: an empty list is
    /// merely unanswered.
    fn record_list_validation(
        &mut self,
        question_text: &str,
        items: &[String],
    ) -> FieldValidation {
        let validation = validate_list_answer(items);
        if validation.is_valid {
            self.list_errors.remove(question_text);
        } else {
            self.list_errors
                .insert(question_text.to_string(), validation.clone());
        }
        validation
    }

    pub fn list_error(&self, question_text: &str) -> Option<&FieldValidation> {
        self.list_errors.get(question_text)
    }

    pub fn list_errors(&self) -> &HashMap<String, FieldValidation> {
        &self.list_errors
    }

    /// True when any list-type answer is currently invalid; final (non-
    /// draft) saves must be blocked while this holds.
    pub fn has_blocking_errors(&self) -> bool {
        !self.list_errors.is_empty()
    }

    // ------------------------------------------------------------------
    // Lifecycle and completion
    // ------------------------------------------------------------------

    /// Lock the response. Terminal: every subsequent mutation is rejected.
    pub fn lock(&mut self) {
        if !self.is_locked {
            log::info!(
                "Locking questionnaire responses for '{}' (lot {})",
                self.service_name,
                self.lot
            );
            self.is_locked = true;
            self.touch();
        }
    }

    /// Questions with a non-blank answer by the per-type emptiness rule
    pub fn answered_count(&self) -> usize {
        self.schema
            .ordered_sections()
            .flat_map(|(_, questions)| questions)
            .filter(|question| {
                self.answers
                    .get(&question.question_text)
                    .is_some_and(|answer| !answer.is_blank())
            })
            .count()
    }

    /// Completion percentage (0-100) for the analytics collaborator
    pub fn completion_percentage(&self) -> u8 {
        let total = self.schema.question_count();
        if total == 0 {
            return 0;
        }
        ((self.answered_count() as f32 / total as f32) * 100.0) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.schema.question_count() > 0 && self.answered_count() == self.schema.question_count()
    }

    /// Assemble the save request: one entry per non-blank answer, sections
    /// in schema order.
    pub fn to_save_request(&self, is_draft: bool) -> SaveResponseRequest {
        let mut answers = Vec::new();
        for (section_name, questions) in self.schema.ordered_sections() {
            for question in questions {
                let Some(answer) = self.answers.get(&question.question_text) else {
                    continue;
                };
                if answer.is_blank() {
                    continue;
                }
                answers.push(QuestionAnswer {
                    question_text: question.question_text.clone(),
                    question_type: question.question_type,
                    answer: answer.to_json(),
                    section_name: section_name.to_string(),
                });
            }
        }

        SaveResponseRequest {
            service_name: self.service_name.clone(),
            lot: self.lot.as_str().to_string(),
            gcloud_version: self.gcloud_version.clone(),
            answers,
            is_draft,
            is_locked: self.is_locked,
        }
    }
}

/// List-answer validation: max 10 items, each at most 10 words after
/// prefix stripping. First violation only, matching the fixed-field rule.
fn validate_list_answer(items: &[String]) -> FieldValidation {
    let valid_items: Vec<&String> = items.iter().filter(|item| !item.trim().is_empty()).collect();

    if valid_items.len() > MAX_LIST_ITEMS {
        return FieldValidation::invalid(format!(
            "Maximum {} items allowed ({} provided)",
            MAX_LIST_ITEMS,
            valid_items.len()
        ));
    }

    for item in &valid_items {
        let count = word_count(&strip_number_prefix(item));
        if count > MAX_ITEM_WORDS {
            return FieldValidation::invalid(format!(
                "Each item must be {} words or fewer (found {} words)",
                MAX_ITEM_WORDS, count
            ));
        }
    }

    FieldValidation::valid(format!(
        "Valid ({}/{} items)",
        valid_items.len(),
        MAX_LIST_ITEMS
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::schema::Question;
    use serde_json::json;
    use std::collections::HashMap as Map;

    fn question(text: &str, question_type: QuestionType) -> Question {
        Question {
            question_text: text.to_string(),
            question_type,
            answer_options: match question_type {
                QuestionType::Radio | QuestionType::Checkbox => {
                    Some(vec!["Yes".to_string(), "No".to_string()])
                }
                _ => None,
            },
            question_hint: None,
            question_advice: None,
        }
    }

    fn data() -> QuestionnaireData {
        let mut sections = Map::new();
        sections.insert(
            "Service details".to_string(),
            vec![
                question("Service type?", QuestionType::Radio),
                question("Certifications held?", QuestionType::Checkbox),
            ],
        );
        sections.insert(
            "Capabilities".to_string(),
            vec![
                question("Describe your approach", QuestionType::Textarea),
                question("Key tools used", QuestionType::List),
            ],
        );
        QuestionnaireData {
            service_name: "Cloud Backup".to_string(),
            lot: "3".to_string(),
            gcloud_version: "15".to_string(),
            sections,
            section_order: vec!["Service details".to_string(), "Capabilities".to_string()],
            saved_answers: None,
            is_draft: true,
            is_locked: false,
        }
    }

    #[test]
    fn test_navigation_clamps_without_wraparound() {
        let mut session = QuestionnaireSession::new(data()).unwrap();
        assert_eq!(session.current_section_index(), 0);
        assert_eq!(session.previous_section(), 0);
        assert_eq!(session.next_section(), 1);
        assert_eq!(session.next_section(), 1);
        assert_eq!(session.go_to_section(99), 1);
        assert_eq!(session.previous_section(), 0);
        assert_eq!(session.current_section_name(), Some("Service details"));
    }

    #[test]
    fn test_scalar_answer_replaces() {
        let mut session = QuestionnaireSession::new(data()).unwrap();
        session.set_scalar("Service type?", "IaaS").unwrap();
        session.set_scalar("Service type?", "SaaS").unwrap();
        assert_eq!(
            session.answer("Service type?"),
            Some(&AnswerValue::Scalar("SaaS".to_string()))
        );
    }

    #[test]
    fn test_checkbox_double_toggle_restores_state() {
        let mut session = QuestionnaireSession::new(data()).unwrap();
        session
            .toggle_checkbox("Certifications held?", "Yes", true)
            .unwrap();
        session
            .toggle_checkbox("Certifications held?", "Yes", false)
            .unwrap();
        assert_eq!(session.answer("Certifications held?"), None);
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let mut session = QuestionnaireSession::new(data()).unwrap();
        let err = session
            .set_answer(
                "Service type?",
                AnswerValue::Items(vec!["wrong".to_string()]),
            )
            .unwrap_err();
        assert!(matches!(err, AnswerError::TypeMismatch { .. }));

        let err = session
            .toggle_checkbox("Describe your approach", "Yes", true)
            .unwrap_err();
        assert!(matches!(err, AnswerError::TypeMismatch { .. }));
    }

    #[test]
    fn test_unknown_question_rejected() {
        let mut session = QuestionnaireSession::new(data()).unwrap();
        let err = session.set_scalar("Not a question", "value").unwrap_err();
        assert_eq!(
            err,
            AnswerError::UnknownQuestion("Not a question".to_string())
        );
    }

    #[test]
    fn test_lock_rejects_mutation_and_preserves_answers() {
        let mut session = QuestionnaireSession::new(data()).unwrap();
        session.set_scalar("Service type?", "IaaS").unwrap();
        session.lock();

        let before: Vec<_> = session.to_save_request(false).answers;
        assert_eq!(
            session.set_scalar("Service type?", "SaaS"),
            Err(AnswerError::Locked)
        );
        assert_eq!(
            session.toggle_checkbox("Certifications held?", "Yes", true),
            Err(AnswerError::Locked)
        );
        assert_eq!(
            session.set_list_answer("Key tools used", vec!["tool".to_string()]),
            Err(AnswerError::Locked)
        );
        assert_eq!(session.to_save_request(false).answers, before);

        // Navigation is disabled too
        assert_eq!(session.next_section(), 0);
    }

    #[test]
    fn test_list_errors_keyed_by_question() {
        let mut session = QuestionnaireSession::new(data()).unwrap();
        let long_item = vec!["word"; 11].join(" ");
        let validation = session
            .set_list_answer("Key tools used", vec![long_item])
            .unwrap();
        assert!(!validation.is_valid);
        assert!(session.list_error("Key tools used").is_some());
        assert!(session.has_blocking_errors());

        session
            .set_list_answer("Key tools used", vec!["Terraform".to_string()])
            .unwrap();
        assert!(session.list_error("Key tools used").is_none());
        assert!(!session.has_blocking_errors());
    }

    #[test]
    fn test_empty_list_answer_is_unanswered_not_invalid() {
        let mut session = QuestionnaireSession::new(data()).unwrap();
        let validation = session.set_list_answer("Key tools used", vec![]).unwrap();
        assert!(validation.is_valid);
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn test_completion_accounting() {
        let mut session = QuestionnaireSession::new(data()).unwrap();
        assert_eq!(session.completion_percentage(), 0);

        session.set_scalar("Service type?", "IaaS").unwrap();
        session.set_scalar("Describe your approach", "Carefully").unwrap();
        assert_eq!(session.answered_count(), 2);
        assert_eq!(session.completion_percentage(), 50);
        assert!(!session.is_complete());

        session
            .toggle_checkbox("Certifications held?", "Yes", true)
            .unwrap();
        session
            .set_list_answer("Key tools used", vec!["Terraform".to_string()])
            .unwrap();
        assert!(session.is_complete());
        assert_eq!(session.completion_percentage(), 100);
    }

    #[test]
    fn test_blank_scalar_counts_as_unanswered() {
        let mut session = QuestionnaireSession::new(data()).unwrap();
        session.set_scalar("Describe your approach", "   ").unwrap();
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn test_save_request_orders_by_section() {
        let mut session = QuestionnaireSession::new(data()).unwrap();
        session
            .set_list_answer("Key tools used", vec!["Terraform".to_string()])
            .unwrap();
        session.set_scalar("Service type?", "IaaS").unwrap();

        let request = session.to_save_request(true);
        assert_eq!(request.answers.len(), 2);
        assert_eq!(request.answers[0].question_text, "Service type?");
        assert_eq!(request.answers[0].section_name, "Service details");
        assert_eq!(request.answers[1].question_text, "Key tools used");
        assert!(request.is_draft);
        assert!(!request.is_locked);
    }

    #[test]
    fn test_restores_saved_answers_by_type() {
        let mut data = data();
        let mut saved = Map::new();
        saved.insert("Service type?".to_string(), json!("IaaS"));
        saved.insert("Certifications held?".to_string(), json!(["Yes"]));
        saved.insert("Key tools used".to_string(), json!(["Terraform", "Ansible"]));
        saved.insert("Gone question".to_string(), json!("ignored"));
        data.saved_answers = Some(saved);

        let session = QuestionnaireSession::new(data).unwrap();
        assert_eq!(session.answered_count(), 3);
        assert_eq!(
            session.answer("Key tools used"),
            Some(&AnswerValue::Items(vec![
                "Terraform".to_string(),
                "Ansible".to_string()
            ]))
        );
        assert_eq!(session.answer("Gone question"), None);
    }

    #[test]
    fn test_unknown_lot_rejected() {
        let mut data = data();
        data.lot = "4".to_string();
        let err = QuestionnaireSession::new(data).unwrap_err();
        assert!(err.to_string().contains("Invalid LOT: 4"));
    }

    #[test]
    fn test_lot_is_normalised_on_wire() {
        let mut data = data();
        data.lot = " 2A ".to_string();
        let session = QuestionnaireSession::new(data).unwrap();
        assert_eq!(session.lot, Lot::Lot2a);
        assert_eq!(session.to_save_request(true).lot, "2a");
    }
}
