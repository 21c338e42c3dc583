use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::answers::{AnswerSet, ValidatedResponse, ValidationError, ValidationErrorKind};
use crate::mode::{ResponseMode, filter_for_mode};
use crate::spec::form::FormDef;
use crate::validate::{ValidationContext, validate_field};
use crate::visibility::evaluate_logic;

/// Submission-scoped rejection. Either form logic blocked the submission
/// outright, or at least one field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SubmissionError {
    #[error("submission prevented by form logic: {message}")]
    PreventSubmit { message: String },
    #[error("validation failed for {} field(s)", errors.len())]
    ValidationFailed { errors: Vec<ValidationError> },
}

/// Runs one submission attempt through logic evaluation, mode filtering, and
/// per-field validation, producing an all-or-nothing decision.
///
/// Errors are collected across every field (stable field-list order) rather
/// than short-circuiting, so the respondent gets complete feedback. Answers
/// keyed by ids the form does not know are rejected as unexpected.
pub fn assemble(
    form: &FormDef,
    mode: ResponseMode,
    answers: &AnswerSet,
    today: NaiveDate,
) -> Result<Vec<ValidatedResponse>, SubmissionError> {
    let outcome = evaluate_logic(form, answers);
    if let Some(message) = outcome.block {
        return Err(SubmissionError::PreventSubmit { message });
    }

    let fields = filter_for_mode(&form.fields, mode);
    let ctx = ValidationContext::new(mode, today);

    let mut errors = Vec::new();
    let mut responses = Vec::with_capacity(fields.len());
    for field in &fields {
        match validate_field(field, outcome.visible.contains(&field.id), answers.get(&field.id), &ctx)
        {
            Ok(response) => responses.push(response),
            Err(error) => errors.push(error),
        }
    }

    // Unknown ids are checked against the unfiltered field list: an answer
    // for a mode-dropped field is ignored, not unexpected.
    let known = form.field_ids();
    for field_id in answers.field_ids() {
        if !known.contains(field_id) {
            errors.push(ValidationError::new(
                field_id,
                ValidationErrorKind::UnexpectedField,
            ));
        }
    }

    if errors.is_empty() {
        Ok(responses)
    } else {
        Err(SubmissionError::ValidationFailed { errors })
    }
}
