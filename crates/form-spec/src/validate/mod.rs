mod attachment;
mod contact;
mod date;
mod identity;
mod numeric;
mod options;
mod table;
mod text;

use chrono::NaiveDate;

use crate::answers::{RawAnswer, ValidatedResponse, ValidationError, ValidationErrorKind};
use crate::mode::ResponseMode;
use crate::spec::field::{FieldDescriptor, FieldType};

/// Ambient inputs the validator needs but must not read itself: the response
/// mode fixes the attachment ceiling, `today` pins date-relative checks so
/// client and server evaluate identically.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext {
    pub mode: ResponseMode,
    pub today: NaiveDate,
}

impl ValidationContext {
    pub fn new(mode: ResponseMode, today: NaiveDate) -> Self {
        Self { mode, today }
    }
}

/// Validates one field's raw answer under the visibility computed by the
/// logic engine. Pure; every failure is a value naming the field.
///
/// Hidden (or disabled) fields validate trivially. When a hidden field
/// nonetheless carries an answer, the value is dropped rather than rejected,
/// so a respondent can never be blocked by a field they cannot see.
pub fn validate_field(
    field: &FieldDescriptor,
    is_visible: bool,
    raw: Option<&RawAnswer>,
    ctx: &ValidationContext,
) -> Result<ValidatedResponse, ValidationError> {
    if field.disabled || !is_visible {
        return Ok(ValidatedResponse::empty(field, false));
    }

    if !field.field_type.expects_answer() {
        // Presentation fields: any stray answer is dropped.
        return Ok(ValidatedResponse::empty(field, true));
    }

    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            return if field.required {
                Err(ValidationError::new(
                    &field.id,
                    ValidationErrorKind::MissingRequiredField,
                ))
            } else {
                Ok(ValidatedResponse::empty(field, true))
            };
        }
    };

    // Government-prefilled values are attested upstream; presence was
    // enforced above, format re-validation is skipped.
    if field.my_info {
        return Ok(passthrough(field, raw));
    }

    let fail = |kind: ValidationErrorKind| ValidationError::new(&field.id, kind);

    match field.field_type {
        FieldType::ShortText | FieldType::LongText => {
            let answer = single_answer(field, raw)?;
            text::validate_text(field, answer).map_err(fail)?;
            Ok(single_response(field, answer))
        }
        FieldType::Number => {
            let answer = single_answer(field, raw)?;
            numeric::validate_number(field, answer).map_err(fail)?;
            Ok(single_response(field, answer))
        }
        FieldType::Decimal => {
            let answer = single_answer(field, raw)?;
            numeric::validate_decimal(field, answer).map_err(fail)?;
            Ok(single_response(field, answer))
        }
        FieldType::Rating => {
            let answer = single_answer(field, raw)?;
            numeric::validate_rating(field, answer).map_err(fail)?;
            Ok(single_response(field, answer))
        }
        FieldType::YesNo => {
            let answer = single_answer(field, raw)?;
            options::validate_yes_no(answer).map_err(fail)?;
            Ok(single_response(field, answer))
        }
        FieldType::Dropdown => {
            let answer = single_answer(field, raw)?;
            options::validate_single_select(field, answer, false).map_err(fail)?;
            Ok(single_response(field, answer))
        }
        FieldType::CountryRegion => {
            let answer = single_answer(field, raw)?;
            options::validate_single_select(field, answer, true).map_err(fail)?;
            Ok(single_response(field, answer))
        }
        FieldType::Radio => {
            let answer = single_answer(field, raw)?;
            options::validate_radio(field, answer).map_err(fail)?;
            Ok(single_response(field, answer))
        }
        FieldType::Checkbox => {
            options::validate_checkbox(field, &raw.answer_array).map_err(fail)?;
            let mut response = ValidatedResponse::empty(field, true);
            response.answer_array = raw.answer_array.clone();
            Ok(response)
        }
        FieldType::Email => {
            let answer = single_answer(field, raw)?;
            contact::validate_email(field, answer, raw.signature.as_deref()).map_err(fail)?;
            let mut response = single_response(field, answer);
            response.signature = raw.signature.clone();
            Ok(response)
        }
        FieldType::Mobile => {
            let answer = single_answer(field, raw)?;
            contact::validate_mobile(field, answer, raw.signature.as_deref()).map_err(fail)?;
            let mut response = single_response(field, answer);
            response.signature = raw.signature.clone();
            Ok(response)
        }
        FieldType::HomePhone => {
            let answer = single_answer(field, raw)?;
            contact::validate_home_phone(field, answer).map_err(fail)?;
            Ok(single_response(field, answer))
        }
        FieldType::Date => {
            let answer = single_answer(field, raw)?;
            date::validate_date(field, answer, ctx.today).map_err(fail)?;
            Ok(single_response(field, answer))
        }
        FieldType::Nric => {
            let answer = single_answer(field, raw)?;
            if !identity::is_nric_valid(answer) {
                return Err(fail(ValidationErrorKind::InvalidFormat));
            }
            Ok(single_response(field, &answer.trim().to_uppercase()))
        }
        FieldType::Uen => {
            let answer = single_answer(field, raw)?;
            if !identity::is_uen_valid(answer, ctx.today) {
                return Err(fail(ValidationErrorKind::InvalidFormat));
            }
            Ok(single_response(field, &answer.trim().to_uppercase()))
        }
        FieldType::Attachment => {
            let content_hash = attachment::validate_attachment(field, raw, ctx.mode).map_err(fail)?;
            let mut response = ValidatedResponse::empty(field, true);
            response.answer = attachment::file_name(raw).to_string();
            response.content_hash = Some(content_hash);
            Ok(response)
        }
        FieldType::Table => {
            table::validate_table(field, raw, ctx)?;
            let mut response = ValidatedResponse::empty(field, true);
            response.rows = raw.rows.clone();
            Ok(response)
        }
        FieldType::Children => {
            if raw.rows.iter().any(|row| {
                row.is_empty() || row.iter().any(|entry| entry.trim().is_empty())
            }) {
                return Err(fail(ValidationErrorKind::MalformedRow));
            }
            let mut response = ValidatedResponse::empty(field, true);
            response.rows = raw.rows.clone();
            Ok(response)
        }
        // expects_answer() filtered these out above.
        FieldType::Statement | FieldType::Section | FieldType::Image => {
            Ok(ValidatedResponse::empty(field, true))
        }
    }
}

/// Extracts the trimmed single answer, rejecting array-shaped input for
/// single-answer field types.
fn single_answer<'a>(
    field: &FieldDescriptor,
    raw: &'a RawAnswer,
) -> Result<&'a str, ValidationError> {
    match raw.answer.as_deref().map(str::trim) {
        Some(answer) if !answer.is_empty() && raw.answer_array.is_empty() && raw.rows.is_empty() => {
            Ok(answer)
        }
        _ => Err(ValidationError::new(
            &field.id,
            ValidationErrorKind::InvalidFormat,
        )),
    }
}

fn single_response(field: &FieldDescriptor, answer: &str) -> ValidatedResponse {
    let mut response = ValidatedResponse::empty(field, true);
    response.answer = answer.to_string();
    response
}

/// Normalizes a MyInfo-prefilled answer without re-validating its format.
fn passthrough(field: &FieldDescriptor, raw: &RawAnswer) -> ValidatedResponse {
    let mut response = ValidatedResponse::empty(field, true);
    response.answer = raw
        .answer
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    response.answer_array = raw.answer_array.clone();
    response.rows = raw.rows.clone();
    response.signature = raw.signature.clone();
    response
}
