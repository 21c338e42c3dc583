use std::collections::BTreeSet;

use crate::answers::ValidationErrorKind;
use crate::spec::field::FieldDescriptor;
use crate::visibility::OTHERS_ANSWER_PREFIX;

pub(super) fn validate_yes_no(answer: &str) -> Result<(), ValidationErrorKind> {
    if answer == "Yes" || answer == "No" {
        Ok(())
    } else {
        Err(ValidationErrorKind::NotAnAllowedOption)
    }
}

/// Dropdown and CountryRegion membership check. CountryRegion additionally
/// accepts case-insensitive matches, since MyInfo prefills arrive uppercased.
pub(super) fn validate_single_select(
    field: &FieldDescriptor,
    answer: &str,
    case_insensitive: bool,
) -> Result<(), ValidationErrorKind> {
    let found = if case_insensitive {
        field
            .field_options
            .iter()
            .any(|option| option.eq_ignore_ascii_case(answer))
    } else {
        field.field_options.iter().any(|option| option == answer)
    };
    if found {
        Ok(())
    } else {
        Err(ValidationErrorKind::NotAnAllowedOption)
    }
}

pub(super) fn validate_radio(
    field: &FieldDescriptor,
    answer: &str,
) -> Result<(), ValidationErrorKind> {
    if field.field_options.iter().any(|option| option == answer) {
        return Ok(());
    }
    if field.allow_others && is_others_answer(answer) {
        return Ok(());
    }
    Err(ValidationErrorKind::NotAnAllowedOption)
}

/// Checkbox checks: selection-count limits first, then option validity,
/// then duplicates.
pub(super) fn validate_checkbox(
    field: &FieldDescriptor,
    selected: &[String],
) -> Result<(), ValidationErrorKind> {
    if selected.is_empty() {
        return Err(ValidationErrorKind::InvalidFormat);
    }

    if let Some(limits) = &field.validation.checkbox {
        if let Some(min) = limits.min_selected
            && (selected.len() as u64) < min
        {
            return Err(ValidationErrorKind::TooFewSelections);
        }
        if let Some(max) = limits.max_selected
            && (selected.len() as u64) > max
        {
            return Err(ValidationErrorKind::TooManySelections);
        }
    }

    for choice in selected {
        let known = field.field_options.iter().any(|option| option == choice);
        if !known && !(field.allow_others && is_others_answer(choice)) {
            return Err(ValidationErrorKind::NotAnAllowedOption);
        }
    }

    let distinct: BTreeSet<&str> = selected.iter().map(String::as_str).collect();
    if distinct.len() != selected.len() {
        return Err(ValidationErrorKind::DuplicateSelection);
    }

    Ok(())
}

/// `"Others: …"` with a non-empty free-text remainder.
fn is_others_answer(answer: &str) -> bool {
    answer
        .strip_prefix(OTHERS_ANSWER_PREFIX)
        .is_some_and(|rest| !rest.trim().is_empty())
}
