use std::sync::LazyLock;

use regex::Regex;

use crate::answers::ValidationErrorKind;
use crate::spec::field::{FieldDescriptor, NumberValidation, RangeValidation, RatingOptions};

use super::text::check_length;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("number regex"));
static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("decimal regex"));

/// Number answers are digit strings; the configured validation then checks
/// either the string length or the numeric range.
pub(super) fn validate_number(
    field: &FieldDescriptor,
    answer: &str,
) -> Result<(), ValidationErrorKind> {
    if !NUMBER_RE.is_match(answer) {
        return Err(ValidationErrorKind::InvalidFormat);
    }
    match &field.validation.number {
        None => Ok(()),
        Some(NumberValidation::Length(length)) => check_length(answer.len() as u64, length),
        Some(NumberValidation::Range(range)) => {
            let value: f64 = answer
                .parse()
                .map_err(|_| ValidationErrorKind::InvalidFormat)?;
            check_range(value, range)
        }
    }
}

/// Decimal answers are plain decimal literals, bounded inclusively when a
/// range is configured.
pub(super) fn validate_decimal(
    field: &FieldDescriptor,
    answer: &str,
) -> Result<(), ValidationErrorKind> {
    if !DECIMAL_RE.is_match(answer) {
        return Err(ValidationErrorKind::InvalidFormat);
    }
    let value: f64 = answer
        .parse()
        .map_err(|_| ValidationErrorKind::InvalidFormat)?;
    if !value.is_finite() {
        return Err(ValidationErrorKind::InvalidFormat);
    }
    match &field.validation.decimal {
        Some(range) => check_range(value, range),
        None => Ok(()),
    }
}

/// Ratings are integers in `1..=steps`.
pub(super) fn validate_rating(
    field: &FieldDescriptor,
    answer: &str,
) -> Result<(), ValidationErrorKind> {
    let value: u32 = answer
        .parse()
        .map_err(|_| ValidationErrorKind::InvalidFormat)?;
    let steps = field.validation.rating.unwrap_or_default().steps;
    if (1..=steps).contains(&value) {
        Ok(())
    } else {
        Err(ValidationErrorKind::OutOfRange)
    }
}

fn check_range(value: f64, range: &RangeValidation) -> Result<(), ValidationErrorKind> {
    let above_min = range.custom_min.is_none_or(|min| min <= value);
    let below_max = range.custom_max.is_none_or(|max| value <= max);
    if above_min && below_max {
        Ok(())
    } else {
        Err(ValidationErrorKind::OutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::field::{FieldType, LengthCheck, TextLengthValidation};

    #[test]
    fn number_rejects_non_digit_input() {
        let field = FieldDescriptor::new("n", "N", FieldType::Number);
        assert!(validate_number(&field, "042").is_ok());
        assert_eq!(
            validate_number(&field, "4.2"),
            Err(ValidationErrorKind::InvalidFormat)
        );
        assert_eq!(
            validate_number(&field, "-1"),
            Err(ValidationErrorKind::InvalidFormat)
        );
    }

    #[test]
    fn number_range_bounds_are_inclusive() {
        let mut field = FieldDescriptor::new("n", "N", FieldType::Number);
        field.validation.number = Some(NumberValidation::Range(RangeValidation {
            custom_min: Some(5.0),
            custom_max: Some(10.0),
        }));
        assert!(validate_number(&field, "5").is_ok());
        assert!(validate_number(&field, "10").is_ok());
        assert_eq!(
            validate_number(&field, "11"),
            Err(ValidationErrorKind::OutOfRange)
        );
    }

    #[test]
    fn number_length_check_applies_to_digit_string() {
        let mut field = FieldDescriptor::new("n", "N", FieldType::Number);
        field.validation.number = Some(NumberValidation::Length(TextLengthValidation {
            selected: LengthCheck::Exact,
            custom_val: Some(8),
        }));
        assert!(validate_number(&field, "98765432").is_ok());
        assert_eq!(
            validate_number(&field, "987"),
            Err(ValidationErrorKind::OutOfRange)
        );
    }

    #[test]
    fn decimal_accepts_negative_and_fractional() {
        let field = FieldDescriptor::new("d", "D", FieldType::Decimal);
        assert!(validate_decimal(&field, "-3.5").is_ok());
        assert_eq!(
            validate_decimal(&field, "1e3"),
            Err(ValidationErrorKind::InvalidFormat)
        );
        assert_eq!(
            validate_decimal(&field, "3."),
            Err(ValidationErrorKind::InvalidFormat)
        );
    }

    #[test]
    fn rating_honours_configured_steps() {
        let mut field = FieldDescriptor::new("r", "R", FieldType::Rating);
        field.validation.rating = Some(RatingOptions { steps: 10 });
        assert!(validate_rating(&field, "10").is_ok());
        assert_eq!(
            validate_rating(&field, "0"),
            Err(ValidationErrorKind::OutOfRange)
        );
        assert_eq!(
            validate_rating(&field, "11"),
            Err(ValidationErrorKind::OutOfRange)
        );
    }
}
