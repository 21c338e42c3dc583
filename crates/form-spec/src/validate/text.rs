use crate::answers::ValidationErrorKind;
use crate::spec::field::{FieldDescriptor, LengthCheck, TextLengthValidation};

/// Character-count check for ShortText/LongText answers. A field without a
/// configured length validation accepts any non-empty answer.
pub(super) fn validate_text(
    field: &FieldDescriptor,
    answer: &str,
) -> Result<(), ValidationErrorKind> {
    match &field.validation.text {
        Some(validation) => check_length(answer.chars().count() as u64, validation),
        None => Ok(()),
    }
}

/// Shared by text fields and number digit-string length validation.
/// A validation with no `custom_val` configured is a no-op.
pub(super) fn check_length(
    len: u64,
    validation: &TextLengthValidation,
) -> Result<(), ValidationErrorKind> {
    let Some(expected) = validation.custom_val else {
        return Ok(());
    };
    let ok = match validation.selected {
        LengthCheck::Exact => len == expected,
        LengthCheck::Minimum => len >= expected,
        LengthCheck::Maximum => len <= expected,
    };
    if ok {
        Ok(())
    } else {
        Err(ValidationErrorKind::OutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::field::FieldType;

    fn text_field(selected: LengthCheck, custom_val: u64) -> FieldDescriptor {
        let mut field = FieldDescriptor::new("t", "T", FieldType::ShortText);
        field.validation.text = Some(TextLengthValidation {
            selected,
            custom_val: Some(custom_val),
        });
        field
    }

    #[test]
    fn exact_length_is_enforced() {
        let field = text_field(LengthCheck::Exact, 3);
        assert!(validate_text(&field, "abc").is_ok());
        assert_eq!(
            validate_text(&field, "abcd"),
            Err(ValidationErrorKind::OutOfRange)
        );
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let field = text_field(LengthCheck::Maximum, 2);
        assert!(validate_text(&field, "日本").is_ok());
        assert_eq!(
            validate_text(&field, "日本語"),
            Err(ValidationErrorKind::OutOfRange)
        );
    }

    #[test]
    fn missing_custom_val_disables_the_check() {
        let mut field = FieldDescriptor::new("t", "T", FieldType::LongText);
        field.validation.text = Some(TextLengthValidation {
            selected: LengthCheck::Minimum,
            custom_val: None,
        });
        assert!(validate_text(&field, "x").is_ok());
    }
}
