use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::answers::ValidationErrorKind;
use crate::spec::field::{DateCheck, FieldDescriptor};

/// Dates are submitted as `DD MMM YYYY`, e.g. `09 Jan 2019`. The shape is
/// strict (two-digit day, three-letter month) before the calendar check.
static DATE_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2} [A-Z][a-z]{2} \d{4}$").expect("date regex"));

pub(super) fn validate_date(
    field: &FieldDescriptor,
    answer: &str,
    today: NaiveDate,
) -> Result<(), ValidationErrorKind> {
    if !DATE_SHAPE_RE.is_match(answer) {
        return Err(ValidationErrorKind::InvalidFormat);
    }
    let date = NaiveDate::parse_from_str(answer, "%d %b %Y")
        .map_err(|_| ValidationErrorKind::InvalidFormat)?;

    let Some(validation) = &field.validation.date else {
        return Ok(());
    };
    let ok = match validation.selected {
        DateCheck::NoFuture => date <= today,
        DateCheck::NoPast => date >= today,
        DateCheck::Custom => {
            validation.custom_min.is_none_or(|min| date >= min)
                && validation.custom_max.is_none_or(|max| date <= max)
        }
    };
    if ok {
        Ok(())
    } else {
        Err(ValidationErrorKind::OutOfRange)
    }
}
