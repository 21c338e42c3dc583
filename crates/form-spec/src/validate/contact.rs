use std::sync::LazyLock;

use globset::{Glob, GlobSetBuilder};
use regex::Regex;

use crate::answers::ValidationErrorKind;
use crate::spec::field::FieldDescriptor;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-.]*[A-Za-z0-9])?\.[A-Za-z]{2,}$")
        .expect("email regex")
});
// Singapore mobile numbers start with 8 or 9 after the country code.
static SG_MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+65[89]\d{7}$").expect("sg mobile regex"));
// Singapore landlines start with 3 or 6.
static SG_HOME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+65[36]\d{7}$").expect("sg landline regex"));
static INTL_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9]\d{7,14}$").expect("intl phone regex"));

pub(super) fn validate_email(
    field: &FieldDescriptor,
    answer: &str,
    signature: Option<&str>,
) -> Result<(), ValidationErrorKind> {
    if !EMAIL_RE.is_match(answer) {
        return Err(ValidationErrorKind::InvalidFormat);
    }
    if !field.allowed_email_domains.is_empty() {
        let domain = answer
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or_default();
        if !domain_allowed(domain, &field.allowed_email_domains) {
            return Err(ValidationErrorKind::DisallowedEmailDomain);
        }
    }
    check_signature(field, signature)
}

pub(super) fn validate_mobile(
    field: &FieldDescriptor,
    answer: &str,
    signature: Option<&str>,
) -> Result<(), ValidationErrorKind> {
    let ok = SG_MOBILE_RE.is_match(answer)
        || (field.allow_intl_numbers && INTL_PHONE_RE.is_match(answer));
    if !ok {
        return Err(ValidationErrorKind::InvalidFormat);
    }
    check_signature(field, signature)
}

pub(super) fn validate_home_phone(
    field: &FieldDescriptor,
    answer: &str,
) -> Result<(), ValidationErrorKind> {
    let ok = SG_HOME_RE.is_match(answer)
        || (field.allow_intl_numbers && INTL_PHONE_RE.is_match(answer));
    if ok {
        Ok(())
    } else {
        Err(ValidationErrorKind::InvalidFormat)
    }
}

/// Matches a domain against allow-list patterns like `@gmail.com` or
/// `@*.gov.sg`. A single wildcard is permitted, only as the leading label.
/// Malformed patterns never match.
pub(super) fn domain_allowed(domain: &str, patterns: &[String]) -> bool {
    let mut builder = GlobSetBuilder::new();
    let mut any = false;
    for pattern in patterns.iter().filter(|pattern| valid_domain_pattern(pattern)) {
        let glob = pattern.trim_start_matches('@').to_ascii_lowercase();
        if let Ok(glob) = Glob::new(&glob) {
            builder.add(glob);
            any = true;
        }
    }
    if !any {
        return false;
    }
    match builder.build() {
        Ok(set) => set.is_match(domain.to_ascii_lowercase()),
        Err(_) => false,
    }
}

/// `@` followed by either a literal domain or a `*.`-prefixed one.
pub fn valid_domain_pattern(pattern: &str) -> bool {
    let Some(rest) = pattern.strip_prefix('@') else {
        return false;
    };
    match rest.strip_prefix("*.") {
        Some(tail) => !tail.is_empty() && !tail.contains('*'),
        None => !rest.is_empty() && !rest.contains('*'),
    }
}

/// The signature's cryptographic validity is the verification collaborator's
/// concern; here only presence and shape are checked.
fn check_signature(
    field: &FieldDescriptor,
    signature: Option<&str>,
) -> Result<(), ValidationErrorKind> {
    if !field.verifiable {
        return Ok(());
    }
    match signature {
        Some(token)
            if token.len() >= 8 && token.chars().all(|c| c.is_ascii() && !c.is_whitespace()) =>
        {
            Ok(())
        }
        _ => Err(ValidationErrorKind::MissingVerificationSignature),
    }
}
