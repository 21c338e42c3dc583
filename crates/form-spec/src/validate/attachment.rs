use sha2::{Digest, Sha256};

use crate::answers::{RawAnswer, ValidationErrorKind};
use crate::mode::{ResponseMode, attachment_ceiling_bytes};
use crate::spec::field::FieldDescriptor;

/// Checks the uploaded file against the effective size limit and returns the
/// hex SHA-256 of its content for downstream equality checks.
pub(super) fn validate_attachment(
    field: &FieldDescriptor,
    raw: &RawAnswer,
    mode: ResponseMode,
) -> Result<String, ValidationErrorKind> {
    let Some(attachment) = &raw.attachment else {
        // An answer naming a file without its content is malformed.
        return Err(ValidationErrorKind::InvalidFormat);
    };
    if attachment.file_name.trim().is_empty() {
        return Err(ValidationErrorKind::InvalidFormat);
    }

    let limit = effective_limit_bytes(field, mode);
    if attachment.content.len() as u64 > limit {
        return Err(ValidationErrorKind::AttachmentTooLarge);
    }

    Ok(hex::encode(Sha256::digest(&attachment.content)))
}

pub(super) fn file_name(raw: &RawAnswer) -> &str {
    raw.attachment
        .as_ref()
        .map(|attachment| attachment.file_name.as_str())
        .or(raw.answer.as_deref())
        .unwrap_or_default()
}

/// The per-field cap may only lower the mode ceiling, never raise it.
fn effective_limit_bytes(field: &FieldDescriptor, mode: ResponseMode) -> u64 {
    let ceiling = attachment_ceiling_bytes(mode);
    match field.validation.attachment {
        Some(options) => ceiling.min(options.size_limit_mb * 1024 * 1024),
        None => ceiling,
    }
}
