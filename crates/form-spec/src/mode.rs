use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::spec::field::{FieldDescriptor, FieldId, FieldType};

const MB: u64 = 1024 * 1024;

/// Delivery/storage strategy for a form's submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    Email,
    Encrypt,
    Multirespondent,
}

/// Predicate deciding whether a field participates in a response mode.
pub type ModePredicate = fn(&FieldDescriptor) -> bool;

/// Email rendering is a flattened question/answer list; presentation-only
/// fields have no place in it.
pub fn email_mode_filter(field: &FieldDescriptor) -> bool {
    !matches!(field.field_type, FieldType::Image | FieldType::Statement)
}

pub fn encrypt_mode_filter(_field: &FieldDescriptor) -> bool {
    true
}

pub fn multirespondent_mode_filter(_field: &FieldDescriptor) -> bool {
    true
}

/// Strategy table keyed by mode. Tests assert on predicate identity, not
/// just output, so the table stays the single source of truth.
pub fn mode_predicate(mode: ResponseMode) -> ModePredicate {
    match mode {
        ResponseMode::Email => email_mode_filter,
        ResponseMode::Encrypt => encrypt_mode_filter,
        ResponseMode::Multirespondent => multirespondent_mode_filter,
    }
}

/// Narrows the field list to those participating in `mode`. Idempotent.
pub fn filter_for_mode(fields: &[FieldDescriptor], mode: ResponseMode) -> Vec<FieldDescriptor> {
    let predicate = mode_predicate(mode);
    fields.iter().filter(|field| predicate(field)).cloned().collect()
}

/// The "verified content" subset consumed by the signing collaborator:
/// verifiable Email/Mobile fields, in stored modes only.
pub fn verified_field_ids(fields: &[FieldDescriptor], mode: ResponseMode) -> BTreeSet<FieldId> {
    match mode {
        ResponseMode::Email => BTreeSet::new(),
        ResponseMode::Encrypt | ResponseMode::Multirespondent => fields
            .iter()
            .filter(|field| {
                field.verifiable
                    && matches!(field.field_type, FieldType::Email | FieldType::Mobile)
            })
            .map(|field| field.id.clone())
            .collect(),
    }
}

/// Hard attachment ceiling per mode; a per-field cap may only lower it.
pub const fn attachment_ceiling_bytes(mode: ResponseMode) -> u64 {
    match mode {
        ResponseMode::Email => 7 * MB,
        ResponseMode::Encrypt | ResponseMode::Multirespondent => 20 * MB,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("text", "Text", FieldType::ShortText),
            FieldDescriptor::new("image", "Image", FieldType::Image),
            FieldDescriptor::new("statement", "Statement", FieldType::Statement),
        ]
    }

    #[test]
    fn email_mode_drops_presentation_fields() {
        let filtered = filter_for_mode(&fields(), ResponseMode::Email);
        let ids: Vec<_> = filtered.iter().map(|field| field.id.as_str()).collect();
        assert_eq!(ids, vec!["text"]);
    }

    #[test]
    fn stored_modes_keep_all_fields() {
        assert_eq!(filter_for_mode(&fields(), ResponseMode::Encrypt).len(), 3);
        assert_eq!(
            filter_for_mode(&fields(), ResponseMode::Multirespondent).len(),
            3
        );
    }

    #[test]
    fn mode_table_returns_the_named_predicates() {
        assert_eq!(
            mode_predicate(ResponseMode::Email) as usize,
            email_mode_filter as usize
        );
        assert_eq!(
            mode_predicate(ResponseMode::Encrypt) as usize,
            encrypt_mode_filter as usize
        );
    }

    #[test]
    fn filtering_is_idempotent() {
        let once = filter_for_mode(&fields(), ResponseMode::Email);
        let twice = filter_for_mode(&once, ResponseMode::Email);
        assert_eq!(once, twice);
    }

    #[test]
    fn verified_subset_only_in_stored_modes() {
        let mut email_field = FieldDescriptor::new("email", "Email", FieldType::Email);
        email_field.verifiable = true;
        let fields = vec![email_field];

        assert!(verified_field_ids(&fields, ResponseMode::Email).is_empty());
        assert!(verified_field_ids(&fields, ResponseMode::Encrypt).contains("email"));
    }

    #[test]
    fn attachment_ceiling_depends_on_mode() {
        assert_eq!(attachment_ceiling_bytes(ResponseMode::Email), 7 * MB);
        assert_eq!(attachment_ceiling_bytes(ResponseMode::Encrypt), 20 * MB);
    }
}
