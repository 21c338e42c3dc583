use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::spec::field::{FieldDescriptor, FieldId, FieldType};

/// Uploaded file accompanying an attachment answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentContent {
    pub file_name: String,
    #[serde(default)]
    pub content: Vec<u8>,
}

/// Respondent-submitted value for one field.
///
/// Accepts shorthand JSON forms: a bare string, a string array (checkbox),
/// or an array of string arrays (table rows), besides the full object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(from = "RawAnswerRepr")]
pub struct RawAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answer_array: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentContent>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnswerRepr {
    Single(String),
    Array(Vec<String>),
    Rows(Vec<Vec<String>>),
    Full {
        #[serde(default)]
        answer: Option<String>,
        #[serde(default)]
        answer_array: Vec<String>,
        #[serde(default)]
        rows: Vec<Vec<String>>,
        #[serde(default)]
        signature: Option<String>,
        #[serde(default)]
        attachment: Option<AttachmentContent>,
    },
}

impl From<RawAnswerRepr> for RawAnswer {
    fn from(repr: RawAnswerRepr) -> Self {
        match repr {
            RawAnswerRepr::Single(answer) => Self::single(answer),
            RawAnswerRepr::Array(values) => Self::multi(values),
            RawAnswerRepr::Rows(rows) => Self::table(rows),
            RawAnswerRepr::Full {
                answer,
                answer_array,
                rows,
                signature,
                attachment,
            } => Self {
                answer,
                answer_array,
                rows,
                signature,
                attachment,
            },
        }
    }
}

impl RawAnswer {
    pub fn single(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            ..Self::default()
        }
    }

    pub fn multi<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self {
            answer_array: values.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn table(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// True when the respondent supplied nothing for this field.
    pub fn is_empty(&self) -> bool {
        self.answer.as_deref().is_none_or(|answer| answer.trim().is_empty())
            && self.answer_array.is_empty()
            && self.rows.is_empty()
            && self.attachment.is_none()
    }
}

/// All answers of one submission attempt, keyed by field id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct AnswerSet(pub BTreeMap<FieldId, RawAnswer>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field_id: &str) -> Option<&RawAnswer> {
        self.0.get(field_id)
    }

    pub fn insert(&mut self, field_id: impl Into<FieldId>, answer: RawAnswer) {
        self.0.insert(field_id.into(), answer);
    }

    pub fn field_ids(&self) -> impl Iterator<Item = &FieldId> {
        self.0.keys()
    }
}

impl<K: Into<FieldId>> FromIterator<(K, RawAnswer)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (K, RawAnswer)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(field_id, answer)| (field_id.into(), answer))
                .collect(),
        )
    }
}

/// A raw answer that survived validation, normalized for downstream
/// collaborators (storage writer, email composer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedResponse {
    pub field_id: FieldId,
    pub field_type: FieldType,
    pub is_visible: bool,
    /// Trimmed single answer; empty when the field holds no single value.
    #[serde(default)]
    pub answer: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answer_array: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Hex SHA-256 of attachment content, for downstream equality checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(default)]
    pub my_info: bool,
}

impl ValidatedResponse {
    /// Response carrying no answer: hidden fields, presentation fields, and
    /// optional fields left blank all normalize to this.
    pub fn empty(field: &FieldDescriptor, is_visible: bool) -> Self {
        Self {
            field_id: field.id.clone(),
            field_type: field.field_type,
            is_visible,
            answer: String::new(),
            answer_array: Vec::new(),
            rows: Vec::new(),
            signature: None,
            content_hash: None,
            my_info: field.my_info,
        }
    }
}

/// Field-scoped reason a single answer was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    #[error("required field has no answer")]
    MissingRequiredField,
    #[error("answer has an invalid format")]
    InvalidFormat,
    #[error("answer is out of the allowed range")]
    OutOfRange,
    #[error("answer is not one of the allowed options")]
    NotAnAllowedOption,
    #[error("duplicate options selected")]
    DuplicateSelection,
    #[error("fewer options selected than the allowed minimum")]
    TooFewSelections,
    #[error("more options selected than the allowed maximum")]
    TooManySelections,
    #[error("email domain is not allow-listed")]
    DisallowedEmailDomain,
    #[error("attachment exceeds the size limit")]
    AttachmentTooLarge,
    #[error("verified field is missing its signature")]
    MissingVerificationSignature,
    #[error("row count is out of the allowed range")]
    RowCountOutOfRange,
    #[error("row does not match the column layout")]
    MalformedRow,
    #[error("answer references a field not in the form")]
    UnexpectedField,
}

/// Validation failure for one field of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{field_id}: {kind}")]
pub struct ValidationError {
    pub field_id: FieldId,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn new(field_id: impl Into<FieldId>, kind: ValidationErrorKind) -> Self {
        Self {
            field_id: field_id.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_answer_accepts_shorthand_json() {
        let single: RawAnswer = serde_json::from_str(r#""hello""#).expect("single");
        assert_eq!(single.answer.as_deref(), Some("hello"));

        let multi: RawAnswer = serde_json::from_str(r#"["A", "B"]"#).expect("multi");
        assert_eq!(multi.answer_array, vec!["A", "B"]);

        let rows: RawAnswer = serde_json::from_str(r#"[["a", "b"]]"#).expect("rows");
        assert_eq!(rows.rows, vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn whitespace_only_answer_is_empty() {
        assert!(RawAnswer::single("   ").is_empty());
        assert!(!RawAnswer::single("x").is_empty());
        assert!(!RawAnswer::multi(["A"]).is_empty());
    }

    #[test]
    fn error_display_names_the_field() {
        let error = ValidationError::new("field-1", ValidationErrorKind::OutOfRange);
        assert_eq!(
            error.to_string(),
            "field-1: answer is out of the allowed range"
        );
    }
}
