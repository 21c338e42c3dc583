#![allow(missing_docs)]

pub mod answers;
pub mod assemble;
pub mod mode;
pub mod spec;
pub mod validate;
pub mod visibility;

pub use answers::{
    AnswerSet, AttachmentContent, RawAnswer, ValidatedResponse, ValidationError,
    ValidationErrorKind,
};
pub use assemble::{SubmissionError, assemble};
pub use mode::{
    ResponseMode, attachment_ceiling_bytes, email_mode_filter, encrypt_mode_filter,
    filter_for_mode, mode_predicate, multirespondent_mode_filter, verified_field_ids,
};
pub use spec::{
    Column, ColumnType, Condition, ConditionState, ConditionValue, FieldDescriptor, FieldId,
    FieldType, FormDef, LogicClause, ValidationOptions, applicable_states,
};
pub use validate::{ValidationContext, validate_field};
pub use visibility::{LogicOutcome, evaluate_logic, prevent_submit_message, resolve_visibility};
