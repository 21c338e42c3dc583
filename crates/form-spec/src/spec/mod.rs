pub mod field;
pub mod form;
pub mod logic;

pub use field::{
    AttachmentOptions, Column, ColumnType, DateCheck, DateValidation, FieldDescriptor, FieldId,
    FieldType, LengthCheck, NumberValidation, RangeValidation, RatingOptions, SelectionLimits,
    TableOptions, TextLengthValidation, ValidationOptions,
};
pub use form::FormDef;
pub use logic::{Condition, ConditionState, ConditionValue, LogicClause, applicable_states};
