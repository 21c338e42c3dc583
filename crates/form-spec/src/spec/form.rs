use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::mode::ResponseMode;
use crate::spec::field::{FieldDescriptor, FieldId};
use crate::spec::logic::LogicClause;

/// Top-level form definition: the field list plus the logic clauses attached
/// to it. Immutable for the duration of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormDef {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub response_mode: ResponseMode,
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logic: Vec<LogicClause>,
}

impl FormDef {
    pub fn field(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn field_ids(&self) -> BTreeSet<FieldId> {
        self.fields.iter().map(|field| field.id.clone()).collect()
    }
}
