use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::{FieldId, FieldType};

/// Comparison operator attached to a logic condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConditionState {
    Equal,
    Lte,
    Gte,
    Either,
}

/// Literal a condition compares the referenced field's answer against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(f64),
    Single(String),
    Multi(Vec<String>),
}

impl ConditionValue {
    /// The condition literals as trimmed strings, one entry per candidate.
    ///
    /// Old forms carry trailing whitespace in authored values, so trimming
    /// here keeps those clauses firing.
    pub fn candidates(&self) -> Vec<String> {
        match self {
            Self::Number(number) => vec![format_number(*number)],
            Self::Single(value) => vec![value.trim().to_string()],
            Self::Multi(values) => values.iter().map(|value| value.trim().to_string()).collect(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Single(value) => value.trim().parse().ok(),
            Self::Multi(_) => None,
        }
    }
}

fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        format!("{number}")
    }
}

/// One predicate over another field's current answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Condition {
    /// Lookup key into the answer set, not ownership of the field.
    pub field: FieldId,
    pub state: ConditionState,
    pub value: ConditionValue,
}

/// Admin-authored rule: either reveal fields or block submission.
///
/// Conditions within a clause are combined with AND; a field named by several
/// `ShowFields` clauses becomes visible when any one of them fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "logic_type", rename_all = "snake_case")]
pub enum LogicClause {
    ShowFields {
        conditions: Vec<Condition>,
        show: Vec<FieldId>,
    },
    PreventSubmit {
        conditions: Vec<Condition>,
        message: String,
    },
}

impl LogicClause {
    pub fn conditions(&self) -> &[Condition] {
        match self {
            Self::ShowFields { conditions, .. } | Self::PreventSubmit { conditions, .. } => {
                conditions
            }
        }
    }
}

/// Operator compatibility table: which condition states may reference a field
/// of the given type. Types absent from the table cannot drive logic at all.
pub fn applicable_states(field_type: FieldType) -> &'static [ConditionState] {
    use ConditionState::{Either, Equal, Gte, Lte};
    match field_type {
        FieldType::Dropdown | FieldType::Radio => &[Equal, Either],
        FieldType::Number | FieldType::Decimal | FieldType::Rating => &[Equal, Lte, Gte],
        FieldType::YesNo => &[Equal],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_values_are_trimmed() {
        let value = ConditionValue::Multi(vec!["Option 1 ".into(), " Option 2".into()]);
        assert_eq!(value.candidates(), vec!["Option 1", "Option 2"]);
    }

    #[test]
    fn numeric_condition_values_format_without_fraction() {
        assert_eq!(ConditionValue::Number(17.0).candidates(), vec!["17"]);
        assert_eq!(ConditionValue::Number(2.5).candidates(), vec!["2.5"]);
    }

    #[test]
    fn rating_supports_ordering_states() {
        let states = applicable_states(FieldType::Rating);
        assert!(states.contains(&ConditionState::Lte));
        assert!(states.contains(&ConditionState::Gte));
        assert!(!states.contains(&ConditionState::Either));
    }

    #[test]
    fn text_fields_cannot_drive_logic() {
        assert!(applicable_states(FieldType::LongText).is_empty());
        assert!(applicable_states(FieldType::Attachment).is_empty());
    }

    #[test]
    fn clause_deserializes_from_tagged_json() {
        let clause: LogicClause = serde_json::from_str(
            r#"{
                "logic_type": "show_fields",
                "conditions": [{"field": "f1", "state": "equal", "value": "A"}],
                "show": ["f2"]
            }"#,
        )
        .expect("clause json");
        match clause {
            LogicClause::ShowFields { conditions, show } => {
                assert_eq!(show, vec!["f2"]);
                assert_eq!(conditions[0].value, ConditionValue::Single("A".into()));
            }
            LogicClause::PreventSubmit { .. } => panic!("wrong variant"),
        }
    }
}
