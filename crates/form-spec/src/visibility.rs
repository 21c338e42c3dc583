use std::collections::{BTreeMap, BTreeSet};

use crate::answers::{AnswerSet, RawAnswer};
use crate::spec::field::{FieldDescriptor, FieldId, FieldType};
use crate::spec::form::FormDef;
use crate::spec::logic::{Condition, ConditionState, LogicClause};

/// Sentinel prefix marking a free-text "Others" answer on Radio/Checkbox
/// fields. Conditions with the literal value `Others` match any such answer.
pub const OTHERS_ANSWER_PREFIX: &str = "Others: ";

/// Result of one logic evaluation pass over a form and its current answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicOutcome {
    pub visible: BTreeSet<FieldId>,
    pub block: Option<String>,
}

impl LogicOutcome {
    pub fn is_visible(&self, field_id: &str) -> bool {
        self.visible.contains(field_id)
    }
}

/// Evaluates all logic clauses against the current answers.
///
/// Referentially transparent: identical inputs always produce the identical
/// outcome, so the client-side preview and the authoritative server pass
/// cannot disagree.
pub fn evaluate_logic(form: &FormDef, answers: &AnswerSet) -> LogicOutcome {
    let visible = resolve_visibility(form, answers);
    let block = prevent_submit_message(form, answers, &visible).map(str::to_string);
    LogicOutcome { visible, block }
}

/// Computes the set of visible field ids.
///
/// A field with no `ShowFields` clause naming it is always visible. A field
/// named by at least one clause starts hidden and becomes visible once any
/// of its clauses fires. Clause firing requires every condition field to be
/// visible itself, so show-logic chains cascade; the loop runs to a fixpoint
/// because fields only ever flip from hidden to visible.
pub fn resolve_visibility(form: &FormDef, answers: &AnswerSet) -> BTreeSet<FieldId> {
    let grouped = group_show_clauses(form);
    let mut visible: BTreeSet<FieldId> = BTreeSet::new();

    let mut changed = true;
    while changed {
        changed = false;
        for field in &form.fields {
            if visible.contains(&field.id) {
                continue;
            }
            let newly_visible = match grouped.get(field.id.as_str()) {
                None => true,
                Some(clauses) => clauses
                    .iter()
                    .any(|conditions| clause_satisfied(conditions, form, answers, &visible)),
            };
            if newly_visible {
                visible.insert(field.id.clone());
                changed = true;
            }
        }
    }

    visible
}

/// Returns the message of the first firing `PreventSubmit` clause, in
/// clause-array order. All clauses share the firing rule of show logic.
pub fn prevent_submit_message<'a>(
    form: &'a FormDef,
    answers: &AnswerSet,
    visible: &BTreeSet<FieldId>,
) -> Option<&'a str> {
    let field_ids = form.field_ids();
    form.logic
        .iter()
        .filter_map(|clause| match clause {
            LogicClause::PreventSubmit {
                conditions,
                message,
            } => Some((conditions, message)),
            LogicClause::ShowFields { .. } => None,
        })
        .find(|(conditions, _)| {
            conditions
                .iter()
                .all(|condition| field_ids.contains(&condition.field))
                && clause_satisfied(conditions, form, answers, visible)
        })
        .map(|(_, message)| message.as_str())
}

/// Index of show-logic clauses keyed by the field id they reveal.
///
/// Clauses whose conditions reference a field id absent from the form are
/// discarded wholesale, and show targets that no longer exist are skipped:
/// stale logic from deleted fields must never fire.
fn group_show_clauses(form: &FormDef) -> BTreeMap<&str, Vec<&[Condition]>> {
    let field_ids = form.field_ids();
    let mut grouped: BTreeMap<&str, Vec<&[Condition]>> = BTreeMap::new();

    for clause in &form.logic {
        let LogicClause::ShowFields { conditions, show } = clause else {
            continue;
        };
        if !conditions
            .iter()
            .all(|condition| field_ids.contains(&condition.field))
        {
            continue;
        }
        for target in show {
            if field_ids.contains(target) {
                grouped.entry(target.as_str()).or_default().push(conditions);
            }
        }
    }

    grouped
}

/// AND within a clause: the clause fires only when every condition holds and
/// every condition's referenced field is currently visible.
fn clause_satisfied(
    conditions: &[Condition],
    form: &FormDef,
    answers: &AnswerSet,
    visible: &BTreeSet<FieldId>,
) -> bool {
    conditions.iter().all(|condition| {
        visible.contains(&condition.field)
            && form
                .field(&condition.field)
                .is_some_and(|field| condition_fulfilled(field, condition, answers.get(&field.id)))
    })
}

/// Evaluates one condition against the referenced field's current answer.
/// A missing, empty, or unparsable answer makes the condition false; logic
/// evaluation never errors on respondent input.
fn condition_fulfilled(
    field: &FieldDescriptor,
    condition: &Condition,
    raw: Option<&RawAnswer>,
) -> bool {
    let Some(answer) = raw.and_then(|raw| raw.answer.as_deref()) else {
        return false;
    };
    let answer = answer.trim();
    if answer.is_empty() {
        return false;
    }

    match condition.state {
        ConditionState::Lte => match (answer.parse::<f64>(), condition.value.as_f64()) {
            (Ok(current), Some(target)) => current <= target,
            _ => false,
        },
        ConditionState::Gte => match (answer.parse::<f64>(), condition.value.as_f64()) {
            (Ok(current), Some(target)) => current >= target,
            _ => false,
        },
        ConditionState::Equal | ConditionState::Either => {
            let candidates = condition.value.candidates();

            // A condition naming "Others" matches any free-text others answer.
            if field.field_type == FieldType::Radio
                && candidates.iter().any(|candidate| candidate == "Others")
                && answer.starts_with(OTHERS_ANSWER_PREFIX)
            {
                return true;
            }

            if field.field_type == FieldType::Decimal {
                let Ok(current) = answer.parse::<f64>() else {
                    return false;
                };
                return candidates
                    .iter()
                    .any(|candidate| candidate.parse::<f64>() == Ok(current));
            }

            candidates.iter().any(|candidate| candidate == answer)
        }
    }
}
