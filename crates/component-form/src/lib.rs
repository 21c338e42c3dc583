//! JSON-string facade over the form processing core.
//!
//! Every entry point takes and returns JSON strings so the component can be
//! embedded behind any transport without sharing Rust types. Failures are
//! reported in-band as `{"error": "..."}` payloads rather than panics.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

use form_spec::{AnswerSet, FormDef, ResponseMode, assemble, filter_for_mode};

const DEFAULT_FORM_DEF: &str = include_str!("../../form-spec/tests/fixtures/simple_form.json");

#[derive(Debug, Error)]
enum ComponentError {
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("failed to parse answers: {0}")]
    AnswersParse(#[source] serde_json::Error),
    #[error("form '{0}' is not available")]
    FormUnavailable(String),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
}

#[derive(Debug, Deserialize, Serialize, Default)]
struct ComponentConfig {
    #[serde(default)]
    form_def_json: Option<String>,
}

fn load_form_def(config_json: &str) -> Result<FormDef, ComponentError> {
    let config = if config_json.trim().is_empty() {
        ComponentConfig::default()
    } else {
        serde_json::from_str(config_json).map_err(ComponentError::ConfigParse)?
    };

    let def_json = config.form_def_json.as_deref().unwrap_or(DEFAULT_FORM_DEF);

    serde_json::from_str(def_json).map_err(ComponentError::ConfigParse)
}

fn ensure_form(form_id: &str, config_json: &str) -> Result<FormDef, ComponentError> {
    let form = load_form_def(config_json)?;
    if form.id != form_id {
        Err(ComponentError::FormUnavailable(form_id.to_string()))
    } else {
        Ok(form)
    }
}

fn parse_context(ctx_json: &str) -> Value {
    serde_json::from_str(ctx_json).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Mode override from the caller context; the form's own mode otherwise.
fn resolve_mode(ctx: &Value, form: &FormDef) -> ResponseMode {
    ctx.get("mode")
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or(form.response_mode)
}

/// `today` from the caller context so date checks are reproducible; the
/// current UTC date otherwise.
fn resolve_today(ctx: &Value) -> NaiveDate {
    ctx.get("today")
        .and_then(Value::as_str)
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| Utc::now().date_naive())
}

fn parse_answers(answers_json: &str) -> Result<AnswerSet, ComponentError> {
    serde_json::from_str(answers_json).map_err(ComponentError::AnswersParse)
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

/// Returns the form definition as seen by respondents in the given mode:
/// fields the mode drops are absent, and verifiable contact fields are
/// listed under `verified_field_ids`.
pub fn describe(form_id: &str, config_json: &str, ctx_json: &str) -> String {
    respond(ensure_form(form_id, config_json).and_then(|form| {
        let ctx = parse_context(ctx_json);
        let mode = resolve_mode(&ctx, &form);
        let fields = filter_for_mode(&form.fields, mode);
        let verified = form_spec::verified_field_ids(&fields, mode);
        tracing::debug!(form_id, ?mode, fields = fields.len(), "describe");
        let mode = serde_json::to_value(mode).map_err(ComponentError::JsonEncode)?;
        let fields = serde_json::to_value(&fields).map_err(ComponentError::JsonEncode)?;
        let logic = serde_json::to_value(&form.logic).map_err(ComponentError::JsonEncode)?;
        let verified = serde_json::to_value(&verified).map_err(ComponentError::JsonEncode)?;
        Ok(json!({
            "id": form.id,
            "title": form.title,
            "description": form.description,
            "response_mode": mode,
            "fields": fields,
            "logic": logic,
            "verified_field_ids": verified,
        }))
    }))
}

/// Runs only the logic pass: which fields are visible for these answers, and
/// whether a prevent-submit clause fires.
pub fn evaluate_logic(form_id: &str, config_json: &str, answers_json: &str) -> String {
    respond(ensure_form(form_id, config_json).and_then(|form| {
        let answers = parse_answers(answers_json)?;
        let outcome = form_spec::evaluate_logic(&form, &answers);
        tracing::debug!(
            form_id,
            visible = outcome.visible.len(),
            blocked = outcome.block.is_some(),
            "evaluate_logic"
        );
        let visible = serde_json::to_value(&outcome.visible).map_err(ComponentError::JsonEncode)?;
        Ok(json!({
            "visible": visible,
            "prevent_submit": outcome.block,
        }))
    }))
}

/// Validates answers without producing a submission. The response reports
/// `"valid"` plus the full error list, so callers can surface every problem
/// at once.
pub fn validate_answers(
    form_id: &str,
    config_json: &str,
    ctx_json: &str,
    answers_json: &str,
) -> String {
    respond(ensure_form(form_id, config_json).and_then(|form| {
        let ctx = parse_context(ctx_json);
        let mode = resolve_mode(&ctx, &form);
        let today = resolve_today(&ctx);
        let answers = parse_answers(answers_json)?;

        let value = match assemble(&form, mode, &answers, today) {
            Ok(_) => json!({ "valid": true, "errors": [] }),
            Err(rejection) => {
                let rejection =
                    serde_json::to_value(&rejection).map_err(ComponentError::JsonEncode)?;
                json!({ "valid": false, "rejection": rejection })
            }
        };
        Ok(value)
    }))
}

/// Full submission attempt: logic, mode filtering, validation, assembly.
/// On acceptance the response carries the validated field responses in form
/// order; on rejection it carries the structured reason.
pub fn submit(form_id: &str, config_json: &str, ctx_json: &str, answers_json: &str) -> String {
    respond(ensure_form(form_id, config_json).and_then(|form| {
        let ctx = parse_context(ctx_json);
        let mode = resolve_mode(&ctx, &form);
        let today = resolve_today(&ctx);
        let answers = parse_answers(answers_json)?;

        match assemble(&form, mode, &answers, today) {
            Ok(responses) => {
                tracing::info!(form_id, responses = responses.len(), "submission accepted");
                let responses =
                    serde_json::to_value(&responses).map_err(ComponentError::JsonEncode)?;
                Ok(json!({ "status": "accepted", "responses": responses }))
            }
            Err(rejection) => {
                tracing::info!(form_id, %rejection, "submission rejected");
                let rejection =
                    serde_json::to_value(&rejection).map_err(ComponentError::JsonEncode)?;
                Ok(json!({ "status": "rejected", "rejection": rejection }))
            }
        }
    }))
}
