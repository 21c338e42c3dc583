use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};

use form_spec::{FormDef, ResponseMode, applicable_states};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Form submission checker",
    long_about = "Validates submission files against form definitions, inspects conditional visibility, and lints logic clauses."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeArg {
    Email,
    Encrypt,
    Multirespondent,
}

impl From<ModeArg> for ResponseMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Email => ResponseMode::Email,
            ModeArg::Encrypt => ResponseMode::Encrypt,
            ModeArg::Multirespondent => ResponseMode::Multirespondent,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run a submission file through logic, mode filtering, and validation.
    Validate {
        /// Path to the form definition JSON.
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        /// Path to the answers JSON (field id -> answer).
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
        /// Override the form's response mode.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Reference date for date checks (YYYY-MM-DD, defaults to today).
        #[arg(long, value_name = "DATE")]
        today: Option<NaiveDate>,
    },
    /// Show which fields the answers make visible, and any submit block.
    Visibility {
        /// Path to the form definition JSON.
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        /// Path to the answers JSON.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
    },
    /// Check logic clauses for dangling references and operator mismatches.
    Lint {
        /// Path to the form definition JSON.
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> CliResult<ExitCode> {
    match command {
        Command::Validate {
            form,
            answers,
            mode,
            today,
        } => validate(&form, &answers, mode, today),
        Command::Visibility { form, answers } => visibility(&form, &answers),
        Command::Lint { form } => lint(&form),
    }
}

fn load_form(path: &Path) -> CliResult<(FormDef, String)> {
    let raw = fs::read_to_string(path)?;
    let form: FormDef = serde_json::from_str(&raw)?;
    Ok((form, raw))
}

fn validate(
    form_path: &Path,
    answers_path: &Path,
    mode: Option<ModeArg>,
    today: Option<NaiveDate>,
) -> CliResult<ExitCode> {
    let (form, form_json) = load_form(form_path)?;
    let answers_json = fs::read_to_string(answers_path)?;

    let config = json!({ "form_def_json": form_json }).to_string();
    let mut ctx = serde_json::Map::new();
    if let Some(mode) = mode {
        ctx.insert("mode".into(), serde_json::to_value(ResponseMode::from(mode))?);
    }
    if let Some(today) = today {
        ctx.insert("today".into(), Value::String(today.to_string()));
    }
    let ctx = Value::Object(ctx).to_string();

    let report: Value =
        serde_json::from_str(&component_form::submit(&form.id, &config, &ctx, &answers_json))?;
    if let Some(error) = report.get("error").and_then(Value::as_str) {
        return Err(error.into());
    }

    match report["status"].as_str() {
        Some("accepted") => {
            let count = report["responses"].as_array().map_or(0, Vec::len);
            println!("accepted: {count} field response(s)");
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            print_rejection(&report["rejection"]);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_rejection(rejection: &Value) {
    match rejection["reason"].as_str() {
        Some("prevent_submit") => {
            let message = rejection["message"].as_str().unwrap_or_default();
            println!("rejected: submission prevented by form logic: {message}");
        }
        _ => {
            println!("rejected: validation failed");
            if let Some(errors) = rejection["errors"].as_array() {
                for error in errors {
                    let field = error["field_id"].as_str().unwrap_or("?");
                    let kind = error["kind"].as_str().unwrap_or("?");
                    println!("  {field}: {kind}");
                }
            }
        }
    }
}

fn visibility(form_path: &Path, answers_path: &Path) -> CliResult<ExitCode> {
    let (form, form_json) = load_form(form_path)?;
    let answers_json = fs::read_to_string(answers_path)?;

    let config = json!({ "form_def_json": form_json }).to_string();
    let outcome: Value =
        serde_json::from_str(&component_form::evaluate_logic(&form.id, &config, &answers_json))?;
    if let Some(error) = outcome.get("error").and_then(Value::as_str) {
        return Err(error.into());
    }

    if let Some(visible) = outcome["visible"].as_array() {
        for id in visible {
            if let Some(id) = id.as_str() {
                println!("{id}");
            }
        }
    }
    if let Some(message) = outcome["prevent_submit"].as_str() {
        println!("prevent_submit: {message}");
    }
    Ok(ExitCode::SUCCESS)
}

fn lint(form_path: &Path) -> CliResult<ExitCode> {
    let (form, _) = load_form(form_path)?;
    let findings = lint_form(&form);
    for finding in &findings {
        println!("{finding}");
    }
    if findings.is_empty() {
        println!("ok: {} logic clause(s) checked", form.logic.len());
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Structural checks on a form definition: duplicate field ids, conditions
/// referring to fields that do not exist or cannot carry that operator, and
/// show-targets pointing nowhere.
fn lint_form(form: &FormDef) -> Vec<String> {
    let mut findings = Vec::new();

    let mut seen = BTreeSet::new();
    for field in &form.fields {
        if !seen.insert(&field.id) {
            findings.push(format!("duplicate field id '{}'", field.id));
        }
    }

    for (index, clause) in form.logic.iter().enumerate() {
        for condition in clause.conditions() {
            match form.field(&condition.field) {
                None => findings.push(format!(
                    "clause {index}: condition references unknown field '{}'",
                    condition.field
                )),
                Some(field) => {
                    let allowed = applicable_states(field.field_type);
                    if !allowed.contains(&condition.state) {
                        findings.push(format!(
                            "clause {index}: operator {:?} not applicable to {:?} field '{}'",
                            condition.state, field.field_type, field.id
                        ));
                    }
                }
            }
        }
        if let form_spec::LogicClause::ShowFields { show, .. } = clause {
            for target in show {
                if form.field(target).is_none() {
                    findings.push(format!(
                        "clause {index}: show target '{target}' does not exist"
                    ));
                }
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use form_spec::{
        Condition, ConditionState, ConditionValue, FieldDescriptor, FieldType, LogicClause,
    };

    fn form(fields: Vec<FieldDescriptor>, logic: Vec<LogicClause>) -> FormDef {
        FormDef {
            id: "lint-form".into(),
            title: "Lint".into(),
            description: None,
            response_mode: ResponseMode::Encrypt,
            fields,
            logic,
        }
    }

    #[test]
    fn clean_form_has_no_findings() {
        let form = form(
            vec![
                FieldDescriptor::new("a", "A", FieldType::YesNo),
                FieldDescriptor::new("b", "B", FieldType::ShortText),
            ],
            vec![LogicClause::ShowFields {
                conditions: vec![Condition {
                    field: "a".into(),
                    state: ConditionState::Equal,
                    value: ConditionValue::Single("Yes".into()),
                }],
                show: vec!["b".into()],
            }],
        );
        assert!(lint_form(&form).is_empty());
    }

    #[test]
    fn dangling_references_are_reported() {
        let form = form(
            vec![FieldDescriptor::new("a", "A", FieldType::YesNo)],
            vec![LogicClause::ShowFields {
                conditions: vec![Condition {
                    field: "gone".into(),
                    state: ConditionState::Equal,
                    value: ConditionValue::Single("Yes".into()),
                }],
                show: vec!["also-gone".into()],
            }],
        );
        let findings = lint_form(&form);
        assert_eq!(findings.len(), 2);
        assert!(findings[0].contains("unknown field 'gone'"));
        assert!(findings[1].contains("'also-gone'"));
    }

    #[test]
    fn operator_field_type_mismatch_is_reported() {
        let form = form(
            vec![
                FieldDescriptor::new("text", "Text", FieldType::ShortText),
                FieldDescriptor::new("b", "B", FieldType::ShortText),
            ],
            vec![LogicClause::ShowFields {
                conditions: vec![Condition {
                    field: "text".into(),
                    state: ConditionState::Lte,
                    value: ConditionValue::Number(3.0),
                }],
                show: vec!["b".into()],
            }],
        );
        let findings = lint_form(&form);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("not applicable"));
    }

    #[test]
    fn duplicate_field_ids_are_reported() {
        let form = form(
            vec![
                FieldDescriptor::new("a", "A", FieldType::ShortText),
                FieldDescriptor::new("a", "A again", FieldType::Number),
            ],
            Vec::new(),
        );
        let findings = lint_form(&form);
        assert_eq!(findings, vec!["duplicate field id 'a'".to_string()]);
    }

    const SAMPLE_FORM: &str = r#"{
        "id": "age-check",
        "title": "Age check",
        "response_mode": "encrypt",
        "fields": [
            { "id": "age", "title": "Age", "field_type": "number" },
            { "id": "consent", "title": "Consent", "field_type": "yes_no" }
        ],
        "logic": [
            {
                "logic_type": "prevent_submit",
                "conditions": [{ "field": "age", "state": "lte", "value": 17 }],
                "message": "Must be 18+"
            }
        ]
    }"#;

    fn sample_files(
        answers: &serde_json::Value,
    ) -> Result<assert_fs::TempDir, Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        workspace.child("form.json").write_str(SAMPLE_FORM)?;
        workspace
            .child("answers.json")
            .write_str(&answers.to_string())?;
        Ok(workspace)
    }

    #[test]
    fn validate_accepts_a_clean_submission() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = sample_files(&json!({ "age": "21", "consent": "Yes" }))?;

        let mut cmd = Command::cargo_bin("formproc")?;
        let assert = cmd
            .arg("validate")
            .arg("--form")
            .arg(workspace.path().join("form.json"))
            .arg("--answers")
            .arg(workspace.path().join("answers.json"))
            .assert()
            .success();
        let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
        assert!(stdout.contains("accepted"));

        Ok(())
    }

    #[test]
    fn validate_exits_nonzero_on_logic_block() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = sample_files(&json!({ "age": "16", "consent": "Yes" }))?;

        let mut cmd = Command::cargo_bin("formproc")?;
        let assert = cmd
            .arg("validate")
            .arg("--form")
            .arg(workspace.path().join("form.json"))
            .arg("--answers")
            .arg(workspace.path().join("answers.json"))
            .assert()
            .failure();
        let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
        assert!(stdout.contains("Must be 18+"));

        Ok(())
    }

    #[test]
    fn validate_lists_field_errors() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = sample_files(&json!({ "age": "21" }))?;

        let mut cmd = Command::cargo_bin("formproc")?;
        let assert = cmd
            .arg("validate")
            .arg("--form")
            .arg(workspace.path().join("form.json"))
            .arg("--answers")
            .arg(workspace.path().join("answers.json"))
            .assert()
            .failure();
        let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
        assert!(stdout.contains("consent: missing_required_field"));

        Ok(())
    }

    #[test]
    fn visibility_prints_visible_ids() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = sample_files(&json!({ "age": "21" }))?;

        let mut cmd = Command::cargo_bin("formproc")?;
        let assert = cmd
            .arg("visibility")
            .arg("--form")
            .arg(workspace.path().join("form.json"))
            .arg("--answers")
            .arg(workspace.path().join("answers.json"))
            .assert()
            .success();
        let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
        assert!(stdout.lines().any(|line| line == "age"));
        assert!(stdout.lines().any(|line| line == "consent"));

        Ok(())
    }

    #[test]
    fn lint_flags_a_broken_form() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let broken = r#"{
            "id": "broken",
            "title": "Broken",
            "response_mode": "encrypt",
            "fields": [{ "id": "a", "title": "A", "field_type": "short_text" }],
            "logic": [
                {
                    "logic_type": "show_fields",
                    "conditions": [{ "field": "missing", "state": "equal", "value": "x" }],
                    "show": ["a"]
                }
            ]
        }"#;
        workspace.child("form.json").write_str(broken)?;

        let mut cmd = Command::cargo_bin("formproc")?;
        let assert = cmd
            .arg("lint")
            .arg("--form")
            .arg(workspace.path().join("form.json"))
            .assert()
            .failure();
        let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
        assert!(stdout.contains("unknown field 'missing'"));

        Ok(())
    }
}
