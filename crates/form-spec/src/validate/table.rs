use crate::answers::{RawAnswer, ValidationError, ValidationErrorKind};
use crate::spec::field::FieldDescriptor;

use super::{ValidationContext, validate_field};

/// Table answers are rows of cells, one cell per column. Each cell is
/// validated by adapting its column into a synthetic field and re-entering
/// the ordinary dispatcher, so a table column accepts exactly what a
/// standalone field of that type would.
pub(super) fn validate_table(
    field: &FieldDescriptor,
    raw: &RawAnswer,
    ctx: &ValidationContext,
) -> Result<(), ValidationError> {
    let fail = |kind: ValidationErrorKind| ValidationError::new(&field.id, kind);

    let Some(options) = &field.validation.table else {
        // A table without a column layout cannot accept any rows.
        return Err(fail(ValidationErrorKind::MalformedRow));
    };

    let row_count = raw.rows.len() as u64;
    if row_count < options.minimum_rows
        || options.maximum_rows.is_some_and(|max| row_count > max)
    {
        return Err(fail(ValidationErrorKind::RowCountOutOfRange));
    }

    for row in &raw.rows {
        if row.len() != options.columns.len() {
            return Err(fail(ValidationErrorKind::MalformedRow));
        }
        for (cell, column) in row.iter().zip(&options.columns) {
            let synthetic = column.to_field();
            let cell_answer = if cell.trim().is_empty() {
                None
            } else {
                Some(RawAnswer::single(cell.clone()))
            };
            // Cell errors surface under the owning table's field id.
            validate_field(&synthetic, true, cell_answer.as_ref(), ctx)
                .map_err(|error| fail(error.kind))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::ResponseMode;
    use crate::spec::field::{Column, ColumnType, FieldType, TableOptions};

    fn ctx() -> ValidationContext {
        ValidationContext::new(
            ResponseMode::Encrypt,
            chrono::NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date"),
        )
    }

    fn table_field(minimum_rows: u64, maximum_rows: Option<u64>) -> FieldDescriptor {
        let mut field = FieldDescriptor::new("table", "Table", FieldType::Table);
        field.validation.table = Some(TableOptions {
            minimum_rows,
            maximum_rows,
            columns: vec![
                Column {
                    id: "name".into(),
                    title: "Name".into(),
                    column_type: ColumnType::ShortText,
                    required: true,
                    field_options: vec![],
                },
                Column {
                    id: "grade".into(),
                    title: "Grade".into(),
                    column_type: ColumnType::Dropdown,
                    required: false,
                    field_options: vec!["Pass".into(), "Fail".into()],
                },
            ],
        });
        field
    }

    fn rows(rows: &[&[&str]]) -> RawAnswer {
        RawAnswer::table(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn row_count_bounds_are_enforced() {
        let field = table_field(2, Some(3));
        let one = rows(&[&["Alice", "Pass"]]);
        assert_eq!(
            validate_table(&field, &one, &ctx()).expect_err("too few").kind,
            ValidationErrorKind::RowCountOutOfRange
        );
        let two = rows(&[&["Alice", "Pass"], &["Bob", "Fail"]]);
        assert!(validate_table(&field, &two, &ctx()).is_ok());
    }

    #[test]
    fn cell_validation_matches_standalone_field() {
        let field = table_field(0, None);
        let bad_option = rows(&[&["Alice", "Maybe"]]);
        assert_eq!(
            validate_table(&field, &bad_option, &ctx())
                .expect_err("unknown option")
                .kind,
            ValidationErrorKind::NotAnAllowedOption
        );
    }

    #[test]
    fn required_column_rejects_empty_cell() {
        let field = table_field(0, None);
        let missing = rows(&[&["", "Pass"]]);
        assert_eq!(
            validate_table(&field, &missing, &ctx())
                .expect_err("missing name")
                .kind,
            ValidationErrorKind::MissingRequiredField
        );
    }

    #[test]
    fn optional_column_accepts_empty_cell() {
        let field = table_field(0, None);
        let blank_grade = rows(&[&["Alice", ""]]);
        assert!(validate_table(&field, &blank_grade, &ctx()).is_ok());
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let field = table_field(0, None);
        let ragged = rows(&[&["Alice"]]);
        assert_eq!(
            validate_table(&field, &ragged, &ctx()).expect_err("ragged").kind,
            ValidationErrorKind::MalformedRow
        );
    }
}
