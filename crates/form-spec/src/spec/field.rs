use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stable identifier of a field within one form.
pub type FieldId = String;

/// Closed set of field types understood by the validator dispatcher.
///
/// Adding a variant is a breaking change on purpose: every `match` over this
/// enum is exhaustive, so a new type cannot reach production without a
/// validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    ShortText,
    LongText,
    Number,
    Decimal,
    Dropdown,
    Radio,
    Checkbox,
    YesNo,
    Rating,
    Email,
    Mobile,
    HomePhone,
    Date,
    Nric,
    Uen,
    CountryRegion,
    Table,
    Attachment,
    Statement,
    Section,
    Image,
    Children,
}

impl FieldType {
    /// Presentation-only types never expect an answer from the respondent.
    pub fn expects_answer(self) -> bool {
        !matches!(self, Self::Statement | Self::Section | Self::Image)
    }
}

/// Which side of a length constraint is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LengthCheck {
    Exact,
    Minimum,
    Maximum,
}

/// Character-count constraint for text answers and digit-strings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextLengthValidation {
    pub selected: LengthCheck,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_val: Option<u64>,
}

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct RangeValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_max: Option<f64>,
}

/// Number fields constrain either the digit-string length or the value range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum NumberValidation {
    Length(TextLengthValidation),
    Range(RangeValidation),
}

/// Selection-count bounds for checkbox fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct SelectionLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_selected: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_selected: Option<u64>,
}

/// Rating scale; answers must fall in `1..=steps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RatingOptions {
    pub steps: u32,
}

impl Default for RatingOptions {
    fn default() -> Self {
        Self { steps: 5 }
    }
}

/// Date range policy relative to the submission day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DateCheck {
    NoFuture,
    NoPast,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DateValidation {
    pub selected: DateCheck,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub custom_min: Option<chrono::NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub custom_max: Option<chrono::NaiveDate>,
}

/// Per-field attachment cap; the response mode supplies the hard ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AttachmentOptions {
    pub size_limit_mb: u64,
}

/// Column types a table may carry. Each column validates as a synthetic
/// field of the corresponding basic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    ShortText,
    Dropdown,
}

/// One column of a table field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub id: String,
    pub title: String,
    pub column_type: ColumnType,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_options: Vec<String>,
}

impl Column {
    /// Adapts the column into a standalone field descriptor so table cells
    /// re-enter the ordinary per-type validator.
    pub fn to_field(&self) -> FieldDescriptor {
        let field_type = match self.column_type {
            ColumnType::ShortText => FieldType::ShortText,
            ColumnType::Dropdown => FieldType::Dropdown,
        };
        let mut field = FieldDescriptor::new(&self.id, &self.title, field_type);
        field.required = self.required;
        field.field_options = self.field_options.clone();
        field
    }
}

/// Row-count bounds and column layout for a table field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TableOptions {
    #[serde(default)]
    pub minimum_rows: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_rows: Option<u64>,
    pub columns: Vec<Column>,
}

/// Type-specific constraint bundle. Only the entry matching the field's type
/// is consulted; the rest are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ValidationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextLengthValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<NumberValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal: Option<RangeValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkbox: Option<SelectionLimits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<RatingOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableOptions>,
}

fn default_required() -> bool {
    true
}

/// Normalized view of one form field: its type, constraints, and the
/// capability flags that modulate validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub title: String,
    pub field_type: FieldType,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_options: Vec<String>,
    /// Radio/Checkbox: accept a free-text `"Others: …"` answer.
    #[serde(default)]
    pub allow_others: bool,
    #[serde(default, skip_serializing_if = "is_default_validation")]
    pub validation: ValidationOptions,
    /// Email/Mobile: the response must carry an externally issued signature.
    #[serde(default)]
    pub verifiable: bool,
    /// Mobile/HomePhone: accept non-Singapore numbers.
    #[serde(default)]
    pub allow_intl_numbers: bool,
    /// Email: empty means any domain is accepted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_email_domains: Vec<String>,
    /// Government-prefilled; exempt from format re-validation, not presence.
    #[serde(default)]
    pub my_info: bool,
}

fn is_default_validation(validation: &ValidationOptions) -> bool {
    *validation == ValidationOptions::default()
}

impl FieldDescriptor {
    pub fn new(id: impl Into<FieldId>, title: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            field_type,
            required: true,
            disabled: false,
            field_options: Vec::new(),
            allow_others: false,
            validation: ValidationOptions::default(),
            verifiable: false,
            allow_intl_numbers: false,
            allowed_email_domains: Vec::new(),
            my_info: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_options<S: Into<String>>(mut self, options: impl IntoIterator<Item = S>) -> Self {
        self.field_options = options.into_iter().map(Into::into).collect();
        self
    }
}
