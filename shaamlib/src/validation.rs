//! Модель ошибок валидации и проверки доменных сущностей.
//!
//! Проверки одни и те же для генерации и для разбора; отличается только реакция:
//! генератор в режиме fail-fast прерывается на первой ошибке, парсер всегда собирает всё.

use crate::{
    config::{GenerationMode, GenerationOptions, SoftwareInfo},
    error::{Result, ShaamError},
    field,
    model::{Account, Address, BusinessMetadata, DebitCredit, Document, InventoryItem, JournalEntry, ReportInput},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, io::Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Что именно нарушено. Сообщение в [`ValidationError`] выводится из этого значения.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    Required,
    TooLong { max: usize, actual: usize },
    NotNumeric { value: String },
    /// Идентификатор с буквами там, где допустимы только цифры.
    NonDigit { value: String },
    InvalidCode { value: String },
    /// Перевод строки, табуляция и прочие управляющие символы в значении поля.
    ControlCharacter { value: String },
    InvalidValue { message: String },
    /// Строка не разбирается: длина, тег, формат поля.
    Shape { message: String },
    UnknownRecord { code: String },
    CountMismatch { declared: u64, actual: u64 },
    UnknownSummaryType { code: String },
    MissingSummary { actual: u64 },
    TaxIdMismatch { header: String, metadata: String },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Required => write!(f, "required field is empty"),
            IssueKind::TooLong { max, actual } => {
                write!(f, "value has {actual} characters, at most {max} allowed")
            }
            IssueKind::NotNumeric { value } => write!(f, "value {value:?} is not numeric"),
            IssueKind::NonDigit { value } => {
                write!(f, "value {value:?} contains non-digit characters")
            }
            IssueKind::InvalidCode { value } => {
                write!(f, "code {value:?} is not in the allowed list")
            }
            IssueKind::ControlCharacter { value } => {
                write!(f, "value {value:?} contains control characters")
            }
            IssueKind::InvalidValue { message } | IssueKind::Shape { message } => {
                write!(f, "{message}")
            }
            IssueKind::UnknownRecord { code } => write!(f, "unknown record type {code:?}"),
            IssueKind::CountMismatch { declared, actual } => {
                write!(f, "declared {declared} record(s), found {actual}")
            }
            IssueKind::UnknownSummaryType { code } => {
                write!(f, "summary names unknown record type {code:?}")
            }
            IssueKind::MissingSummary { actual } => {
                write!(f, "{actual} record(s) present but not declared in the INI file")
            }
            IssueKind::TaxIdMismatch { header, metadata } => {
                write!(f, "A000 tax id {header} differs from A100 tax id {metadata}")
            }
        }
    }
}

/// Нарушение на уровне одного поля записи.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub kind: IssueKind,
}

impl FieldIssue {
    pub fn new(field: &'static str, kind: IssueKind) -> Self {
        FieldIssue { field, kind }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

/// Ошибка с контекстом, достаточным для диагностики без повторного разбора строки.
///
/// `record_index` — позиция сущности в своей коллекции либо номер строки в файле
/// (с нуля) для ошибок разбора строк.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub record_type: String,
    pub record_index: Option<usize>,
    pub field: String,
    pub message: String,
    pub severity: Severity,
    pub kind: IssueKind,
}

impl ValidationError {
    pub fn new(
        severity: Severity,
        record_type: impl Into<String>,
        record_index: Option<usize>,
        field: impl Into<String>,
        kind: IssueKind,
    ) -> Self {
        ValidationError {
            record_type: record_type.into(),
            record_index,
            field: field.into(),
            message: kind.to_string(),
            severity,
            kind,
        }
    }

    pub fn error(
        record_type: impl Into<String>,
        record_index: Option<usize>,
        field: impl Into<String>,
        kind: IssueKind,
    ) -> Self {
        Self::new(Severity::Error, record_type, record_index, field, kind)
    }

    pub fn warning(
        record_type: impl Into<String>,
        record_index: Option<usize>,
        field: impl Into<String>,
        kind: IssueKind,
    ) -> Self {
        Self::new(Severity::Warning, record_type, record_index, field, kind)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.record_type)?;
        if let Some(i) = self.record_index {
            write!(f, "[{i}]")?;
        }
        write!(f, ".{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

// Ширины полей, в которые попадают доменные значения.
const BUSINESS_ID: usize = 15;
const TAX_ID: usize = field::TAX_ID_WIDTH;
const DOCUMENT_ID: usize = 20;
const ACCOUNT_KEY: usize = 15;
const REFERENCE_DOCUMENT: usize = 20;
const CURRENCY_CODE: usize = 3;
const COUNTRY_CODE: usize = 2;
const MATCHING_FIELD: usize = 10;
const BRANCH_ID: usize = 7;
const ZIP: usize = 8;
const TRANSACTION_NUMBER: usize = 10;
const TRANSACTION_LINE_NUMBER: usize = 5;
const BATCH_NUMBER: usize = 8;
const CLASSIFICATION_CODE: usize = 4;
const ITEM_CODE: usize = 20;
const UNIT_COST: usize = 10;
const SOFTWARE_REG_NUMBER: usize = 8;
const FLAG: usize = 1;

#[derive(Debug, Clone, Copy)]
struct Scope {
    entity: &'static str,
    index: Option<usize>,
}

impl Scope {
    fn at(entity: &'static str, index: usize) -> Self {
        Scope {
            entity,
            index: Some(index),
        }
    }
}

/// Накопитель нарушений с проверками для каждой сущности.
#[derive(Debug, Default)]
pub struct Validator {
    fail_fast: bool,
    issues: Vec<ValidationError>,
}

impl Validator {
    pub fn new(mode: GenerationMode) -> Self {
        Validator {
            fail_fast: mode == GenerationMode::FailFast,
            issues: Vec::new(),
        }
    }

    /// Никогда не прерывается; используется парсером.
    pub fn collecting() -> Self {
        Self::default()
    }

    pub fn issues(&self) -> &[ValidationError] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<ValidationError> {
        self.issues
    }

    fn push(&mut self, issue: ValidationError) -> Result<()> {
        let stop = self.fail_fast && issue.is_error();
        self.issues.push(issue);
        if stop {
            return Err(ShaamError::Validation(std::mem::take(&mut self.issues)));
        }
        Ok(())
    }

    fn error(&mut self, scope: Scope, field: &str, kind: IssueKind) -> Result<()> {
        self.push(ValidationError::error(scope.entity, scope.index, field, kind))
    }

    fn warning(&mut self, scope: Scope, field: &str, kind: IssueKind) -> Result<()> {
        self.push(ValidationError::warning(scope.entity, scope.index, field, kind))
    }

    fn required(&mut self, scope: Scope, field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            self.error(scope, field, IssueKind::Required)?;
        }
        Ok(())
    }

    fn max_len(&mut self, scope: Scope, field: &str, value: Option<&str>, max: usize) -> Result<()> {
        let actual = value.map_or(0, |v| v.chars().count());
        if actual > max {
            self.error(scope, field, IssueKind::TooLong { max, actual })?;
        }
        Ok(())
    }

    fn identifier(&mut self, scope: Scope, field: &str, value: &str, max: usize) -> Result<()> {
        self.required(scope, field, value)?;
        self.max_len(scope, field, Some(value), max)
    }

    /// Цифры после нормализации; буквы — ошибка нормализации, а не обрезка.
    fn digits(&mut self, scope: Scope, field: &str, value: Option<&str>, max: usize) -> Result<()> {
        let Some(value) = value else {
            return Ok(());
        };
        match field::normalize_digits(value)? {
            Some(digits) => self.max_len(scope, field, Some(&digits), max),
            None => self.error(
                scope,
                field,
                IssueKind::NonDigit {
                    value: value.to_string(),
                },
            ),
        }
    }

    /// Значения, которые попадают в запись как есть и не должны её разрывать.
    fn single_line(&mut self, scope: Scope, fields: &[(&str, Option<&str>)]) -> Result<()> {
        for &(name, value) in fields {
            if let Some(value) = value.filter(|v| field::has_control_chars(v)) {
                self.error(
                    scope,
                    name,
                    IssueKind::ControlCharacter {
                        value: value.to_string(),
                    },
                )?;
            }
        }
        Ok(())
    }

    fn address(&mut self, scope: Scope, address: &Address) -> Result<()> {
        self.single_line(
            scope,
            &[
                ("address.street", address.street.as_deref()),
                ("address.house_number", address.house_number.as_deref()),
                ("address.city", address.city.as_deref()),
                ("address.zip", address.zip.as_deref()),
                ("address.country", address.country.as_deref()),
            ],
        )?;
        self.max_len(scope, "address.zip", address.zip.as_deref(), ZIP)
    }

    fn amount(&mut self, scope: Scope, field: &str, value: Option<Decimal>, width: usize) -> Result<()> {
        match value {
            Some(v) if !field::fits_signed(v, width) => self.error(
                scope,
                field,
                IssueKind::InvalidValue {
                    message: format!("amount {v} does not fit into {} digits", width - 1),
                },
            ),
            _ => Ok(()),
        }
    }

    fn number(&mut self, scope: Scope, field: &str, value: Option<u64>, digits: usize) -> Result<()> {
        let actual = value.map_or(0, |v| v.to_string().len());
        if actual > digits {
            self.error(scope, field, IssueKind::TooLong { max: digits, actual })?;
        }
        Ok(())
    }

    pub fn business_metadata(&mut self, m: &BusinessMetadata) -> Result<()> {
        let scope = Scope {
            entity: "BusinessMetadata",
            index: None,
        };
        self.identifier(scope, "business_id", &m.business_id, BUSINESS_ID)?;
        if !field::is_digits(&m.business_id) {
            self.error(
                scope,
                "business_id",
                IssueKind::NotNumeric {
                    value: m.business_id.clone(),
                },
            )?;
        }
        self.required(scope, "name", &m.name)?;
        self.single_line(scope, &[("name", Some(&m.name))])?;
        self.required(scope, "tax_id", &m.tax_id)?;
        self.digits(scope, "tax_id", Some(&m.tax_id), TAX_ID)?;
        if let Some(address) = &m.address {
            self.address(scope, address)?;
        }
        let period = &m.reporting_period;
        if period.start_date > period.end_date {
            self.error(
                scope,
                "reporting_period",
                IssueKind::InvalidValue {
                    message: format!(
                        "start date {} is after end date {}",
                        period.start_date, period.end_date
                    ),
                },
            )?;
        }
        Ok(())
    }

    pub fn document(&mut self, index: usize, d: &Document) -> Result<()> {
        let scope = Scope::at("Document", index);
        self.identifier(scope, "id", &d.id, DOCUMENT_ID)?;
        self.single_line(scope, &[("id", Some(&d.id)), ("description", d.description.as_deref())])?;
        self.amount(scope, "amount", Some(d.amount), field::MONETARY_WIDTH)
    }

    pub fn journal_entry(&mut self, index: usize, e: &JournalEntry) -> Result<()> {
        let scope = Scope::at("JournalEntry", index);
        self.required(scope, "id", &e.id)?;
        if !field::is_digits(&e.id) || e.id.len() > TRANSACTION_NUMBER {
            self.warning(
                scope,
                "id",
                IssueKind::InvalidValue {
                    message: format!(
                        "id {:?} is not a transaction number; the record sequence is written instead",
                        e.id
                    ),
                },
            )?;
        }
        self.identifier(scope, "account_key", &e.account_key, ACCOUNT_KEY)?;
        self.amount(scope, "amount", Some(e.amount), field::MONETARY_WIDTH)?;
        self.number(scope, "transaction_line_number", e.transaction_line_number, TRANSACTION_LINE_NUMBER)?;
        self.number(scope, "batch_number", e.batch_number, BATCH_NUMBER)?;
        self.max_len(scope, "reference_document", e.reference_document.as_deref(), REFERENCE_DOCUMENT)?;
        self.max_len(scope, "reference_document2", e.reference_document2.as_deref(), REFERENCE_DOCUMENT)?;
        self.max_len(scope, "counter_account_key", e.counter_account_key.as_deref(), ACCOUNT_KEY)?;
        self.max_len(scope, "currency_code", e.currency_code.as_deref(), CURRENCY_CODE)?;
        self.amount(scope, "foreign_currency_amount", e.foreign_currency_amount, field::MONETARY_WIDTH)?;
        self.amount(scope, "quantity", e.quantity, field::QUANTITY_WIDTH)?;
        self.max_len(scope, "matching_field1", e.matching_field1.as_deref(), MATCHING_FIELD)?;
        self.max_len(scope, "matching_field2", e.matching_field2.as_deref(), MATCHING_FIELD)?;
        self.max_len(scope, "branch_id", e.branch_id.as_deref(), BRANCH_ID)?;
        self.single_line(
            scope,
            &[
                ("account_key", Some(&e.account_key)),
                ("description", e.description.as_deref()),
                ("transaction_type", e.transaction_type.as_deref()),
                ("reference_document", e.reference_document.as_deref()),
                ("reference_document2", e.reference_document2.as_deref()),
                ("counter_account_key", e.counter_account_key.as_deref()),
                ("currency_code", e.currency_code.as_deref()),
                ("matching_field1", e.matching_field1.as_deref()),
                ("matching_field2", e.matching_field2.as_deref()),
                ("branch_id", e.branch_id.as_deref()),
                ("operator_username", e.operator_username.as_deref()),
            ],
        )?;
        if let Some(indicator) = e.debit_credit_indicator {
            if !e.amount.is_zero() && indicator != DebitCredit::for_amount(e.amount) {
                self.warning(
                    scope,
                    "debit_credit_indicator",
                    IssueKind::InvalidValue {
                        message: format!(
                            "indicator {} disagrees with the sign of amount {}; the indicator wins",
                            indicator.code(),
                            e.amount
                        ),
                    },
                )?;
            }
        }
        Ok(())
    }

    pub fn account(&mut self, index: usize, a: &Account) -> Result<()> {
        let scope = Scope::at("Account", index);
        self.identifier(scope, "id", &a.id, ACCOUNT_KEY)?;
        self.required(scope, "name", &a.name)?;
        self.identifier(scope, "sort_code.key", &a.sort_code.key, ACCOUNT_KEY)?;
        self.amount(scope, "opening_balance", Some(a.opening_balance), field::MONETARY_WIDTH)?;
        self.amount(scope, "total_debits", a.total_debits, field::MONETARY_WIDTH)?;
        self.amount(scope, "total_credits", a.total_credits, field::MONETARY_WIDTH)?;
        self.amount(
            scope,
            "opening_balance_foreign_currency",
            a.opening_balance_foreign_currency,
            field::MONETARY_WIDTH,
        )?;
        self.max_len(scope, "parent_account_key", a.parent_account_key.as_deref(), ACCOUNT_KEY)?;
        self.max_len(scope, "country_code", a.country_code.as_deref(), COUNTRY_CODE)?;
        self.max_len(scope, "foreign_currency_code", a.foreign_currency_code.as_deref(), CURRENCY_CODE)?;
        self.max_len(scope, "branch_id", a.branch_id.as_deref(), BRANCH_ID)?;
        self.digits(scope, "vat_id", a.vat_id.as_deref(), TAX_ID)?;
        self.digits(
            scope,
            "accounting_classification_code",
            a.accounting_classification_code.as_deref(),
            CLASSIFICATION_CODE,
        )?;
        self.single_line(
            scope,
            &[
                ("id", Some(&a.id)),
                ("name", Some(&a.name)),
                ("sort_code.key", Some(&a.sort_code.key)),
                ("sort_code.name", Some(&a.sort_code.name)),
                ("country_code", a.country_code.as_deref()),
                ("parent_account_key", a.parent_account_key.as_deref()),
                ("branch_id", a.branch_id.as_deref()),
                ("foreign_currency_code", a.foreign_currency_code.as_deref()),
            ],
        )?;
        if let Some(address) = &a.address {
            self.address(scope, address)?;
        }
        Ok(())
    }

    pub fn inventory_item(&mut self, index: usize, i: &InventoryItem) -> Result<()> {
        let scope = Scope::at("InventoryItem", index);
        self.identifier(scope, "id", &i.id, ITEM_CODE)?;
        self.required(scope, "name", &i.name)?;
        self.single_line(scope, &[("id", Some(&i.id)), ("name", Some(&i.name))])?;
        self.amount(scope, "quantity", Some(i.quantity), field::QUANTITY_WIDTH)?;
        self.amount(scope, "unit_price", Some(i.unit_price), UNIT_COST)
    }

    /// Сведения о программе из настроек: то, что попадёт в A000.
    pub fn software(&mut self, s: &SoftwareInfo) -> Result<()> {
        let scope = Scope {
            entity: "SoftwareInfo",
            index: None,
        };
        self.required(scope, "name", &s.name)?;
        self.single_line(
            scope,
            &[
                ("name", Some(&s.name)),
                ("version", Some(&s.version)),
                ("vendor_name", Some(&s.vendor_name)),
                ("output_path", Some(&s.output_path)),
                ("compression_software", Some(&s.compression_software)),
                ("base_currency", Some(&s.base_currency)),
            ],
        )?;
        self.digits(scope, "vendor_vat_id", Some(&s.vendor_vat_id), TAX_ID)?;
        self.max_len(scope, "base_currency", Some(s.base_currency.trim()), CURRENCY_CODE)?;
        for (name, value, width) in [
            ("registration_number", &s.registration_number, SOFTWARE_REG_NUMBER),
            ("software_type", &s.software_type, FLAG),
            ("accounting_type", &s.accounting_type, FLAG),
            ("balance_required", &s.balance_required, FLAG),
            ("language_code", &s.language_code, FLAG),
            ("character_set", &s.character_set, FLAG),
        ] {
            let value = value.trim();
            if !field::is_digits(value) {
                self.error(
                    scope,
                    name,
                    IssueKind::NotNumeric {
                        value: value.to_string(),
                    },
                )?;
            } else {
                self.max_len(scope, name, Some(value), width)?;
            }
        }
        Ok(())
    }

    pub fn report_input(&mut self, input: &ReportInput) -> Result<()> {
        self.business_metadata(&input.business)?;
        let period = input.business.reporting_period;
        for (i, d) in input.documents.iter().enumerate() {
            self.document(i, d)?;
            if d.date < period.start_date || d.date > period.end_date {
                self.warning(
                    Scope::at("Document", i),
                    "date",
                    IssueKind::InvalidValue {
                        message: format!("date {} is outside the reporting period", d.date),
                    },
                )?;
            }
        }
        for (i, e) in input.journal_entries.iter().enumerate() {
            self.journal_entry(i, e)?;
        }
        for (i, a) in input.accounts.iter().enumerate() {
            self.account(i, a)?;
        }
        for (i, item) in input.inventory.iter().enumerate() {
            self.inventory_item(i, item)?;
        }
        Ok(())
    }
}

/// Проверяет весь вход генератора. Возвращает предупреждения; любая ошибка — `Err`.
pub fn validate_report_input(input: &ReportInput, mode: GenerationMode) -> Result<Vec<ValidationError>> {
    let mut validator = Validator::new(mode);
    validator.report_input(input)?;
    warnings_only(validator)
}

/// Вход генератора вместе с настройками, которые попадут в заголовок.
pub fn validate_generation(input: &ReportInput, options: &GenerationOptions) -> Result<Vec<ValidationError>> {
    let mut validator = Validator::new(options.validation_mode);
    validator.software(&options.software)?;
    validator.report_input(input)?;
    warnings_only(validator)
}

fn warnings_only(validator: Validator) -> Result<Vec<ValidationError>> {
    let issues = validator.into_issues();
    if issues.iter().any(ValidationError::is_error) {
        return Err(ShaamError::Validation(issues));
    }
    Ok(issues)
}

#[derive(Serialize)]
struct CsvIssueRow<'a> {
    severity: Severity,
    record_type: &'a str,
    record_index: Option<usize>,
    field: &'a str,
    message: &'a str,
}

/// Выгружает список ошибок в CSV: severity,record_type,record_index,field,message
pub fn write_errors_csv<W: Write>(w: W, errors: &[ValidationError]) -> Result<()> {
    let mut wrt = csv::WriterBuilder::new().from_writer(w);
    for e in errors {
        wrt.serialize(CsvIssueRow {
            severity: e.severity,
            record_type: &e.record_type,
            record_index: e.record_index,
            field: &e.field,
            message: &e.message,
        })?;
    }
    wrt.flush()?;
    Ok(())
}

// Помощники для `FixedRecord::check`.

pub(crate) fn require(issues: &mut Vec<FieldIssue>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        issues.push(FieldIssue::new(field, IssueKind::Required));
    }
}

pub(crate) fn require_code(
    issues: &mut Vec<FieldIssue>,
    field: &'static str,
    value: Option<&str>,
    valid: impl Fn(&str) -> bool,
) {
    match value {
        Some(v) if !v.is_empty() && !valid(v) => issues.push(FieldIssue::new(
            field,
            IssueKind::InvalidCode {
                value: v.to_string(),
            },
        )),
        _ => {}
    }
}
