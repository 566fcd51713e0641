//! Разбор пары файлов обратно в доменные данные с отчётом об ошибках.
//!
//! Разбор устойчив: плохая строка превращается в запись об ошибке, и чтение идёт дальше.
//! Прервать весь вызов может только строгий режим с запретом частичных данных.

use crate::{
    config::{ParseMode, ParseOptions},
    error::{Result, ShaamError},
    field, layout,
    model::{
        Account, Address, BusinessMetadata, DebitCredit, Document, DocumentType, InventoryItem, JournalEntry,
        ReportInput, ReportingPeriod, SortCode,
    },
    record::{Record, RecordType},
    records::{
        a000::{SummaryRecord, A000},
        a100::A100,
        b100::B100,
        b110::B110,
        c100::C100,
        d110::D110,
        d120::D120,
        m100::M100,
        z900::Z900,
    },
    traits::FixedRecord,
    validation::{IssueKind, Severity, ValidationError, Validator},
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// `record_type` для ошибок перекрёстной сверки.
pub const CROSS_VALIDATION: &str = "CrossValidation";

/// Все успешно декодированные записи, сгруппированные по типу.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedRecords {
    pub header: Option<A000>,
    pub summaries: Vec<SummaryRecord>,
    pub a100: Vec<A100>,
    pub b100: Vec<B100>,
    pub b110: Vec<B110>,
    pub c100: Vec<C100>,
    pub d110: Vec<D110>,
    pub d120: Vec<D120>,
    pub m100: Vec<M100>,
    pub z900: Vec<Z900>,
}

impl ParsedRecords {
    pub fn count(&self, kind: RecordType) -> usize {
        match kind {
            RecordType::A000 => usize::from(self.header.is_some()),
            RecordType::A100 => self.a100.len(),
            RecordType::B100 => self.b100.len(),
            RecordType::B110 => self.b110.len(),
            RecordType::C100 => self.c100.len(),
            RecordType::D110 => self.d110.len(),
            RecordType::D120 => self.d120.len(),
            RecordType::M100 => self.m100.len(),
            RecordType::Z900 => self.z900.len(),
        }
    }

    fn push(&mut self, record: Record) {
        match record {
            Record::A000(r) => self.header = Some(r),
            Record::A100(r) => self.a100.push(r),
            Record::B100(r) => self.b100.push(r),
            Record::B110(r) => self.b110.push(r),
            Record::C100(r) => self.c100.push(r),
            Record::D110(r) => self.d110.push(r),
            Record::D120(r) => self.d120.push(r),
            Record::M100(r) => self.m100.push(r),
            Record::Z900(r) => self.z900.push(r),
        }
    }

    fn data_records(&self) -> usize {
        RecordType::DATA.iter().map(|&k| self.count(k)).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseSummary {
    /// Декодированные строки обоих файлов.
    pub total_records: usize,
    pub per_type: BTreeMap<RecordType, usize>,
    pub errors: Vec<ValidationError>,
    pub cross_validation_passed: bool,
}

impl ParseSummary {
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(ValidationError::is_error)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    pub data: ReportInput,
    pub summary: ParseSummary,
    pub records: ParsedRecords,
}

pub fn parse(ini_text: &str, data_text: &str, options: &ParseOptions) -> Result<ParseResult> {
    info!(mode = ?options.validation_mode, "parsing uniform-format report");
    let mut issues = Vec::new();
    let mut records = ParsedRecords::default();

    let ini_lines = read_ini(ini_text, &mut records, &mut issues);
    read_data(data_text, options, &mut records, &mut issues);
    debug!(
        ini_lines,
        data_records = records.data_records(),
        issues = issues.len(),
        "lines decoded"
    );

    let data = build_report(&records, &mut issues);

    if options.validation_mode != ParseMode::None {
        let mut validator = Validator::collecting();
        validator.report_input(&data)?;
        issues.extend(validator.into_issues());
    }

    let cross_validation_passed = cross_validate(&records, &mut issues);

    let per_type: BTreeMap<RecordType, usize> = RecordType::DATA
        .iter()
        .map(|&k| (k, records.count(k)))
        .filter(|&(_, n)| n > 0)
        .collect();
    let summary = ParseSummary {
        total_records: ini_lines + records.data_records(),
        per_type,
        errors: issues,
        cross_validation_passed,
    };

    if options.validation_mode == ParseMode::Strict && !options.allow_partial_data && summary.has_errors() {
        return Err(ShaamError::Validation(summary.errors));
    }
    info!(
        total_records = summary.total_records,
        issues = summary.errors.len(),
        cross_validation_passed,
        "report parsed"
    );
    Ok(ParseResult {
        data,
        summary,
        records,
    })
}

/// Непустые строки с их номером в файле (с нуля).
fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty())
}

/// Возвращает число декодированных строк INI.
fn read_ini(text: &str, records: &mut ParsedRecords, issues: &mut Vec<ValidationError>) -> usize {
    let mut decoded = 0;
    for (index, line) in lines(text) {
        if layout::tag_of(line) == A000::CODE {
            match A000::decode(line) {
                Ok(_) if records.header.is_some() => issues.push(ValidationError::error(
                    A000::CODE,
                    Some(index),
                    "code",
                    IssueKind::Shape {
                        message: "duplicate A000 header".into(),
                    },
                )),
                Ok(header) => {
                    records.header = Some(header);
                    decoded += 1;
                }
                Err(e) => issues.extend(decode_issues(A000::CODE, index, e)),
            }
        } else {
            match SummaryRecord::decode(line) {
                Ok(summary) => {
                    records.summaries.push(summary);
                    decoded += 1;
                }
                Err(e) => issues.extend(decode_issues(SummaryRecord::NAME, index, e)),
            }
        }
    }
    decoded
}

fn read_data(
    text: &str,
    options: &ParseOptions,
    records: &mut ParsedRecords,
    issues: &mut Vec<ValidationError>,
) {
    for (index, line) in lines(text) {
        let tag = layout::tag_of(line);
        match RecordType::from_code(&tag).filter(|&k| k != RecordType::A000) {
            Some(kind) => match Record::decode(line) {
                Ok(record) => records.push(record),
                Err(e) => issues.extend(decode_issues(kind.code(), index, e)),
            },
            None if options.skip_unknown_records => {
                warn!(line = index, tag = %tag, "skipping unknown record");
            }
            None => {
                let severity = if options.validation_mode == ParseMode::Strict {
                    Severity::Error
                } else {
                    Severity::Warning
                };
                issues.push(ValidationError::new(
                    severity,
                    tag.clone(),
                    Some(index),
                    "code",
                    IssueKind::UnknownRecord { code: tag },
                ));
            }
        }
    }
}

/// Ошибку декодирования строки раскладывает в ошибки по полям, где это возможно.
fn decode_issues(record: &str, index: usize, err: ShaamError) -> Vec<ValidationError> {
    let issue = |field: &str, kind| ValidationError::error(record, Some(index), field, kind);
    match err {
        ShaamError::Schema { issues, .. } => issues.into_iter().map(|i| issue(i.field, i.kind)).collect(),
        ShaamError::Field { field, message, .. } => vec![issue(field, IssueKind::Shape { message })],
        ShaamError::Tag { .. } => vec![issue(
            "code",
            IssueKind::Shape {
                message: err.to_string(),
            },
        )],
        other => vec![issue(
            "line",
            IssueKind::Shape {
                message: other.to_string(),
            },
        )],
    }
}

fn build_report(records: &ParsedRecords, issues: &mut Vec<ValidationError>) -> ReportInput {
    let descriptions: HashMap<(&str, &str), &str> = records
        .d110
        .iter()
        .filter_map(|d| {
            let text = d.goods_service_description.as_deref()?;
            Some(((d.document_type.as_str(), d.document_number.as_str()), text))
        })
        .collect();

    ReportInput {
        business: business_metadata(records, issues),
        documents: records
            .c100
            .iter()
            .filter_map(|c| {
                let doc_type = DocumentType::from_code(&c.document_type)?;
                let description = descriptions
                    .get(&(c.document_type.as_str(), c.document_id.as_str()))
                    .map(|s| s.to_string());
                Some(Document {
                    id: c.document_id.clone(),
                    doc_type,
                    date: c.document_issue_date,
                    amount: c.amount_including_vat,
                    description,
                })
            })
            .collect(),
        journal_entries: records.b100.iter().map(journal_entry).collect(),
        accounts: records.b110.iter().map(account).collect(),
        inventory: records
            .m100
            .iter()
            .map(|m| InventoryItem {
                id: m.internal_item_code.clone(),
                name: m.item_name.clone(),
                quantity: m.opening_stock.unwrap_or(Decimal::ZERO),
                unit_price: m.end_period_cost_not_in_bond.unwrap_or(Decimal::ZERO),
            })
            .collect(),
    }
}

fn business_metadata(records: &ParsedRecords, issues: &mut Vec<ValidationError>) -> BusinessMetadata {
    if let Some(h) = &records.header {
        return BusinessMetadata {
            business_id: h.primary_identifier.clone(),
            name: h.business_name.clone(),
            tax_id: tax_id(&h.vat_id),
            address: Address::from_parts(
                h.business_street.clone(),
                h.business_house_number.clone(),
                h.business_city.clone(),
                h.business_zip.clone(),
                None,
            ),
            reporting_period: ReportingPeriod {
                start_date: h.start_date,
                end_date: h.end_date,
            },
        };
    }

    let fallback = records.a100.first();
    let missing = ValidationError::new(
        if fallback.is_some() {
            Severity::Warning
        } else {
            Severity::Error
        },
        A000::CODE,
        None,
        "header",
        IssueKind::Required,
    );
    issues.push(missing);
    BusinessMetadata {
        business_id: fallback.map(|a| a.primary_identifier.clone()).unwrap_or_default(),
        name: String::new(),
        tax_id: fallback.map(|a| tax_id(&a.vat_id)).unwrap_or_default(),
        address: None,
        reporting_period: ReportingPeriod {
            start_date: Default::default(),
            end_date: Default::default(),
        },
    }
}

fn journal_entry(b: &B100) -> JournalEntry {
    let indicator = b.indicator();
    let amount = match indicator {
        Some(DebitCredit::Credit) if !b.transaction_amount.is_zero() => -b.transaction_amount,
        _ => b.transaction_amount,
    };
    JournalEntry {
        id: b.transaction_number.to_string(),
        date: b.date,
        amount,
        account_key: b.account_key.clone(),
        description: b.details.clone(),
        transaction_line_number: b.transaction_line_number,
        batch_number: b.batch_number,
        transaction_type: b.transaction_type.clone(),
        reference_document: b.reference_document.clone(),
        reference_document_type: b.reference_document_type.as_deref().and_then(DocumentType::from_code),
        reference_document2: b.reference_document2.clone(),
        reference_document_type2: b.reference_document_type2.as_deref().and_then(DocumentType::from_code),
        value_date: b.value_date,
        counter_account_key: b.counter_account_key.clone(),
        debit_credit_indicator: indicator,
        currency_code: b.currency_code.clone(),
        foreign_currency_amount: b.foreign_currency_amount,
        quantity: b.quantity,
        matching_field1: b.matching_field1.clone(),
        matching_field2: b.matching_field2.clone(),
        branch_id: b.branch_id.clone(),
        entry_date: b.entry_date,
        operator_username: b.operator_username.clone(),
    }
}

/// Числовое поле записи теряет ведущие нули, а налоговый номер в модели хранится полностью.
fn tax_id(digits: &str) -> String {
    if digits.is_empty() {
        return String::new();
    }
    field::pad_left(digits, field::TAX_ID_WIDTH)
}

fn account(b: &B110) -> Account {
    Account {
        id: b.account_key.clone(),
        name: b.account_name.clone(),
        sort_code: SortCode {
            key: b.trial_balance_code.clone(),
            name: b.trial_balance_code_description.clone().unwrap_or_default(),
        },
        opening_balance: b.opening_balance,
        address: Address::from_parts(
            b.street.clone(),
            b.house_number.clone(),
            b.city.clone(),
            b.zip.clone(),
            b.country.clone(),
        ),
        country_code: b.country_code.clone(),
        parent_account_key: b.parent_account_key.clone(),
        vat_id: b.customer_supplier_vat_id.as_deref().map(tax_id),
        total_debits: b.total_debits,
        total_credits: b.total_credits,
        accounting_classification_code: b.accounting_classification_code.clone(),
        branch_id: b.branch_id.clone(),
        opening_balance_foreign_currency: b.opening_balance_foreign_currency,
        foreign_currency_code: b.foreign_currency_code.clone(),
    }
}

/// Сверка счётчиков INI, итога Z900 и ИНН. Возвращает общий вердикт.
fn cross_validate(records: &ParsedRecords, issues: &mut Vec<ValidationError>) -> bool {
    let mut passed = true;
    let mut fail = |issues: &mut Vec<ValidationError>, field: String, kind: IssueKind| {
        issues.push(ValidationError::error(CROSS_VALIDATION, None, field, kind));
        passed = false;
    };

    let mut declared = BTreeSet::new();
    for s in &records.summaries {
        let field = format!("{}_count", s.record_type);
        match RecordType::from_code(&s.record_type).filter(|&k| k != RecordType::A000) {
            None => fail(
                issues,
                field,
                IssueKind::UnknownSummaryType {
                    code: s.record_type.clone(),
                },
            ),
            Some(kind) => {
                declared.insert(kind);
                let actual = records.count(kind) as u64;
                if actual != s.count {
                    fail(
                        issues,
                        field,
                        IssueKind::CountMismatch {
                            declared: s.count,
                            actual,
                        },
                    );
                }
            }
        }
    }

    if let Some(z) = records.z900.first() {
        let actual = RecordType::DATA
            .iter()
            .filter(|&&k| k != RecordType::Z900)
            .map(|&k| match k {
                RecordType::A100 => records.count(k).min(1),
                _ => records.count(k),
            })
            .sum::<usize>() as u64;
        if z.total_records != actual {
            fail(
                issues,
                "Z900_totalRecords".into(),
                IssueKind::CountMismatch {
                    declared: z.total_records,
                    actual,
                },
            );
        }
    }

    if let Some(h) = &records.header {
        let actual = records.data_records() as u64;
        if h.total_records != actual {
            fail(
                issues,
                "A000_totalRecords".into(),
                IssueKind::CountMismatch {
                    declared: h.total_records,
                    actual,
                },
            );
        }
        if let Some(a) = records.a100.first() {
            if h.vat_id != a.vat_id {
                fail(
                    issues,
                    "vatId".into(),
                    IssueKind::TaxIdMismatch {
                        header: h.vat_id.clone(),
                        metadata: a.vat_id.clone(),
                    },
                );
            }
        }
    }

    for kind in RecordType::DATA {
        let actual = records.count(kind);
        if actual > 0 && !declared.contains(&kind) {
            issues.push(ValidationError::warning(
                CROSS_VALIDATION,
                None,
                format!("{}_count", kind.code()),
                IssueKind::MissingSummary { actual: actual as u64 },
            ));
        }
    }

    passed
}
