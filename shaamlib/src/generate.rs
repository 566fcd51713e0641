//! Генерация пары файлов INI.TXT / BKMVDATA.TXT из доменных данных.

use crate::{
    config::GenerationOptions,
    error::{Result, ShaamError},
    field,
    model::{Account, Address, DebitCredit, Document, InventoryItem, JournalEntry, PaymentMethod, ReportInput},
    record::RecordType,
    records::{
        a000::{SummaryRecord, A000, SYSTEM_CONSTANT},
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
    validation,
};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub const INI_FILE_NAME: &str = "INI.TXT";
pub const DATA_FILE_NAME: &str = "BKMVDATA.TXT";
pub const TEXT_MIME_TYPE: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextFile {
    pub name: String,
    pub mime_type: String,
    pub content: String,
}

impl TextFile {
    fn new(name: String, content: String) -> Self {
        TextFile {
            name,
            mime_type: TEXT_MIME_TYPE.to_string(),
            content,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Строки обоих файлов.
    pub total_records: usize,
    /// Только типы файла данных, только ненулевые.
    pub per_type: BTreeMap<RecordType, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportOutput {
    pub ini_text: String,
    pub data_text: String,
    pub ini_file: TextFile,
    pub data_file: TextFile,
    pub summary: ReportSummary,
}

/// Сквозная нумерация записей файла данных, начиная с 1.
#[derive(Debug)]
struct RecordCounter {
    next: u64,
}

impl RecordCounter {
    fn new() -> Self {
        RecordCounter { next: 1 }
    }

    fn next(&mut self) -> u64 {
        let n = self.next;
        self.next += 1;
        n
    }
}

/// Строки файла данных вместе с поштучным учётом по типам.
#[derive(Debug, Default)]
struct DataLines {
    lines: Vec<String>,
    per_type: BTreeMap<RecordType, usize>,
}

impl DataLines {
    fn push(&mut self, kind: RecordType, line: String) {
        self.lines.push(line);
        *self.per_type.entry(kind).or_default() += 1;
    }

    fn len(&self) -> usize {
        self.lines.len()
    }
}

pub fn generate(input: &ReportInput, options: &GenerationOptions) -> Result<ReportOutput> {
    info!(
        business = %input.business.business_id,
        documents = input.documents.len(),
        journal_entries = input.journal_entries.len(),
        accounts = input.accounts.len(),
        inventory = input.inventory.len(),
        "generating uniform-format report"
    );

    let warnings = validation::validate_generation(input, options)?;
    for w in &warnings {
        warn!(issue = %w, "input warning");
    }

    let business = &input.business;
    let vat_id = digits("tax_id", &business.tax_id)?;
    let primary_identifier = business.business_id.clone();
    let mut counter = RecordCounter::new();
    let mut data = DataLines::default();

    let a100 = A100 {
        record_number: counter.next(),
        vat_id: vat_id.clone(),
        primary_identifier: primary_identifier.clone(),
        system_constant: SYSTEM_CONSTANT.to_string(),
    };
    data.push(RecordType::A100, a100.encode()?);

    for (i, doc) in input.documents.iter().enumerate() {
        let link = i as u64 + 1;
        data.push(RecordType::C100, document_header(&mut counter, &vat_id, doc, link).encode()?);
        data.push(RecordType::D110, document_line(&mut counter, &vat_id, doc, link).encode()?);
        data.push(RecordType::D120, document_payment(&mut counter, &vat_id, doc, link).encode()?);
    }
    debug!(count = input.documents.len(), "documents written");

    for (i, entry) in input.journal_entries.iter().enumerate() {
        data.push(RecordType::B100, journal_line(&mut counter, &vat_id, i, entry).encode()?);
    }
    debug!(count = input.journal_entries.len(), "journal entries written");

    for account in &input.accounts {
        data.push(RecordType::B110, account_record(&mut counter, &vat_id, account)?.encode()?);
    }
    debug!(count = input.accounts.len(), "accounts written");

    for item in &input.inventory {
        data.push(RecordType::M100, inventory_record(&mut counter, &vat_id, item).encode()?);
    }
    debug!(count = input.inventory.len(), "inventory items written");

    let z900 = Z900 {
        record_number: counter.next(),
        vat_id: vat_id.clone(),
        primary_identifier: primary_identifier.clone(),
        system_constant: SYSTEM_CONSTANT.to_string(),
        total_records: data.len() as u64,
    };
    data.push(RecordType::Z900, z900.encode()?);

    let header = ini_header(input, options, &vat_id, &primary_identifier, data.len() as u64)?;
    let mut ini = vec![header.encode()?];
    for kind in RecordType::DATA {
        if let Some(&count) = data.per_type.get(&kind) {
            ini.push(SummaryRecord::new(kind.code(), count as u64).encode()?);
        }
    }

    let summary = ReportSummary {
        total_records: ini.len() + data.len(),
        per_type: data.per_type,
    };
    let ini_text = ini.concat();
    let data_text = data.lines.concat();
    let (ini_name, data_name) = file_names(&options.file_name_base);
    info!(total_records = summary.total_records, "report generated");

    Ok(ReportOutput {
        ini_file: TextFile::new(ini_name, ini_text.clone()),
        data_file: TextFile::new(data_name, data_text.clone()),
        ini_text,
        data_text,
        summary,
    })
}

/// `INI.TXT` / `BKMVDATA.TXT`, с префиксом `<base>.`, если он задан.
pub fn file_names(base: &str) -> (String, String) {
    let base = base.trim();
    if base.is_empty() {
        (INI_FILE_NAME.to_string(), DATA_FILE_NAME.to_string())
    } else {
        (format!("{base}.{INI_FILE_NAME}"), format!("{base}.{DATA_FILE_NAME}"))
    }
}

fn digits(name: &'static str, value: &str) -> Result<String> {
    field::normalize_digits(value)?.ok_or_else(|| ShaamError::Normalization {
        field: name,
        value: value.to_string(),
    })
}

fn opt_digits(name: &'static str, value: Option<&str>) -> Result<Option<String>> {
    value.map(|v| digits(name, v)).transpose().map(|v| v.filter(|s| !s.is_empty()))
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn address_part(address: Option<&Address>, part: impl Fn(&Address) -> &Option<String>) -> Option<String> {
    address.and_then(|a| part(a).clone())
}

fn ini_header(
    input: &ReportInput,
    options: &GenerationOptions,
    vat_id: &str,
    primary_identifier: &str,
    total_records: u64,
) -> Result<A000> {
    let business = &input.business;
    let software = &options.software;
    let period = business.reporting_period;
    let address = business.address.as_ref();
    Ok(A000 {
        total_records,
        vat_id: vat_id.to_string(),
        primary_identifier: primary_identifier.to_string(),
        system_constant: SYSTEM_CONSTANT.to_string(),
        software_reg_number: non_empty(&software.registration_number),
        software_name: software.name.clone(),
        software_version: software.version.clone(),
        vendor_vat_id: opt_digits("vendor_vat_id", Some(&software.vendor_vat_id))?,
        vendor_name: software.vendor_name.clone(),
        software_type: non_empty(&software.software_type),
        file_output_path: non_empty(&software.output_path),
        accounting_type: non_empty(&software.accounting_type),
        balance_required: non_empty(&software.balance_required),
        company_reg_id: None,
        withholding_file_number: None,
        business_name: business.name.clone(),
        business_street: address_part(address, |a| &a.street),
        business_house_number: address_part(address, |a| &a.house_number),
        business_city: address_part(address, |a| &a.city),
        business_zip: address_part(address, |a| &a.zip),
        tax_year: u64::try_from(period.start_date.year()).ok(),
        start_date: period.start_date,
        end_date: period.end_date,
        process_start_date: Some(options.processed_at.map_or(period.end_date, |t| t.date())),
        process_start_time: options.processed_at.map(|t| t.format("%H%M").to_string()),
        language_code: non_empty(&software.language_code),
        character_set: non_empty(&software.character_set),
        compression_software: non_empty(&software.compression_software),
        base_currency: non_empty(&software.base_currency),
        branch_info_flag: None,
    })
}

fn document_header(counter: &mut RecordCounter, vat_id: &str, doc: &Document, link: u64) -> C100 {
    C100 {
        record_number: counter.next(),
        vat_id: vat_id.to_string(),
        document_type: doc.doc_type.code().to_string(),
        document_id: doc.id.clone(),
        document_issue_date: doc.date,
        document_issue_time: None,
        customer_name: None,
        customer_street: None,
        customer_house_number: None,
        customer_city: None,
        customer_zip: None,
        customer_country: None,
        customer_country_code: None,
        customer_phone: None,
        customer_vat_id: None,
        document_value_date: None,
        foreign_currency_amount: None,
        currency_code: None,
        amount_before_discount: Some(doc.amount),
        document_discount: Some(Decimal::ZERO),
        amount_after_discount_excluding_vat: Some(doc.amount),
        vat_amount: Some(Decimal::ZERO),
        amount_including_vat: doc.amount,
        withholding_tax_amount: None,
        customer_key: None,
        matching_field: None,
        cancelled_attribute: None,
        document_date: Some(doc.date),
        branch_id: None,
        operator_username: None,
        action_link: Some(link),
    }
}

/// Одна синтетическая строка на весь документ.
fn document_line(counter: &mut RecordCounter, vat_id: &str, doc: &Document, link: u64) -> D110 {
    D110 {
        record_number: counter.next(),
        vat_id: vat_id.to_string(),
        document_type: doc.doc_type.code().to_string(),
        document_number: doc.id.clone(),
        line_number: Some(1),
        base_document_type: None,
        base_document_number: None,
        transaction_type: None,
        internal_catalog_code: None,
        goods_service_description: doc.description.clone(),
        manufacturer_name: None,
        serial_number: None,
        unit_of_measure_description: None,
        quantity: Some(Decimal::ONE),
        unit_price_excluding_vat: Some(doc.amount),
        line_discount: None,
        line_total: Some(doc.amount),
        vat_rate_percent: None,
        branch_id: None,
        document_date: Some(doc.date),
        header_link_field: Some(link),
        base_document_branch_id: None,
    }
}

fn document_payment(counter: &mut RecordCounter, vat_id: &str, doc: &Document, link: u64) -> D120 {
    D120 {
        record_number: counter.next(),
        vat_id: vat_id.to_string(),
        document_type: doc.doc_type.code().to_string(),
        document_number: doc.id.clone(),
        line_number: Some(1),
        payment_method: PaymentMethod::Other.code().to_string(),
        bank_number: None,
        branch_number: None,
        account_number: None,
        check_number: None,
        payment_due_date: None,
        line_amount: Some(doc.amount),
        acquirer_code: None,
        card_brand: None,
        credit_transaction_type: None,
        branch_id: None,
        document_date: Some(doc.date),
        header_link_field: Some(link),
    }
}

/// Цифровой id проводки идёт в номер транзакции; иначе — порядковый номер.
fn transaction_number(id: &str, index: usize) -> u64 {
    if id.len() <= 10 && field::is_digits(id) {
        if let Ok(n) = id.parse() {
            return n;
        }
    }
    index as u64 + 1
}

fn journal_line(counter: &mut RecordCounter, vat_id: &str, index: usize, e: &JournalEntry) -> B100 {
    let indicator = e
        .debit_credit_indicator
        .unwrap_or_else(|| DebitCredit::for_amount(e.amount));
    B100 {
        record_number: counter.next(),
        vat_id: vat_id.to_string(),
        transaction_number: transaction_number(&e.id, index),
        transaction_line_number: e.transaction_line_number,
        batch_number: e.batch_number,
        transaction_type: e.transaction_type.clone(),
        reference_document: e.reference_document.clone(),
        reference_document_type: e.reference_document_type.map(|t| t.code().to_string()),
        reference_document2: e.reference_document2.clone(),
        reference_document_type2: e.reference_document_type2.map(|t| t.code().to_string()),
        details: e.description.clone(),
        date: e.date,
        value_date: e.value_date,
        account_key: e.account_key.clone(),
        counter_account_key: e.counter_account_key.clone(),
        debit_credit_indicator: indicator.code().to_string(),
        currency_code: e.currency_code.clone(),
        transaction_amount: e.amount.abs(),
        foreign_currency_amount: e.foreign_currency_amount,
        quantity: e.quantity,
        matching_field1: e.matching_field1.clone(),
        matching_field2: e.matching_field2.clone(),
        branch_id: e.branch_id.clone(),
        entry_date: e.entry_date,
        operator_username: e.operator_username.clone(),
    }
}

fn account_record(counter: &mut RecordCounter, vat_id: &str, a: &Account) -> Result<B110> {
    let address = a.address.as_ref();
    Ok(B110 {
        record_number: counter.next(),
        vat_id: vat_id.to_string(),
        account_key: a.id.clone(),
        account_name: a.name.clone(),
        trial_balance_code: a.sort_code.key.clone(),
        trial_balance_code_description: non_empty(&a.sort_code.name),
        street: address_part(address, |x| &x.street),
        house_number: address_part(address, |x| &x.house_number),
        city: address_part(address, |x| &x.city),
        zip: address_part(address, |x| &x.zip),
        country: address_part(address, |x| &x.country),
        country_code: a.country_code.clone(),
        parent_account_key: a.parent_account_key.clone(),
        opening_balance: a.opening_balance,
        total_debits: a.total_debits,
        total_credits: a.total_credits,
        accounting_classification_code: opt_digits(
            "accounting_classification_code",
            a.accounting_classification_code.as_deref(),
        )?,
        customer_supplier_vat_id: opt_digits("vat_id", a.vat_id.as_deref())?,
        branch_id: a.branch_id.clone(),
        opening_balance_foreign_currency: a.opening_balance_foreign_currency,
        foreign_currency_code: a.foreign_currency_code.clone(),
    })
}

fn inventory_record(counter: &mut RecordCounter, vat_id: &str, item: &InventoryItem) -> M100 {
    M100 {
        record_number: counter.next(),
        vat_id: vat_id.to_string(),
        universal_item_code: None,
        supplier_item_code: None,
        internal_item_code: item.id.clone(),
        item_name: item.name.clone(),
        classification_code: None,
        classification_description: None,
        unit_of_measure: None,
        opening_stock: Some(item.quantity),
        total_stock_in: None,
        total_stock_out: None,
        end_period_cost_not_in_bond: Some(item.unit_price),
        end_period_cost_in_bond: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_number_falls_back_to_sequence() {
        assert_eq!(transaction_number("42", 0), 42);
        assert_eq!(transaction_number("JE-42", 6), 7);
        assert_eq!(transaction_number("12345678901", 0), 1);
        assert_eq!(transaction_number("", 2), 3);
    }

    #[test]
    fn file_names_with_base() {
        assert_eq!(file_names(""), ("INI.TXT".into(), "BKMVDATA.TXT".into()));
        assert_eq!(
            file_names("2024"),
            ("2024.INI.TXT".into(), "2024.BKMVDATA.TXT".into())
        );
    }
}
