//! B100: строка проводки в журнале.

use crate::{
    error::Result,
    layout::{FieldSpec, LineReader, LineWriter},
    model::{DebitCredit, DocumentType},
    traits::FixedRecord,
    validation::{self, FieldIssue},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct B100 {
    pub record_number: u64,
    pub vat_id: String,
    pub transaction_number: u64,
    pub transaction_line_number: Option<u64>,
    pub batch_number: Option<u64>,
    pub transaction_type: Option<String>,
    pub reference_document: Option<String>,
    pub reference_document_type: Option<String>,
    pub reference_document2: Option<String>,
    pub reference_document_type2: Option<String>,
    pub details: Option<String>,
    pub date: NaiveDate,
    pub value_date: Option<NaiveDate>,
    pub account_key: String,
    pub counter_account_key: Option<String>,
    /// `1` — дебет, `2` — кредит.
    pub debit_credit_indicator: String,
    pub currency_code: Option<String>,
    /// Модуль суммы; направление задаёт индикатор.
    pub transaction_amount: Decimal,
    pub foreign_currency_amount: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub matching_field1: Option<String>,
    pub matching_field2: Option<String>,
    pub branch_id: Option<String>,
    pub entry_date: Option<NaiveDate>,
    pub operator_username: Option<String>,
}

const LAYOUT: &[FieldSpec] = &[
    FieldSpec::code("code", 4),
    FieldSpec::numeric("record_number", 9),
    FieldSpec::numeric("vat_id", 9).required(),
    FieldSpec::numeric("transaction_number", 10),
    FieldSpec::numeric("transaction_line_number", 5),
    FieldSpec::numeric("batch_number", 8),
    FieldSpec::text("transaction_type", 15),
    FieldSpec::code("reference_document", 20),
    FieldSpec::numeric("reference_document_type", 3),
    FieldSpec::code("reference_document2", 20),
    FieldSpec::numeric("reference_document_type2", 3),
    FieldSpec::text("details", 50),
    FieldSpec::date("date").required(),
    FieldSpec::date("value_date"),
    FieldSpec::code("account_key", 15).required(),
    FieldSpec::code("counter_account_key", 15),
    FieldSpec::numeric("debit_credit_indicator", 1).required(),
    FieldSpec::code("currency_code", 3),
    FieldSpec::signed("transaction_amount", 15),
    FieldSpec::signed("foreign_currency_amount", 15),
    FieldSpec::signed("quantity", 12),
    FieldSpec::code("matching_field1", 10),
    FieldSpec::code("matching_field2", 10),
    FieldSpec::code("branch_id", 7),
    FieldSpec::date("entry_date"),
    FieldSpec::text("operator_username", 9),
    FieldSpec::text("reserved", 25),
];

impl B100 {
    pub fn indicator(&self) -> Option<DebitCredit> {
        DebitCredit::from_code(&self.debit_credit_indicator)
    }
}

impl FixedRecord for B100 {
    const CODE: &'static str = "B100";
    const FIELDS: &'static [FieldSpec] = LAYOUT;

    fn write_fields(&self, w: &mut LineWriter) -> Result<()> {
        w.tag()?;
        w.number(self.record_number)?;
        w.numeric(&self.vat_id)?;
        w.number(self.transaction_number)?;
        w.opt_number(self.transaction_line_number)?;
        w.opt_number(self.batch_number)?;
        w.opt_text(self.transaction_type.as_deref())?;
        w.opt_text(self.reference_document.as_deref())?;
        w.opt_numeric(self.reference_document_type.as_deref())?;
        w.opt_text(self.reference_document2.as_deref())?;
        w.opt_numeric(self.reference_document_type2.as_deref())?;
        w.opt_text(self.details.as_deref())?;
        w.date(self.date)?;
        w.opt_date(self.value_date)?;
        w.text(&self.account_key)?;
        w.opt_text(self.counter_account_key.as_deref())?;
        w.numeric(&self.debit_credit_indicator)?;
        w.opt_text(self.currency_code.as_deref())?;
        w.signed(self.transaction_amount)?;
        w.opt_signed(self.foreign_currency_amount)?;
        w.opt_signed(self.quantity)?;
        w.opt_text(self.matching_field1.as_deref())?;
        w.opt_text(self.matching_field2.as_deref())?;
        w.opt_text(self.branch_id.as_deref())?;
        w.opt_date(self.entry_date)?;
        w.opt_text(self.operator_username.as_deref())?;
        w.reserved()
    }

    fn read_fields(r: &mut LineReader) -> Result<Self> {
        r.tag()?;
        let record_number = r.number()?;
        let vat_id = r.numeric()?;
        let transaction_number = r.number()?;
        let transaction_line_number = r.opt_number()?;
        let batch_number = r.opt_number()?;
        let transaction_type = r.opt_text()?;
        let reference_document = r.opt_text()?;
        let reference_document_type = r.opt_numeric()?;
        let reference_document2 = r.opt_text()?;
        let reference_document_type2 = r.opt_numeric()?;
        let details = r.opt_text()?;
        let date = r.date()?;
        let value_date = r.opt_date()?;
        let account_key = r.text()?;
        let counter_account_key = r.opt_text()?;
        let debit_credit_indicator = r.numeric()?;
        let currency_code = r.opt_text()?;
        let transaction_amount = r.signed()?;
        let foreign_currency_amount = r.opt_signed()?;
        let quantity = r.opt_signed()?;
        let matching_field1 = r.opt_text()?;
        let matching_field2 = r.opt_text()?;
        let branch_id = r.opt_text()?;
        let entry_date = r.opt_date()?;
        let operator_username = r.opt_text()?;
        r.reserved()?;
        Ok(B100 {
            record_number,
            vat_id,
            transaction_number,
            transaction_line_number,
            batch_number,
            transaction_type,
            reference_document,
            reference_document_type,
            reference_document2,
            reference_document_type2,
            details,
            date,
            value_date,
            account_key,
            counter_account_key,
            debit_credit_indicator,
            currency_code,
            transaction_amount,
            foreign_currency_amount,
            quantity,
            matching_field1,
            matching_field2,
            branch_id,
            entry_date,
            operator_username,
        })
    }

    fn check(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        validation::require(&mut issues, "vat_id", &self.vat_id);
        validation::require(&mut issues, "account_key", &self.account_key);
        validation::require(&mut issues, "debit_credit_indicator", &self.debit_credit_indicator);
        validation::require_code(
            &mut issues,
            "debit_credit_indicator",
            Some(&self.debit_credit_indicator),
            |c| DebitCredit::from_code(c).is_some(),
        );
        validation::require_code(
            &mut issues,
            "reference_document_type",
            self.reference_document_type.as_deref(),
            |c| DocumentType::from_code(c).is_some(),
        );
        validation::require_code(
            &mut issues,
            "reference_document_type2",
            self.reference_document_type2.as_deref(),
            |c| DocumentType::from_code(c).is_some(),
        );
        issues
    }
}
