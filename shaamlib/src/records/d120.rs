//! D120: строка оплаты по документу.

use crate::{
    error::Result,
    layout::{FieldSpec, LineReader, LineWriter},
    model::{DocumentType, PaymentMethod},
    traits::FixedRecord,
    validation::{self, FieldIssue},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct D120 {
    pub record_number: u64,
    pub vat_id: String,
    pub document_type: String,
    pub document_number: String,
    pub line_number: Option<u64>,
    /// Код 1–9, см. [`PaymentMethod`].
    pub payment_method: String,
    pub bank_number: Option<String>,
    pub branch_number: Option<String>,
    pub account_number: Option<String>,
    pub check_number: Option<String>,
    pub payment_due_date: Option<NaiveDate>,
    pub line_amount: Option<Decimal>,
    pub acquirer_code: Option<String>,
    pub card_brand: Option<String>,
    pub credit_transaction_type: Option<String>,
    pub branch_id: Option<String>,
    pub document_date: Option<NaiveDate>,
    pub header_link_field: Option<u64>,
}

const LAYOUT: &[FieldSpec] = &[
    FieldSpec::code("code", 4),
    FieldSpec::numeric("record_number", 9),
    FieldSpec::numeric("vat_id", 9).required(),
    FieldSpec::numeric("document_type", 3).required(),
    FieldSpec::code("document_number", 20).required(),
    FieldSpec::numeric("line_number", 4),
    FieldSpec::numeric("payment_method", 1).required(),
    FieldSpec::numeric("bank_number", 10),
    FieldSpec::numeric("branch_number", 10),
    FieldSpec::numeric("account_number", 15),
    FieldSpec::numeric("check_number", 10),
    FieldSpec::date("payment_due_date"),
    FieldSpec::signed("line_amount", 15),
    FieldSpec::numeric("acquirer_code", 1),
    FieldSpec::text("card_brand", 20),
    FieldSpec::numeric("credit_transaction_type", 1),
    FieldSpec::code("branch_id", 7),
    FieldSpec::date("document_date"),
    FieldSpec::numeric("header_link_field", 7),
    FieldSpec::text("reserved", 60),
];

impl D120 {
    pub fn method(&self) -> Option<PaymentMethod> {
        PaymentMethod::from_code(&self.payment_method)
    }
}

impl FixedRecord for D120 {
    const CODE: &'static str = "D120";
    const FIELDS: &'static [FieldSpec] = LAYOUT;

    fn write_fields(&self, w: &mut LineWriter) -> Result<()> {
        w.tag()?;
        w.number(self.record_number)?;
        w.numeric(&self.vat_id)?;
        w.numeric(&self.document_type)?;
        w.text(&self.document_number)?;
        w.opt_number(self.line_number)?;
        w.numeric(&self.payment_method)?;
        w.opt_numeric(self.bank_number.as_deref())?;
        w.opt_numeric(self.branch_number.as_deref())?;
        w.opt_numeric(self.account_number.as_deref())?;
        w.opt_numeric(self.check_number.as_deref())?;
        w.opt_date(self.payment_due_date)?;
        w.opt_signed(self.line_amount)?;
        w.opt_numeric(self.acquirer_code.as_deref())?;
        w.opt_text(self.card_brand.as_deref())?;
        w.opt_numeric(self.credit_transaction_type.as_deref())?;
        w.opt_text(self.branch_id.as_deref())?;
        w.opt_date(self.document_date)?;
        w.opt_number(self.header_link_field)?;
        w.reserved()
    }

    fn read_fields(r: &mut LineReader) -> Result<Self> {
        r.tag()?;
        let record_number = r.number()?;
        let vat_id = r.numeric()?;
        let document_type = r.numeric()?;
        let document_number = r.text()?;
        let line_number = r.opt_number()?;
        let payment_method = r.numeric()?;
        let bank_number = r.opt_numeric()?;
        let branch_number = r.opt_numeric()?;
        let account_number = r.opt_numeric()?;
        let check_number = r.opt_numeric()?;
        let payment_due_date = r.opt_date()?;
        let line_amount = r.opt_signed()?;
        let acquirer_code = r.opt_numeric()?;
        let card_brand = r.opt_text()?;
        let credit_transaction_type = r.opt_numeric()?;
        let branch_id = r.opt_text()?;
        let document_date = r.opt_date()?;
        let header_link_field = r.opt_number()?;
        r.reserved()?;
        Ok(D120 {
            record_number,
            vat_id,
            document_type,
            document_number,
            line_number,
            payment_method,
            bank_number,
            branch_number,
            account_number,
            check_number,
            payment_due_date,
            line_amount,
            acquirer_code,
            card_brand,
            credit_transaction_type,
            branch_id,
            document_date,
            header_link_field,
        })
    }

    fn check(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        validation::require(&mut issues, "vat_id", &self.vat_id);
        validation::require(&mut issues, "document_type", &self.document_type);
        validation::require_code(&mut issues, "document_type", Some(&self.document_type), |c| {
            DocumentType::from_code(c).is_some()
        });
        validation::require(&mut issues, "document_number", &self.document_number);
        validation::require(&mut issues, "payment_method", &self.payment_method);
        validation::require_code(&mut issues, "payment_method", Some(&self.payment_method), |c| {
            PaymentMethod::from_code(c).is_some()
        });
        issues
    }
}
