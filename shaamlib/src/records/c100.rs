//! C100: заголовок документа (счёт, квитанция, заказ…).

use crate::{
    error::Result,
    layout::{FieldSpec, LineReader, LineWriter},
    model::DocumentType,
    traits::FixedRecord,
    validation::{self, FieldIssue},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct C100 {
    pub record_number: u64,
    pub vat_id: String,
    pub document_type: String,
    pub document_id: String,
    pub document_issue_date: NaiveDate,
    pub document_issue_time: Option<String>,
    pub customer_name: Option<String>,
    pub customer_street: Option<String>,
    pub customer_house_number: Option<String>,
    pub customer_city: Option<String>,
    pub customer_zip: Option<String>,
    pub customer_country: Option<String>,
    pub customer_country_code: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_vat_id: Option<String>,
    pub document_value_date: Option<NaiveDate>,
    pub foreign_currency_amount: Option<Decimal>,
    pub currency_code: Option<String>,
    pub amount_before_discount: Option<Decimal>,
    pub document_discount: Option<Decimal>,
    pub amount_after_discount_excluding_vat: Option<Decimal>,
    pub vat_amount: Option<Decimal>,
    pub amount_including_vat: Decimal,
    pub withholding_tax_amount: Option<Decimal>,
    pub customer_key: Option<String>,
    pub matching_field: Option<String>,
    pub cancelled_attribute: Option<String>,
    pub document_date: Option<NaiveDate>,
    pub branch_id: Option<String>,
    pub operator_username: Option<String>,
    /// Связь с D110/D120 того же документа.
    pub action_link: Option<u64>,
}

const LAYOUT: &[FieldSpec] = &[
    FieldSpec::code("code", 4),
    FieldSpec::numeric("record_number", 9),
    FieldSpec::numeric("vat_id", 9).required(),
    FieldSpec::numeric("document_type", 3).required(),
    FieldSpec::code("document_id", 20).required(),
    FieldSpec::date("document_issue_date").required(),
    FieldSpec::numeric("document_issue_time", 4),
    FieldSpec::text("customer_name", 50),
    FieldSpec::text("customer_street", 50),
    FieldSpec::text("customer_house_number", 10),
    FieldSpec::text("customer_city", 30),
    FieldSpec::code("customer_zip", 8),
    FieldSpec::text("customer_country", 30),
    FieldSpec::code("customer_country_code", 2),
    FieldSpec::text("customer_phone", 15),
    FieldSpec::numeric("customer_vat_id", 9),
    FieldSpec::date("document_value_date"),
    FieldSpec::signed("foreign_currency_amount", 15),
    FieldSpec::code("currency_code", 3),
    FieldSpec::signed("amount_before_discount", 15),
    FieldSpec::signed("document_discount", 15),
    FieldSpec::signed("amount_after_discount_excluding_vat", 15),
    FieldSpec::signed("vat_amount", 15),
    FieldSpec::signed("amount_including_vat", 15),
    FieldSpec::signed("withholding_tax_amount", 12),
    FieldSpec::code("customer_key", 15),
    FieldSpec::code("matching_field", 10),
    FieldSpec::code("cancelled_attribute", 1),
    FieldSpec::date("document_date"),
    FieldSpec::code("branch_id", 7),
    FieldSpec::text("operator_username", 9),
    FieldSpec::numeric("action_link", 7),
    FieldSpec::text("reserved", 14),
];

impl FixedRecord for C100 {
    const CODE: &'static str = "C100";
    const FIELDS: &'static [FieldSpec] = LAYOUT;

    fn write_fields(&self, w: &mut LineWriter) -> Result<()> {
        w.tag()?;
        w.number(self.record_number)?;
        w.numeric(&self.vat_id)?;
        w.numeric(&self.document_type)?;
        w.text(&self.document_id)?;
        w.date(self.document_issue_date)?;
        w.opt_numeric(self.document_issue_time.as_deref())?;
        w.opt_text(self.customer_name.as_deref())?;
        w.opt_text(self.customer_street.as_deref())?;
        w.opt_text(self.customer_house_number.as_deref())?;
        w.opt_text(self.customer_city.as_deref())?;
        w.opt_text(self.customer_zip.as_deref())?;
        w.opt_text(self.customer_country.as_deref())?;
        w.opt_text(self.customer_country_code.as_deref())?;
        w.opt_text(self.customer_phone.as_deref())?;
        w.opt_numeric(self.customer_vat_id.as_deref())?;
        w.opt_date(self.document_value_date)?;
        w.opt_signed(self.foreign_currency_amount)?;
        w.opt_text(self.currency_code.as_deref())?;
        w.opt_signed(self.amount_before_discount)?;
        w.opt_signed(self.document_discount)?;
        w.opt_signed(self.amount_after_discount_excluding_vat)?;
        w.opt_signed(self.vat_amount)?;
        w.signed(self.amount_including_vat)?;
        w.opt_signed(self.withholding_tax_amount)?;
        w.opt_text(self.customer_key.as_deref())?;
        w.opt_text(self.matching_field.as_deref())?;
        w.opt_text(self.cancelled_attribute.as_deref())?;
        w.opt_date(self.document_date)?;
        w.opt_text(self.branch_id.as_deref())?;
        w.opt_text(self.operator_username.as_deref())?;
        w.opt_number(self.action_link)?;
        w.reserved()
    }

    fn read_fields(r: &mut LineReader) -> Result<Self> {
        r.tag()?;
        let record_number = r.number()?;
        let vat_id = r.numeric()?;
        let document_type = r.numeric()?;
        let document_id = r.text()?;
        let document_issue_date = r.date()?;
        let document_issue_time = r.opt_numeric()?;
        let customer_name = r.opt_text()?;
        let customer_street = r.opt_text()?;
        let customer_house_number = r.opt_text()?;
        let customer_city = r.opt_text()?;
        let customer_zip = r.opt_text()?;
        let customer_country = r.opt_text()?;
        let customer_country_code = r.opt_text()?;
        let customer_phone = r.opt_text()?;
        let customer_vat_id = r.opt_numeric()?;
        let document_value_date = r.opt_date()?;
        let foreign_currency_amount = r.opt_signed()?;
        let currency_code = r.opt_text()?;
        let amount_before_discount = r.opt_signed()?;
        let document_discount = r.opt_signed()?;
        let amount_after_discount_excluding_vat = r.opt_signed()?;
        let vat_amount = r.opt_signed()?;
        let amount_including_vat = r.signed()?;
        let withholding_tax_amount = r.opt_signed()?;
        let customer_key = r.opt_text()?;
        let matching_field = r.opt_text()?;
        let cancelled_attribute = r.opt_text()?;
        let document_date = r.opt_date()?;
        let branch_id = r.opt_text()?;
        let operator_username = r.opt_text()?;
        let action_link = r.opt_number()?;
        r.reserved()?;
        Ok(C100 {
            record_number,
            vat_id,
            document_type,
            document_id,
            document_issue_date,
            document_issue_time,
            customer_name,
            customer_street,
            customer_house_number,
            customer_city,
            customer_zip,
            customer_country,
            customer_country_code,
            customer_phone,
            customer_vat_id,
            document_value_date,
            foreign_currency_amount,
            currency_code,
            amount_before_discount,
            document_discount,
            amount_after_discount_excluding_vat,
            vat_amount,
            amount_including_vat,
            withholding_tax_amount,
            customer_key,
            matching_field,
            cancelled_attribute,
            document_date,
            branch_id,
            operator_username,
            action_link,
        })
    }

    fn check(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        validation::require(&mut issues, "vat_id", &self.vat_id);
        validation::require(&mut issues, "document_type", &self.document_type);
        validation::require_code(&mut issues, "document_type", Some(&self.document_type), |c| {
            DocumentType::from_code(c).is_some()
        });
        validation::require(&mut issues, "document_id", &self.document_id);
        issues
    }
}
