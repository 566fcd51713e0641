//! B110: карточка счёта.

use crate::{
    error::Result,
    layout::{FieldSpec, LineReader, LineWriter},
    traits::FixedRecord,
    validation::{self, FieldIssue},
};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct B110 {
    pub record_number: u64,
    pub vat_id: String,
    pub account_key: String,
    pub account_name: String,
    pub trial_balance_code: String,
    pub trial_balance_code_description: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub parent_account_key: Option<String>,
    pub opening_balance: Decimal,
    pub total_debits: Option<Decimal>,
    pub total_credits: Option<Decimal>,
    pub accounting_classification_code: Option<String>,
    pub customer_supplier_vat_id: Option<String>,
    pub branch_id: Option<String>,
    pub opening_balance_foreign_currency: Option<Decimal>,
    pub foreign_currency_code: Option<String>,
}

const LAYOUT: &[FieldSpec] = &[
    FieldSpec::code("code", 4),
    FieldSpec::numeric("record_number", 9),
    FieldSpec::numeric("vat_id", 9).required(),
    FieldSpec::code("account_key", 15).required(),
    FieldSpec::text("account_name", 50).required(),
    FieldSpec::code("trial_balance_code", 15).required(),
    FieldSpec::text("trial_balance_code_description", 30),
    FieldSpec::text("street", 50),
    FieldSpec::text("house_number", 10),
    FieldSpec::text("city", 30),
    FieldSpec::code("zip", 8),
    FieldSpec::text("country", 30),
    FieldSpec::code("country_code", 2),
    FieldSpec::code("parent_account_key", 15),
    FieldSpec::signed("opening_balance", 15),
    FieldSpec::signed("total_debits", 15),
    FieldSpec::signed("total_credits", 15),
    FieldSpec::numeric("accounting_classification_code", 4),
    FieldSpec::numeric("customer_supplier_vat_id", 9),
    FieldSpec::code("branch_id", 7),
    FieldSpec::signed("opening_balance_foreign_currency", 15),
    FieldSpec::code("foreign_currency_code", 3),
    FieldSpec::text("reserved", 16),
];

impl FixedRecord for B110 {
    const CODE: &'static str = "B110";
    const FIELDS: &'static [FieldSpec] = LAYOUT;

    fn write_fields(&self, w: &mut LineWriter) -> Result<()> {
        w.tag()?;
        w.number(self.record_number)?;
        w.numeric(&self.vat_id)?;
        w.text(&self.account_key)?;
        w.text(&self.account_name)?;
        w.text(&self.trial_balance_code)?;
        w.opt_text(self.trial_balance_code_description.as_deref())?;
        w.opt_text(self.street.as_deref())?;
        w.opt_text(self.house_number.as_deref())?;
        w.opt_text(self.city.as_deref())?;
        w.opt_text(self.zip.as_deref())?;
        w.opt_text(self.country.as_deref())?;
        w.opt_text(self.country_code.as_deref())?;
        w.opt_text(self.parent_account_key.as_deref())?;
        w.signed(self.opening_balance)?;
        w.opt_signed(self.total_debits)?;
        w.opt_signed(self.total_credits)?;
        w.opt_numeric(self.accounting_classification_code.as_deref())?;
        w.opt_numeric(self.customer_supplier_vat_id.as_deref())?;
        w.opt_text(self.branch_id.as_deref())?;
        w.opt_signed(self.opening_balance_foreign_currency)?;
        w.opt_text(self.foreign_currency_code.as_deref())?;
        w.reserved()
    }

    fn read_fields(r: &mut LineReader) -> Result<Self> {
        r.tag()?;
        let record_number = r.number()?;
        let vat_id = r.numeric()?;
        let account_key = r.text()?;
        let account_name = r.text()?;
        let trial_balance_code = r.text()?;
        let trial_balance_code_description = r.opt_text()?;
        let street = r.opt_text()?;
        let house_number = r.opt_text()?;
        let city = r.opt_text()?;
        let zip = r.opt_text()?;
        let country = r.opt_text()?;
        let country_code = r.opt_text()?;
        let parent_account_key = r.opt_text()?;
        let opening_balance = r.signed()?;
        let total_debits = r.opt_signed()?;
        let total_credits = r.opt_signed()?;
        let accounting_classification_code = r.opt_numeric()?;
        let customer_supplier_vat_id = r.opt_numeric()?;
        let branch_id = r.opt_text()?;
        let opening_balance_foreign_currency = r.opt_signed()?;
        let foreign_currency_code = r.opt_text()?;
        r.reserved()?;
        Ok(B110 {
            record_number,
            vat_id,
            account_key,
            account_name,
            trial_balance_code,
            trial_balance_code_description,
            street,
            house_number,
            city,
            zip,
            country,
            country_code,
            parent_account_key,
            opening_balance,
            total_debits,
            total_credits,
            accounting_classification_code,
            customer_supplier_vat_id,
            branch_id,
            opening_balance_foreign_currency,
            foreign_currency_code,
        })
    }

    fn check(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        validation::require(&mut issues, "vat_id", &self.vat_id);
        validation::require(&mut issues, "account_key", &self.account_key);
        validation::require(&mut issues, "account_name", &self.account_name);
        validation::require(&mut issues, "trial_balance_code", &self.trial_balance_code);
        issues
    }
}
