//! M100: складская позиция за отчётный период.

use crate::{
    error::Result,
    layout::{FieldSpec, LineReader, LineWriter},
    traits::FixedRecord,
    validation::{self, FieldIssue},
};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct M100 {
    pub record_number: u64,
    pub vat_id: String,
    pub universal_item_code: Option<String>,
    pub supplier_item_code: Option<String>,
    pub internal_item_code: String,
    pub item_name: String,
    pub classification_code: Option<String>,
    pub classification_description: Option<String>,
    pub unit_of_measure: Option<String>,
    pub opening_stock: Option<Decimal>,
    pub total_stock_in: Option<Decimal>,
    pub total_stock_out: Option<Decimal>,
    pub end_period_cost_not_in_bond: Option<Decimal>,
    pub end_period_cost_in_bond: Option<Decimal>,
}

const LAYOUT: &[FieldSpec] = &[
    FieldSpec::code("code", 4),
    FieldSpec::numeric("record_number", 9),
    FieldSpec::numeric("vat_id", 9).required(),
    FieldSpec::code("universal_item_code", 20),
    FieldSpec::code("supplier_item_code", 20),
    FieldSpec::code("internal_item_code", 20).required(),
    FieldSpec::text("item_name", 50).required(),
    FieldSpec::code("classification_code", 10),
    FieldSpec::text("classification_description", 30),
    FieldSpec::text("unit_of_measure", 20),
    FieldSpec::signed("opening_stock", 12),
    FieldSpec::signed("total_stock_in", 12),
    FieldSpec::signed("total_stock_out", 12),
    FieldSpec::signed("end_period_cost_not_in_bond", 10),
    FieldSpec::signed("end_period_cost_in_bond", 10),
    FieldSpec::text("reserved", 50),
];

impl FixedRecord for M100 {
    const CODE: &'static str = "M100";
    const FIELDS: &'static [FieldSpec] = LAYOUT;

    fn write_fields(&self, w: &mut LineWriter) -> Result<()> {
        w.tag()?;
        w.number(self.record_number)?;
        w.numeric(&self.vat_id)?;
        w.opt_text(self.universal_item_code.as_deref())?;
        w.opt_text(self.supplier_item_code.as_deref())?;
        w.text(&self.internal_item_code)?;
        w.text(&self.item_name)?;
        w.opt_text(self.classification_code.as_deref())?;
        w.opt_text(self.classification_description.as_deref())?;
        w.opt_text(self.unit_of_measure.as_deref())?;
        w.opt_signed(self.opening_stock)?;
        w.opt_signed(self.total_stock_in)?;
        w.opt_signed(self.total_stock_out)?;
        w.opt_signed(self.end_period_cost_not_in_bond)?;
        w.opt_signed(self.end_period_cost_in_bond)?;
        w.reserved()
    }

    fn read_fields(r: &mut LineReader) -> Result<Self> {
        r.tag()?;
        let record_number = r.number()?;
        let vat_id = r.numeric()?;
        let universal_item_code = r.opt_text()?;
        let supplier_item_code = r.opt_text()?;
        let internal_item_code = r.text()?;
        let item_name = r.text()?;
        let classification_code = r.opt_text()?;
        let classification_description = r.opt_text()?;
        let unit_of_measure = r.opt_text()?;
        let opening_stock = r.opt_signed()?;
        let total_stock_in = r.opt_signed()?;
        let total_stock_out = r.opt_signed()?;
        let end_period_cost_not_in_bond = r.opt_signed()?;
        let end_period_cost_in_bond = r.opt_signed()?;
        r.reserved()?;
        Ok(M100 {
            record_number,
            vat_id,
            universal_item_code,
            supplier_item_code,
            internal_item_code,
            item_name,
            classification_code,
            classification_description,
            unit_of_measure,
            opening_stock,
            total_stock_in,
            total_stock_out,
            end_period_cost_not_in_bond,
            end_period_cost_in_bond,
        })
    }

    fn check(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        validation::require(&mut issues, "vat_id", &self.vat_id);
        validation::require(&mut issues, "internal_item_code", &self.internal_item_code);
        validation::require(&mut issues, "item_name", &self.item_name);
        issues
    }
}
