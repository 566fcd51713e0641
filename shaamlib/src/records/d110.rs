//! D110: строка документа (товар или услуга).

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
pub struct D110 {
    pub record_number: u64,
    pub vat_id: String,
    pub document_type: String,
    pub document_number: String,
    pub line_number: Option<u64>,
    pub base_document_type: Option<String>,
    pub base_document_number: Option<String>,
    pub transaction_type: Option<String>,
    pub internal_catalog_code: Option<String>,
    pub goods_service_description: Option<String>,
    pub manufacturer_name: Option<String>,
    pub serial_number: Option<String>,
    pub unit_of_measure_description: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price_excluding_vat: Option<Decimal>,
    pub line_discount: Option<Decimal>,
    pub line_total: Option<Decimal>,
    pub vat_rate_percent: Option<String>,
    pub branch_id: Option<String>,
    pub document_date: Option<NaiveDate>,
    pub header_link_field: Option<u64>,
    pub base_document_branch_id: Option<String>,
}

const LAYOUT: &[FieldSpec] = &[
    FieldSpec::code("code", 4),
    FieldSpec::numeric("record_number", 9),
    FieldSpec::numeric("vat_id", 9).required(),
    FieldSpec::numeric("document_type", 3).required(),
    FieldSpec::code("document_number", 20).required(),
    FieldSpec::numeric("line_number", 4),
    FieldSpec::numeric("base_document_type", 3),
    FieldSpec::code("base_document_number", 20),
    FieldSpec::numeric("transaction_type", 1),
    FieldSpec::code("internal_catalog_code", 20),
    FieldSpec::text("goods_service_description", 30),
    FieldSpec::text("manufacturer_name", 50),
    FieldSpec::text("serial_number", 30),
    FieldSpec::text("unit_of_measure_description", 20),
    FieldSpec::signed("quantity", 17),
    FieldSpec::signed("unit_price_excluding_vat", 15),
    FieldSpec::signed("line_discount", 15),
    FieldSpec::signed("line_total", 15),
    FieldSpec::numeric("vat_rate_percent", 4),
    FieldSpec::code("branch_id", 7),
    FieldSpec::date("document_date"),
    FieldSpec::numeric("header_link_field", 7),
    FieldSpec::code("base_document_branch_id", 7),
    FieldSpec::text("reserved", 21),
];

impl FixedRecord for D110 {
    const CODE: &'static str = "D110";
    const FIELDS: &'static [FieldSpec] = LAYOUT;

    fn write_fields(&self, w: &mut LineWriter) -> Result<()> {
        w.tag()?;
        w.number(self.record_number)?;
        w.numeric(&self.vat_id)?;
        w.numeric(&self.document_type)?;
        w.text(&self.document_number)?;
        w.opt_number(self.line_number)?;
        w.opt_numeric(self.base_document_type.as_deref())?;
        w.opt_text(self.base_document_number.as_deref())?;
        w.opt_numeric(self.transaction_type.as_deref())?;
        w.opt_text(self.internal_catalog_code.as_deref())?;
        w.opt_text(self.goods_service_description.as_deref())?;
        w.opt_text(self.manufacturer_name.as_deref())?;
        w.opt_text(self.serial_number.as_deref())?;
        w.opt_text(self.unit_of_measure_description.as_deref())?;
        w.opt_signed(self.quantity)?;
        w.opt_signed(self.unit_price_excluding_vat)?;
        w.opt_signed(self.line_discount)?;
        w.opt_signed(self.line_total)?;
        w.opt_numeric(self.vat_rate_percent.as_deref())?;
        w.opt_text(self.branch_id.as_deref())?;
        w.opt_date(self.document_date)?;
        w.opt_number(self.header_link_field)?;
        w.opt_text(self.base_document_branch_id.as_deref())?;
        w.reserved()
    }

    fn read_fields(r: &mut LineReader) -> Result<Self> {
        r.tag()?;
        let record_number = r.number()?;
        let vat_id = r.numeric()?;
        let document_type = r.numeric()?;
        let document_number = r.text()?;
        let line_number = r.opt_number()?;
        let base_document_type = r.opt_numeric()?;
        let base_document_number = r.opt_text()?;
        let transaction_type = r.opt_numeric()?;
        let internal_catalog_code = r.opt_text()?;
        let goods_service_description = r.opt_text()?;
        let manufacturer_name = r.opt_text()?;
        let serial_number = r.opt_text()?;
        let unit_of_measure_description = r.opt_text()?;
        let quantity = r.opt_signed()?;
        let unit_price_excluding_vat = r.opt_signed()?;
        let line_discount = r.opt_signed()?;
        let line_total = r.opt_signed()?;
        let vat_rate_percent = r.opt_numeric()?;
        let branch_id = r.opt_text()?;
        let document_date = r.opt_date()?;
        let header_link_field = r.opt_number()?;
        let base_document_branch_id = r.opt_text()?;
        r.reserved()?;
        Ok(D110 {
            record_number,
            vat_id,
            document_type,
            document_number,
            line_number,
            base_document_type,
            base_document_number,
            transaction_type,
            internal_catalog_code,
            goods_service_description,
            manufacturer_name,
            serial_number,
            unit_of_measure_description,
            quantity,
            unit_price_excluding_vat,
            line_discount,
            line_total,
            vat_rate_percent,
            branch_id,
            document_date,
            header_link_field,
            base_document_branch_id,
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
        validation::require_code(
            &mut issues,
            "base_document_type",
            self.base_document_type.as_deref(),
            |c| DocumentType::from_code(c).is_some(),
        );
        issues
    }
}
