//! Z900: закрывающая запись файла данных.

use crate::{
    error::Result,
    layout::{FieldSpec, LineReader, LineWriter},
    traits::FixedRecord,
    validation::{self, FieldIssue},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Z900 {
    pub record_number: u64,
    pub vat_id: String,
    pub primary_identifier: String,
    pub system_constant: String,
    /// Сколько записей в файле данных до Z900.
    pub total_records: u64,
}

const LAYOUT: &[FieldSpec] = &[
    FieldSpec::code("code", 4),
    FieldSpec::numeric("record_number", 9),
    FieldSpec::numeric("vat_id", 9).required(),
    FieldSpec::numeric("primary_identifier", 15).required(),
    FieldSpec::code("system_constant", 8).required(),
    FieldSpec::numeric("total_records", 15),
    FieldSpec::text("reserved", 50),
];

impl FixedRecord for Z900 {
    const CODE: &'static str = "Z900";
    const FIELDS: &'static [FieldSpec] = LAYOUT;

    fn write_fields(&self, w: &mut LineWriter) -> Result<()> {
        w.tag()?;
        w.number(self.record_number)?;
        w.numeric(&self.vat_id)?;
        w.numeric(&self.primary_identifier)?;
        w.text(&self.system_constant)?;
        w.number(self.total_records)?;
        w.reserved()
    }

    fn read_fields(r: &mut LineReader) -> Result<Self> {
        r.tag()?;
        let record_number = r.number()?;
        let vat_id = r.numeric()?;
        let primary_identifier = r.numeric()?;
        let system_constant = r.text()?;
        let total_records = r.number()?;
        r.reserved()?;
        Ok(Z900 {
            record_number,
            vat_id,
            primary_identifier,
            system_constant,
            total_records,
        })
    }

    fn check(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        validation::require(&mut issues, "vat_id", &self.vat_id);
        validation::require(&mut issues, "system_constant", &self.system_constant);
        issues
    }
}
