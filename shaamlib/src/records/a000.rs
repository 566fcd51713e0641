//! Файл INI: заголовок A000 и строки счётчиков по типам записей.

use crate::{
    error::Result,
    layout::{self, FieldSpec, LineReader, LineWriter},
    traits::FixedRecord,
    validation::{self, FieldIssue},
};
use chrono::NaiveDate;
use serde::Serialize;

/// Константа формата, общая для A000, A100 и Z900.
pub const SYSTEM_CONSTANT: &str = "&OF1.31&";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct A000 {
    /// Число строк в файле данных, включая Z900.
    pub total_records: u64,
    pub vat_id: String,
    pub primary_identifier: String,
    pub system_constant: String,
    pub software_reg_number: Option<String>,
    pub software_name: String,
    pub software_version: String,
    pub vendor_vat_id: Option<String>,
    pub vendor_name: String,
    pub software_type: Option<String>,
    pub file_output_path: Option<String>,
    pub accounting_type: Option<String>,
    pub balance_required: Option<String>,
    pub company_reg_id: Option<String>,
    pub withholding_file_number: Option<String>,
    pub business_name: String,
    pub business_street: Option<String>,
    pub business_house_number: Option<String>,
    pub business_city: Option<String>,
    pub business_zip: Option<String>,
    pub tax_year: Option<u64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub process_start_date: Option<NaiveDate>,
    /// `HHMM` без ведущих нулей.
    pub process_start_time: Option<String>,
    /// Пустое значение — `0`, иврит.
    pub language_code: Option<String>,
    pub character_set: Option<String>,
    pub compression_software: Option<String>,
    pub base_currency: Option<String>,
    pub branch_info_flag: Option<String>,
}

const LAYOUT: &[FieldSpec] = &[
    FieldSpec::code("code", 4),
    FieldSpec::text("reserved", 5),
    FieldSpec::numeric("total_records", 15),
    FieldSpec::numeric("vat_id", 9).required(),
    FieldSpec::numeric("primary_identifier", 15).required(),
    FieldSpec::code("system_constant", 8).required(),
    FieldSpec::numeric("software_reg_number", 8),
    FieldSpec::text("software_name", 20).required(),
    FieldSpec::text("software_version", 20),
    FieldSpec::numeric("vendor_vat_id", 9),
    FieldSpec::text("vendor_name", 20),
    FieldSpec::numeric("software_type", 1),
    FieldSpec::text("file_output_path", 50),
    FieldSpec::numeric("accounting_type", 1),
    FieldSpec::numeric("balance_required", 1),
    FieldSpec::numeric("company_reg_id", 9),
    FieldSpec::numeric("withholding_file_number", 9),
    FieldSpec::text("reserved", 10),
    FieldSpec::text("business_name", 50).required(),
    FieldSpec::text("business_street", 50),
    FieldSpec::text("business_house_number", 10),
    FieldSpec::text("business_city", 30),
    FieldSpec::code("business_zip", 8),
    FieldSpec::numeric("tax_year", 4),
    FieldSpec::date("start_date").required(),
    FieldSpec::date("end_date").required(),
    FieldSpec::date("process_start_date"),
    FieldSpec::numeric("process_start_time", 4),
    FieldSpec::numeric("language_code", 1),
    FieldSpec::numeric("character_set", 1),
    FieldSpec::text("compression_software", 20),
    FieldSpec::code("base_currency", 3),
    FieldSpec::numeric("branch_info_flag", 1),
    FieldSpec::text("reserved", 46),
];

impl FixedRecord for A000 {
    const CODE: &'static str = "A000";
    const FIELDS: &'static [FieldSpec] = LAYOUT;

    fn write_fields(&self, w: &mut LineWriter) -> Result<()> {
        w.tag()?;
        w.reserved()?;
        w.number(self.total_records)?;
        w.numeric(&self.vat_id)?;
        w.numeric(&self.primary_identifier)?;
        w.text(&self.system_constant)?;
        w.opt_numeric(self.software_reg_number.as_deref())?;
        w.text(&self.software_name)?;
        w.text(&self.software_version)?;
        w.opt_numeric(self.vendor_vat_id.as_deref())?;
        w.text(&self.vendor_name)?;
        w.opt_numeric(self.software_type.as_deref())?;
        w.opt_text(self.file_output_path.as_deref())?;
        w.opt_numeric(self.accounting_type.as_deref())?;
        w.opt_numeric(self.balance_required.as_deref())?;
        w.opt_numeric(self.company_reg_id.as_deref())?;
        w.opt_numeric(self.withholding_file_number.as_deref())?;
        w.reserved()?;
        w.text(&self.business_name)?;
        w.opt_text(self.business_street.as_deref())?;
        w.opt_text(self.business_house_number.as_deref())?;
        w.opt_text(self.business_city.as_deref())?;
        w.opt_text(self.business_zip.as_deref())?;
        w.opt_number(self.tax_year)?;
        w.date(self.start_date)?;
        w.date(self.end_date)?;
        w.opt_date(self.process_start_date)?;
        w.opt_numeric(self.process_start_time.as_deref())?;
        w.opt_numeric(self.language_code.as_deref())?;
        w.opt_numeric(self.character_set.as_deref())?;
        w.opt_text(self.compression_software.as_deref())?;
        w.opt_text(self.base_currency.as_deref())?;
        w.opt_numeric(self.branch_info_flag.as_deref())?;
        w.reserved()
    }

    fn read_fields(r: &mut LineReader) -> Result<Self> {
        r.tag()?;
        r.reserved()?;
        let total_records = r.number()?;
        let vat_id = r.numeric()?;
        let primary_identifier = r.numeric()?;
        let system_constant = r.text()?;
        let software_reg_number = r.opt_numeric()?;
        let software_name = r.text()?;
        let software_version = r.text()?;
        let vendor_vat_id = r.opt_numeric()?;
        let vendor_name = r.text()?;
        let software_type = r.opt_numeric()?;
        let file_output_path = r.opt_text()?;
        let accounting_type = r.opt_numeric()?;
        let balance_required = r.opt_numeric()?;
        let company_reg_id = r.opt_numeric()?;
        let withholding_file_number = r.opt_numeric()?;
        r.reserved()?;
        let business_name = r.text()?;
        let business_street = r.opt_text()?;
        let business_house_number = r.opt_text()?;
        let business_city = r.opt_text()?;
        let business_zip = r.opt_text()?;
        let tax_year = r.opt_number()?;
        let start_date = r.date()?;
        let end_date = r.date()?;
        let process_start_date = r.opt_date()?;
        let process_start_time = r.opt_numeric()?;
        let language_code = r.opt_numeric()?;
        let character_set = r.opt_numeric()?;
        let compression_software = r.opt_text()?;
        let base_currency = r.opt_text()?;
        let branch_info_flag = r.opt_numeric()?;
        r.reserved()?;
        Ok(A000 {
            total_records,
            vat_id,
            primary_identifier,
            system_constant,
            software_reg_number,
            software_name,
            software_version,
            vendor_vat_id,
            vendor_name,
            software_type,
            file_output_path,
            accounting_type,
            balance_required,
            company_reg_id,
            withholding_file_number,
            business_name,
            business_street,
            business_house_number,
            business_city,
            business_zip,
            tax_year,
            start_date,
            end_date,
            process_start_date,
            process_start_time,
            language_code,
            character_set,
            compression_software,
            base_currency,
            branch_info_flag,
        })
    }

    fn check(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        validation::require(&mut issues, "vat_id", &self.vat_id);
        validation::require(&mut issues, "primary_identifier", &self.primary_identifier);
        validation::require(&mut issues, "system_constant", &self.system_constant);
        validation::require(&mut issues, "software_name", &self.software_name);
        validation::require(&mut issues, "business_name", &self.business_name);
        issues
    }
}

/// Строка INI-файла: тип записи и сколько таких записей в файле данных.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRecord {
    /// Код как в файле; неизвестные коды сохраняются и ловятся сверкой.
    pub record_type: String,
    pub count: u64,
}

impl SummaryRecord {
    pub const NAME: &'static str = "A000Sum";
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::code("record_type", 4).required(),
        FieldSpec::numeric("count", 15),
    ];
    pub const WIDTH: usize = layout::total_width(Self::FIELDS);

    pub fn new(record_type: impl Into<String>, count: u64) -> Self {
        SummaryRecord {
            record_type: record_type.into(),
            count,
        }
    }

    pub fn encode(&self) -> Result<String> {
        let mut w = LineWriter::new(Self::NAME, Self::FIELDS);
        w.text(&self.record_type)?;
        w.number(self.count)?;
        w.finish()
    }

    pub fn decode(line: &str) -> Result<Self> {
        let mut r = LineReader::new(Self::NAME, Self::FIELDS, layout::strip_terminator(line))?;
        let record_type = r.text()?;
        let count = r.number()?;
        r.finish()?;
        let mut issues = Vec::new();
        validation::require(&mut issues, "record_type", &record_type);
        if !issues.is_empty() {
            return Err(crate::error::ShaamError::Schema {
                record: Self::NAME,
                issues,
            });
        }
        Ok(SummaryRecord { record_type, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_line_layout() {
        let line = SummaryRecord::new("B100", 42).encode().unwrap();
        assert_eq!(line, "B100000000000000042\r\n");
        assert_eq!(SummaryRecord::decode(&line).unwrap(), SummaryRecord::new("B100", 42));
    }

    #[test]
    fn blank_summary_type_is_rejected() {
        let line = format!("    {}", "0".repeat(15));
        assert!(SummaryRecord::decode(&line).is_err());
    }
}
