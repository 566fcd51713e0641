use chrono::NaiveDate;
use rust_decimal::Decimal;
use shaamlib::{
    config::{GenerationOptions, ParseOptions},
    model::{BusinessMetadata, Document, DocumentType, JournalEntry, ReportInput, ReportingPeriod},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Пример: один счёт и одна проводка -> файлы -> обратно в данные
    let date = |m, d| NaiveDate::from_ymd_opt(2024, m, d).ok_or("bad date");
    let input = ReportInput {
        business: BusinessMetadata {
            business_id: "1001".into(),
            name: "Demo Ltd".into(),
            tax_id: "51-234567-8".into(),
            address: None,
            reporting_period: ReportingPeriod {
                start_date: date(1, 1)?,
                end_date: date(12, 31)?,
            },
        },
        documents: vec![Document {
            id: "INV-1".into(),
            doc_type: DocumentType::TAX_INVOICE,
            date: date(3, 15)?,
            amount: Decimal::new(117_000, 2),
            description: Some("Consulting".into()),
        }],
        journal_entries: vec![JournalEntry {
            id: "1".into(),
            date: date(3, 15)?,
            amount: Decimal::new(117_000, 2),
            account_key: "4000".into(),
            ..Default::default()
        }],
        accounts: vec![],
        inventory: vec![],
    };

    let output = shaamlib::generate(&input, &GenerationOptions::default())?;
    print!("{}", output.ini_text);
    print!("{}", output.data_text);

    let parsed = shaamlib::parse(&output.ini_text, &output.data_text, &ParseOptions::default())?;
    println!("{}", serde_json::to_string_pretty(&parsed.summary)?);
    Ok(())
}
