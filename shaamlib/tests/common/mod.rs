#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shaamlib::model::{
    Account, Address, BusinessMetadata, DebitCredit, Document, DocumentType, InventoryItem, JournalEntry,
    ReportInput, ReportingPeriod, SortCode,
};

pub const TAX_ID: &str = "512345678";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

pub fn business() -> BusinessMetadata {
    BusinessMetadata {
        business_id: "1001".into(),
        name: "Demo Ltd".into(),
        tax_id: TAX_ID.into(),
        address: Some(Address {
            street: Some("Herzl".into()),
            house_number: Some("12".into()),
            city: Some("Tel Aviv".into()),
            zip: Some("6100000".into()),
            country: None,
        }),
        reporting_period: ReportingPeriod {
            start_date: date(2024, 1, 1),
            end_date: date(2024, 12, 31),
        },
    }
}

/// Документ на 1000.50, дебетовая проводка на 1000.50, счёт с остатком 5000, одна позиция склада.
pub fn scenario() -> ReportInput {
    ReportInput {
        business: business(),
        documents: vec![Document {
            id: "INV-1".into(),
            doc_type: DocumentType::TAX_INVOICE,
            date: date(2024, 3, 15),
            amount: dec("1000.50"),
            description: Some("Consulting".into()),
        }],
        journal_entries: vec![JournalEntry {
            id: "1".into(),
            date: date(2024, 3, 15),
            amount: dec("1000.50"),
            account_key: "4000".into(),
            description: Some("Invoice INV-1".into()),
            debit_credit_indicator: Some(DebitCredit::Debit),
            ..Default::default()
        }],
        accounts: vec![Account {
            id: "4000".into(),
            name: "Revenue".into(),
            sort_code: SortCode {
                key: "400".into(),
                name: "Income".into(),
            },
            opening_balance: dec("5000.00"),
            ..Default::default()
        }],
        inventory: vec![InventoryItem {
            id: "SKU-1".into(),
            name: "Widget".into(),
            quantity: dec("10"),
            unit_price: dec("25.00"),
        }],
    }
}

/// Непустые строки без CRLF.
pub fn lines(text: &str) -> Vec<&str> {
    text.split("\r\n").filter(|l| !l.is_empty()).collect()
}
