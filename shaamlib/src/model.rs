//! Доменные модели — «нормализованный» слой между приложением и файлами SHAAM.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Код типа документа из закрытого перечня налогового управления.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "u16", into = "u16")]
pub struct DocumentType(u16);

impl DocumentType {
    pub const CODES: [u16; 30] = [
        100, 200, 205, 210, 300, 305, 310, 320, 330, 340, 345, 400, 405, 410, 420, 500, 600, 700,
        710, 800, 810, 820, 830, 840, 900, 910, 920, 930, 940, 950,
    ];

    pub const ORDER: Self = Self(100);
    pub const DELIVERY_NOTE: Self = Self(200);
    pub const RETURN_NOTE: Self = Self(210);
    pub const INVOICE: Self = Self(300);
    pub const TAX_INVOICE: Self = Self(305);
    pub const TAX_INVOICE_RECEIPT: Self = Self(320);
    pub const CREDIT_INVOICE: Self = Self(330);
    pub const RECEIPT: Self = Self(400);
    pub const PURCHASE_ORDER: Self = Self(500);

    pub fn new(code: u16) -> Option<Self> {
        Self::CODES.contains(&code).then_some(Self(code))
    }

    /// Разбирает трёхзначный код из записи ("305").
    pub fn from_code(code: &str) -> Option<Self> {
        code.trim().parse().ok().and_then(Self::new)
    }

    pub fn code(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for DocumentType {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::new(code).ok_or_else(|| format!("unknown document type {code}"))
    }
}

impl From<DocumentType> for u16 {
    fn from(t: DocumentType) -> Self {
        t.0
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Признак дебет/кредит в проводке: `1` — дебет, `2` — кредит.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DebitCredit {
    Debit,
    Credit,
}

impl DebitCredit {
    pub fn code(self) -> &'static str {
        match self {
            DebitCredit::Debit => "1",
            DebitCredit::Credit => "2",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(DebitCredit::Debit),
            "2" => Some(DebitCredit::Credit),
            _ => None,
        }
    }

    /// Нулевая и положительная сумма — дебет.
    pub fn for_amount(amount: Decimal) -> Self {
        if amount.is_sign_negative() && !amount.is_zero() {
            DebitCredit::Credit
        } else {
            DebitCredit::Debit
        }
    }
}

/// Способ оплаты в строке оплаты документа (D120).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Check,
    CreditCard,
    BankTransfer,
    Voucher,
    ExchangeNote,
    PromissoryNote,
    StandingOrder,
    Other,
}

impl PaymentMethod {
    pub fn code(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "1",
            PaymentMethod::Check => "2",
            PaymentMethod::CreditCard => "3",
            PaymentMethod::BankTransfer => "4",
            PaymentMethod::Voucher => "5",
            PaymentMethod::ExchangeNote => "6",
            PaymentMethod::PromissoryNote => "7",
            PaymentMethod::StandingOrder => "8",
            PaymentMethod::Other => "9",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "1" => PaymentMethod::Cash,
            "2" => PaymentMethod::Check,
            "3" => PaymentMethod::CreditCard,
            "4" => PaymentMethod::BankTransfer,
            "5" => PaymentMethod::Voucher,
            "6" => PaymentMethod::ExchangeNote,
            "7" => PaymentMethod::PromissoryNote,
            "8" => PaymentMethod::StandingOrder,
            "9" => PaymentMethod::Other,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl Address {
    /// `None`, если ни одно поле адреса не заполнено.
    pub fn from_parts(
        street: Option<String>,
        house_number: Option<String>,
        city: Option<String>,
        zip: Option<String>,
        country: Option<String>,
    ) -> Option<Self> {
        let address = Address {
            street,
            house_number,
            city,
            zip,
            country,
        };
        (address != Address::default()).then_some(address)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportingPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BusinessMetadata {
    pub business_id: String,
    pub name: String,
    pub tax_id: String,
    #[serde(default)]
    pub address: Option<Address>,
    pub reporting_period: ReportingPeriod,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub doc_type: DocumentType,
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

/// Проводка. Положительная сумма — дебет, отрицательная — кредит.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JournalEntry {
    pub id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub account_key: String,
    pub description: Option<String>,

    pub transaction_line_number: Option<u64>,
    pub batch_number: Option<u64>,
    pub transaction_type: Option<String>,
    pub reference_document: Option<String>,
    pub reference_document_type: Option<DocumentType>,
    pub reference_document2: Option<String>,
    pub reference_document_type2: Option<DocumentType>,
    pub value_date: Option<NaiveDate>,
    pub counter_account_key: Option<String>,
    pub debit_credit_indicator: Option<DebitCredit>,
    pub currency_code: Option<String>,
    pub foreign_currency_amount: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub matching_field1: Option<String>,
    pub matching_field2: Option<String>,
    pub branch_id: Option<String>,
    pub entry_date: Option<NaiveDate>,
    pub operator_username: Option<String>,
}

/// Пара «код сортировки / название» из плана счетов.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortCode {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub sort_code: SortCode,
    pub opening_balance: Decimal,

    pub address: Option<Address>,
    pub country_code: Option<String>,
    pub parent_account_key: Option<String>,
    pub vat_id: Option<String>,
    pub total_debits: Option<Decimal>,
    pub total_credits: Option<Decimal>,
    pub accounting_classification_code: Option<String>,
    pub branch_id: Option<String>,
    pub opening_balance_foreign_currency: Option<Decimal>,
    pub foreign_currency_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

/// Единица генерации: метаданные бизнеса и четыре коллекции сущностей.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportInput {
    pub business: BusinessMetadata,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub journal_entries: Vec<JournalEntry>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
}
