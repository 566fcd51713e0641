mod common;

use common::{date, dec, lines, scenario, TAX_ID};
use shaamlib::{
    config::{GenerationOptions, ParseMode, ParseOptions},
    error::ShaamError,
    generate,
    model::{Account, Address, DebitCredit, DocumentType, JournalEntry, SortCode},
    parse,
    parse::CROSS_VALIDATION,
    record::RecordType,
    validation::{write_errors_csv, IssueKind, Severity},
};

fn generated() -> (String, String) {
    let out = generate(&scenario(), &GenerationOptions::default()).expect("generate");
    (out.ini_text, out.data_text)
}

fn replace_line(text: &str, tag: &str, edit: impl Fn(&str) -> String) -> String {
    lines(text)
        .into_iter()
        .map(|l| if l.starts_with(tag) { edit(l) } else { l.to_string() })
        .map(|l| l + "\r\n")
        .collect()
}

fn strict_no_partial() -> ParseOptions {
    ParseOptions {
        validation_mode: ParseMode::Strict,
        allow_partial_data: false,
        ..Default::default()
    }
}

#[test]
fn scenario_survives_round_trip() {
    let (ini, data) = generated();
    let result = parse(&ini, &data, &ParseOptions::default()).expect("parse");

    assert!(result.summary.errors.is_empty(), "{:?}", result.summary.errors);
    assert!(result.summary.cross_validation_passed);
    assert_eq!(result.summary.per_type[&RecordType::Z900], 1);
    assert_eq!(result.summary.per_type[&RecordType::A100], 1);

    let parsed = &result.data;
    assert_eq!(parsed.documents.len(), 1);
    assert_eq!(parsed.documents[0].amount, dec("1000.5"));
    assert_eq!(parsed.documents[0].description.as_deref(), Some("Consulting"));
    assert_eq!(parsed.journal_entries.len(), 1);
    assert_eq!(parsed.journal_entries[0].amount, dec("1000.5"));
    assert_eq!(parsed.journal_entries[0].debit_credit_indicator, Some(DebitCredit::Debit));
    assert_eq!(parsed.accounts[0].opening_balance, dec("5000"));
    assert_eq!(parsed, &scenario());

    assert_eq!(result.records.d110.len(), 1);
    assert_eq!(result.records.d120.len(), 1);
    assert_eq!(result.records.d120[0].payment_method, "9");
}

#[test]
fn credit_indicator_restores_sign() {
    let mut input = scenario();
    input.journal_entries.push(JournalEntry {
        id: "2".into(),
        date: date(2024, 3, 16),
        amount: dec("-40.10"),
        account_key: "4000".into(),
        ..Default::default()
    });
    let out = generate(&input, &GenerationOptions::default()).unwrap();
    let result = parse(&out.ini_text, &out.data_text, &ParseOptions::default()).unwrap();
    let entry = &result.data.journal_entries[1];
    assert_eq!(entry.amount, dec("-40.10"));
    assert_eq!(entry.debit_credit_indicator, Some(DebitCredit::Credit));
}

#[test]
fn declared_count_mismatch_fails_cross_validation() {
    let mut input = scenario();
    let mut second = input.journal_entries[0].clone();
    second.id = "2".into();
    input.journal_entries.push(second);
    let out = generate(&input, &GenerationOptions::default()).unwrap();
    let ini = replace_line(&out.ini_text, "B100", |_| "B100000000000000003".to_string());

    let result = parse(&ini, &out.data_text, &ParseOptions::default()).unwrap();
    assert!(!result.summary.cross_validation_passed);
    let issue = result
        .summary
        .errors
        .iter()
        .find(|e| e.field == "B100_count")
        .expect("B100_count error");
    assert_eq!(issue.record_type, CROSS_VALIDATION);
    assert_eq!(issue.severity, Severity::Error);
    assert_eq!(
        issue.kind,
        IssueKind::CountMismatch {
            declared: 3,
            actual: 2
        }
    );
}

#[test]
fn unknown_summary_type_fails_cross_validation() {
    let (ini, data) = generated();
    let ini = format!("{ini}Q777000000000000001\r\n");
    let result = parse(&ini, &data, &ParseOptions::default()).unwrap();
    assert!(!result.summary.cross_validation_passed);
    assert!(result
        .summary
        .errors
        .iter()
        .any(|e| e.field == "Q777_count" && matches!(e.kind, IssueKind::UnknownSummaryType { .. })));
}

#[test]
fn closing_total_is_checked() {
    let (ini, data) = generated();
    let data = replace_line(&data, "Z900", |l| format!("{}{}{}", &l[..45], "0".repeat(14) + "1", &l[60..]));
    let result = parse(&ini, &data, &ParseOptions::default()).unwrap();
    assert!(!result.summary.cross_validation_passed);
    let issue = result
        .summary
        .errors
        .iter()
        .find(|e| e.field == "Z900_totalRecords")
        .expect("Z900 total error");
    assert_eq!(
        issue.kind,
        IssueKind::CountMismatch {
            declared: 1,
            actual: 7
        }
    );
}

#[test]
fn header_and_a100_tax_ids_must_match() {
    let (ini, data) = generated();
    let data = replace_line(&data, "A100", |l| format!("{}{}{}", &l[..13], "999999999", &l[22..]));
    let result = parse(&ini, &data, &ParseOptions::default()).unwrap();
    assert!(!result.summary.cross_validation_passed);
    let issue = result.summary.errors.iter().find(|e| e.field == "vatId").expect("vatId error");
    assert_eq!(
        issue.kind,
        IssueKind::TaxIdMismatch {
            header: TAX_ID.into(),
            metadata: "999999999".into()
        }
    );
}

#[test]
fn corrupted_line_lenient_keeps_the_rest() {
    let (ini, data) = generated();
    let data = replace_line(&data, "B110", |l| l[..200].to_string());

    let result = parse(&ini, &data, &ParseOptions::default()).unwrap();
    assert!(result.data.accounts.is_empty());
    assert_eq!(result.data.documents.len(), 1);
    assert_eq!(result.data.journal_entries.len(), 1);
    let issue = result
        .summary
        .errors
        .iter()
        .find(|e| e.record_type == "B110")
        .expect("decode error for B110");
    assert_eq!(issue.record_index, Some(5));
    assert!(matches!(issue.kind, IssueKind::Shape { .. }));
    assert!(!result.summary.cross_validation_passed);

    match parse(&ini, &data, &strict_no_partial()) {
        Err(ShaamError::Validation(issues)) => assert!(issues.iter().any(|e| e.record_type == "B110")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn strict_with_partial_data_still_returns_result() {
    let (ini, data) = generated();
    let data = replace_line(&data, "M100", |l| l[..100].to_string());
    let options = ParseOptions {
        validation_mode: ParseMode::Strict,
        ..Default::default()
    };
    let result = parse(&ini, &data, &options).unwrap();
    assert!(result.summary.has_errors());
    assert!(result.data.inventory.is_empty());
}

#[test]
fn unknown_data_records_by_mode() {
    let (ini, data) = generated();
    let data = format!("{data}X999{}\r\n", " ".repeat(20));

    let lenient = parse(&ini, &data, &ParseOptions::default()).unwrap();
    let issue = lenient
        .summary
        .errors
        .iter()
        .find(|e| matches!(e.kind, IssueKind::UnknownRecord { .. }))
        .expect("unknown record issue");
    assert_eq!(issue.severity, Severity::Warning);
    assert_eq!(issue.record_type, "X999");
    assert!(lenient.summary.cross_validation_passed);

    let strict = ParseOptions {
        validation_mode: ParseMode::Strict,
        ..Default::default()
    };
    let result = parse(&ini, &data, &strict).unwrap();
    assert!(result
        .summary
        .errors
        .iter()
        .any(|e| e.severity == Severity::Error && matches!(e.kind, IssueKind::UnknownRecord { .. })));

    let skip = ParseOptions {
        skip_unknown_records: true,
        ..strict_no_partial()
    };
    let result = parse(&ini, &data, &skip).expect("unknown lines skipped silently");
    assert!(result.summary.errors.is_empty());
}

#[test]
fn validation_mode_none_skips_entity_checks() {
    let mut input = scenario();
    input.documents[0].date = date(2025, 6, 1);
    let out = generate(&input, &GenerationOptions::default()).unwrap();

    let lenient = parse(&out.ini_text, &out.data_text, &ParseOptions::default()).unwrap();
    assert!(lenient
        .summary
        .errors
        .iter()
        .any(|e| e.record_type == "Document" && e.field == "date"));

    let none = ParseOptions {
        validation_mode: ParseMode::None,
        ..Default::default()
    };
    let result = parse(&out.ini_text, &out.data_text, &none).unwrap();
    assert!(result.summary.errors.is_empty());
    assert!(result.summary.cross_validation_passed);
}

#[test]
fn a100_is_the_fallback_for_business_metadata() {
    let (_, data) = generated();
    let result = parse("", &data, &ParseOptions::default()).unwrap();
    assert_eq!(result.data.business.tax_id, TAX_ID);
    assert_eq!(result.data.business.business_id, "1001");
    let header = result
        .summary
        .errors
        .iter()
        .find(|e| e.record_type == "A000")
        .expect("missing header issue");
    assert_eq!(header.severity, Severity::Warning);
    assert!(result
        .summary
        .errors
        .iter()
        .any(|e| matches!(e.kind, IssueKind::MissingSummary { actual: 1 })));

    let empty = parse("", "", &ParseOptions::default()).unwrap();
    assert!(empty.summary.has_errors());
    assert_eq!(empty.summary.total_records, 0);
}

#[test]
fn errors_export_as_csv() {
    let (ini, data) = generated();
    let ini = replace_line(&ini, "B100", |_| "B100000000000000005".to_string());
    let result = parse(&ini, &data, &ParseOptions::default()).unwrap();

    let mut out = Vec::new();
    write_errors_csv(&mut out, &result.summary.errors).expect("csv");
    let text = String::from_utf8(out).unwrap();
    let mut rows = text.lines();
    assert_eq!(rows.next(), Some("severity,record_type,record_index,field,message"));
    assert_eq!(
        rows.next(),
        Some("error,CrossValidation,,B100_count,\"declared 5 record(s), found 1\"")
    );
}

#[test]
fn leading_zero_tax_ids_survive_round_trip() {
    let mut input = scenario();
    input.business.tax_id = "012345678".into();
    input.accounts[0].vat_id = Some("001234567".into());
    let out = generate(&input, &GenerationOptions::default()).unwrap();
    let result = parse(&out.ini_text, &out.data_text, &ParseOptions::default()).unwrap();

    assert!(result.summary.cross_validation_passed);
    assert!(result.summary.errors.is_empty(), "{:?}", result.summary.errors);
    assert_eq!(result.data.business.tax_id, "012345678");
    assert_eq!(result.data.accounts[0].vat_id.as_deref(), Some("001234567"));
    assert_eq!(result.data, input);
    // wire records keep the plain numeric form
    assert_eq!(result.records.a100[0].vat_id, "12345678");
}

#[test]
fn extended_fields_survive_round_trip() {
    let mut input = scenario();
    input.journal_entries[0] = JournalEntry {
        id: "5".into(),
        date: date(2024, 3, 15),
        amount: dec("-1000.50"),
        account_key: "4000".into(),
        description: Some("Invoice INV-1".into()),
        transaction_line_number: Some(2),
        batch_number: Some(17),
        transaction_type: Some("sale".into()),
        reference_document: Some("INV-1".into()),
        reference_document_type: Some(DocumentType::TAX_INVOICE),
        reference_document2: Some("ORD-9".into()),
        reference_document_type2: Some(DocumentType::ORDER),
        value_date: Some(date(2024, 3, 20)),
        counter_account_key: Some("1200".into()),
        debit_credit_indicator: Some(DebitCredit::Credit),
        currency_code: Some("USD".into()),
        foreign_currency_amount: Some(dec("-270.25")),
        quantity: Some(dec("3.5")),
        matching_field1: Some("M1".into()),
        matching_field2: Some("M2".into()),
        branch_id: Some("BR1".into()),
        entry_date: Some(date(2024, 3, 16)),
        operator_username: Some("clerk".into()),
    };
    input.accounts[0] = Account {
        id: "4000".into(),
        name: "Revenue".into(),
        sort_code: SortCode {
            key: "400".into(),
            name: "Income".into(),
        },
        opening_balance: dec("-5000.00"),
        address: Some(Address {
            street: Some("Rothschild".into()),
            house_number: Some("7".into()),
            city: Some("Haifa".into()),
            zip: Some("3100000".into()),
            country: Some("Israel".into()),
        }),
        country_code: Some("IL".into()),
        parent_account_key: Some("4".into()),
        vat_id: Some("987654321".into()),
        total_debits: Some(dec("1200.10")),
        total_credits: Some(dec("-300")),
        accounting_classification_code: Some("1234".into()),
        branch_id: Some("BR1".into()),
        opening_balance_foreign_currency: Some(dec("1350.75")),
        foreign_currency_code: Some("EUR".into()),
    };

    let out = generate(&input, &GenerationOptions::default()).unwrap();
    let result = parse(&out.ini_text, &out.data_text, &ParseOptions::default()).unwrap();
    assert!(result.summary.errors.is_empty(), "{:?}", result.summary.errors);
    assert!(result.summary.cross_validation_passed);
    assert_eq!(result.data.journal_entries, input.journal_entries);
    assert_eq!(result.data.accounts, input.accounts);
    assert_eq!(result.data, input);
}
