mod common;

use common::{date, dec};
use rust_decimal::Decimal;
use shaamlib::{
    error::ShaamError,
    record::{Record, RecordType},
    records::{
        a000::{A000, SYSTEM_CONSTANT},
        a100::A100,
        b100::B100,
        b110::B110,
        c100::C100,
        d110::D110,
        d120::D120,
        m100::M100,
        z900::Z900,
    },
    traits::FixedRecord,
    validation::IssueKind,
};
use std::fmt::Debug;

fn x(n: usize) -> String {
    "X".repeat(n)
}

fn nines(n: usize) -> String {
    "9".repeat(n)
}

/// Наибольшая по модулю сумма для знакового поля ширины `width`.
fn max_signed(width: usize, negative: bool) -> Decimal {
    let v = dec(&format!("{}.99", nines(width - 3)));
    if negative {
        -v
    } else {
        v
    }
}

fn assert_roundtrip<R: FixedRecord + PartialEq + Debug>(record: &R, width: usize) {
    let line = record.encode().expect("encode");
    assert!(line.ends_with("\r\n"));
    assert_eq!(line.chars().count(), width + 2, "{} width", R::CODE);
    assert_eq!(&line[..4], R::CODE);
    let back = R::decode(&line).expect("decode");
    assert_eq!(&back, record);
}

fn a000_min() -> A000 {
    A000 {
        total_records: 2,
        vat_id: "1".into(),
        primary_identifier: "1".into(),
        system_constant: SYSTEM_CONSTANT.into(),
        software_reg_number: None,
        software_name: "s".into(),
        software_version: String::new(),
        vendor_vat_id: None,
        vendor_name: String::new(),
        software_type: None,
        file_output_path: None,
        accounting_type: None,
        balance_required: None,
        company_reg_id: None,
        withholding_file_number: None,
        business_name: "b".into(),
        business_street: None,
        business_house_number: None,
        business_city: None,
        business_zip: None,
        tax_year: None,
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        process_start_date: None,
        process_start_time: None,
        language_code: None,
        character_set: None,
        compression_software: None,
        base_currency: None,
        branch_info_flag: None,
    }
}

#[test]
fn a000_widths() {
    assert_roundtrip(&a000_min(), 466);
    let max = A000 {
        total_records: nines(15).parse().unwrap(),
        vat_id: nines(9),
        primary_identifier: nines(15),
        software_reg_number: Some(nines(8)),
        software_name: x(20),
        software_version: x(20),
        vendor_vat_id: Some(nines(9)),
        vendor_name: x(20),
        software_type: Some("2".into()),
        file_output_path: Some(x(50)),
        accounting_type: Some("2".into()),
        balance_required: Some("1".into()),
        company_reg_id: Some(nines(9)),
        withholding_file_number: Some(nines(9)),
        business_name: x(50),
        business_street: Some(x(50)),
        business_house_number: Some(x(10)),
        business_city: Some(x(30)),
        business_zip: Some(x(8)),
        tax_year: Some(2024),
        process_start_date: Some(date(2025, 1, 5)),
        process_start_time: Some("2359".into()),
        language_code: Some("1".into()),
        character_set: Some("1".into()),
        compression_software: Some(x(20)),
        base_currency: Some("ILS".into()),
        branch_info_flag: Some("1".into()),
        ..a000_min()
    };
    assert_roundtrip(&max, 466);
}

#[test]
fn a100_and_z900_widths() {
    let a100 = A100 {
        record_number: 1,
        vat_id: nines(9),
        primary_identifier: nines(15),
        system_constant: SYSTEM_CONSTANT.into(),
    };
    assert_roundtrip(&a100, 95);
    let z900 = Z900 {
        record_number: nines(9).parse().unwrap(),
        vat_id: "7".into(),
        primary_identifier: "7".into(),
        system_constant: SYSTEM_CONSTANT.into(),
        total_records: 0,
    };
    assert_roundtrip(&z900, 110);
}

fn b100_min() -> B100 {
    B100 {
        record_number: 2,
        vat_id: "1".into(),
        transaction_number: 1,
        transaction_line_number: None,
        batch_number: None,
        transaction_type: None,
        reference_document: None,
        reference_document_type: None,
        reference_document2: None,
        reference_document_type2: None,
        details: None,
        date: date(2024, 3, 1),
        value_date: None,
        account_key: "1".into(),
        counter_account_key: None,
        debit_credit_indicator: "1".into(),
        currency_code: None,
        transaction_amount: Decimal::ZERO,
        foreign_currency_amount: None,
        quantity: None,
        matching_field1: None,
        matching_field2: None,
        branch_id: None,
        entry_date: None,
        operator_username: None,
    }
}

#[test]
fn b100_widths() {
    assert_roundtrip(&b100_min(), 317);
    let max = B100 {
        record_number: nines(9).parse().unwrap(),
        vat_id: nines(9),
        transaction_number: nines(10).parse().unwrap(),
        transaction_line_number: Some(99_999),
        batch_number: Some(99_999_999),
        transaction_type: Some(x(15)),
        reference_document: Some(x(20)),
        reference_document_type: Some("950".into()),
        reference_document2: Some(x(20)),
        reference_document_type2: Some("100".into()),
        details: Some(x(50)),
        value_date: Some(date(2024, 3, 2)),
        account_key: x(15),
        counter_account_key: Some(x(15)),
        debit_credit_indicator: "2".into(),
        currency_code: Some("USD".into()),
        transaction_amount: max_signed(15, false),
        foreign_currency_amount: Some(max_signed(15, true)),
        quantity: Some(max_signed(12, true)),
        matching_field1: Some(x(10)),
        matching_field2: Some(x(10)),
        branch_id: Some(x(7)),
        entry_date: Some(date(2024, 3, 3)),
        operator_username: Some(x(9)),
        ..b100_min()
    };
    assert_roundtrip(&max, 317);
}

#[test]
fn b110_widths() {
    let min = B110 {
        record_number: 3,
        vat_id: "1".into(),
        account_key: "1".into(),
        account_name: "a".into(),
        trial_balance_code: "1".into(),
        trial_balance_code_description: None,
        street: None,
        house_number: None,
        city: None,
        zip: None,
        country: None,
        country_code: None,
        parent_account_key: None,
        opening_balance: Decimal::ZERO,
        total_debits: None,
        total_credits: None,
        accounting_classification_code: None,
        customer_supplier_vat_id: None,
        branch_id: None,
        opening_balance_foreign_currency: None,
        foreign_currency_code: None,
    };
    assert_roundtrip(&min, 376);
    let max = B110 {
        account_key: x(15),
        account_name: x(50),
        trial_balance_code: x(15),
        trial_balance_code_description: Some(x(30)),
        street: Some(x(50)),
        house_number: Some(x(10)),
        city: Some(x(30)),
        zip: Some(x(8)),
        country: Some(x(30)),
        country_code: Some("IL".into()),
        parent_account_key: Some(x(15)),
        opening_balance: max_signed(15, true),
        total_debits: Some(max_signed(15, false)),
        total_credits: Some(max_signed(15, false)),
        accounting_classification_code: Some(nines(4)),
        customer_supplier_vat_id: Some(nines(9)),
        branch_id: Some(x(7)),
        opening_balance_foreign_currency: Some(max_signed(15, true)),
        foreign_currency_code: Some("EUR".into()),
        ..min.clone()
    };
    assert_roundtrip(&max, 376);
}

fn c100_max() -> C100 {
    C100 {
        record_number: 4,
        vat_id: nines(9),
        document_type: "320".into(),
        document_id: x(20),
        document_issue_date: date(2024, 5, 1),
        document_issue_time: Some("1230".into()),
        customer_name: Some(x(50)),
        customer_street: Some(x(50)),
        customer_house_number: Some(x(10)),
        customer_city: Some(x(30)),
        customer_zip: Some(x(8)),
        customer_country: Some(x(30)),
        customer_country_code: Some("IL".into()),
        customer_phone: Some(x(15)),
        customer_vat_id: Some(nines(9)),
        document_value_date: Some(date(2024, 5, 2)),
        foreign_currency_amount: Some(max_signed(15, false)),
        currency_code: Some("USD".into()),
        amount_before_discount: Some(max_signed(15, false)),
        document_discount: Some(max_signed(15, true)),
        amount_after_discount_excluding_vat: Some(max_signed(15, false)),
        vat_amount: Some(max_signed(15, false)),
        amount_including_vat: max_signed(15, true),
        withholding_tax_amount: Some(max_signed(12, false)),
        customer_key: Some(x(15)),
        matching_field: Some(x(10)),
        cancelled_attribute: Some("1".into()),
        document_date: Some(date(2024, 5, 3)),
        branch_id: Some(x(7)),
        operator_username: Some(x(9)),
        action_link: Some(9_999_999),
    }
}

#[test]
fn c100_widths() {
    assert_roundtrip(&c100_max(), 445);
    let min = C100 {
        vat_id: "1".into(),
        document_id: "1".into(),
        document_issue_time: None,
        customer_name: None,
        customer_street: None,
        customer_house_number: None,
        customer_city: None,
        customer_zip: None,
        customer_country: None,
        customer_country_code: None,
        customer_phone: None,
        customer_vat_id: None,
        document_value_date: None,
        foreign_currency_amount: None,
        currency_code: None,
        amount_before_discount: None,
        document_discount: None,
        amount_after_discount_excluding_vat: None,
        vat_amount: None,
        amount_including_vat: Decimal::ZERO,
        withholding_tax_amount: None,
        customer_key: None,
        matching_field: None,
        cancelled_attribute: None,
        document_date: None,
        branch_id: None,
        operator_username: None,
        action_link: None,
        ..c100_max()
    };
    assert_roundtrip(&min, 445);
}

#[test]
fn d110_and_d120_widths() {
    let d110 = D110 {
        record_number: 5,
        vat_id: nines(9),
        document_type: "305".into(),
        document_number: x(20),
        line_number: Some(9999),
        base_document_type: Some("200".into()),
        base_document_number: Some(x(20)),
        transaction_type: Some("1".into()),
        internal_catalog_code: Some(x(20)),
        goods_service_description: Some(x(30)),
        manufacturer_name: Some(x(50)),
        serial_number: Some(x(30)),
        unit_of_measure_description: Some(x(20)),
        quantity: Some(max_signed(17, false)),
        unit_price_excluding_vat: Some(max_signed(15, false)),
        line_discount: Some(max_signed(15, true)),
        line_total: Some(max_signed(15, false)),
        vat_rate_percent: Some("1700".into()),
        branch_id: Some(x(7)),
        document_date: Some(date(2024, 6, 1)),
        header_link_field: Some(9_999_999),
        base_document_branch_id: Some(x(7)),
    };
    assert_roundtrip(&d110, 339);

    let d120 = D120 {
        record_number: 6,
        vat_id: nines(9),
        document_type: "400".into(),
        document_number: x(20),
        line_number: Some(9999),
        payment_method: "3".into(),
        bank_number: Some(nines(10)),
        branch_number: Some(nines(10)),
        account_number: Some(nines(15)),
        check_number: Some(nines(10)),
        payment_due_date: Some(date(2024, 7, 1)),
        line_amount: Some(max_signed(15, true)),
        acquirer_code: Some("2".into()),
        card_brand: Some(x(20)),
        credit_transaction_type: Some("1".into()),
        branch_id: Some(x(7)),
        document_date: Some(date(2024, 6, 30)),
        header_link_field: Some(1),
    };
    assert_roundtrip(&d120, 222);
    assert_roundtrip(
        &D120 {
            line_number: None,
            bank_number: None,
            branch_number: None,
            account_number: None,
            check_number: None,
            payment_due_date: None,
            line_amount: None,
            acquirer_code: None,
            card_brand: None,
            credit_transaction_type: None,
            branch_id: None,
            document_date: None,
            header_link_field: None,
            ..d120
        },
        222,
    );
}

#[test]
fn m100_widths() {
    let max = M100 {
        record_number: 7,
        vat_id: nines(9),
        universal_item_code: Some(x(20)),
        supplier_item_code: Some(x(20)),
        internal_item_code: x(20),
        item_name: x(50),
        classification_code: Some(x(10)),
        classification_description: Some(x(30)),
        unit_of_measure: Some(x(20)),
        opening_stock: Some(max_signed(12, false)),
        total_stock_in: Some(max_signed(12, false)),
        total_stock_out: Some(max_signed(12, true)),
        end_period_cost_not_in_bond: Some(max_signed(10, false)),
        end_period_cost_in_bond: Some(max_signed(10, true)),
    };
    assert_roundtrip(&max, 298);
    let min = M100 {
        universal_item_code: None,
        supplier_item_code: None,
        classification_code: None,
        classification_description: None,
        unit_of_measure: None,
        opening_stock: None,
        total_stock_in: None,
        total_stock_out: None,
        end_period_cost_not_in_bond: None,
        end_period_cost_in_bond: None,
        ..max
    };
    assert_roundtrip(&min, 298);
}

#[test]
fn free_text_is_truncated_but_codes_must_fit() {
    let long_details = B100 {
        details: Some(x(60)),
        ..b100_min()
    };
    let line = long_details.encode().expect("free text truncates");
    assert_eq!(line.chars().count(), 317 + 2);
    assert_eq!(B100::decode(&line).unwrap().details, Some(x(50)));

    let long_key = B100 {
        account_key: x(16),
        ..b100_min()
    };
    assert!(matches!(
        long_key.encode(),
        Err(ShaamError::Field { field: "account_key", .. })
    ));
}

#[test]
fn tag_mismatch_names_both_tags() {
    let line = b100_min().encode().unwrap();
    let err = B110::decode(&line).unwrap_err();
    match &err {
        ShaamError::Tag { expected, actual } => {
            assert_eq!(*expected, "B110");
            assert_eq!(actual, "B100");
        }
        other => panic!("unexpected error {other:?}"),
    }
    let text = err.to_string();
    assert!(text.contains("B110") && text.contains("B100"));
}

#[test]
fn wrong_length_is_rejected() {
    let line = b100_min().encode().unwrap();
    let short = &line[..300];
    assert!(matches!(
        B100::decode(short),
        Err(ShaamError::Length {
            record: "B100",
            expected: 317,
            actual: 300
        })
    ));
}

#[test]
fn schema_check_reports_bad_codes() {
    let bad = B100 {
        debit_credit_indicator: "3".into(),
        reference_document_type: Some("999".into()),
        ..b100_min()
    };
    match bad.encode() {
        Err(ShaamError::Schema { record, issues }) => {
            assert_eq!(record, "B100");
            let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
            assert_eq!(fields, ["debit_credit_indicator", "reference_document_type"]);
            assert!(issues
                .iter()
                .all(|i| matches!(i.kind, IssueKind::InvalidCode { .. })));
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn encode_refuses_what_decode_would_reject() {
    let bad = C100 {
        document_type: "999".into(),
        vat_id: String::new(),
        document_id: String::new(),
        ..c100_max()
    };
    match bad.encode() {
        Err(ShaamError::Schema { record, issues }) => {
            assert_eq!(record, "C100");
            let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
            assert!(fields.contains(&"document_type"));
            assert!(fields.contains(&"vat_id"));
            assert!(fields.contains(&"document_id"));
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn decode_rejects_bad_codes_in_a_foreign_line() {
    let line = b100_min().encode().unwrap();
    let offset: usize = B100::FIELDS
        .iter()
        .take_while(|f| f.name != "debit_credit_indicator")
        .map(|f| f.width)
        .sum();
    let mut tampered = line.clone();
    tampered.replace_range(offset..offset + 1, "3");
    match B100::decode(&tampered) {
        Err(ShaamError::Schema { issues, .. }) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].field, "debit_credit_indicator");
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn record_dispatch_by_tag() {
    let line = c100_max().encode().unwrap();
    let record = Record::decode(&line).unwrap();
    assert_eq!(record.record_type(), RecordType::C100);
    assert_eq!(record.encode().unwrap(), line);
}

#[test]
fn control_characters_never_reach_the_line() {
    let broken = B100 {
        details: Some("line one\r\nline two".into()),
        ..b100_min()
    };
    match broken.encode() {
        Err(ShaamError::Field { record, field, message }) => {
            assert_eq!(record, "B100");
            assert_eq!(field, "details");
            assert!(message.contains("control characters"));
        }
        other => panic!("expected field error, got {other:?}"),
    }
}
