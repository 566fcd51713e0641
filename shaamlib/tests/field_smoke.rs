use rstest::rstest;
use rust_decimal::Decimal;
use shaamlib::field::{
    format_monetary_amount, format_optional_quantity, format_quantity, format_signed, normalize_digits,
    parse_monetary_amount, parse_optional_monetary_amount, parse_quantity, parse_signed,
};

#[rstest]
#[case("0")]
#[case("12.4")]
#[case("-12.4")]
#[case("0.01")]
#[case("-0.01")]
#[case("1234567890.99")]
#[case("-1234567890.99")]
fn monetary_is_idempotent(#[case] value: &str) {
    let v: Decimal = value.parse().unwrap();
    let text = format_monetary_amount(v).expect("format");
    assert_eq!(text.len(), 15);
    let back = parse_monetary_amount(&text).expect("parse");
    assert_eq!(back, v);
    assert_eq!(format_monetary_amount(back).unwrap(), text);
}

#[test]
fn quantity_uses_twelve_characters() {
    let q: Decimal = "-3.5".parse().unwrap();
    let text = format_quantity(q).unwrap();
    assert_eq!(text, "-00000000350");
    assert_eq!(parse_quantity(&text).unwrap(), q);
    assert_eq!(format_optional_quantity(None).unwrap(), "");
}

#[test]
fn generic_width_for_wide_and_narrow_fields() {
    let v: Decimal = "1.5".parse().unwrap();
    assert_eq!(format_signed(v, 17).unwrap(), "+0000000000000150");
    assert_eq!(format_signed(v, 10).unwrap(), "+000000150");
    assert_eq!(parse_signed("+000000150", 10).unwrap(), v);
    assert!(format_signed("10000000".parse().unwrap(), 10).is_err());
}

#[test]
fn blank_optional_amount_is_none() {
    assert_eq!(parse_optional_monetary_amount(&" ".repeat(15)).unwrap(), None);
    assert!(parse_optional_monetary_amount("garbage").is_err());
}

#[rstest]
#[case("512345678", Some("512345678"))]
#[case("51 234 567 8", Some("512345678"))]
#[case("51-2345678", Some("512345678"))]
#[case("5123A5678", None)]
fn tax_id_normalization(#[case] raw: &str, #[case] expected: Option<&str>) {
    assert_eq!(normalize_digits(raw).unwrap().as_deref(), expected);
}
