//! Примитивы полей фиксированной ширины: выравнивание, даты и знаковые суммы.
//!
//! Ширина везде считается в символах, а не в байтах: текстовые поля могут содержать иврит.

use crate::error::{Result, ShaamError};
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use std::sync::OnceLock;

/// Ширина денежного поля: знак + 14 цифр.
pub const MONETARY_WIDTH: usize = 15;
/// Ширина поля количества: знак + 11 цифр.
pub const QUANTITY_WIDTH: usize = 12;
pub const DATE_WIDTH: usize = 8;
/// Налоговый номер (ИНН) всегда из девяти цифр.
pub const TAX_ID_WIDTH: usize = 9;

const DATE_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Выравнивание влево с добивкой пробелами; длинное значение обрезается до `width`.
pub fn pad_right(value: &str, width: usize) -> String {
    let mut out: String = value.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

/// Выравнивание вправо с добивкой нулями.
pub fn pad_left(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.chars().take(width).collect();
    }
    let mut out = "0".repeat(width - len);
    out.push_str(value);
    out
}

pub fn format_field(value: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => pad_right(value, width),
        Align::Right => pad_left(value, width),
    }
}

/// Знак + модуль значения, умноженный на 100, добитый нулями до `width - 1` цифр.
pub fn format_signed(value: Decimal, width: usize) -> Result<String> {
    if width < 2 {
        return Err(ShaamError::Codec(format!("signed field width {width} is too small")));
    }
    let cents = (value.abs() * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let magnitude = cents
        .to_u128()
        .ok_or_else(|| ShaamError::Codec(format!("amount {value} is not representable")))?
        .to_string();
    if magnitude.len() > width - 1 {
        return Err(ShaamError::Codec(format!(
            "amount {value} does not fit into {} digits",
            width - 1
        )));
    }
    let sign = if value.is_sign_negative() && !cents.is_zero() {
        '-'
    } else {
        '+'
    };
    Ok(format!("{sign}{}", pad_left(&magnitude, width - 1)))
}

pub fn parse_signed(text: &str, width: usize) -> Result<Decimal> {
    let len = text.chars().count();
    if len != width {
        return Err(ShaamError::Codec(format!(
            "signed field must be {width} characters, got {len}"
        )));
    }
    let mut chars = text.chars();
    let negative = match chars.next() {
        Some('+') => false,
        Some('-') => true,
        other => {
            return Err(ShaamError::Codec(format!(
                "signed field must start with '+' or '-', got {other:?}"
            )))
        }
    };
    let digits = chars.as_str();
    if !is_digits(digits) {
        return Err(ShaamError::Codec(format!(
            "signed field payload must be digits, got {digits:?}"
        )));
    }
    let cents: i64 = digits
        .parse()
        .map_err(|e| ShaamError::Codec(format!("signed field {digits:?}: {e}")))?;
    // "-000…0" читается как положительный ноль
    let cents = if negative { -cents } else { cents };
    Ok(Decimal::new(cents, 2))
}

pub fn format_monetary_amount(value: Decimal) -> Result<String> {
    format_signed(value, MONETARY_WIDTH)
}

pub fn parse_monetary_amount(text: &str) -> Result<Decimal> {
    parse_signed(text, MONETARY_WIDTH)
}

pub fn format_quantity(value: Decimal) -> Result<String> {
    format_signed(value, QUANTITY_WIDTH)
}

pub fn parse_quantity(text: &str) -> Result<Decimal> {
    parse_signed(text, QUANTITY_WIDTH)
}

/// `None` кодируется пустой строкой; добивку до ширины делает вызывающий.
pub fn format_optional_signed(value: Option<Decimal>, width: usize) -> Result<String> {
    value.map(|v| format_signed(v, width)).transpose().map(Option::unwrap_or_default)
}

/// Пустое или пробельное поле читается как `None`.
pub fn parse_optional_signed(text: &str, width: usize) -> Result<Option<Decimal>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_signed(text, width).map(Some)
}

pub fn format_optional_monetary_amount(value: Option<Decimal>) -> Result<String> {
    format_optional_signed(value, MONETARY_WIDTH)
}

pub fn parse_optional_monetary_amount(text: &str) -> Result<Option<Decimal>> {
    parse_optional_signed(text, MONETARY_WIDTH)
}

pub fn format_optional_quantity(value: Option<Decimal>) -> Result<String> {
    format_optional_signed(value, QUANTITY_WIDTH)
}

pub fn parse_optional_quantity(text: &str) -> Result<Option<Decimal>> {
    parse_optional_signed(text, QUANTITY_WIDTH)
}

/// true, если значение помещается в знаковое поле заданной ширины.
pub fn fits_signed(value: Decimal, width: usize) -> bool {
    format_signed(value, width).is_ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Пустая дата и `00000000` читаются как `None`.
pub fn parse_date(text: &str) -> Result<Option<NaiveDate>> {
    let text = text.trim();
    if text.is_empty() || text.chars().all(|c| c == '0') {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(Some)
        .map_err(|e| ShaamError::Codec(format!("date {text:?}: {e}")))
}

/// Перевод строки или другой управляющий символ внутри поля разрывает запись фиксированной ширины.
pub fn has_control_chars(value: &str) -> bool {
    value.chars().any(char::is_control)
}

pub fn is_digits(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit())
}

/// Убирает ведущие нули; строка из одних нулей становится пустой.
pub fn strip_leading_zeros(value: &str) -> &str {
    value.trim_start_matches('0')
}

fn separators() -> Result<&'static Regex> {
    static SEPARATORS: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    SEPARATORS
        .get_or_init(|| Regex::new(r"[\s\-]"))
        .as_ref()
        .map_err(|e| ShaamError::Codec(format!("separator pattern: {e}")))
}

/// Приводит идентификатор (ИНН, код классификации) к цифрам.
///
/// Пробелы и дефисы считаются оформлением и удаляются. Любой другой нецифровой символ
/// делает значение непригодным: `None`, вызывающий сообщает об ошибке, а не молча урезает.
pub fn normalize_digits(value: &str) -> Result<Option<String>> {
    let stripped = separators()?.replace_all(value, "");
    Ok(is_digits(&stripped).then(|| stripped.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn pads_and_truncates_by_characters() {
        assert_eq!(pad_right("שלום", 6), "שלום  ");
        assert_eq!(pad_right("abcdef", 3), "abc");
        assert_eq!(pad_left("42", 5), "00042");
        assert_eq!(format_field("7", 3, Align::Left), "7  ");
        assert_eq!(format_field("7", 3, Align::Right), "007");
    }

    #[rstest]
    #[case("0", "+00000000000000")]
    #[case("12.4", "+00000000001240")]
    #[case("-12.4", "-00000000001240")]
    #[case("0.005", "+00000000000001")]
    #[case("-0.001", "+00000000000000")]
    fn formats_monetary(#[case] value: &str, #[case] expected: &str) {
        let value: Decimal = value.parse().unwrap();
        assert_eq!(format_monetary_amount(value).unwrap(), expected);
    }

    #[rstest]
    #[case("+0000000000124")]
    #[case("*00000000001240")]
    #[case("+0000000000124x")]
    fn rejects_malformed_monetary(#[case] text: &str) {
        assert!(parse_monetary_amount(text).is_err());
    }

    #[test]
    fn negative_zero_reads_as_positive() {
        let v = parse_monetary_amount("-00000000000000").unwrap();
        assert!(v.is_zero());
        assert!(!v.is_sign_negative());
    }

    #[test]
    fn overflow_is_an_error() {
        let too_big: Decimal = "1000000000".parse().unwrap();
        assert!(format_quantity(too_big).is_err());
        assert!(format_monetary_amount(too_big).is_ok());
    }

    #[test]
    fn optional_wrappers() {
        assert_eq!(format_optional_monetary_amount(None).unwrap(), "");
        assert_eq!(parse_optional_quantity("            ").unwrap(), None);
        assert_eq!(
            parse_optional_quantity("+00000000150").unwrap(),
            Some(Decimal::new(150, 2))
        );
    }

    #[test]
    fn dates() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(format_date(d), "20240229");
        assert_eq!(parse_date("20240229").unwrap(), Some(d));
        assert_eq!(parse_date("00000000").unwrap(), None);
        assert!(parse_date("20241341").is_err());
    }

    #[test]
    fn normalizes_digits() {
        assert_eq!(normalize_digits("51-234 567-8").unwrap().as_deref(), Some("512345678"));
        assert_eq!(normalize_digits("IL123").unwrap(), None);
    }
}
