//! Декларативная раскладка записей и курсоры чтения/записи строки.
//!
//! Запись описывается срезом [`FieldSpec`] в порядке следования полей. [`LineWriter`] и
//! [`LineReader`] проходят по этому срезу поле за полем, так что ширины и смещения
//! хранятся в одном месте, а пустые значения кодируются единообразно.

use crate::{
    error::{Result, ShaamError},
    field::{self, Align},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub const CRLF: &str = "\r\n";
pub const TAG_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Свободный текст, при переполнении обрезается.
    Text,
    /// Буквенно-цифровой идентификатор, обязан помещаться целиком.
    Code,
    /// Цифры, выравнивание вправо, добивка нулями.
    Numeric,
    /// `YYYYMMDD`.
    Date,
    /// Знак + цифры суммы, умноженной на 100.
    Signed,
}

impl FieldKind {
    pub const fn align(self) -> Align {
        match self {
            FieldKind::Text | FieldKind::Code => Align::Left,
            _ => Align::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub width: usize,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, width: usize, kind: FieldKind) -> Self {
        FieldSpec {
            name,
            width,
            kind,
            required: false,
        }
    }

    pub const fn text(name: &'static str, width: usize) -> Self {
        Self::new(name, width, FieldKind::Text)
    }

    pub const fn code(name: &'static str, width: usize) -> Self {
        Self::new(name, width, FieldKind::Code)
    }

    pub const fn numeric(name: &'static str, width: usize) -> Self {
        Self::new(name, width, FieldKind::Numeric)
    }

    pub const fn date(name: &'static str) -> Self {
        Self::new(name, field::DATE_WIDTH, FieldKind::Date)
    }

    pub const fn signed(name: &'static str, width: usize) -> Self {
        Self::new(name, width, FieldKind::Signed)
    }

    pub const fn required(self) -> Self {
        FieldSpec {
            required: true,
            ..self
        }
    }

    pub const fn align(&self) -> Align {
        self.kind.align()
    }
}

pub const fn total_width(fields: &[FieldSpec]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < fields.len() {
        total += fields[i].width;
        i += 1;
    }
    total
}

/// Отрезает `\r\n` / `\n` в конце строки. Пробелы в конце — часть записи и не трогаются.
pub fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Первые четыре символа строки.
pub fn tag_of(line: &str) -> String {
    line.chars().take(TAG_WIDTH).collect()
}

/// Собирает строку записи, проверяя, что значения приходят в порядке раскладки.
pub struct LineWriter {
    record: &'static str,
    fields: &'static [FieldSpec],
    next: usize,
    line: String,
}

impl LineWriter {
    pub fn new(record: &'static str, fields: &'static [FieldSpec]) -> Self {
        LineWriter {
            record,
            fields,
            next: 0,
            line: String::with_capacity(total_width(fields) + CRLF.len()),
        }
    }

    fn advance(&mut self, accepted: &[FieldKind]) -> Result<FieldSpec> {
        let spec = *self.fields.get(self.next).ok_or_else(|| {
            ShaamError::field(self.record, "-", "more values written than the layout declares")
        })?;
        if !accepted.contains(&spec.kind) {
            return Err(ShaamError::field(
                self.record,
                spec.name,
                format!("field is {:?}, written as {:?}", spec.kind, accepted),
            ));
        }
        self.next += 1;
        Ok(spec)
    }

    /// Первое поле записи: её собственный тег.
    pub fn tag(&mut self) -> Result<()> {
        let record = self.record;
        self.text(record)
    }

    pub fn text(&mut self, value: &str) -> Result<()> {
        let spec = self.advance(&[FieldKind::Text, FieldKind::Code])?;
        if field::has_control_chars(value) {
            return Err(ShaamError::field(
                self.record,
                spec.name,
                format!("value {value:?} contains control characters"),
            ));
        }
        let len = value.chars().count();
        if spec.kind == FieldKind::Code && len > spec.width {
            return Err(ShaamError::field(
                self.record,
                spec.name,
                format!("value {value:?} is longer than {} characters", spec.width),
            ));
        }
        self.line.push_str(&field::pad_right(value, spec.width));
        Ok(())
    }

    pub fn opt_text(&mut self, value: Option<&str>) -> Result<()> {
        self.text(value.unwrap_or_default())
    }

    pub fn numeric(&mut self, value: &str) -> Result<()> {
        let spec = self.advance(&[FieldKind::Numeric])?;
        if !field::is_digits(value) {
            return Err(ShaamError::field(
                self.record,
                spec.name,
                format!("value {value:?} is not numeric"),
            ));
        }
        if value.len() > spec.width {
            return Err(ShaamError::field(
                self.record,
                spec.name,
                format!("value {value:?} is longer than {} digits", spec.width),
            ));
        }
        self.line.push_str(&field::pad_left(value, spec.width));
        Ok(())
    }

    pub fn opt_numeric(&mut self, value: Option<&str>) -> Result<()> {
        self.numeric(value.unwrap_or_default())
    }

    pub fn number(&mut self, value: u64) -> Result<()> {
        self.numeric(&value.to_string())
    }

    pub fn opt_number(&mut self, value: Option<u64>) -> Result<()> {
        match value {
            Some(v) => self.number(v),
            None => self.numeric(""),
        }
    }

    pub fn date(&mut self, value: NaiveDate) -> Result<()> {
        self.opt_date(Some(value))
    }

    pub fn opt_date(&mut self, value: Option<NaiveDate>) -> Result<()> {
        let spec = self.advance(&[FieldKind::Date])?;
        let text = value.map(field::format_date).unwrap_or_default();
        self.line.push_str(&field::pad_left(&text, spec.width));
        Ok(())
    }

    pub fn signed(&mut self, value: Decimal) -> Result<()> {
        self.opt_signed(Some(value))
    }

    /// Отсутствующая сумма записывается пробелами.
    pub fn opt_signed(&mut self, value: Option<Decimal>) -> Result<()> {
        let spec = self.advance(&[FieldKind::Signed])?;
        let text = field::format_optional_signed(value, spec.width)
            .map_err(|e| ShaamError::field(self.record, spec.name, e.to_string()))?;
        self.line.push_str(&field::pad_right(&text, spec.width));
        Ok(())
    }

    /// Резервное поле: пробелы для текстовых, нули для числовых.
    pub fn reserved(&mut self) -> Result<()> {
        let spec = self.advance(&[FieldKind::Text, FieldKind::Code, FieldKind::Numeric])?;
        self.line.push_str(&field::format_field("", spec.width, spec.align()));
        Ok(())
    }

    pub fn finish(mut self) -> Result<String> {
        if self.next != self.fields.len() {
            let missing = self.fields[self.next].name;
            return Err(ShaamError::field(self.record, missing, "field was not written"));
        }
        self.line.push_str(CRLF);
        Ok(self.line)
    }
}

/// Разбирает строку записи по раскладке, поле за полем.
pub struct LineReader {
    record: &'static str,
    fields: &'static [FieldSpec],
    chars: Vec<char>,
    next: usize,
    offset: usize,
}

impl LineReader {
    /// Строка должна быть уже без терминатора; длина сверяется с суммой ширин раскладки.
    pub fn new(record: &'static str, fields: &'static [FieldSpec], line: &str) -> Result<Self> {
        let chars: Vec<char> = line.chars().collect();
        let expected = total_width(fields);
        if chars.len() != expected {
            return Err(ShaamError::Length {
                record,
                expected,
                actual: chars.len(),
            });
        }
        Ok(LineReader {
            record,
            fields,
            chars,
            next: 0,
            offset: 0,
        })
    }

    fn take(&mut self, accepted: &[FieldKind]) -> Result<(FieldSpec, String)> {
        let spec = *self.fields.get(self.next).ok_or_else(|| {
            ShaamError::field(self.record, "-", "more values read than the layout declares")
        })?;
        if !accepted.contains(&spec.kind) {
            return Err(ShaamError::field(
                self.record,
                spec.name,
                format!("field is {:?}, read as {:?}", spec.kind, accepted),
            ));
        }
        let raw: String = self.chars[self.offset..self.offset + spec.width].iter().collect();
        self.next += 1;
        self.offset += spec.width;
        Ok((spec, raw))
    }

    fn error(&self, spec: &FieldSpec, message: impl Into<String>) -> ShaamError {
        ShaamError::field(self.record, spec.name, message)
    }

    /// Тег уже сверен вызывающим, поле просто пропускается.
    pub fn tag(&mut self) -> Result<()> {
        self.take(&[FieldKind::Code]).map(|_| ())
    }

    pub fn text(&mut self) -> Result<String> {
        let (_, raw) = self.take(&[FieldKind::Text, FieldKind::Code])?;
        Ok(raw.trim().to_string())
    }

    pub fn opt_text(&mut self) -> Result<Option<String>> {
        Ok(Some(self.text()?).filter(|s| !s.is_empty()))
    }

    /// Цифры без ведущих нулей; поле из нулей или пробелов даёт пустую строку.
    pub fn numeric(&mut self) -> Result<String> {
        let (spec, raw) = self.take(&[FieldKind::Numeric])?;
        let trimmed = raw.trim();
        if !field::is_digits(trimmed) {
            return Err(self.error(&spec, format!("value {raw:?} is not numeric")));
        }
        Ok(field::strip_leading_zeros(trimmed).to_string())
    }

    pub fn opt_numeric(&mut self) -> Result<Option<String>> {
        Ok(Some(self.numeric()?).filter(|s| !s.is_empty()))
    }

    pub fn number(&mut self) -> Result<u64> {
        Ok(self.opt_number()?.unwrap_or(0))
    }

    pub fn opt_number(&mut self) -> Result<Option<u64>> {
        let spec = self.fields.get(self.next).copied();
        match self.opt_numeric()? {
            None => Ok(None),
            Some(digits) => digits.parse::<u64>().map(Some).map_err(|e| match spec {
                Some(spec) => self.error(&spec, format!("{digits:?}: {e}")),
                None => ShaamError::Codec(e.to_string()),
            }),
        }
    }

    pub fn date(&mut self) -> Result<NaiveDate> {
        let spec = self.fields.get(self.next).copied();
        self.opt_date()?.ok_or_else(|| match spec {
            Some(spec) => self.error(&spec, "required date is empty"),
            None => ShaamError::Codec("required date is empty".into()),
        })
    }

    pub fn opt_date(&mut self) -> Result<Option<NaiveDate>> {
        let (spec, raw) = self.take(&[FieldKind::Date])?;
        field::parse_date(&raw).map_err(|e| self.error(&spec, e.to_string()))
    }

    pub fn signed(&mut self) -> Result<Decimal> {
        let spec = self.fields.get(self.next).copied();
        self.opt_signed()?.ok_or_else(|| match spec {
            Some(spec) => self.error(&spec, "required amount is blank"),
            None => ShaamError::Codec("required amount is blank".into()),
        })
    }

    pub fn opt_signed(&mut self) -> Result<Option<Decimal>> {
        let (spec, raw) = self.take(&[FieldKind::Signed])?;
        field::parse_optional_signed(&raw, spec.width).map_err(|e| self.error(&spec, e.to_string()))
    }

    pub fn reserved(&mut self) -> Result<()> {
        self.take(&[FieldKind::Text, FieldKind::Code, FieldKind::Numeric])
            .map(|_| ())
    }

    pub fn finish(self) -> Result<()> {
        match self.fields.get(self.next) {
            Some(spec) => Err(self.error(spec, "field was not read")),
            None => Ok(()),
        }
    }
}
