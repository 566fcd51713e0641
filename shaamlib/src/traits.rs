//! Унифицированный трэйт записи фиксированной ширины.

use crate::{
    error::{Result, ShaamError},
    layout::{self, FieldSpec, LineReader, LineWriter},
    validation::FieldIssue,
};

pub trait FixedRecord: Sized {
    /// Тег из первых четырёх символов строки.
    const CODE: &'static str;
    const FIELDS: &'static [FieldSpec];
    const WIDTH: usize = layout::total_width(Self::FIELDS);

    /// Пишет поля строго в порядке `FIELDS`, начиная с тега.
    fn write_fields(&self, w: &mut LineWriter) -> Result<()>;

    /// Читает поля в порядке `FIELDS`, начиная с тега.
    fn read_fields(r: &mut LineReader) -> Result<Self>;

    /// Доменные ограничения, которые не выражаются раскладкой.
    fn check(&self) -> Vec<FieldIssue> {
        Vec::new()
    }

    /// `check` в виде ошибки [`ShaamError::Schema`].
    fn validate(&self) -> Result<()> {
        let issues = self.check();
        if !issues.is_empty() {
            return Err(ShaamError::Schema {
                record: Self::CODE,
                issues,
            });
        }
        Ok(())
    }

    /// Запись, не прошедшая `check`, не кодируется.
    fn encode(&self) -> Result<String> {
        self.validate()?;
        let mut w = LineWriter::new(Self::CODE, Self::FIELDS);
        self.write_fields(&mut w)?;
        w.finish()
    }

    fn decode(line: &str) -> Result<Self> {
        let line = layout::strip_terminator(line);
        let tag = layout::tag_of(line);
        if tag != Self::CODE {
            return Err(ShaamError::Tag {
                expected: Self::CODE,
                actual: tag,
            });
        }
        let mut r = LineReader::new(Self::CODE, Self::FIELDS, line)?;
        let record = Self::read_fields(&mut r)?;
        r.finish()?;
        record.validate()?;
        Ok(record)
    }
}
