//! Закрытый набор типов записей и диспетчеризация по тегу.

use crate::{
    error::{Result, ShaamError},
    layout,
    records::{
        a000::A000, a100::A100, b100::B100, b110::B110, c100::C100, d110::D110, d120::D120,
        m100::M100, z900::Z900,
    },
    traits::FixedRecord,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordType {
    A000,
    A100,
    B100,
    B110,
    C100,
    D110,
    D120,
    M100,
    Z900,
}

impl RecordType {
    /// Типы файла данных в порядке строк счётчиков INI.
    pub const DATA: [RecordType; 8] = [
        RecordType::A100,
        RecordType::B100,
        RecordType::B110,
        RecordType::C100,
        RecordType::D110,
        RecordType::D120,
        RecordType::M100,
        RecordType::Z900,
    ];

    pub fn code(self) -> &'static str {
        match self {
            RecordType::A000 => A000::CODE,
            RecordType::A100 => A100::CODE,
            RecordType::B100 => B100::CODE,
            RecordType::B110 => B110::CODE,
            RecordType::C100 => C100::CODE,
            RecordType::D110 => D110::CODE,
            RecordType::D120 => D120::CODE,
            RecordType::M100 => M100::CODE,
            RecordType::Z900 => Z900::CODE,
        }
    }

    /// Длина строки без CRLF.
    pub fn width(self) -> usize {
        match self {
            RecordType::A000 => A000::WIDTH,
            RecordType::A100 => A100::WIDTH,
            RecordType::B100 => B100::WIDTH,
            RecordType::B110 => B110::WIDTH,
            RecordType::C100 => C100::WIDTH,
            RecordType::D110 => D110::WIDTH,
            RecordType::D120 => D120::WIDTH,
            RecordType::M100 => M100::WIDTH,
            RecordType::Z900 => Z900::WIDTH,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "A000" => RecordType::A000,
            "A100" => RecordType::A100,
            "B100" => RecordType::B100,
            "B110" => RecordType::B110,
            "C100" => RecordType::C100,
            "D110" => RecordType::D110,
            "D120" => RecordType::D120,
            "M100" => RecordType::M100,
            "Z900" => RecordType::Z900,
            _ => return None,
        })
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    A000(A000),
    A100(A100),
    B100(B100),
    B110(B110),
    C100(C100),
    D110(D110),
    D120(D120),
    M100(M100),
    Z900(Z900),
}

impl Record {
    pub fn record_type(&self) -> RecordType {
        match self {
            Record::A000(_) => RecordType::A000,
            Record::A100(_) => RecordType::A100,
            Record::B100(_) => RecordType::B100,
            Record::B110(_) => RecordType::B110,
            Record::C100(_) => RecordType::C100,
            Record::D110(_) => RecordType::D110,
            Record::D120(_) => RecordType::D120,
            Record::M100(_) => RecordType::M100,
            Record::Z900(_) => RecordType::Z900,
        }
    }

    pub fn encode(&self) -> Result<String> {
        match self {
            Record::A000(r) => r.encode(),
            Record::A100(r) => r.encode(),
            Record::B100(r) => r.encode(),
            Record::B110(r) => r.encode(),
            Record::C100(r) => r.encode(),
            Record::D110(r) => r.encode(),
            Record::D120(r) => r.encode(),
            Record::M100(r) => r.encode(),
            Record::Z900(r) => r.encode(),
        }
    }

    /// Выбирает тип по первым четырём символам строки.
    pub fn decode(line: &str) -> Result<Self> {
        let tag = layout::tag_of(line);
        let kind = RecordType::from_code(&tag).ok_or(ShaamError::UnknownRecord(tag))?;
        Ok(match kind {
            RecordType::A000 => Record::A000(A000::decode(line)?),
            RecordType::A100 => Record::A100(A100::decode(line)?),
            RecordType::B100 => Record::B100(B100::decode(line)?),
            RecordType::B110 => Record::B110(B110::decode(line)?),
            RecordType::C100 => Record::C100(C100::decode(line)?),
            RecordType::D110 => Record::D110(D110::decode(line)?),
            RecordType::D120 => Record::D120(D120::decode(line)?),
            RecordType::M100 => Record::M100(M100::decode(line)?),
            RecordType::Z900 => Record::Z900(Z900::decode(line)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::a000::SummaryRecord;
    use rstest::rstest;

    #[rstest]
    #[case(RecordType::A000, 466)]
    #[case(RecordType::A100, 95)]
    #[case(RecordType::B100, 317)]
    #[case(RecordType::B110, 376)]
    #[case(RecordType::C100, 445)]
    #[case(RecordType::D110, 339)]
    #[case(RecordType::D120, 222)]
    #[case(RecordType::M100, 298)]
    #[case(RecordType::Z900, 110)]
    fn layouts_sum_to_declared_width(#[case] kind: RecordType, #[case] width: usize) {
        assert_eq!(kind.width(), width);
        assert_eq!(RecordType::from_code(kind.code()), Some(kind));
    }

    #[test]
    fn summary_width() {
        assert_eq!(SummaryRecord::WIDTH, 19);
    }

    #[test]
    fn unknown_tag() {
        let err = Record::decode("X999 whatever").unwrap_err();
        assert!(matches!(err, ShaamError::UnknownRecord(tag) if tag == "X999"));
    }
}
