//! shaamlib — генерация и разбор файлов единого формата SHAAM (INI.TXT + BKMVDATA.TXT)

pub mod config;
pub mod error;
pub mod field;
pub mod generate;
pub mod layout;
pub mod model;
pub mod parse;
pub mod record;
pub mod traits;
pub mod validation;

pub mod records {
    pub mod a000;
    pub mod a100;
    pub mod b100;
    pub mod b110;
    pub mod c100;
    pub mod d110;
    pub mod d120;
    pub mod m100;
    pub mod z900;
}

pub use generate::{generate, ReportOutput, ReportSummary, TextFile};
pub use parse::{parse, ParseResult, ParseSummary, ParsedRecords};
