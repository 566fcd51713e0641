//! Параметры генерации и разбора.
//!
//! Все структуры десериализуются с умолчаниями, так что CLI может собирать их из
//! конфигурационного файла, переменных окружения и флагов в любом сочетании.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Поведение генератора при ошибках во входных данных.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// Остановиться на первой ошибке.
    #[default]
    FailFast,
    /// Собрать все ошибки и вернуть их разом.
    CollectAll,
}

/// Строгость разбора.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseMode {
    Strict,
    #[default]
    Lenient,
    /// Без проверки сущностей; перекрёстная сверка выполняется всегда.
    None,
}

/// Сведения о программе, которые попадают в заголовок A000.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftwareInfo {
    pub registration_number: String,
    pub name: String,
    pub version: String,
    pub vendor_vat_id: String,
    pub vendor_name: String,
    /// `1` — однолетняя, `2` — многолетняя.
    pub software_type: String,
    pub output_path: String,
    /// `1` — простая бухгалтерия, `2` — двойная.
    pub accounting_type: String,
    pub balance_required: String,
    /// `0` — иврит.
    pub language_code: String,
    /// `1` — ISO-8859-8-i.
    pub character_set: String,
    pub compression_software: String,
    pub base_currency: String,
}

impl Default for SoftwareInfo {
    fn default() -> Self {
        SoftwareInfo {
            registration_number: String::new(),
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            vendor_vat_id: String::new(),
            vendor_name: String::new(),
            software_type: "2".into(),
            output_path: String::new(),
            accounting_type: "2".into(),
            balance_required: "1".into(),
            language_code: "0".into(),
            character_set: "1".into(),
            compression_software: String::new(),
            base_currency: "ILS".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub validation_mode: GenerationMode,
    /// Префикс имён файлов: `<base>.INI.TXT`. Пустой — `INI.TXT` / `BKMVDATA.TXT`.
    pub file_name_base: String,
    pub software: SoftwareInfo,
    /// Момент выгрузки для A000; по умолчанию — конец отчётного периода.
    pub processed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub validation_mode: ParseMode,
    pub skip_unknown_records: bool,
    pub allow_partial_data: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            validation_mode: ParseMode::Lenient,
            skip_unknown_records: false,
            allow_partial_data: true,
        }
    }
}
