use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use shaamlib::{
    config::{GenerationMode, GenerationOptions, ParseMode, ParseOptions},
    error::ShaamError,
    model::ReportInput,
    validation, ParseSummary, ReportSummary,
};
use std::{
    fs,
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "shaam.toml";

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Mode {
    Strict,
    Lenient,
    None,
}

impl From<Mode> for ParseMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Strict => ParseMode::Strict,
            Mode::Lenient => ParseMode::Lenient,
            Mode::None => ParseMode::None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "shaam", version, about = "Выгрузка и проверка файлов единого формата SHAAM")]
struct Cli {
    /// Файл настроек (по умолчанию shaam.toml, если он есть)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// JSON с данными отчёта -> INI.TXT + BKMVDATA.TXT
    Generate {
        /// Входной JSON (ReportInput)
        #[arg(short = 'i', long)]
        input: PathBuf,

        /// Каталог для файлов
        #[arg(short = 'o', long = "out-dir", default_value = ".")]
        out_dir: PathBuf,

        /// Собрать все ошибки вместо остановки на первой
        #[arg(long)]
        collect_all: bool,

        /// Префикс имён файлов
        #[arg(long)]
        file_name_base: Option<String>,
    },

    /// INI.TXT + BKMVDATA.TXT -> JSON с данными и отчётом об ошибках
    Parse {
        #[arg(long)]
        ini: PathBuf,

        #[arg(long)]
        data: PathBuf,

        /// Строгость проверки
        #[arg(long, value_enum)]
        mode: Option<Mode>,

        /// Молча пропускать строки с неизвестным тегом
        #[arg(long)]
        skip_unknown: bool,

        /// В строгом режиме не возвращать данные при ошибках
        #[arg(long)]
        no_partial: bool,

        /// Выгрузить список ошибок в CSV
        #[arg(long = "errors-csv")]
        errors_csv: Option<PathBuf>,
    },
}

/// Настройки из файла и переменных окружения `SHAAM__…`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    generate: GenerationOptions,
    parse: ParseOptions,
}

impl Settings {
    fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG).required(false),
        };
        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("SHAAM").prefix_separator("__").separator("__"))
            .build()
            .and_then(Config::try_deserialize)
            .context("failed to load configuration")
    }
}

#[derive(Serialize)]
struct GenerateReport<'a> {
    ini_file: PathBuf,
    data_file: PathBuf,
    summary: &'a ReportSummary,
}

#[derive(Serialize)]
struct ParseReport<'a> {
    data: &'a ReportInput,
    summary: &'a ParseSummary,
}

fn main() -> ExitCode {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logging is not available: {e}");
    }

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => match err.downcast_ref::<ShaamError>() {
            Some(ShaamError::Validation(issues)) => {
                for issue in issues {
                    eprintln!("{issue}");
                }
                error!(issues = issues.len(), "validation failed");
                ExitCode::from(1)
            }
            _ => {
                eprintln!("error: {err:#}");
                ExitCode::from(2)
            }
        },
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let settings = Settings::load(cli.config.as_deref())?;
    match cli.command {
        Command::Generate {
            input,
            out_dir,
            collect_all,
            file_name_base,
        } => {
            let mut options = settings.generate;
            if collect_all {
                options.validation_mode = GenerationMode::CollectAll;
            }
            if let Some(base) = file_name_base {
                options.file_name_base = base;
            }
            generate(&input, &out_dir, &options)
        }
        Command::Parse {
            ini,
            data,
            mode,
            skip_unknown,
            no_partial,
            errors_csv,
        } => {
            let mut options = settings.parse;
            if let Some(mode) = mode {
                options.validation_mode = mode.into();
            }
            options.skip_unknown_records |= skip_unknown;
            if no_partial {
                options.allow_partial_data = false;
            }
            parse(&ini, &data, errors_csv.as_deref(), &options)
        }
    }
}

fn generate(input: &Path, out_dir: &Path, options: &GenerationOptions) -> Result<ExitCode> {
    let reader = BufReader::new(
        fs::File::open(input).with_context(|| format!("cannot open {}", input.display()))?,
    );
    let report: ReportInput = serde_json::from_reader(reader)
        .with_context(|| format!("cannot read report input from {}", input.display()))?;

    let output = shaamlib::generate(&report, options)?;

    fs::create_dir_all(out_dir).with_context(|| format!("cannot create {}", out_dir.display()))?;
    let ini_file = out_dir.join(&output.ini_file.name);
    let data_file = out_dir.join(&output.data_file.name);
    for (path, content) in [(&ini_file, &output.ini_text), (&data_file, &output.data_text)] {
        fs::write(path, content).with_context(|| format!("cannot write {}", path.display()))?;
        info!(path = %path.display(), "written");
    }

    print_json(&GenerateReport {
        ini_file,
        data_file,
        summary: &output.summary,
    })?;
    Ok(ExitCode::SUCCESS)
}

fn parse(ini: &Path, data: &Path, errors_csv: Option<&Path>, options: &ParseOptions) -> Result<ExitCode> {
    let ini_text = fs::read_to_string(ini).with_context(|| format!("cannot read {}", ini.display()))?;
    let data_text = fs::read_to_string(data).with_context(|| format!("cannot read {}", data.display()))?;

    let result = shaamlib::parse(&ini_text, &data_text, options)?;

    if let Some(path) = errors_csv {
        let file = fs::File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
        validation::write_errors_csv(file, &result.summary.errors)?;
        info!(path = %path.display(), issues = result.summary.errors.len(), "error report written");
    }

    print_json(&ParseReport {
        data: &result.data,
        summary: &result.summary,
    })?;

    if result.summary.has_errors() || !result.summary.cross_validation_passed {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
