//! balanta CLI - trial-balance workbook ingestion tool
//!
//! Parses XLSX and XLS trial balances into validated accounts and totals, and
//! checks upload filenames against the storage policy.

use balanta::ingest::ACCOUNT_COLUMNS;
use balanta::render::JsonFormat;
use balanta::{FormatType, ParseOptions, TrialBalanceParser, XlsReader, XlsxReader};
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Trial-balance spreadsheet ingestion
#[derive(Parser)]
#[command(
    name = "balanta",
    version,
    about = "Parse trial-balance workbooks into validated accounts",
    long_about = "balanta - trial-balance spreadsheet ingestion.\n\n\
                  Reads the first sheet of an XLSX or XLS workbook, validates account rows and \
                  reports accounts with reconciled totals as JSON or text."
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a trial-balance workbook
    Parse {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long, conflicts_with = "text")]
        compact: bool,

        /// Print a text summary instead of JSON
        #[arg(long)]
        text: bool,

        /// Report why rows were skipped
        #[arg(long)]
        diagnostics: bool,

        /// Maximum number of accounts to accept
        #[arg(long, default_value_t = balanta::options::DEFAULT_MAX_ACCOUNTS)]
        max_accounts: usize,
    },

    /// Show workbook format, sheets and grid size
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// Normalize an upload filename and show its storage path
    Filename {
        /// Original filename
        name: String,

        /// Owner identifier used as the storage prefix
        #[arg(long, default_value = "owner")]
        owner: String,
    },

    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Parse {
            input,
            output,
            compact,
            text,
            diagnostics,
            max_accounts,
        } => {
            let data = fs::read(&input)?;
            tracing::debug!(input = %input.display(), bytes = data.len(), "read workbook");

            let options = ParseOptions::new()
                .with_max_accounts(max_accounts)
                .with_diagnostics(diagnostics);
            let result = TrialBalanceParser::with_options(options).parse(&data);

            let rendered = if text {
                balanta::render::to_text(&result)
            } else {
                let format = if compact {
                    JsonFormat::Compact
                } else {
                    JsonFormat::Pretty
                };
                balanta::render::to_json(&result, format)?
            };

            write_output(output.as_ref(), &rendered)?;

            if !result.success {
                eprintln!(
                    "{} {}",
                    "✗".red().bold(),
                    result.error.as_deref().unwrap_or_default()
                );
                return Ok(ExitCode::from(2));
            }

            if let Some(path) = output {
                println!(
                    "{} Parsed {} accounts: {}",
                    "✓".green().bold(),
                    result.accounts_count,
                    path.display()
                );
            }
        }

        Commands::Info { input } => {
            let format = balanta::detect_format_from_path(&input)?;
            let data = fs::read(&input)?;

            println!("{}", "Workbook Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Format".bold(), format);

            let (names, first) = match format {
                FormatType::Xlsx => {
                    let reader = XlsxReader::from_bytes(data)?;
                    println!("{}: {}", "Sheet count".bold(), reader.sheet_count());
                    let names = reader.sheet_names().join(", ");
                    (names, reader.first_sheet(ACCOUNT_COLUMNS)?)
                }
                FormatType::Xls => {
                    let mut reader = XlsReader::from_bytes(data)?;
                    println!("{}: {}", "Sheet count".bold(), reader.sheet_count());
                    let names = reader.sheet_names().join(", ");
                    (names, reader.first_sheet(ACCOUNT_COLUMNS)?)
                }
            };
            println!("{}: {}", "Sheets".bold(), names);

            match first {
                Some(sheet) => {
                    println!("{}: {}", "First sheet".bold(), sheet.name);
                    println!(
                        "{}: {} rows x {} columns",
                        "Grid".bold(),
                        sheet.grid.len(),
                        sheet.grid.width()
                    );
                }
                None => println!("{} No worksheets", "!".yellow().bold()),
            }
        }

        Commands::Filename { name, owner } => {
            let normalized = balanta::normalize_filename(&name);
            let allowed = balanta::is_allowed_extension(&normalized);

            println!("{}: {}", "Normalized".bold(), normalized);
            println!("{}: {}", "Storage path".bold(), balanta::storage_path(&owner, &name));

            if allowed {
                println!("{} Extension accepted", "✓".green().bold());
            } else {
                println!("{} Only .xlsx and .xls files are accepted", "✗".red().bold());
                return Ok(ExitCode::from(2));
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_version() {
    println!("{} {}", "balanta".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Trial-balance spreadsheet ingestion");
    println!();
    println!("Supported formats: XLSX, XLSM, XLS");
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
