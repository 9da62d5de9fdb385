//! sheetdiff CLI - compare one sheet of two workbooks

mod output;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use sheetdiff::prelude::*;
use sheetdiff::{XlsxWorkbook, LookIn, SearchOrder};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::output::{write_report, DiffReport, OutputFormat};

#[derive(Parser)]
#[command(name = "sheetdiff")]
#[command(author, version, about = "Compare spreadsheet sheets cell by cell")]
struct Cli {
    /// More logging (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sheets of a workbook
    Sheets {
        /// Workbook file (xlsx)
        input: PathBuf,
    },

    /// Show extent, merges and formulas of a sheet
    Info {
        input: PathBuf,

        /// Sheet name (default: the active sheet)
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Print a sheet as tab-separated display text
    Show {
        input: PathBuf,

        #[arg(short, long)]
        sheet: Option<String>,

        /// Decimal adjustment applied to every numeric cell
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        decimals: i32,
    },

    /// Find cells containing text
    Find {
        input: PathBuf,

        /// Text to look for
        text: String,

        #[arg(short, long)]
        sheet: Option<String>,

        #[arg(long)]
        match_case: bool,

        /// Match the whole cell instead of a substring
        #[arg(long)]
        entire: bool,

        /// Search formula text where a cell has one
        #[arg(long)]
        formulas: bool,

        /// Scan column by column
        #[arg(long)]
        by_columns: bool,
    },

    /// Compare a sheet of two workbooks
    Diff {
        /// Old (base) workbook
        old: PathBuf,

        /// New (changed) workbook
        new: PathBuf,

        /// Sheet name on both sides
        #[arg(short, long, conflicts_with_all = ["old_sheet", "new_sheet"])]
        sheet: Option<String>,

        /// Sheet name in the old workbook
        #[arg(long)]
        old_sheet: Option<String>,

        /// Sheet name in the new workbook
        #[arg(long)]
        new_sheet: Option<String>,

        #[arg(long)]
        ignore_case: bool,

        #[arg(long)]
        ignore_whitespace: bool,

        #[arg(long)]
        ignore_number_format: bool,

        /// Difference categories to report (default: all)
        #[arg(long, value_enum, value_delimiter = ',')]
        only: Vec<Category>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file with a diff configuration; flags override it
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
enum Category {
    Content,
    Format,
    Formula,
}

impl Category {
    fn mask(self) -> DiffMask {
        match self {
            Category::Content => DiffMask::CONTENT,
            Category::Format => DiffMask::FORMAT,
            Category::Formula => DiffMask::FORMULA,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Sheets { input } => list_sheets(&input)?,
        Commands::Info { input, sheet } => show_info(&input, sheet.as_deref())?,
        Commands::Show {
            input,
            sheet,
            decimals,
        } => show_sheet(&input, sheet.as_deref(), decimals)?,
        Commands::Find {
            input,
            text,
            sheet,
            match_case,
            entire,
            formulas,
            by_columns,
        } => {
            let options = SearchOptions::new(text)
                .match_case(match_case)
                .match_entire(entire)
                .look_in(if formulas { LookIn::Formulas } else { LookIn::Values })
                .order(if by_columns { SearchOrder::ByColumns } else { SearchOrder::ByRows });
            return find(&input, sheet.as_deref(), &options);
        }
        Commands::Diff {
            old,
            new,
            sheet,
            old_sheet,
            new_sheet,
            ignore_case,
            ignore_whitespace,
            ignore_number_format,
            only,
            format,
            output,
            config,
        } => {
            let mut diff_config = match &config {
                Some(path) => load_config(path)?,
                None => DiffConfig::default(),
            };
            diff_config.ignore_case |= ignore_case;
            diff_config.ignore_whitespace |= ignore_whitespace;
            diff_config.ignore_number_format |= ignore_number_format;

            let view = if only.is_empty() {
                DiffView::default()
            } else {
                DiffView::only(only.iter().fold(DiffMask::NONE, |m, c| m | c.mask()))
            };

            return compare(
                &old,
                &new,
                old_sheet.as_deref().or(sheet.as_deref()),
                new_sheet.as_deref().or(sheet.as_deref()),
                diff_config,
                view,
                format,
                output.as_deref(),
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn open(input: &Path) -> Result<XlsxWorkbook> {
    XlsxReader::new()
        .open_file(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))
}

fn load(input: &Path, sheet: Option<&str>) -> Result<SheetSnapshot> {
    let _span = tracing::info_span!("load", path = %input.display()).entered();
    let snapshot = open(input)?
        .load_sheet(sheet)
        .with_context(|| format!("Failed to load sheet from '{}'", input.display()))?;
    tracing::info!(
        sheet = %snapshot.name,
        rows = snapshot.row_count(),
        cols = snapshot.col_count(),
        "Loaded sheet"
    );
    Ok(snapshot)
}

fn load_config(path: &Path) -> Result<DiffConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid config '{}'", path.display()))
}

fn list_sheets(input: &Path) -> Result<()> {
    let workbook = open(input)?;
    let active = workbook.active_sheet();
    for (i, name) in workbook.sheet_names().into_iter().enumerate() {
        let marker = if Some(name) == active { "*" } else { "" };
        println!("{}\t{}{}", i, name, marker);
    }
    Ok(())
}

fn show_info(input: &Path, sheet: Option<&str>) -> Result<()> {
    let snapshot = load(input, sheet)?;

    println!("File: {}", input.display());
    println!("Sheet: \"{}\"", snapshot.name);
    if snapshot.row_count() == 0 || snapshot.col_count() == 0 {
        println!("Used range: empty");
    } else {
        let range = CellRange::from_indices(0, 0, snapshot.row_count() - 1, snapshot.col_count() - 1);
        println!(
            "Used range: {} ({} rows x {} columns)",
            range,
            snapshot.row_count(),
            snapshot.col_count()
        );
    }
    println!("Formulas: {}", snapshot.formulas.len());
    println!("Distinct styles: {}", snapshot.styles.table().len());
    println!("Merged regions: {}", snapshot.merges.len());
    for merge in &snapshot.merges {
        println!(
            "  {}",
            CellRange::from_indices(merge.row, merge.col, merge.last_row(), merge.last_col())
        );
    }
    Ok(())
}

fn show_sheet(input: &Path, sheet: Option<&str>, decimals: i32) -> Result<()> {
    let snapshot = load(input, sheet)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for row in 0..snapshot.row_count() {
        let line: Vec<String> = (0..snapshot.col_count())
            .map(|col| format_cell(snapshot.value(row, col), snapshot.style(row, col), decimals))
            .collect();
        writeln!(out, "{}", line.join("\t")).context("Failed to write to stdout")?;
    }
    Ok(())
}

fn find(input: &Path, sheet: Option<&str>, options: &SearchOptions) -> Result<ExitCode> {
    if options.text.is_empty() {
        bail!("Search text must not be empty");
    }
    let snapshot = load(input, sheet)?;
    let found = find_all(&snapshot, options);
    for address in &found {
        let (row, col) = (address.row, address.col);
        let shown = match (options.look_in, snapshot.formula(row, col)) {
            (LookIn::Formulas, Some(formula)) => formula.to_string(),
            _ => snapshot.value(row, col).to_natural_string(),
        };
        println!("{}\t{}", address, shown);
    }
    Ok(if found.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[allow(clippy::too_many_arguments)]
fn compare(
    old: &Path,
    new: &Path,
    old_sheet: Option<&str>,
    new_sheet: Option<&str>,
    config: DiffConfig,
    view: DiffView,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<ExitCode> {
    let left = load(old, old_sheet)?;
    let right = load(new, new_sheet)?;

    let session = {
        let _span = tracing::info_span!("diff").entered();
        ComparisonSession::new(left, right, config)
    };
    let report = DiffReport::new(old, new, &session, view);
    tracing::info!(cells = report.cells.len(), "Diff complete");

    match output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create '{}'", path.display()))?;
            let mut writer = io::BufWriter::new(file);
            write_report(&report, format, &mut writer)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            writer.flush()?;
            eprintln!("Wrote {} differences to '{}'", report.cells.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_report(&report, format, &mut out).context("Failed to write to stdout")?;
        }
    }

    Ok(if report.cells.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
