use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use cardsheet::{
    DEFAULT_OUTPUT_NAME, DEFAULT_RECORDS_PER_PAGE, Error, ReportConfig, TrailingPage, Workbook,
};
use clap::Parser;

/// Turn a spreadsheet sheet of names and addresses into printable PDF comment cards.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Input .xlsx workbook
    input: PathBuf,

    /// Sheet to process (defaults to the first sheet)
    #[arg(short, long)]
    sheet: Option<String>,

    /// Output PDF path
    #[arg(short, long, default_value = DEFAULT_OUTPUT_NAME)]
    output: PathBuf,

    /// Print the workbook's sheet names and exit
    #[arg(long)]
    list_sheets: bool,

    /// Rows to preview before generating (0 disables)
    #[arg(long, default_value_t = 5)]
    preview: usize,

    /// Cards per page
    #[arg(long, default_value_t = DEFAULT_RECORDS_PER_PAGE)]
    records_per_page: NonZeroUsize,

    /// Add an empty trailing page when the last page is exactly full
    #[arg(long)]
    legacy_trailing_page: bool,

    /// Write uncompressed content streams
    #[arg(long)]
    no_compress: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(cli: &Cli) -> Result<(), Error> {
    let mut workbook = Workbook::open(&cli.input)?;

    if cli.list_sheets {
        for name in workbook.sheet_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let table = cardsheet::select_sheet(&mut workbook, cli.sheet.as_deref())?;
    if cli.preview > 0 {
        println!("Preview of {:?}:", table.name);
        println!("{}", table.preview(cli.preview));
        println!();
    }

    let mut config = ReportConfig::default();
    config.layout.records_per_page = cli.records_per_page;
    if cli.legacy_trailing_page {
        config.layout.trailing_page = TrailingPage::Emit;
    }
    config.render.compress = !cli.no_compress;

    let report = cardsheet::generate_report(&table, &config)?;
    std::fs::write(&cli.output, &report.pdf)?;
    println!(
        "Wrote {} ({} cards on {} pages)",
        cli.output.display(),
        report.cards,
        report.pages
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ Error::MissingColumns { .. }) => {
            eprintln!("Warning: {e}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
