//! PriceLab CLI: inspect, summarize and export a stock price CSV.
//!
//! Commands:
//! - `stocks`: list categories and the stocks a category filter leaves
//! - `summary`: last close, high/low and the SMA trend signal for one stock
//! - `show`: the processed rows (close + both SMAs) for one stock
//! - `export`: write the cleaned table with SMA columns appended
//! - `generate`: write a synthetic random-walk dataset

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pricelab_core::data::{raw_to_csv, write_csv};
use pricelab_core::domain::format_date;
use pricelab_core::selection::ALL_CATEGORIES;
use pricelab_core::synthetic::{generate_synthetic, SyntheticStock};
use pricelab_core::{
    categories, CategoryFilter, Pipeline, PipelineConfig, PipelineOutput, Selector, StockView,
    Summary,
};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "pricelab",
    about = "PriceLab CLI: stock price cleaning with SMA trend signals"
)]
struct Cli {
    /// Path to a TOML config file (SMA windows, date formats, export name).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List categories and the stocks available under a category filter.
    Stocks {
        /// Input CSV file, or `-` for stdin.
        input: PathBuf,

        /// Category filter ("All" or omitted for no filter).
        #[arg(long)]
        category: Option<String>,
    },
    /// Quick insights for one stock: last close, high, low and trend signal.
    Summary {
        /// Input CSV file, or `-` for stdin.
        input: PathBuf,

        /// Stock identifier. Defaults to the first available stock.
        #[arg(long)]
        stock: Option<String>,

        /// Category filter ("All" or omitted for no filter).
        #[arg(long)]
        category: Option<String>,

        /// Emit JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the processed rows for one stock.
    Show {
        /// Input CSV file, or `-` for stdin.
        input: PathBuf,

        /// Stock identifier. Defaults to the first available stock.
        #[arg(long)]
        stock: Option<String>,

        /// Category filter ("All" or omitted for no filter).
        #[arg(long)]
        category: Option<String>,

        /// Number of trailing rows to show.
        #[arg(long, default_value_t = 100)]
        tail: usize,

        /// Also print the first rows of the raw input.
        #[arg(long, default_value_t = false)]
        preview: bool,
    },
    /// Write the cleaned table with SMA columns appended.
    Export {
        /// Input CSV file, or `-` for stdin.
        input: PathBuf,

        /// Output path. Defaults to the configured export file name.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate a synthetic dataset.
    Generate {
        /// Stocks as SYMBOL or SYMBOL:CATEGORY (e.g., INFY:IT HDFCBANK:Banking).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 2 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Output path. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    let pipeline = Pipeline::new(config);

    match cli.command {
        Commands::Stocks { input, category } => run_stocks(&pipeline, &input, category),
        Commands::Summary {
            input,
            stock,
            category,
            json,
        } => run_summary(&pipeline, &input, stock, category, json),
        Commands::Show {
            input,
            stock,
            category,
            tail,
            preview,
        } => run_show(&pipeline, &input, stock, category, tail, preview),
        Commands::Export { input, output } => run_export(&pipeline, &input, output),
        Commands::Generate {
            symbols,
            start,
            end,
            output,
        } => run_generate(symbols, start, end, output),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load(pipeline: &Pipeline, input: &Path) -> Result<PipelineOutput> {
    let output = if input == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("failed to read stdin")?;
        pipeline.run(bytes.as_slice())?
    } else {
        pipeline
            .run_path(input)
            .with_context(|| format!("failed to load {}", input.display()))?
    };

    let drops = &output.report.drops;
    if drops.dropped() > 0 {
        eprintln!(
            "Note: dropped {} of {} rows ({} invalid date, {} invalid close)",
            drops.dropped(),
            drops.rows_read,
            drops.invalid_date,
            drops.invalid_close
        );
    }
    Ok(output)
}

fn select(output: &PipelineOutput, stock: Option<&str>, category: Option<&str>) -> Result<StockView> {
    let selector = Selector::new(&output.series, CategoryFilter::from_label(category));
    Ok(selector.select(stock)?)
}

fn run_stocks(pipeline: &Pipeline, input: &Path, category: Option<String>) -> Result<()> {
    let output = load(pipeline, input)?;

    if output.table.has_category() {
        let mut labels = vec![ALL_CATEGORIES.to_string()];
        labels.extend(categories(&output.table));
        println!("Categories: {}", labels.join(", "));
    }

    let selector = Selector::new(&output.series, CategoryFilter::from_label(category.as_deref()));
    let stocks = selector.candidate_stocks()?;
    println!("Stocks ({}):", stocks.len());
    for stock in &stocks {
        println!("  {stock}");
    }
    Ok(())
}

fn run_summary(
    pipeline: &Pipeline,
    input: &Path,
    stock: Option<String>,
    category: Option<String>,
    json: bool,
) -> Result<()> {
    let output = load(pipeline, input)?;
    let view = select(&output, stock.as_deref(), category.as_deref())?;
    let summary = Summary::from_points(&view.points)?;

    if json {
        let value = serde_json::json!({
            "stock": view.stock,
            "summary": summary,
            "report": output.report,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let windows = output.series.windows();
    println!();
    println!("=== Quick Insights: {} ===", view.stock);
    println!(
        "Period:            {} to {} ({} rows)",
        summary.first_date, summary.last_date, summary.observations
    );
    println!("Last Close:        {:.2}", summary.last_close);
    println!("High:              {:.2}", summary.high);
    println!("Low:               {:.2}", summary.low);
    println!("SMA {:<14} {:.2}", format!("{}:", windows.fast), summary.last_sma_fast);
    println!("SMA {:<14} {:.2}", format!("{}:", windows.slow), summary.last_sma_slow);
    println!("Trend Signal:      {}", summary.signal);
    println!();
    Ok(())
}

fn run_show(
    pipeline: &Pipeline,
    input: &Path,
    stock: Option<String>,
    category: Option<String>,
    tail: usize,
    preview: bool,
) -> Result<()> {
    let output = load(pipeline, input)?;

    if preview {
        println!("Data preview:");
        println!("{}", output.raw.headers.join(" | "));
        for record in output.raw.preview(5) {
            println!("{}", record.join(" | "));
        }
        println!();
    }

    let view = select(&output, stock.as_deref(), category.as_deref())?;
    let windows = output.series.windows();
    let fast_col = windows.fast_column();
    let slow_col = windows.slow_column();

    println!("{}: last {} of {} rows", view.stock, tail.min(view.points.len()), view.points.len());
    println!(
        "{:<12} {:>12} {:>12} {:>12}  {}",
        "Date", "Close", fast_col, slow_col, "Category"
    );
    println!("{}", "-".repeat(62));
    for p in view.tail(tail) {
        println!(
            "{:<12} {:>12.2} {:>12.2} {:>12.2}  {}",
            format_date(p.date),
            p.close,
            p.sma_fast,
            p.sma_slow,
            p.category.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn run_export(pipeline: &Pipeline, input: &Path, output_path: Option<PathBuf>) -> Result<()> {
    let output = load(pipeline, input)?;
    let path =
        output_path.unwrap_or_else(|| PathBuf::from(&pipeline.config().export.file_name));
    let rows = write_csv(&path, &output.table, &output.series)?;
    println!("Wrote {rows} rows to {}", path.display());
    Ok(())
}

fn run_generate(
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let end_date = end
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let start_date = start
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| end_date - chrono::Duration::days(365 * 2));

    if start_date > end_date {
        bail!("--start ({start_date}) must not be after --end ({end_date})");
    }

    let stocks: Vec<SyntheticStock> = symbols.iter().map(|s| SyntheticStock::parse(s)).collect();
    let raw = generate_synthetic(&stocks, start_date, end_date);
    let csv = raw_to_csv(&raw)?;

    match output {
        Some(path) => {
            std::fs::write(&path, csv)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {} rows to {}", raw.len(), path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}
