// Engine command-line entry point
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use engine::config::settings::{BarSettings, BarSort, ChartSettings, EngineSettings, SankeySettings};
use engine::services::ChartService;
use shared::models::{ChartData, ChartKind};
use shared::number::{format_grouped, normalize};
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "engine", about = "Build bar and Sankey chart datasets from CSV files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a chart dataset from a CSV file and print it.
    Chart(ChartArgs),
    /// Normalize human-formatted numbers ("$1,234.56", "(500)", "1.234,5") into integers.
    Normalize(NormalizeArgs),
}

#[derive(Parser, Debug)]
struct ChartArgs {
    /// CSV file to read, or `-` for stdin.
    #[arg(long, short)]
    input: PathBuf,

    /// JSON settings file. Flags below override its values.
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    chart: Option<ChartArg>,

    #[arg(long)]
    label_column: Option<String>,

    #[arg(long)]
    value_column: Option<String>,

    #[arg(long)]
    source_column: Option<String>,

    #[arg(long)]
    target_column: Option<String>,

    /// Bar order.
    #[arg(long, value_enum)]
    sort: Option<SortArg>,

    /// Keep only the first N bars after sorting.
    #[arg(long)]
    limit: Option<usize>,

    #[arg(long)]
    delimiter: Option<char>,

    /// Treat the first row as data.
    #[arg(long)]
    no_headers: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct NormalizeArgs {
    /// Values to normalize. Reads one value per line from stdin when none are given.
    #[arg(allow_hyphen_values = true)]
    values: Vec<String>,

    /// Print results with thousands separators.
    #[arg(long)]
    grouped: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ChartArg {
    Bar,
    Sankey,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SortArg {
    Input,
    Desc,
    Asc,
}

impl From<SortArg> for BarSort {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Input => BarSort::Input,
            SortArg::Desc => BarSort::Descending,
            SortArg::Asc => BarSort::Ascending,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Chart(args) => run_chart(&args, io::stdin().lock(), &mut out),
        Command::Normalize(args) => run_normalize(&args, io::stdin().lock(), &mut out),
    }
}

// `input` is only read when the CSV path is `-`
fn run_chart(args: &ChartArgs, input: impl Read, out: &mut impl Write) -> Result<()> {
    let settings = resolve_settings(args)?;
    let service = ChartService::new(settings)?;
    info!(
        input = %args.input.display(),
        kind = ?service.settings().chart.kind(),
        "Starting chart build"
    );

    let chart = if args.input.as_os_str() == "-" {
        let table = service.read_table(input)?;
        service.build_chart(&table)?
    } else {
        service
            .chart_from_csv(&args.input)
            .with_context(|| format!("Failed to build chart from '{}'", args.input.display()))?
    };

    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &chart)?;
            writeln!(out)?;
        }
        OutputFormat::Text => write_text(out, &chart)?,
    }
    Ok(())
}

fn resolve_settings(args: &ChartArgs) -> Result<EngineSettings> {
    let mut settings = match &args.config {
        Some(path) => EngineSettings::load(path)
            .with_context(|| format!("Failed to load settings from '{}'", path.display()))?,
        None => EngineSettings::default(),
    };

    if let Some(delimiter) = args.delimiter {
        settings.csv.delimiter = delimiter;
    }
    if args.no_headers {
        settings.csv.has_headers = false;
    }

    match args.chart {
        Some(ChartArg::Bar) if !matches!(settings.chart, ChartSettings::Bar(_)) => {
            settings.chart = ChartSettings::Bar(BarSettings::default());
        }
        Some(ChartArg::Sankey) if !matches!(settings.chart, ChartSettings::Sankey(_)) => {
            settings.chart = ChartSettings::Sankey(SankeySettings::default());
        }
        _ => {}
    }

    match &mut settings.chart {
        ChartSettings::Bar(bar) => {
            if let Some(column) = &args.label_column {
                bar.label_column = column.clone();
            }
            if let Some(column) = &args.value_column {
                bar.value_column = column.clone();
            }
            if let Some(sort) = args.sort {
                bar.sort = sort.into();
            }
            if let Some(limit) = args.limit {
                bar.limit = Some(limit);
            }
        }
        ChartSettings::Sankey(sankey) => {
            if let Some(column) = &args.source_column {
                sankey.source_column = column.clone();
            }
            if let Some(column) = &args.target_column {
                sankey.target_column = column.clone();
            }
            if let Some(column) = &args.value_column {
                sankey.value_column = column.clone();
            }
        }
    }

    let kind = settings.chart.kind();
    for flag in ignored_flags(args, kind) {
        warn!(flag, kind = ?kind, "Flag does not apply to this chart kind and is ignored");
    }

    settings.validate()?;
    Ok(settings)
}

fn ignored_flags(args: &ChartArgs, kind: ChartKind) -> Vec<&'static str> {
    let flags = match kind {
        ChartKind::Bar => vec![
            ("--source-column", args.source_column.is_some()),
            ("--target-column", args.target_column.is_some()),
        ],
        ChartKind::Sankey => vec![
            ("--label-column", args.label_column.is_some()),
            ("--sort", args.sort.is_some()),
            ("--limit", args.limit.is_some()),
        ],
    };
    flags.into_iter().filter(|(_, given)| *given).map(|(flag, _)| flag).collect()
}

fn write_text(out: &mut impl Write, chart: &ChartData) -> io::Result<()> {
    match chart {
        ChartData::Bar(series) => {
            writeln!(out, "{}", series.name)?;
            for datum in &series.data {
                writeln!(out, "{}\t{}", datum.label, format_grouped(datum.value))?;
            }
            writeln!(out, "total\t{}", format_grouped(series.total()))?;
        }
        ChartData::Sankey(graph) => {
            for link in &graph.links {
                writeln!(
                    out,
                    "{} -> {}\t{}",
                    graph.nodes[link.source].name,
                    graph.nodes[link.target].name,
                    format_grouped(link.value)
                )?;
            }
            writeln!(out, "total\t{}", format_grouped(graph.total_flow()))?;
        }
    }
    Ok(())
}

fn run_normalize(args: &NormalizeArgs, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    let values = if args.values.is_empty() {
        input
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .context("Failed to read values from stdin")?
    } else {
        args.values.clone()
    };

    for value in &values {
        let number = normalize(value.as_str());
        if args.grouped {
            writeln!(out, "{}", format_grouped(number))?;
        } else {
            writeln!(out, "{}", number)?;
        }
    }
    Ok(())
}
