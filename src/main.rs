//! gdpview - GDP per capita query and chart CLI
//!
//! Loads the wide CSV once, then answers a single query per invocation.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gdpview::charts::StaticChartRenderer;
use gdpview::config::{generate_default_config, Config, LoggingConfig};
use gdpview::report::{self, OutputFormat};
use gdpview::stats::StatsCalculator;
use gdpview::{load_dataset, CountrySelection, QueryEngine, QueryResult, YearRange};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "gdpview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query and chart GDP per capita by country and year")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: user config dir, then ./gdpview.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Wide CSV input, overrides the config file
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// List countries in the dataset
    Countries,

    /// List years in the dataset
    Years,

    /// Print the records matching a selection
    Query(QueryArgs),

    /// Per-country statistics over a selection
    Summary(QueryArgs),

    /// Draw a selection as a line chart (PNG, or SVG for a .svg path)
    Render {
        #[command(flatten)]
        query: QueryArgs,

        /// Output image path
        #[arg(short, long, default_value = "gdp_chart.png")]
        output: PathBuf,

        /// Image width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Image height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Chart title
        #[arg(long)]
        title: Option<String>,
    },

    /// Print a default config file
    Config,
}

#[derive(Args)]
struct QueryArgs {
    /// Country to include; repeat for several. Omit to include every country
    #[arg(short = 'c', long = "country")]
    countries: Vec<String>,

    /// Inclusive year range: LOW..HIGH, LOW:HIGH or YEAR
    #[arg(short, long)]
    years: Option<YearRange>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = match &cli.command {
        Commands::Config => generate_default_config(),
        Commands::Countries => {
            let (engine, _) = startup(&cli)?;
            report::format_list("country", engine.dataset().countries(), cli.format)?
        }
        Commands::Years => {
            let (engine, _) = startup(&cli)?;
            report::format_list("year", engine.dataset().years(), cli.format)?
        }
        Commands::Query(args) => {
            let (engine, config) = startup(&cli)?;
            let result = run_query(&engine, &config, args);
            report::format_records(&result, cli.format)?
        }
        Commands::Summary(args) => {
            let (engine, config) = startup(&cli)?;
            let result = run_query(&engine, &config, args);
            report::format_summaries(&StatsCalculator::summarize(&result), cli.format)?
        }
        Commands::Render {
            query,
            output,
            width,
            height,
            title,
        } => {
            let (engine, config) = startup(&cli)?;
            let result = run_query(&engine, &config, query);
            let mut options = config.chart.options();
            if let Some(w) = width {
                options.width = *w;
            }
            if let Some(h) = height {
                options.height = *h;
            }
            if let Some(t) = title {
                options.title = t.clone();
            }

            StaticChartRenderer::render_to_file(&result, &options, output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            format!("Wrote {} ({} records)\n", output.display(), result.len())
        }
    };

    print!("{output}");
    Ok(())
}

/// Load config, set up logging, then load the dataset once.
fn startup(cli: &Cli) -> Result<(QueryEngine, Config)> {
    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default().context("Failed to load config")?,
    };
    init_logging(&config.logging);

    let data_path = cli.data.clone().unwrap_or_else(|| config.data.path.clone());
    let dataset = load_dataset(&data_path, &config.data.id_column)
        .with_context(|| format!("Failed to load {}", data_path.display()))?;
    Ok((QueryEngine::new(dataset), config))
}

/// Resolve CLI arguments into a typed query and run it.
fn run_query(engine: &QueryEngine, config: &Config, args: &QueryArgs) -> QueryResult {
    let selection: CountrySelection = if args.countries.is_empty() {
        tracing::debug!("No --country given, selecting every country");
        engine.all_countries()
    } else {
        args.countries.iter().cloned().collect()
    };

    for unknown in engine.unknown_countries(&selection) {
        tracing::warn!(country = unknown, "Country not in dataset");
    }

    let range = args.years.unwrap_or_else(|| config.query.default_range());
    if range.is_empty() {
        tracing::warn!(range = %range, "Year range is inverted, nothing will match");
    }

    engine.filter(&selection, range)
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gdpview={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
