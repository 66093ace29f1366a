//! CLI entry point for the COVID-19 exploratory analysis.
//!
//! `run` executes the whole pipeline: load, profile, clean, transform,
//! aggregate, derive the death ratio, render charts and save the grouped
//! table. `profile` stops after the profiling stage.

use anyhow::Result;
use clap::{Parser, Subcommand};
use covid_eda::{
    loader::{DEFAULT_SOURCE, load_table},
    output::{print_json, print_pretty, write_table},
    pipeline::summarize,
    report::{default_charts, render_all},
    schema::Schema,
    stats::DatasetProfile,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "covid_eda")]
#[command(about = "Exploratory analysis of a COVID-19 dataset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and save the per-continent summary
    Run {
        /// URL or path of the dataset CSV
        #[arg(short, long, default_value = DEFAULT_SOURCE)]
        source: String,

        /// CSV file the grouped table is written to (overwritten)
        #[arg(short, long, default_value = "covid_data_grouped.csv")]
        output: PathBuf,

        /// Directory the charts are rendered into
        #[arg(short, long, default_value = "plots")]
        plots_dir: PathBuf,
    },
    /// Load the dataset and report descriptive statistics only
    Profile {
        /// URL or path of the dataset CSV
        #[arg(short, long, default_value = DEFAULT_SOURCE)]
        source: String,

        /// Emit the profile as JSON instead of debug format
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/covid_eda.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("covid_eda.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            source,
            output,
            plots_dir,
        } => {
            let raw = load_table(&source, &Schema::covid()).await?;

            let profile = DatasetProfile::from_table(&raw)?;
            log_highlights(&profile);
            print_pretty(&profile);

            let grouped = summarize(raw)?;
            info!(
                rows = grouped.height(),
                columns = grouped.width(),
                "Grouped summary ready"
            );

            render_all(&grouped, &default_charts(), &plots_dir)?;
            write_table(&output, &grouped)?;
        }
        Commands::Profile { source, json } => {
            let raw = load_table(&source, &Schema::covid()).await?;

            let profile = DatasetProfile::from_table(&raw)?;
            log_highlights(&profile);

            if json {
                print_json(&profile)?;
            } else {
                print_pretty(&profile);
            }
        }
    }

    Ok(())
}

fn log_highlights(profile: &DatasetProfile) {
    let missing_cells: usize = profile.info.iter().map(|c| c.missing).sum();
    info!(
        rows = profile.rows,
        columns = profile.columns,
        missing_cells,
        unique_locations = profile.unique_locations,
        most_frequent_continent = ?profile.most_frequent_continent,
        "Dataset shape"
    );
    info!(
        max_total_cases = ?profile.max_total_cases,
        mean_total_cases = ?profile.mean_total_cases,
        total_deaths_p25 = ?profile.total_deaths_quartiles.p25,
        total_deaths_p50 = ?profile.total_deaths_quartiles.p50,
        total_deaths_p75 = ?profile.total_deaths_quartiles.p75,
        continent_max_hdi = ?profile.continent_max_hdi,
        continent_min_gdp = ?profile.continent_min_gdp,
        "Dataset highlights"
    );
}
