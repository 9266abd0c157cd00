//! CLI application for loading CSV datasets into PostgreSQL.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tabload_db::{ConnectionSource, DbEnv};
use tabload_ingestion::{LoadJob, Loader, DEFAULT_SOURCE_URL, DEFAULT_TABLE};
use tabload_table::Column;
use tabload_telemetry::{init_logging, Metrics};
use tracing::{info, warn};

const SUCCESS_MESSAGE: &str = "✅ Data loaded into PostgreSQL successfully!";

#[derive(Parser)]
#[command(name = "tabload")]
#[command(about = "Load a CSV dataset from a URL into a PostgreSQL table")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the dataset and replace the destination table with it
    Load {
        /// URL of the CSV dataset
        #[arg(long, default_value = DEFAULT_SOURCE_URL)]
        source_url: String,

        /// Destination table, replaced on every run
        #[arg(long, default_value = DEFAULT_TABLE)]
        table: String,

        /// Full connection string; the DB_* variables are used when absent
        #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
        database_url: Option<String>,

        /// Log level
        #[arg(long)]
        log_level: Option<String>,

        /// Append a JSON run summary to this file
        #[arg(long)]
        summary_path: Option<PathBuf>,

        /// Write Prometheus metrics for the run to this file
        #[arg(long)]
        metrics_path: Option<PathBuf>,
    },
    /// Fetch the dataset and print its normalized schema without writing it
    Inspect {
        /// URL of the CSV dataset
        #[arg(long, default_value = DEFAULT_SOURCE_URL)]
        source_url: String,

        /// Log level
        #[arg(long)]
        log_level: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Load {
            source_url,
            table,
            database_url,
            log_level,
            summary_path,
            metrics_path,
        } => {
            init_logging(log_level.as_deref())?;
            let connection = match database_url {
                Some(url) => ConnectionSource::ConnectionString(url),
                None => ConnectionSource::Environment(DbEnv::from_env()),
            };
            let mut job = LoadJob::new(source_url, table, connection);
            if let Some(path) = summary_path {
                job = job.with_summary_path(path);
            }
            run_load(&job, metrics_path).await?;
        }
        Commands::Inspect {
            source_url,
            log_level,
        } => {
            init_logging(log_level.as_deref())?;
            inspect(&source_url).await?;
        }
    }

    Ok(())
}

async fn run_load(job: &LoadJob, metrics_path: Option<PathBuf>) -> anyhow::Result<()> {
    let loader = Loader::new(Metrics::new()?)?;
    let result = loader.run(job).await;

    if let Some(path) = metrics_path {
        if let Err(e) = loader.metrics().write_textfile(&path) {
            warn!("Failed to write metrics to {:?}: {}", path, e);
        }
    }

    let report = result?;
    info!("Replaced {} with {} rows", report.table, report.rows);
    println!("{}", SUCCESS_MESSAGE);
    Ok(())
}

#[derive(Serialize)]
struct Schema<'a> {
    source_url: &'a str,
    rows: usize,
    columns: &'a [Column],
}

async fn inspect(source_url: &str) -> anyhow::Result<()> {
    let loader = Loader::new(Metrics::new()?)?;
    let table = loader.fetch_normalized(source_url).await?;

    let schema = Schema {
        source_url,
        rows: table.row_count(),
        columns: table.columns(),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
