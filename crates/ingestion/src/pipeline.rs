//! The load pipeline: fetch, normalize, configure, write.

use std::future::Future;
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use tabload_db::{ConnectionSource, DbPool, TableWriter};
use tabload_table::Table;
use tabload_telemetry::audit::{self, RunSummary};
use tabload_telemetry::{Metrics, Stage};
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::error::LoadError;
use crate::source_client::SourceClient;

/// Dataset loaded when no source URL is given.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/datasciencedojo/datasets/master/titanic.csv";

/// Destination relation used when no table name is given.
///
/// The name does not describe the default dataset; runs that combine the two
/// log a warning.
pub const DEFAULT_TABLE: &str = "covid_cases_nyc";

/// Everything one run needs, assembled at process start.
#[derive(Debug, Clone)]
pub struct LoadJob {
    pub source_url: String,
    pub table: String,
    pub connection: ConnectionSource,
    /// Append a JSON run summary here when set.
    pub summary_path: Option<PathBuf>,
}

impl LoadJob {
    pub fn new(source_url: impl Into<String>, table: impl Into<String>, connection: ConnectionSource) -> Self {
        Self {
            source_url: source_url.into(),
            table: table.into(),
            connection,
            summary_path: None,
        }
    }

    pub fn with_summary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary_path = Some(path.into());
        self
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub table: String,
    pub rows: u64,
    pub columns: Vec<String>,
    pub elapsed_secs: f64,
}

/// Runs load jobs.
pub struct Loader {
    client: SourceClient,
    metrics: Metrics,
}

impl Loader {
    /// Create a new loader.
    ///
    /// # Arguments
    /// * `metrics` - Metrics collector
    pub fn new(metrics: Metrics) -> anyhow::Result<Self> {
        Ok(Self {
            client: SourceClient::new()?,
            metrics,
        })
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Run a job to completion.
    ///
    /// Stages run strictly in order and the first failure ends the run, so a
    /// failed fetch never resolves configuration or touches the database.
    pub async fn run(&self, job: &LoadJob) -> Result<LoadReport, LoadError> {
        let started = Instant::now();
        info!("Loading {} into table {}", job.source_url, job.table);

        let result = self.execute(job, started).await;

        let summary = match &result {
            Ok(report) => RunSummary {
                finished_at: Utc::now(),
                source_url: job.source_url.clone(),
                table: job.table.clone(),
                succeeded: true,
                rows: report.rows,
                columns: report.columns.clone(),
                elapsed_secs: report.elapsed_secs,
                error: None,
            },
            Err(e) => {
                error!("Load of {} into {} failed: {}", job.source_url, job.table, e);
                RunSummary {
                    finished_at: Utc::now(),
                    source_url: job.source_url.clone(),
                    table: job.table.clone(),
                    succeeded: false,
                    rows: 0,
                    columns: Vec::new(),
                    elapsed_secs: started.elapsed().as_secs_f64(),
                    error: Some(error_chain(e)),
                }
            }
        };

        if let Err(e) = audit::write_run_summary(job.summary_path.as_ref(), &summary) {
            warn!("Failed to write run summary: {}", e);
        }

        result
    }

    /// Fetch a dataset and normalize its column names without writing it.
    pub async fn fetch_normalized(&self, source_url: &str) -> Result<Table, LoadError> {
        let mut table = self
            .timed(Stage::Fetch, async {
                Ok::<_, LoadError>(self.client.fetch_table(source_url).await?)
            })
            .await?;
        self.metrics.inc_rows_fetched(table.row_count() as u64);

        self.timed(Stage::Normalize, async {
            table.normalize_column_names();
            Ok::<_, LoadError>(())
        })
        .await?;

        Ok(table)
    }

    async fn execute(&self, job: &LoadJob, started: Instant) -> Result<LoadReport, LoadError> {
        if job.source_url == DEFAULT_SOURCE_URL && job.table == DEFAULT_TABLE {
            warn!(
                "Destination table {} does not match the titanic passenger dataset; pass --table to choose a fitting name",
                DEFAULT_TABLE
            );
        }

        let table = self.fetch_normalized(&job.source_url).await?;

        let descriptor = self
            .timed(Stage::Configure, async { Ok::<_, LoadError>(job.connection.resolve()?) })
            .await?;

        let rows = self
            .timed(Stage::Write, async {
                let db = DbPool::connect(&descriptor).await?;
                let result = TableWriter::new(&db).replace_table(&job.table, &table).await;
                db.close().await;
                Ok::<_, LoadError>(result?)
            })
            .await?;
        self.metrics.inc_rows_written(rows);

        let report = LoadReport {
            table: job.table.clone(),
            rows,
            columns: table.column_names().into_iter().map(str::to_string).collect(),
            elapsed_secs: started.elapsed().as_secs_f64(),
        };

        info!(
            "Loaded {} rows into {} in {:.2}s",
            report.rows, report.table, report.elapsed_secs
        );

        Ok(report)
    }

    async fn timed<T, F>(&self, stage: Stage, fut: F) -> Result<T, LoadError>
    where
        F: Future<Output = Result<T, LoadError>>,
    {
        let start = Instant::now();
        let result = fut.await;
        self.metrics
            .observe_stage_latency(stage, start.elapsed().as_secs_f64());
        if result.is_err() {
            self.metrics.inc_stage_failure(stage);
        }
        result
    }
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
