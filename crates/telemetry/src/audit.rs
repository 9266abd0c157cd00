//! Run summaries appended to an audit file.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Outcome of one load run, as recorded in the audit file.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub finished_at: DateTime<Utc>,
    pub source_url: String,
    pub table: String,
    pub succeeded: bool,
    pub rows: u64,
    pub columns: Vec<String>,
    pub elapsed_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Append a run summary to the audit file as pretty JSON.
///
/// # Arguments
/// * `path` - Path to the audit file; nothing is written when `None`
/// * `summary` - Summary to append
pub fn write_run_summary<P: AsRef<Path>>(path: Option<P>, summary: &RunSummary) -> anyhow::Result<()> {
    if let Some(audit_path) = path {
        let json = serde_json::to_string_pretty(summary)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&audit_path)?;
        writeln!(file, "{}", json)?;
        info!("Wrote run summary to {:?}", audit_path.as_ref());
    }
    Ok(())
}
