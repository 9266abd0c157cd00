//! Prometheus metrics for tabload runs.

use std::fs;
use std::path::Path;

use prometheus::{
    register_histogram_vec_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, Encoder, HistogramVec, IntCounter, IntCounterVec,
    Registry, TextEncoder,
};
use tracing::info;

/// Pipeline stage a measurement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Normalize,
    Configure,
    Write,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Normalize => "normalize",
            Stage::Configure => "configure",
            Stage::Write => "write",
        }
    }
}

/// Metrics collector for a tabload run.
///
/// Each instance owns its registry, so several loaders can coexist in one
/// process.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    rows_fetched: IntCounter,
    rows_written: IntCounter,
    stage_failures: IntCounterVec,
    stage_latency: HistogramVec,
}

impl Metrics {
    /// Create a new metrics instance.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let rows_fetched = register_int_counter_with_registry!(
            "tabload_rows_fetched_total",
            "Total number of rows parsed from the source CSV",
            registry
        )?;

        let rows_written = register_int_counter_with_registry!(
            "tabload_rows_written_total",
            "Total number of rows inserted into the destination table",
            registry
        )?;

        let stage_failures = register_int_counter_vec_with_registry!(
            "tabload_stage_failures_total",
            "Total number of failed runs by stage",
            &["stage"],
            registry
        )?;

        let stage_latency = register_histogram_vec_with_registry!(
            "tabload_stage_latency_seconds",
            "Stage latency in seconds",
            &["stage"],
            registry
        )?;

        Ok(Self {
            registry,
            rows_fetched,
            rows_written,
            stage_failures,
            stage_latency,
        })
    }

    pub fn inc_rows_fetched(&self, count: u64) {
        self.rows_fetched.inc_by(count);
    }

    pub fn inc_rows_written(&self, count: u64) {
        self.rows_written.inc_by(count);
    }

    /// Increment the failure counter for a stage.
    pub fn inc_stage_failure(&self, stage: Stage) {
        self.stage_failures.with_label_values(&[stage.as_str()]).inc();
    }

    /// Record how long a stage took.
    pub fn observe_stage_latency(&self, stage: Stage, duration_secs: f64) {
        self.stage_latency
            .with_label_values(&[stage.as_str()])
            .observe(duration_secs);
    }

    pub fn rows_fetched(&self) -> u64 {
        self.rows_fetched.get()
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written.get()
    }

    pub fn stage_failures(&self, stage: Stage) -> u64 {
        self.stage_failures.with_label_values(&[stage.as_str()]).get()
    }

    /// Get Prometheus metrics as a string.
    pub fn gather(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Write the text exposition to `path` for a textfile collector.
    pub fn write_textfile<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let body = self.gather()?;
        fs::write(&path, body)?;
        info!("Wrote metrics to {:?}", path.as_ref());
        Ok(())
    }
}
