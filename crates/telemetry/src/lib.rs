//! Observability for tabload runs.

pub mod metrics;
pub mod logging;
pub mod audit;

pub use metrics::{Metrics, Stage};
pub use logging::init_logging;
