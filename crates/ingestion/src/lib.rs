//! Source acquisition and the load pipeline for tabload.

pub mod csv_parser;
pub mod error;
pub mod pipeline;
pub mod source_client;

pub use error::{FetchError, LoadError};
pub use pipeline::{LoadJob, LoadReport, Loader, DEFAULT_SOURCE_URL, DEFAULT_TABLE};
pub use source_client::SourceClient;
