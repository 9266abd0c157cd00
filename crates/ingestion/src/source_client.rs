//! HTTP client for the source dataset.

use anyhow::Result;
use reqwest::Client;
use tabload_table::Table;
use tracing::{debug, info};

use crate::csv_parser::parse_csv;
use crate::error::FetchError;

/// Downloads and parses CSV datasets over HTTP.
pub struct SourceClient {
    client: Client,
}

impl SourceClient {
    /// Create a new source client.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tabload/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` and return the response body.
    ///
    /// Any non-success status is an error; nothing is retried.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let request_err = |source: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_err)?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let body = response.bytes().await.map_err(request_err)?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }

    /// Fetch `url` and parse it as a CSV table.
    pub async fn fetch_table(&self, url: &str) -> Result<Table, FetchError> {
        let body = self.fetch(url).await?;
        let table = parse_csv(&body)?;
        info!(
            "Loaded {} rows and {} columns from {}",
            table.row_count(),
            table.column_count(),
            url
        );
        Ok(table)
    }
}
