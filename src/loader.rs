//! Loads the raw dataset from a URL or a local file.

use polars::prelude::DataFrame;
use tracing::info;

use crate::error::Result;
use crate::fetch::{BasicClient, fetch_bytes};
use crate::parser::parse_table;
use crate::schema::Schema;

pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/SR1608/Datasets/main/covid-data.csv";

/// Reads raw bytes from `source`: fetched over HTTP when it is an `http(s)`
/// URL, read from disk otherwise.
#[tracing::instrument(fields(source = %source))]
pub async fn load_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        let client = BasicClient::new();
        fetch_bytes(&client, source).await?
    } else {
        std::fs::read(source)?
    };
    Ok(bytes)
}

/// Loads `source` and checks it against `schema`.
pub async fn load_table(source: &str, schema: &Schema) -> Result<DataFrame> {
    let bytes = load_source(source).await?;
    let frame = parse_table(&bytes, schema)?;

    let (rows, columns) = frame.shape();
    info!(rows, columns, "Dataset loaded");
    Ok(frame)
}
