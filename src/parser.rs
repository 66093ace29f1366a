//! CSV parser producing a schema-checked [`DataFrame`].

use polars::prelude::*;
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

use crate::error::{EdaError, Result};
use crate::pipeline::utility::nan_to_null;
use crate::schema::{NA_VALUES, Schema};

/// Decodes CSV bytes with a header row into a [`DataFrame`].
///
/// Declared columns are read as text and converted to their declared type;
/// the other columns keep the type the reader infers over the whole file.
/// Cells in [`NA_VALUES`], empty cells and numbers that parse to NaN are
/// null.
///
/// # Errors
///
/// - [`EdaError::SchemaMismatch`] when a declared column is absent.
/// - [`EdaError::ParseFailure`] when a declared numeric column holds text.
/// - [`EdaError::Polars`] for malformed CSV such as rows with extra fields.
pub fn parse_table(bytes: &[u8], schema: &Schema) -> Result<DataFrame> {
    let headers = read_headers(bytes)?;
    schema.check_headers(&headers)?;

    let na_values: Vec<PlSmallStr> = NA_VALUES.iter().map(|v| (*v).into()).collect();
    let parse_opts =
        CsvParseOptions::default().with_null_values(Some(NullValues::AllColumns(na_values)));
    let full_opts = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_schema_overwrite(Some(Arc::new(schema.text_overrides())))
        .with_parse_options(parse_opts);

    let mut cursor = Cursor::new(bytes);
    let mut frame = full_opts.into_reader_with_file_handle(&mut cursor).finish()?;

    for declared in schema.columns() {
        if declared.dtype == DataType::Float64 {
            let raw = frame.column(&declared.name)?.str()?;
            let parsed = parse_numeric(&declared.name, raw)?;
            frame.replace(&declared.name, parsed.into_series())?;
        }
    }

    debug!(
        rows = frame.height(),
        columns = frame.width(),
        "CSV parsed against schema"
    );
    nan_to_null(frame)
}

/// Column names from a one-row read where every column stays text.
fn read_headers(bytes: &[u8]) -> Result<Vec<String>> {
    let sample_opts = CsvReadOptions::default()
        .with_has_header(true)
        .with_n_rows(Some(1))
        .with_infer_schema_length(Some(0));

    let mut cursor = Cursor::new(bytes);
    let sample = sample_opts
        .into_reader_with_file_handle(&mut cursor)
        .finish()?;
    Ok(sample
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect())
}

fn parse_numeric(name: &str, raw: &StringChunked) -> Result<Float64Chunked> {
    let values: Float64Chunked = raw
        .into_iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            None => Ok(None),
            Some(text) => text
                .trim()
                .parse::<f64>()
                .map(|v| (!v.is_nan()).then_some(v))
                .map_err(|_| EdaError::ParseFailure {
                    column: name.to_string(),
                    row,
                    value: text.to_string(),
                    expected: "number",
                }),
        })
        .collect::<Result<_>>()?;
    Ok(values.with_name(name.into()))
}
