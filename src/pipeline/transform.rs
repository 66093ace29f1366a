//! Date parsing, month derivation and column projection.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

use crate::error::{EdaError, Result};
use crate::pipeline::utility::require_column;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parses `YYYY-MM-DD`, `YYYY/MM/DD`, a naive datetime or RFC 3339 into a
/// calendar date. The time of day is discarded.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Converts a text column into a `Date` column. A column that is already
/// `Date` is returned unchanged and nulls stay null.
///
/// # Errors
///
/// The first cell that is not a recognizable date aborts the conversion with
/// [`EdaError::ParseFailure`]; no row is dropped or patched.
#[tracing::instrument(skip(frame))]
pub fn parse_dates(mut frame: DataFrame, column: &str) -> Result<DataFrame> {
    let source = require_column(&frame, column)?;
    if source.dtype() == &DataType::Date {
        return Ok(frame);
    }

    let text = source.cast(&DataType::String)?;
    let epoch = NaiveDate::default();
    let days: Int32Chunked = text
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            None => Ok(None),
            Some(raw) => parse_date(raw)
                .map(|d| Some((d - epoch).num_days() as i32))
                .ok_or_else(|| EdaError::ParseFailure {
                    column: column.to_string(),
                    row,
                    value: raw.to_string(),
                    expected: "date",
                }),
        })
        .collect::<Result<_>>()?;

    let dates = days
        .with_name(column.into())
        .into_series()
        .cast(&DataType::Date)?;
    frame.replace(column, dates)?;
    Ok(frame)
}

/// Appends a column holding the month (1 to 12) of `date_column`.
pub fn derive_month(frame: DataFrame, date_column: &str, month_column: &str) -> Result<DataFrame> {
    if require_column(&frame, date_column)?.dtype() != &DataType::Date {
        return Err(EdaError::SchemaMismatch(format!(
            "column '{date_column}' must be parsed as date before deriving '{month_column}'"
        )));
    }

    Ok(frame
        .lazy()
        .with_column(col(date_column).dt().month().alias(month_column))
        .collect()?)
}

/// Projects `frame` onto `columns`, in the given order.
pub fn select(frame: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    for name in columns {
        require_column(frame, name)?;
    }
    Ok(frame.select(columns.iter().copied())?)
}
