//! Cleaning, transformation, aggregation and feature derivation.
//!
//! Each stage takes a [`DataFrame`] and returns a new one; [`summarize`]
//! chains them from the raw dataset to the grouped summary.

pub mod aggregate;
pub mod clean;
pub mod features;
pub mod transform;
pub mod utility;

use polars::prelude::DataFrame;

use crate::error::Result;
use crate::schema::{CONTINENT, DATE, DEATHS_TO_CASES, MONTH, TOTAL_CASES, TOTAL_DEATHS};

/// Clean, parse dates, derive the month, group by continent with max and
/// derive the deaths-to-cases ratio.
pub fn summarize(raw: DataFrame) -> Result<DataFrame> {
    let cleaned = clean::clean(raw, CONTINENT)?;
    let dated = transform::parse_dates(cleaned, DATE)?;
    let with_month = transform::derive_month(dated, DATE, MONTH)?;
    let grouped = aggregate::group_max(&with_month, CONTINENT)?;
    features::add_ratio(grouped, TOTAL_DEATHS, TOTAL_CASES, DEATHS_TO_CASES)
}
