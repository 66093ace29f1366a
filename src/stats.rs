use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::Result;
use crate::pipeline::utility::{float_column, numeric_columns, require_column, undefined_count};
use crate::schema::{
    CONTINENT, GDP_PER_CAPITA, HUMAN_DEVELOPMENT_INDEX, LOCATION, TOTAL_CASES, TOTAL_DEATHS,
};

/// Non-null count and type of one column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
    pub missing: usize,
}

/// Summary statistics of one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    /// Nulls are skipped; percentiles interpolate linearly between the
    /// closest ranks.
    pub fn from_values(name: &str, values: &Float64Chunked) -> Result<Self> {
        let quartiles = Quartiles::from_values(values)?;
        Ok(ColumnSummary {
            name: name.to_string(),
            count: values.len() - values.null_count(),
            mean: values.mean(),
            std: values.std(1),
            min: values.min(),
            p25: quartiles.p25,
            p50: quartiles.p50,
            p75: quartiles.p75,
            max: values.max(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Quartiles {
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
}

impl Quartiles {
    pub fn from_values(values: &Float64Chunked) -> Result<Self> {
        Ok(Quartiles {
            p25: values.quantile(0.25, QuantileMethod::Linear)?,
            p50: values.quantile(0.50, QuantileMethod::Linear)?,
            p75: values.quantile(0.75, QuantileMethod::Linear)?,
        })
    }
}

/// Read-only overview of a raw dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: usize,
    pub info: Vec<ColumnInfo>,
    pub description: Vec<ColumnSummary>,

    pub unique_locations: usize,
    pub most_frequent_continent: Option<String>,
    pub max_total_cases: Option<f64>,
    pub mean_total_cases: Option<f64>,
    pub total_deaths_quartiles: Quartiles,
    pub continent_max_hdi: Option<String>,
    pub continent_min_gdp: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Max,
    Min,
}

impl DatasetProfile {
    #[tracing::instrument(skip(frame), fields(rows = frame.height()))]
    pub fn from_table(frame: &DataFrame) -> Result<Self> {
        let (rows, columns) = frame.shape();

        let info = frame
            .get_columns()
            .iter()
            .map(|c| -> Result<ColumnInfo> {
                let missing = undefined_count(c)?;
                Ok(ColumnInfo {
                    name: c.name().to_string(),
                    dtype: c.dtype().to_string(),
                    non_null: rows - missing,
                    missing,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let description = numeric_columns(frame)
            .iter()
            .map(|name| ColumnSummary::from_values(name, &float_column(frame, name)?))
            .collect::<Result<Vec<_>>>()?;

        let cases = float_column(frame, TOTAL_CASES)?;
        let deaths = float_column(frame, TOTAL_DEATHS)?;

        Ok(DatasetProfile {
            rows,
            columns,
            info,
            description,
            unique_locations: count_distinct(frame, LOCATION)?,
            most_frequent_continent: most_frequent(frame, CONTINENT)?,
            max_total_cases: cases.max(),
            mean_total_cases: cases.mean(),
            total_deaths_quartiles: Quartiles::from_values(&deaths)?,
            continent_max_hdi: group_extreme(
                frame,
                CONTINENT,
                HUMAN_DEVELOPMENT_INDEX,
                Extreme::Max,
            )?,
            continent_min_gdp: group_extreme(frame, CONTINENT, GDP_PER_CAPITA, Extreme::Min)?,
        })
    }
}

/// Number of distinct non-null values in `column`.
pub fn count_distinct(frame: &DataFrame, column: &str) -> Result<usize> {
    let values = require_column(frame, column)?.as_materialized_series();
    Ok(values.drop_nulls().n_unique()?)
}

/// Most frequent non-null value of `column`. Equal counts resolve to the
/// value seen first in row order.
pub fn most_frequent(frame: &DataFrame, column: &str) -> Result<Option<String>> {
    let text = require_column(frame, column)?.cast(&DataType::String)?;

    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for value in text.str()?.into_iter().flatten() {
        match index.get(value) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(value, order.len());
                order.push((value, 1));
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in order {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    Ok(best.map(|(value, _)| value.to_string()))
}

/// Category whose per-group max (or min) of `value_column` is the overall
/// extreme.
///
/// Groups are visited in ascending category order and the first one
/// reaching the extreme wins. Rows with a null category and groups with no
/// present value are ignored.
pub fn group_extreme(
    frame: &DataFrame,
    category: &str,
    value_column: &str,
    extreme: Extreme,
) -> Result<Option<String>> {
    let keys = require_column(frame, category)?.cast(&DataType::String)?;
    let values = float_column(frame, value_column)?;
    let pairs = DataFrame::new(vec![keys, values.into_series().into()])?;

    let reduced = match extreme {
        Extreme::Max => col(value_column).max(),
        Extreme::Min => col(value_column).min(),
    };
    let groups = pairs
        .lazy()
        .filter(col(category).is_not_null())
        .group_by([col(category)])
        .agg([reduced])
        .filter(col(value_column).is_not_null())
        .sort([category], Default::default())
        .collect()?;

    let names = groups.column(category)?.str()?;
    let reductions = groups.column(value_column)?.f64()?;

    let mut best: Option<(&str, f64)> = None;
    for (name, value) in names.into_iter().zip(reductions.into_iter()) {
        let (Some(name), Some(value)) = (name, value) else {
            continue;
        };
        let better = match (best, extreme) {
            (None, _) => true,
            (Some((_, top)), Extreme::Max) => value > top,
            (Some((_, top)), Extreme::Min) => value < top,
        };
        if better {
            best = Some((name, value));
        }
    }
    Ok(best.map(|(name, _)| name.to_string()))
}
