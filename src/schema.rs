//! Explicit column declarations checked when a dataset is loaded.

use polars::prelude::{DataType, Field, Schema as FrameSchema};

use crate::error::{EdaError, Result};

pub const CONTINENT: &str = "continent";
pub const LOCATION: &str = "location";
pub const DATE: &str = "date";
pub const TOTAL_CASES: &str = "total_cases";
pub const TOTAL_DEATHS: &str = "total_deaths";
pub const GDP_PER_CAPITA: &str = "gdp_per_capita";
pub const HUMAN_DEVELOPMENT_INDEX: &str = "human_development_index";
pub const MONTH: &str = "month";
pub const DEATHS_TO_CASES: &str = "total_deaths_to_total_cases";

/// Cell spellings read as missing, in every column. Empty cells are missing
/// too. Numeric cells that parse to NaN (`NAN`, `-NAN`, ...) are turned into
/// missing values after parsing.
pub const NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: String,
    pub dtype: DataType,
}

/// Columns that must be present, with their expected types. Columns of the
/// file that are not declared are kept with the type the CSV reader infers.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// The seven columns the analysis reads by name.
    pub fn covid() -> Self {
        let declare = |name: &str, dtype| ColumnSpec {
            name: name.to_string(),
            dtype,
        };
        Self::new(vec![
            declare(CONTINENT, DataType::String),
            declare(LOCATION, DataType::String),
            // kept as text until the transformer parses it
            declare(DATE, DataType::String),
            declare(TOTAL_CASES, DataType::Float64),
            declare(TOTAL_DEATHS, DataType::Float64),
            declare(GDP_PER_CAPITA, DataType::Float64),
            declare(HUMAN_DEVELOPMENT_INDEX, DataType::Float64),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&DataType> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.dtype)
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Reader override pinning every declared column to text, so declared
    /// numeric columns are converted cell by cell and a bad cell can be
    /// reported with its row.
    pub fn text_overrides(&self) -> FrameSchema {
        self.columns
            .iter()
            .map(|c| Field::new(c.name.as_str().into(), DataType::String))
            .collect()
    }

    /// Fails with every declared column absent from `headers`.
    pub fn check_headers(&self, headers: &[String]) -> Result<()> {
        let missing: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| !headers.iter().any(|h| h == &c.name))
            .map(|c| c.name.as_str())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(EdaError::SchemaMismatch(format!(
                "missing expected columns: {}",
                missing.join(", ")
            )))
        }
    }
}
