//! Duplicate removal and missing-value handling.

use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::pipeline::utility::{is_float, is_numeric, require_column, undefined_count};

/// Removes exact duplicate rows, keeping the first occurrence. Nulls compare
/// equal to each other.
pub fn drop_duplicates(frame: DataFrame) -> Result<DataFrame> {
    Ok(frame
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?)
}

/// Drops every row whose `column` cell is null.
pub fn drop_missing(frame: DataFrame, column: &str) -> Result<DataFrame> {
    require_column(&frame, column)?;
    Ok(frame.lazy().filter(col(column).is_not_null()).collect()?)
}

/// Replaces every null (and every NaN of a float column) with the column's
/// neutral default: `0` for numbers, `"0"` for text. Other dtypes are left
/// as they are.
pub fn fill_missing(frame: DataFrame) -> Result<DataFrame> {
    let fills: Vec<Expr> = frame
        .get_columns()
        .iter()
        .filter_map(|c| neutral_fill(c.name().as_str(), c.dtype()))
        .collect();

    if fills.is_empty() {
        return Ok(frame);
    }
    Ok(frame.lazy().with_columns(fills).collect()?)
}

fn neutral_fill(name: &str, dtype: &DataType) -> Option<Expr> {
    match dtype {
        dt if is_float(dt) => Some(col(name).fill_nan(lit(0.0)).fill_null(lit(0.0))),
        dt if is_numeric(dt) => Some(col(name).fill_null(lit(0))),
        DataType::String => Some(col(name).fill_null(lit("0"))),
        _ => None,
    }
}

/// Runs the three cleaning steps in order.
///
/// Rows that only differed by a missing cell versus an explicit default
/// become identical once filled, so duplicates are removed a second time.
/// Applying `clean` to its own output returns the same frame.
#[tracing::instrument(skip(frame), fields(rows = frame.height()))]
pub fn clean(frame: DataFrame, category: &str) -> Result<DataFrame> {
    let before = frame.height();
    let frame = drop_duplicates(frame)?;
    let deduplicated = frame.height();

    let frame = drop_missing(frame, category)?;
    let kept = frame.height();

    let filled_cells = frame
        .get_columns()
        .iter()
        .map(undefined_count)
        .sum::<Result<usize>>()?;
    let frame = drop_duplicates(fill_missing(frame)?)?;

    info!(
        duplicates = before - deduplicated + (kept - frame.height()),
        missing_category = deduplicated - kept,
        filled_cells,
        rows = frame.height(),
        "Dataset cleaned"
    );
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirty() -> DataFrame {
        df!(
            "continent" => [Some("Asia"), Some("Asia"), None, Some("Europe"), Some("Europe")],
            "location" => [Some("India"), Some("India"), Some("World"), None, None],
            "total_cases" => [Some(10.0), Some(10.0), Some(99.0), None, None]
        )
        .unwrap()
    }

    fn text(frame: &DataFrame, column: &str, row: usize) -> Option<String> {
        frame
            .column(column)
            .unwrap()
            .str()
            .unwrap()
            .get(row)
            .map(str::to_string)
    }

    #[test]
    fn test_drop_duplicates_keeps_first() {
        let frame = drop_duplicates(dirty()).unwrap();
        assert_eq!(frame.height(), 3);
        assert_eq!(text(&frame, "location", 0).as_deref(), Some("India"));
        assert_eq!(text(&frame, "continent", 1), None);
    }

    #[test]
    fn test_clean_removes_missing_category_and_fills() {
        let frame = clean(dirty(), "continent").unwrap();
        assert_eq!(frame.height(), 2);
        for column in frame.get_columns() {
            assert_eq!(undefined_count(column).unwrap(), 0, "{}", column.name());
        }
        assert_eq!(text(&frame, "location", 1).as_deref(), Some("0"));
        assert_eq!(
            frame.column("total_cases").unwrap().f64().unwrap().get(1),
            Some(0.0)
        );
    }

    #[test]
    fn test_clean_is_idempotent() {
        let once = clean(dirty(), "continent").unwrap();
        let twice = clean(once.clone(), "continent").unwrap();
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn test_no_duplicates_after_clean() {
        let frame = clean(dirty(), "continent").unwrap();
        let unique = drop_duplicates(frame.clone()).unwrap();
        assert_eq!(unique.height(), frame.height());
    }

    #[test]
    fn test_rows_equal_after_fill_are_collapsed() {
        let frame = df!(
            "continent" => ["Asia", "Asia"],
            "total_cases" => [None, Some(0.0)]
        )
        .unwrap();
        let cleaned = clean(frame, "continent").unwrap();
        assert_eq!(cleaned.height(), 1);
        assert!(clean(cleaned.clone(), "continent")
            .unwrap()
            .equals_missing(&cleaned));
    }

    #[test]
    fn test_nan_cells_are_filled() {
        let frame = df!(
            "continent" => ["Asia"],
            "location" => ["India"],
            "total_cases" => [f64::NAN],
            "total_deaths" => [50.0],
            "gdp_per_capita" => [f64::NAN]
        )
        .unwrap();
        let cleaned = clean(frame, "continent").unwrap();

        for column in cleaned.get_columns() {
            assert_eq!(undefined_count(column).unwrap(), 0, "{}", column.name());
        }
        assert_eq!(
            cleaned.column("gdp_per_capita").unwrap().f64().unwrap().get(0),
            Some(0.0)
        );
    }

    #[test]
    fn test_integer_column_filled_with_zero() {
        let frame = df!(
            "continent" => ["Asia", "Europe"],
            "population" => [Some(5i64), None]
        )
        .unwrap();
        let cleaned = clean(frame, "continent").unwrap();
        assert_eq!(cleaned.column("population").unwrap().null_count(), 0);
        assert_eq!(
            cleaned
                .column("population")
                .unwrap()
                .cast(&DataType::Int64)
                .unwrap()
                .i64()
                .unwrap()
                .get(1),
            Some(0)
        );
    }

    #[test]
    fn test_unknown_category_column() {
        assert!(clean(dirty(), "region").is_err());
    }
}
