use polars::prelude::*;

use crate::error::{EdaError, Result};

/// Integer and floating point dtypes.
pub fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

pub fn is_float(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Looks up `name`, reporting an absent column as a schema mismatch.
pub fn require_column<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Column> {
    frame
        .column(name)
        .map_err(|_| EdaError::missing_column(name))
}

/// Names of the numeric columns, in frame order.
pub fn numeric_columns(frame: &DataFrame) -> Vec<String> {
    frame
        .get_columns()
        .iter()
        .filter(|c| is_numeric(c.dtype()))
        .map(|c| c.name().to_string())
        .collect()
}

/// `name` as `f64` values with NaN read as null.
///
/// # Errors
///
/// [`EdaError::SchemaMismatch`] when the column is absent or not numeric.
pub fn float_column(frame: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = require_column(frame, name)?;
    if !is_numeric(column.dtype()) {
        return Err(EdaError::SchemaMismatch(format!(
            "column '{name}' is {}, expected a numeric column",
            column.dtype()
        )));
    }

    let floats = column.cast(&DataType::Float64)?;
    let values: Float64Chunked = floats
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values.with_name(name.into()))
}

/// Null cells plus NaN cells of a float column.
pub fn undefined_count(column: &Column) -> Result<usize> {
    let nan = if is_float(column.dtype()) {
        let floats = column.cast(&DataType::Float64)?;
        floats
            .f64()?
            .into_iter()
            .flatten()
            .filter(|v| v.is_nan())
            .count()
    } else {
        0
    };
    Ok(column.null_count() + nan)
}

/// Replaces NaN with null in every `f64` column.
pub fn nan_to_null(mut frame: DataFrame) -> Result<DataFrame> {
    let floats: Vec<String> = frame
        .get_columns()
        .iter()
        .filter(|c| c.dtype() == &DataType::Float64)
        .map(|c| c.name().to_string())
        .collect();

    for name in floats {
        let values = float_column(&frame, &name)?;
        frame.replace(&name, values.into_series())?;
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        df!(
            "continent" => [Some("Asia"), None, Some("Europe")],
            "total_cases" => [Some(1.0), Some(f64::NAN), None],
            "population" => [Some(10i64), None, Some(30)]
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_columns_in_order() {
        assert_eq!(numeric_columns(&frame()), vec!["total_cases", "population"]);
    }

    #[test]
    fn test_float_column_reads_nan_as_null() {
        let values = float_column(&frame(), "total_cases").unwrap();
        assert_eq!(values.null_count(), 2);
        assert_eq!(values.get(0), Some(1.0));

        let cast = float_column(&frame(), "population").unwrap();
        assert_eq!(cast.get(2), Some(30.0));
    }

    #[test]
    fn test_float_column_rejects_text_and_absent() {
        assert!(matches!(
            float_column(&frame(), "continent"),
            Err(EdaError::SchemaMismatch(_))
        ));
        assert!(matches!(
            float_column(&frame(), "region"),
            Err(EdaError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_undefined_count_includes_nan() {
        let frame = frame();
        assert_eq!(undefined_count(frame.column("total_cases").unwrap()).unwrap(), 2);
        assert_eq!(undefined_count(frame.column("continent").unwrap()).unwrap(), 1);
    }

    #[test]
    fn test_nan_to_null() {
        let frame = nan_to_null(frame()).unwrap();
        let cases = frame.column("total_cases").unwrap();
        assert_eq!(cases.null_count(), 2);
        assert_eq!(undefined_count(cases).unwrap(), 2);
    }
}
