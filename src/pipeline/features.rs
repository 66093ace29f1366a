use polars::prelude::*;

use crate::error::Result;
use crate::pipeline::utility::float_column;

/// Appends `name = numerator / denominator` using IEEE division.
///
/// A zero denominator yields infinity (NaN for `0 / 0`) rather than an
/// error. Either operand missing yields a null cell.
pub fn add_ratio(
    frame: DataFrame,
    numerator: &str,
    denominator: &str,
    name: &str,
) -> Result<DataFrame> {
    float_column(&frame, numerator)?;
    float_column(&frame, denominator)?;

    let ratio = col(numerator).cast(DataType::Float64) / col(denominator).cast(DataType::Float64);
    Ok(frame.lazy().with_column(ratio.alias(name)).collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdaError;

    fn grouped(cases: &[f64], deaths: &[f64]) -> DataFrame {
        df!("total_cases" => cases, "total_deaths" => deaths).unwrap()
    }

    fn ratios(frame: &DataFrame) -> Vec<Option<f64>> {
        frame
            .column("ratio")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_ratio_value() {
        let frame = grouped(&[1000.0], &[50.0]);
        let frame = add_ratio(frame, "total_deaths", "total_cases", "ratio").unwrap();
        assert_eq!(ratios(&frame), vec![Some(0.05)]);
        assert_eq!(frame.column("ratio").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_zero_denominator_is_not_an_error() {
        let frame = grouped(&[0.0, 0.0], &[10.0, 0.0]);
        let frame = add_ratio(frame, "total_deaths", "total_cases", "ratio").unwrap();
        let values = ratios(&frame);
        assert_eq!(values[0], Some(f64::INFINITY));
        assert!(values[1].is_some_and(f64::is_nan));
    }

    #[test]
    fn test_integer_operands_use_float_division() {
        let frame = df!("total_cases" => [4i64], "total_deaths" => [1i64]).unwrap();
        let frame = add_ratio(frame, "total_deaths", "total_cases", "ratio").unwrap();
        assert_eq!(ratios(&frame), vec![Some(0.25)]);
    }

    #[test]
    fn test_missing_operand_gives_missing() {
        let frame = df!(
            "total_cases" => [None::<f64>],
            "total_deaths" => [Some(3.0)]
        )
        .unwrap();
        let frame = add_ratio(frame, "total_deaths", "total_cases", "ratio").unwrap();
        assert_eq!(ratios(&frame), vec![None]);
    }

    #[test]
    fn test_text_operand_rejected() {
        let frame = df!("continent" => ["Asia"], "total_cases" => [1.0]).unwrap();
        let result = add_ratio(frame, "continent", "total_cases", "ratio");
        assert!(matches!(result, Err(EdaError::SchemaMismatch(_))));
    }
}
