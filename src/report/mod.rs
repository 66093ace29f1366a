//! Chart rendering for the grouped summary.
//!
//! Every chart implements [`Chart`] and is rendered to an SVG file named
//! after it. Non-finite values (undefined ratios) are left out of the plots.

mod bar;
mod distribution;
mod matrix;
mod scatter;

pub use bar::CategoryBar;
pub use distribution::Distribution;
pub use matrix::ScatterMatrix;
pub use scatter::Scatter;

use polars::prelude::DataFrame;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::pipeline::utility::float_column;
use crate::schema::{CONTINENT, GDP_PER_CAPITA, TOTAL_CASES};

pub trait Chart {
    /// File stem of the rendered chart.
    fn name(&self) -> String;

    fn render(&self, frame: &DataFrame, path: &Path) -> Result<()>;
}

/// The four charts drawn from the grouped summary.
pub fn default_charts() -> Vec<Box<dyn Chart>> {
    vec![
        Box::new(Distribution::new(
            GDP_PER_CAPITA,
            "Distribution of GDP per Capita",
            "GDP per Capita",
        )),
        Box::new(Scatter::new(
            TOTAL_CASES,
            GDP_PER_CAPITA,
            "Scatter Plot of Total Cases vs GDP per Capita",
            ("Total Cases", "GDP per Capita"),
        )),
        Box::new(ScatterMatrix::new("Scatter Matrix")),
        Box::new(CategoryBar::new(
            CONTINENT,
            TOTAL_CASES,
            "Bar Plot of Total Cases by Continent",
            ("Continent", "Total Cases"),
        )),
    ]
}

/// Renders every chart into `dir`, overwriting earlier renders.
#[tracing::instrument(skip(frame, charts), fields(dir = %dir.display()))]
pub fn render_all(
    frame: &DataFrame,
    charts: &[Box<dyn Chart>],
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut paths = Vec::with_capacity(charts.len());
    for chart in charts {
        let path = dir.join(format!("{}.svg", chart.name()));
        chart.render(frame, &path)?;
        info!(chart = %chart.name(), path = %path.display(), "Chart rendered");
        paths.push(path);
    }
    Ok(paths)
}

/// Cells of `column` in row order, `None` where null or not finite.
fn finite_cells(frame: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    Ok(float_column(frame, column)?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}

fn finite_values(frame: &DataFrame, column: &str) -> Result<Vec<f64>> {
    Ok(finite_cells(frame, column)?.into_iter().flatten().collect())
}

/// Smallest and largest of `values`, `None` when empty.
fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let lo = values.iter().copied().reduce(f64::min)?;
    let hi = values.iter().copied().reduce(f64::max)?;
    Some((lo, hi))
}

/// Axis range covering `values` with 5% padding on each side.
fn padded_range(values: &[f64]) -> Range<f64> {
    match bounds(values) {
        Some((lo, hi)) if hi > lo => {
            let pad = (hi - lo) * 0.05;
            (lo - pad)..(hi + pad)
        }
        Some((v, _)) => (v - 1.0)..(v + 1.0),
        None => 0.0..1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use std::fs;
    use tempfile::tempdir;

    fn grouped() -> DataFrame {
        df!(
            CONTINENT => ["Africa", "Asia", "Europe", "Oceania"],
            TOTAL_CASES => [4_000_000.0, 43_000_000.0, 38_000_000.0, 0.0],
            GDP_PER_CAPITA => [26_000.0, 116_000.0, 94_000.0, 44_000.0],
            "month" => [12i32, 12, 12, 11],
            "total_deaths_to_total_cases" => [0.025, 0.013, 0.02, f64::INFINITY]
        )
        .unwrap()
    }

    #[test]
    fn test_render_all_writes_four_svgs() {
        let dir = tempdir().unwrap();

        let paths = render_all(&grouped(), &default_charts(), dir.path()).unwrap();

        assert_eq!(paths.len(), 4);
        for path in &paths {
            let content = fs::read_to_string(path).unwrap();
            assert!(content.contains("<svg"), "{} is not SVG", path.display());
        }
        assert!(dir.path().join("scatter_matrix.svg").exists());
    }

    #[test]
    fn test_render_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let plots = dir.path().join("plots");

        render_all(&grouped(), &default_charts(), &plots).unwrap();
        assert!(plots.join("total_cases_by_continent.svg").exists());
    }

    #[test]
    fn test_render_empty_frame() {
        let dir = tempdir().unwrap();

        let empty = grouped().clear();
        let paths = render_all(&empty, &default_charts(), dir.path()).unwrap();
        assert_eq!(paths.len(), 4);
    }

    #[test]
    fn test_missing_column_fails_render() {
        let dir = tempdir().unwrap();
        let frame = df!("x" => [1.0]).unwrap();
        let charts: Vec<Box<dyn Chart>> =
            vec![Box::new(Distribution::new("gdp_per_capita", "t", "x"))];
        assert!(render_all(&frame, &charts, dir.path()).is_err());
    }

    #[test]
    fn test_finite_cells_keep_row_alignment() {
        let cells = finite_cells(&grouped(), "total_deaths_to_total_cases").unwrap();
        assert_eq!(cells, vec![Some(0.025), Some(0.013), Some(0.02), None]);
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(&[0.0, 10.0]), -0.5..10.5);
        assert_eq!(padded_range(&[3.0]), 2.0..4.0);
        assert_eq!(padded_range(&[]), 0.0..1.0);
    }
}
