use plotters::prelude::*;
use std::path::Path;

use polars::prelude::DataFrame;

use super::{Chart, finite_cells, padded_range};
use crate::error::{EdaError, Result};

/// Scatter plot of two numeric columns.
pub struct Scatter {
    x: String,
    y: String,
    title: String,
    x_label: String,
    y_label: String,
}

impl Scatter {
    pub fn new(x: &str, y: &str, title: &str, (x_label, y_label): (&str, &str)) -> Self {
        Self {
            x: x.to_string(),
            y: y.to_string(),
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
        }
    }
}

/// Rows where both cells are finite numbers.
pub(super) fn finite_pairs(frame: &DataFrame, x: &str, y: &str) -> Result<Vec<(f64, f64)>> {
    let xs = finite_cells(frame, x)?;
    let ys = finite_cells(frame, y)?;
    Ok(xs
        .into_iter()
        .zip(ys)
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect())
}

impl Chart for Scatter {
    fn name(&self) -> String {
        format!("{}_vs_{}", self.x, self.y)
    }

    fn render(&self, frame: &DataFrame, path: &Path) -> Result<()> {
        let points = finite_pairs(frame, &self.x, &self.y)?;
        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.1).collect();

        let root = SVGBackend::new(path, (900, 600)).into_drawing_area();
        root.fill(&WHITE).map_err(EdaError::render)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(padded_range(&xs), padded_range(&ys))
            .map_err(EdaError::render)?;

        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()
            .map_err(EdaError::render)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
            )
            .map_err(EdaError::render)?;

        root.present().map_err(EdaError::render)?;
        Ok(())
    }
}
