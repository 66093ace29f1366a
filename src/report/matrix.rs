use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use polars::prelude::DataFrame;

use super::distribution::{Bin, histogram};
use super::{Chart, finite_cells, padded_range};
use crate::error::{EdaError, Result};
use crate::pipeline::utility::numeric_columns;

const CELL_SIZE: u32 = 160;

/// Pairwise scatter plots of every numeric column, with a histogram of each
/// column on the diagonal.
pub struct ScatterMatrix {
    title: String,
}

impl ScatterMatrix {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }
}

enum Cell {
    Histogram(Vec<Bin>),
    Points(Vec<(f64, f64)>),
}

impl Chart for ScatterMatrix {
    fn name(&self) -> String {
        "scatter_matrix".to_string()
    }

    fn render(&self, frame: &DataFrame, path: &Path) -> Result<()> {
        let columns = numeric_columns(frame);
        let n = columns.len();

        // Finite cells per column, aligned by row.
        let series = columns
            .iter()
            .map(|name| finite_cells(frame, name))
            .collect::<Result<Vec<_>>>()?;

        let side = (n as u32 * CELL_SIZE).max(900);
        let root = SVGBackend::new(path, (side, side)).into_drawing_area();
        root.fill(&WHITE).map_err(EdaError::render)?;
        let root = root
            .titled(&self.title, ("sans-serif", 28))
            .map_err(EdaError::render)?;

        if n > 0 {
            for (idx, area) in root.split_evenly((n, n)).iter().enumerate() {
                let (row, col) = (idx / n, idx % n);
                let cell = if row == col {
                    let values: Vec<f64> = series[col].iter().flatten().copied().collect();
                    Cell::Histogram(histogram(&values))
                } else {
                    Cell::Points(
                        series[col]
                            .iter()
                            .zip(&series[row])
                            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                            .collect(),
                    )
                };
                let x_desc = (row + 1 == n).then_some(columns[col].as_str());
                let y_desc = (col == 0).then_some(columns[row].as_str());
                draw_cell(area, &cell, x_desc, y_desc)?;
            }
        }

        root.present().map_err(EdaError::render)?;
        Ok(())
    }
}

/// Axis descriptions are only drawn on the bottom row and left column.
fn draw_cell(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    cell: &Cell,
    x_desc: Option<&str>,
    y_desc: Option<&str>,
) -> Result<()> {
    let (x_range, y_range) = match cell {
        Cell::Histogram(bins) => {
            let xs: Vec<f64> = bins.iter().flat_map(|b| [b.lo, b.hi]).collect();
            let top = bins.iter().map(|b| b.count as f64).fold(1.0, f64::max) * 1.1;
            (padded_range(&xs), 0.0..top)
        }
        Cell::Points(points) => {
            let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
            let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
            (padded_range(&xs), padded_range(&ys))
        }
    };

    let mut builder = ChartBuilder::on(area);
    builder.margin(4);
    if x_desc.is_some() {
        builder.x_label_area_size(36);
    }
    if y_desc.is_some() {
        builder.y_label_area_size(56);
    }
    let mut chart = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(EdaError::render)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh().x_labels(3).y_labels(3);
        if let Some(desc) = x_desc {
            mesh.x_desc(desc);
        }
        if let Some(desc) = y_desc {
            mesh.y_desc(desc);
        }
        mesh.draw().map_err(EdaError::render)?;
    }

    match cell {
        Cell::Histogram(bins) => {
            chart
                .draw_series(bins.iter().map(|b| {
                    Rectangle::new(
                        [(b.lo, 0.0), (b.hi, b.count as f64)],
                        BLUE.mix(0.5).filled(),
                    )
                }))
                .map_err(EdaError::render)?;
        }
        Cell::Points(points) => {
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 2, BLUE.filled())),
                )
                .map_err(EdaError::render)?;
        }
    }
    Ok(())
}
