use plotters::prelude::*;
use std::f64::consts::PI;
use std::path::Path;

use polars::prelude::{ChunkVar, DataFrame, Float64Chunked, NewChunkedArray};

use super::{Chart, bounds, finite_values, padded_range};
use crate::error::{EdaError, Result};

const CURVE_POINTS: usize = 200;

/// Histogram of one numeric column overlaid with a kernel density curve.
pub struct Distribution {
    column: String,
    title: String,
    x_label: String,
}

impl Distribution {
    pub fn new(column: &str, title: &str, x_label: &str) -> Self {
        Self {
            column: column.to_string(),
            title: title.to_string(),
            x_label: x_label.to_string(),
        }
    }
}

impl Chart for Distribution {
    fn name(&self) -> String {
        format!("{}_distribution", self.column)
    }

    fn render(&self, frame: &DataFrame, path: &Path) -> Result<()> {
        let values = finite_values(frame, &self.column)?;
        let bins = histogram(&values);
        let bin_width = bins.first().map(|b| b.hi - b.lo).unwrap_or(1.0);
        let curve = kde_curve(&values, values.len() as f64 * bin_width).unwrap_or_default();

        let xs: Vec<f64> = bins
            .iter()
            .flat_map(|b| [b.lo, b.hi])
            .chain(curve.iter().map(|p| p.0))
            .collect();
        let y_top = bins
            .iter()
            .map(|b| b.count as f64)
            .chain(curve.iter().map(|p| p.1))
            .fold(1.0, f64::max)
            * 1.1;

        let root = SVGBackend::new(path, (900, 600)).into_drawing_area();
        root.fill(&WHITE).map_err(EdaError::render)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(padded_range(&xs), 0f64..y_top)
            .map_err(EdaError::render)?;

        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc("Count")
            .draw()
            .map_err(EdaError::render)?;

        chart
            .draw_series(bins.iter().map(|b| {
                Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], BLUE.mix(0.4).filled())
            }))
            .map_err(EdaError::render)?;

        if !curve.is_empty() {
            chart
                .draw_series(LineSeries::new(curve, BLUE.stroke_width(2)))
                .map_err(EdaError::render)?;
        }

        root.present().map_err(EdaError::render)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Equal-width bins, `ceil(log2(n)) + 1` of them. The last bin is closed.
pub(super) fn histogram(values: &[f64]) -> Vec<Bin> {
    let Some((lo, hi)) = bounds(values) else {
        return Vec::new();
    };
    if hi == lo {
        return vec![Bin {
            lo: lo - 0.5,
            hi: hi + 0.5,
            count: values.len(),
        }];
    }

    let k = (values.len() as f64).log2().ceil() as usize + 1;
    let width = (hi - lo) / k as f64;
    let mut counts = vec![0usize; k];
    for v in values {
        let i = (((v - lo) / width) as usize).min(k - 1);
        counts[i] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            lo: lo + i as f64 * width,
            hi: lo + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Gaussian kernel density estimate with Scott's bandwidth, multiplied by
/// `scale` so it overlays a count histogram. `None` with fewer than two
/// distinct values.
pub(super) fn kde_curve(values: &[f64], scale: f64) -> Option<Vec<(f64, f64)>> {
    let n = values.len() as f64;
    let sd = Float64Chunked::from_slice("kde".into(), values).std(1)?;
    if sd == 0.0 || !sd.is_finite() {
        return None;
    }
    let bw = sd * n.powf(-0.2);
    let (lo, hi) = bounds(values)?;
    let (lo, hi) = (lo - 3.0 * bw, hi + 3.0 * bw);
    let norm = scale / (n * bw * (2.0 * PI).sqrt());

    let curve = (0..=CURVE_POINTS)
        .map(|i| {
            let x = lo + (hi - lo) * i as f64 / CURVE_POINTS as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bw).powi(2)).exp())
                .sum();
            (x, density * norm)
        })
        .collect();
    Some(curve)
}
