use plotters::prelude::*;
use plotters::style::FontTransform;
use std::path::Path;

use polars::prelude::{DataFrame, DataType};

use super::{Chart, finite_cells};
use crate::error::{EdaError, Result};
use crate::pipeline::utility::require_column;

/// One bar per category value, category labels rotated.
pub struct CategoryBar {
    category: String,
    value: String,
    title: String,
    x_label: String,
    y_label: String,
}

impl CategoryBar {
    pub fn new(category: &str, value: &str, title: &str, (x_label, y_label): (&str, &str)) -> Self {
        Self {
            category: category.to_string(),
            value: value.to_string(),
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
        }
    }
}

impl Chart for CategoryBar {
    fn name(&self) -> String {
        format!("{}_by_{}", self.value, self.category)
    }

    fn render(&self, frame: &DataFrame, path: &Path) -> Result<()> {
        let categories = require_column(frame, &self.category)?.cast(&DataType::String)?;
        let labels: Vec<String> = categories
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect();
        let heights = finite_cells(frame, &self.value)?;

        let top = heights.iter().flatten().copied().fold(0.0, f64::max);
        let bottom = heights.iter().flatten().copied().fold(0.0, f64::min);
        let top = if top > 0.0 { top * 1.1 } else { 1.0 };
        let slots = labels.len().max(1);

        let root = SVGBackend::new(path, (900, 650)).into_drawing_area();
        root.fill(&WHITE).map_err(EdaError::render)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(110)
            .y_label_area_size(80)
            .build_cartesian_2d((0..slots as i32).into_segmented(), bottom..top)
            .map_err(EdaError::render)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .x_label_style(
                ("sans-serif", 14)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()
            .map_err(EdaError::render)?;

        chart
            .draw_series(
                heights
                    .iter()
                    .enumerate()
                    .filter_map(|(i, h)| h.map(|h| (i as i32, h)))
                    .map(|(i, h)| {
                        let mut bar = Rectangle::new(
                            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), h)],
                            BLUE.filled(),
                        );
                        bar.set_margin(0, 0, 6, 6);
                        bar
                    }),
            )
            .map_err(EdaError::render)?;

        root.present().map_err(EdaError::render)?;
        Ok(())
    }
}
