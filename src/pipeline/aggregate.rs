use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::pipeline::utility::{nan_to_null, require_column};

/// Groups rows by `category` and reduces every other column with max.
///
/// The result holds one row per distinct present category value, in
/// ascending category order, with the category as its first column. Nulls
/// and NaN never win; a column with no present value in a group stays null.
#[tracing::instrument(skip(frame), fields(rows = frame.height()))]
pub fn group_max(frame: &DataFrame, category: &str) -> Result<DataFrame> {
    require_column(frame, category)?;

    let reductions: Vec<Expr> = frame
        .get_column_names()
        .into_iter()
        .filter(|name| name.as_str() != category)
        .map(|name| col(name.as_str()).max())
        .collect();

    let grouped = nan_to_null(frame.clone())?
        .lazy()
        .filter(col(category).is_not_null())
        .group_by([col(category)])
        .agg(reductions)
        .sort([category], Default::default())
        .collect()?;

    info!(groups = grouped.height(), category, "Rows grouped by max");
    Ok(grouped)
}
