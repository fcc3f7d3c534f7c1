use serde::Serialize;

use crate::data::RecordTable;
use crate::error::DashResult;

/// Points of the two-feature scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub x_column: String,
    pub y_column: String,
    /// One `(x, y)` per row, row order preserved; missing cells are `NaN`.
    pub points: Vec<(f64, f64)>,
}

/// Pair two numeric columns row by row, without aggregation.
pub fn feature_pairs(table: &RecordTable, feature_x: &str, feature_y: &str) -> DashResult<ScatterSeries> {
    let xs = table.numeric_values(feature_x)?;
    let ys = table.numeric_values(feature_y)?;
    Ok(ScatterSeries {
        x_column: feature_x.to_string(),
        y_column: feature_y.to_string(),
        points: xs.into_iter().zip(ys).collect(),
    })
}
