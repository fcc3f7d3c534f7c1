use serde::Serialize;

use crate::data::RecordTable;
use crate::error::DashResult;

/// The raw values behind a histogram. Binning belongs to the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub column: String,
    /// Row order, missing cells as `NaN`.
    pub values: Vec<f64>,
}

/// Pass one numeric column through unchanged.
pub fn distribution(table: &RecordTable, column: &str) -> DashResult<Distribution> {
    Ok(Distribution {
        column: column.to_string(),
        values: table.numeric_values(column)?,
    })
}
