use serde::Serialize;

use crate::data::{RecordTable, Value};
use crate::error::DashResult;

/// One bar of the grouped comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTotal {
    pub artist: Value,
    pub metric: String,
    pub value: f64,
}

/// Sum stream, like and view counts for two artists, in long form.
///
/// Artists are grouped in order of first appearance in the table. The
/// output is metric-major: every artist's stream total, then likes, then
/// views. An artist with no rows in the table contributes nothing, and
/// passing the same artist twice yields a single group. Missing and `NaN`
/// cells are skipped in the sums.
pub fn compare_artists(
    table: &RecordTable,
    artist1: &Value,
    artist2: &Value,
) -> DashResult<Vec<MetricTotal>> {
    let roles = table.roles();
    table.require_column(&roles.artist)?;
    let metrics = roles.comparison_metrics();
    for metric in metrics {
        table.require_numeric(metric)?;
    }

    let mut groups: Vec<(&Value, [f64; 3])> = Vec::new();
    for row in table.rows() {
        let artist = row.get(&roles.artist);
        if artist != artist1 && artist != artist2 {
            continue;
        }
        let idx = match groups.iter().position(|(a, _)| *a == artist) {
            Some(idx) => idx,
            None => {
                groups.push((artist, [0.0; 3]));
                groups.len() - 1
            }
        };
        let sums = &mut groups[idx].1;
        for (sum, metric) in sums.iter_mut().zip(metrics) {
            if let Some(v) = row.get(metric).as_f64().filter(|v| !v.is_nan()) {
                *sum += v;
            }
        }
    }

    Ok(metrics
        .iter()
        .enumerate()
        .flat_map(|(m, metric)| {
            groups.iter().map(move |(artist, sums)| MetricTotal {
                artist: (*artist).clone(),
                metric: metric.to_string(),
                value: sums[m],
            })
        })
        .collect())
}
