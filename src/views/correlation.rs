use serde::Serialize;

use crate::data::RecordTable;
use crate::error::{DashError, DashResult};

/// Square Pearson correlation matrix over the numeric columns.
///
/// `values[i][j]` correlates `columns[i]` with `columns[j]`. The matrix is
/// symmetric with an exact `1.0` diagonal; undefined entries (a constant
/// column, fewer than two complete pairs) are `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == col)?;
        Some(self.values[i][j])
    }
}

/// Correlate every pair of numeric columns.
///
/// Fails with [`DashError::InsufficientData`] when the table has fewer than
/// two numeric columns or fewer than two rows.
pub fn correlation_matrix(table: &RecordTable) -> DashResult<CorrelationMatrix> {
    let columns = table.numeric_columns().to_vec();
    if columns.len() < 2 {
        return Err(DashError::InsufficientData(format!(
            "correlation needs at least 2 numeric columns, found {}",
            columns.len()
        )));
    }
    if table.len() < 2 {
        return Err(DashError::InsufficientData(format!(
            "correlation needs at least 2 rows, found {}",
            table.len()
        )));
    }

    let data = columns
        .iter()
        .map(|c| table.numeric_values(c))
        .collect::<DashResult<Vec<_>>>()?;

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&data[i], &data[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix { columns, values })
}

/// Pearson's r over the rows where both values are present.
///
/// Returns `NaN` when fewer than two complete pairs remain or either side
/// has zero variance. The result is clamped to `[-1, 1]`.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(&a, &b)| (a, b))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    // Rounding in the mean leaves a tiny residual variance for constant
    // non-dyadic columns, so compare the values themselves.
    let (x0, y0) = pairs[0];
    if pairs.iter().all(|p| p.0 == x0) || pairs.iter().all(|p| p.1 == y0) {
        return f64::NAN;
    }

    let count = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / count;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / count;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().map(|&v| Value::Integer(v)).collect()
    }

    #[test]
    fn negated_column_is_minus_one() {
        let table = RecordTable::from_columns(vec![
            ("a", ints(&[1, 2, 3])),
            ("b", ints(&[-1, -2, -3])),
        ]);
        let m = correlation_matrix(&table).unwrap();
        assert_eq!(m.get("a", "b"), Some(-1.0));
        assert_eq!(m.get("b", "a"), Some(-1.0));
        assert_eq!(m.get("a", "a"), Some(1.0));
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let table = RecordTable::from_columns(vec![
            ("Artist", vec!["A".into(), "B".into(), "C".into(), "D".into(), "E".into()]),
            ("Danceability", vec![0.8.into(), 0.6.into(), 0.7.into(), 0.2.into(), 0.5.into()]),
            ("Energy", vec![0.9.into(), 0.4.into(), 0.6.into(), 0.1.into(), 0.7.into()]),
            ("Tempo", ints(&[120, 95, 128, 70, 101])),
        ]);
        let m = correlation_matrix(&table).unwrap();
        assert_eq!(m.columns, vec!["Danceability", "Energy", "Tempo"]);
        for i in 0..m.len() {
            assert_eq!(m.values[i][i], 1.0);
            for j in 0..m.len() {
                assert_eq!(m.values[i][j].to_bits(), m.values[j][i].to_bits());
                assert!((-1.0..=1.0).contains(&m.values[i][j]));
            }
        }
    }

    #[test]
    fn constant_column_yields_nan() {
        let table = RecordTable::from_columns(vec![
            ("a", ints(&[1, 2, 3])),
            ("flat", ints(&[4, 4, 4])),
        ]);
        let m = correlation_matrix(&table).unwrap();
        assert!(m.get("a", "flat").unwrap().is_nan());
        assert_eq!(m.get("flat", "flat"), Some(1.0));
    }

    #[test]
    fn constant_fractional_column_yields_nan() {
        let table = RecordTable::from_columns(vec![
            ("a", ints(&[1, 2, 3])),
            ("flat", vec![Value::Float(0.1); 3]),
        ]);
        let m = correlation_matrix(&table).unwrap();
        assert!(m.get("a", "flat").unwrap().is_nan());
        assert!(m.get("flat", "a").unwrap().is_nan());

        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert!(pearson(&x, &[0.7; 7]).is_nan());
        assert!(pearson(&[0.3; 7], &x).is_nan());
    }

    #[test]
    fn missing_cells_are_dropped_pairwise() {
        let x = [1.0, 2.0, f64::NAN, 4.0];
        let y = [2.0, 4.0, 100.0, 8.0];
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
        assert!(pearson(&[1.0, f64::NAN], &[f64::NAN, 2.0]).is_nan());
    }

    #[test]
    fn too_little_data_is_an_error() {
        let one_column = RecordTable::from_columns(vec![("a", ints(&[1, 2, 3]))]);
        assert!(matches!(
            correlation_matrix(&one_column),
            Err(DashError::InsufficientData(_))
        ));

        let one_row = RecordTable::from_columns(vec![("a", ints(&[1])), ("b", ints(&[2]))]);
        assert!(matches!(
            correlation_matrix(&one_row),
            Err(DashError::InsufficientData(_))
        ));
    }
}
