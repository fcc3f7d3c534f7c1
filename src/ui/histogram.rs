// ---------------------------------------------------------------------------
// Automatic histogram binning
// ---------------------------------------------------------------------------

/// One histogram bar covering `[start, end)`; the last bin is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Bin the finite values with Sturges' bin count and a rounded
/// (1, 2 or 5 × 10ⁿ) bin width. `NaN` and infinities are ignored.
pub fn auto_bins(values: &[f64]) -> Vec<Bin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max - min <= f64::EPSILON * max.abs().max(1.0) {
        return vec![Bin {
            start: min - 0.5,
            end: min + 0.5,
            count: finite.len(),
        }];
    }

    let sturges = (finite.len() as f64).log2().ceil() + 1.0;
    let width = nice_width((max - min) / sturges);
    let start = (min / width).floor() * width;
    let n_bins = (((max - start) / width).floor() as usize + 1).max(1);

    let mut counts = vec![0usize; n_bins];
    for v in &finite {
        let idx = (((v - start) / width).floor() as usize).min(n_bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: start + i as f64 * width,
            end: start + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

fn nice_width(raw: f64) -> f64 {
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_integer_column() {
        let bins = auto_bins(&[1.0, 2.0, 2.0, 3.0]);
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 2, 1]);
        assert_eq!(bins[0].start, 1.0);
        assert_eq!(bins[0].width(), 1.0);
    }

    #[test]
    fn every_finite_value_lands_once() {
        let values: Vec<f64> = (0..1000).map(|i| ((i * 37) % 101) as f64 * 0.73 - 12.0).collect();
        let mut with_gaps = values.clone();
        with_gaps.push(f64::NAN);
        with_gaps.push(f64::INFINITY);

        let bins = auto_bins(&with_gaps);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(bins[0].start <= min);
        assert!(bins.last().unwrap().end >= max);
    }

    #[test]
    fn constant_and_empty_columns() {
        let bins = auto_bins(&[4.0, 4.0, 4.0]);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[0].center(), 4.0);

        assert!(auto_bins(&[]).is_empty());
        assert!(auto_bins(&[f64::NAN]).is_empty());
    }

    #[test]
    fn widths_are_rounded() {
        assert_eq!(nice_width(0.3), 0.5);
        assert_eq!(nice_width(7.0), 10.0);
        assert_eq!(nice_width(1500.0), 2000.0);
    }
}
