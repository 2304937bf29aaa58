//! Descriptive statistics over a single numeric column.

/// Descriptive statistics for one column of values.
///
/// Every statistic except `count` is `None` when the column has no values;
/// `std` is also `None` for a single value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Describe {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
    pub sum: Option<f64>,
}

impl Describe {
    /// Computes statistics over the given values. Order does not matter.
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let sum: f64 = sorted.iter().sum();
        let mean = sum / count as f64;

        Self {
            count,
            mean: Some(mean),
            std: sample_std(&sorted, mean),
            min: sorted.first().copied(),
            p25: percentile(&sorted, 0.25),
            p50: percentile(&sorted, 0.5),
            p75: percentile(&sorted, 0.75),
            max: sorted.last().copied(),
            sum: Some(sum),
        }
    }
}

impl Describe {
    /// Returns true if any statistic left the finite range, which only
    /// happens when sums or spreads of finite inputs overflow.
    pub fn overflowed(&self) -> bool {
        [
            self.mean, self.std, self.min, self.p25, self.p50, self.p75, self.max, self.sum,
        ]
        .iter()
        .flatten()
        .any(|v| !v.is_finite())
    }
}

/// Sample standard deviation (denominator n - 1).
fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((squares / (n - 1) as f64).sqrt())
}

/// Linearly interpolated percentile of an ascending slice.
///
/// `p` is in `[0, 1]`; the result sits at fractional rank `p * (n - 1)`.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = p.clamp(0.0, 1.0) * last as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let fraction = rank - lo as f64;

    let (low, high) = (sorted[lo], sorted[hi]);
    Some(low + (high - low) * fraction)
}
