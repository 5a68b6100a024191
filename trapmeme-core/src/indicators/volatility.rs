//! Close-to-close volatility.
//!
//! Sample standard deviation (n - 1 denominator) of simple percentage
//! changes, scaled to percent. Needs at least three closes.

/// Simple returns `(c[i] - c[i-1]) / c[i-1]`, one shorter than the input.
pub fn pct_change(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Sample standard deviation. `None` for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (n - 1) as f64).sqrt())
}

/// Percent volatility of a close series: `stddev(pct_change) × 100`.
pub fn volatility_pct(closes: &[f64]) -> Option<f64> {
    sample_std_dev(&pct_change(closes)).map(|sd| sd * 100.0)
}
