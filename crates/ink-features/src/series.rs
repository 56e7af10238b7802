//! Shared numeric policy for derived sequences
//!
//! Index 0 has no predecessor, so every differencing or ratio helper writes
//! an explicit edge sentinel there. Division is plain IEEE division: a zero
//! denominator yields ±inf or NaN and is passed through untouched.

/// Edge sentinel written at index 0 of differences and ratios
pub const EDGE_SENTINEL: f64 = 0.0;

/// Backward difference `v[i] - v[i-1]` with `first` at index 0
pub fn difference(values: &[f64], first: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(first);
    out.extend(values.windows(2).map(|pair| pair[1] - pair[0]));
    out
}

/// Absolute backward difference, sentinel at index 0
pub fn abs_difference(values: &[f64]) -> Vec<f64> {
    let mut out = difference(values, EDGE_SENTINEL);
    for value in out.iter_mut().skip(1) {
        *value = value.abs();
    }
    out
}

/// Planar step length `sqrt(dx² + dy²)`, sentinel at index 0
pub fn euclidean_step(x: &[f64], y: &[f64]) -> Vec<f64> {
    debug_assert_eq!(x.len(), y.len());
    let mut out = Vec::with_capacity(x.len());
    if x.is_empty() {
        return out;
    }
    out.push(EDGE_SENTINEL);
    out.extend(
        x.windows(2)
            .zip(y.windows(2))
            .map(|(xs, ys)| (xs[1] - xs[0]).hypot(ys[1] - ys[0])),
    );
    out
}

/// Element-wise `numerator[i] / denominator[i]` for `i >= 1`, sentinel at 0
pub fn ratio(numerator: &[f64], denominator: &[f64]) -> Vec<f64> {
    debug_assert_eq!(numerator.len(), denominator.len());
    let mut out = Vec::with_capacity(numerator.len());
    if numerator.is_empty() {
        return out;
    }
    out.push(EDGE_SENTINEL);
    out.extend(
        numerator
            .iter()
            .zip(denominator)
            .skip(1)
            .map(|(n, d)| n / d),
    );
    out
}

/// Ratio of consecutive differences `(a[i] - a[i-1]) / (b[i] - b[i-1])`
pub fn difference_ratio(a: &[f64], b: &[f64]) -> Vec<f64> {
    ratio(&difference(a, EDGE_SENTINEL), &difference(b, EDGE_SENTINEL))
}

/// Centred moving average with "same"-length output
///
/// Convolution with a box kernel of `window` taps, each `1 / window`.
/// Output index `i` is the full-convolution index `i + (window - 1) / 2`;
/// samples outside the sequence contribute zero. The output always has
/// `values.len()` elements, including when `window` exceeds it.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    if n == 0 || window == 0 {
        return vec![0.0; n];
    }

    let lead = (window - 1) / 2;
    let scale = 1.0 / window as f64;

    // Direct summation: a running prefix sum would smear a single inf/NaN
    // into every later window.
    (0..n)
        .map(|i| {
            // Inclusive range [i + lead + 1 - window, i + lead], clipped
            let hi = (i + lead).min(n - 1);
            let lo = (i + lead + 1).saturating_sub(window);
            values[lo..=hi].iter().map(|v| v * scale).sum()
        })
        .collect()
}
