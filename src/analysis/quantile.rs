/// Sort the finite values of a sample in ascending order.
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// `p`-th quantile of **pre-sorted** data, linear interpolation between
/// order statistics (R-7).
///
/// Returns `None` for an empty sample or `p` outside `[0, 1]`. Equal
/// neighbours yield their exact value.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return None;
    }

    let h = (n - 1) as f64 * p;
    let j = h.floor() as usize;
    let g = h - h.floor();

    if j + 1 >= n {
        return Some(sorted[n - 1]);
    }
    let (lo, hi) = (sorted[j], sorted[j + 1]);
    Some(lo + g * (hi - lo))
}
