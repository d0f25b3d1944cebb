//! Nearest-rank percentile helpers for already-sorted slices.
//!
//! - Empty input => `None` (or `0.0` for the f64 convenience wrapper).
//! - The index for quantile `q` is `floor(len * q)` clamped to `[0, len-1]`,
//!   so there is no interpolation between neighbouring values.

/// Index of quantile `q` (a fraction, e.g. `0.9`) in a sorted slice of `len`
/// values.
pub fn index_for_quantile(len: usize, quantile: f64) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let position = (len as f64 * quantile).floor();
    if position.is_nan() || position <= 0.0 {
        return Some(0);
    }
    Some((position as usize).min(len - 1))
}

/// Returns the quantile value from a slice sorted in ascending order.
pub fn value_sorted<T: Copy>(sorted_values: &[T], quantile: f64) -> Option<T> {
    let index = index_for_quantile(sorted_values.len(), quantile)?;
    sorted_values.get(index).copied()
}

/// Convenience wrapper for `f64` results.
pub fn value_f64_sorted(sorted_values: &[f64], quantile: f64) -> f64 {
    value_sorted(sorted_values, quantile).unwrap_or(0.0)
}
