use crate::types::quantile_profile::{QuantileBand, QUANTILE_LEVELS};
use ordered_float::OrderedFloat;

/// Quantile `q` (0..=1) of ascending `sorted` values using linear
/// interpolation between the two nearest order statistics.
///
/// Returns `None` for an empty slice.
pub fn interpolated_quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = q.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(last);
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// The [`QUANTILE_LEVELS`] of `values`, or `None` when `values` is empty.
pub fn quantile_band(mut values: Vec<f64>) -> Option<QuantileBand> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable_by_key(|v| OrderedFloat(*v));
    let mut levels = [0.0; 5];
    for (slot, q) in levels.iter_mut().zip(QUANTILE_LEVELS) {
        *slot = interpolated_quantile(&values, q)?;
    }
    Some(QuantileBand::from_levels(levels))
}
