/// Splits `(x, value)` points into runs of consecutive present values, so a
/// missing value breaks a line or band instead of being bridged.
pub(crate) fn contiguous_runs<T>(points: impl IntoIterator<Item = (f64, Option<T>)>) -> Vec<Vec<(f64, T)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (x, value) in points {
        match value {
            Some(v) => current.push((x, v)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Min and max of the present values, widened when they coincide.
pub(crate) fn value_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })?;
    if hi > lo {
        Some((lo, hi))
    } else {
        Some((lo - 1.0, hi + 1.0))
    }
}
