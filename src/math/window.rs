//! Centered rolling windows.

use std::cmp::Ordering;

/// Centered rolling median with a fixed window.
///
/// Position `i` takes the median of `values[i - w/2 ..= i + w/2]` when that
/// whole window lies inside the slice. Positions near either end, where the
/// window would be incomplete, keep their raw value. Even windows are centered
/// the same way as odd ones (`w/2` on each side of `i`, `w - 1 - w/2` after).
pub fn centered_median(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let before = (window - 1) / 2;
    let after = window - 1 - before;

    let mut buf = Vec::with_capacity(window);
    values
        .iter()
        .enumerate()
        .map(|(i, &raw)| {
            if i < before || i + after >= values.len() {
                return raw;
            }
            buf.clear();
            buf.extend_from_slice(&values[i - before..=i + after]);
            median(&mut buf).unwrap_or(raw)
        })
        .collect()
}

/// Median of a scratch buffer (sorted in place).
pub fn median(buf: &mut [f64]) -> Option<f64> {
    if buf.is_empty() {
        return None;
    }
    buf.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = buf.len() / 2;
    if buf.len() % 2 == 1 {
        Some(buf[mid])
    } else {
        Some((buf[mid - 1] + buf[mid]) / 2.0)
    }
}
