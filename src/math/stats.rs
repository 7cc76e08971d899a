//! Order statistics over yield histories.
//!
//! The conventions here are fixed because the output is compared against
//! historical charts:
//!
//! - quantiles interpolate linearly between order statistics at `q * (n - 1)`
//! - percentile ranks give tied values their average rank
//!
//! Non-finite inputs are the caller's problem; every series reaching these
//! functions is produced by the bander and is finite.

use std::cmp::Ordering;

/// Linear-interpolated quantiles of `values` at each probability in `probs`.
///
/// Returns `None` for an empty input. Probabilities are clamped to `[0, 1]`.
pub fn quantiles<const N: usize>(values: &[f64], probs: &[f64; N]) -> Option<[f64; N]> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let last = sorted.len() - 1;
    let mut out = [0.0; N];
    for (slot, &q) in out.iter_mut().zip(probs.iter()) {
        let pos = q.clamp(0.0, 1.0) * last as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        let frac = pos - lo as f64;
        *slot = if lo == hi {
            sorted[lo]
        } else {
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        };
    }
    Some(out)
}

/// Probabilities 0.0, 0.1, ..., 1.0.
pub fn decile_probs() -> [f64; 11] {
    let mut probs = [0.0; 11];
    for (i, p) in probs.iter_mut().enumerate() {
        *p = i as f64 / 10.0;
    }
    probs
}

/// Percentile rank of `x` within `values` as a fraction.
///
/// `rank = (#below + (#equal + 1) / 2) / n`, i.e. ties share their average
/// rank. When `x` is itself one of the values the result is in `(0, 1]`.
pub fn percentile_rank(values: &[f64], x: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let below = values.iter().filter(|&&v| v < x).count() as f64;
    let equal = values.iter().filter(|&&v| v == x).count() as f64;
    let rank = if equal > 0.0 {
        below + (equal + 1.0) / 2.0
    } else {
        below
    };
    Some(rank / values.len() as f64)
}

/// `close / running_max(close) - 1` for each point (0 at new highs).
pub fn running_drawdown(closes: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    closes
        .iter()
        .map(|&c| {
            peak = peak.max(c);
            if peak > 0.0 { (c / peak - 1.0).min(0.0) } else { 0.0 }
        })
        .collect()
}
