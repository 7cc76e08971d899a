//! Human-readable labels for percentiles and bands.

use crate::domain::BAND_COUNT;

/// English ordinal for an integer percentile: 1st, 2nd, 3rd, 4th, 11th, 21st, ...
pub fn format_percentile(n: u32) -> String {
    let suffix = match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Legend labels for the bands, index-aligned with `band_boundaries[i]..band_boundaries[i + 1]`.
///
/// Band 0 is the low-yield (expensive) extreme and reads "Top 100%": every
/// historical yield was at least that high.
pub fn band_labels() -> [String; BAND_COUNT] {
    std::array::from_fn(|i| format!("Top {}%", (BAND_COUNT - i) * 10))
}
