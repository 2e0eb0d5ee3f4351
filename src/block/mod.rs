//! Standard Block arithmetic over the national statistics constants.
//!
//! A standard block is the share of the (target) population that one
//! municipality would hold if everyone were spread evenly. The impact of an
//! announced figure is how many such blocks it covers.

/// Total population used as the numerator basis.
pub const POPULATION: u64 = 124_000_000;

/// Count of basic municipalities used as the denominator basis.
pub const MUNICIPALITIES: u64 = 1_718;

/// Ratio substituted when the caller omits one (the whole population).
pub const DEFAULT_TARGET_RATIO: f64 = 1.0;

/// `POPULATION * target_ratio / MUNICIPALITIES`. No clamping: ratios outside
/// `[0, 1]` are the caller's business.
pub fn block_size(target_ratio: f64) -> f64 {
    (POPULATION as f64 * target_ratio) / MUNICIPALITIES as f64
}

/// Raw `value / block`. A zero block yields a non-finite result.
pub fn impact_of(value: f64, block: f64) -> f64 {
    value / block
}
