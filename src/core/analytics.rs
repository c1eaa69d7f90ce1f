//! Pure calculations over series values.

use crate::core::series::SeriesValue;

/// Compounds a sequence of period-over-period percentage changes into a
/// single multiplicative factor: the product of `(1 + value / 100)`.
///
/// An empty sequence yields `1.0`, the neutral factor. The result is only
/// meaningful for series whose published values are percentages (the three
/// price indices exposed as [`SeriesCode`](crate::SeriesCode) constants all
/// are); nothing is validated here.
pub fn accumulated_index(values: &[SeriesValue]) -> f64 {
    values
        .iter()
        .fold(1.0, |acc, v| acc * (v.value / 100.0 + 1.0))
}

/// Converts a multiplicative factor into the equivalent compounded
/// percentage change, e.g. a factor of `1.004495` becomes `0.4495`.
pub fn percentage_from_index(index: f64) -> f64 {
    index * 100.0 - 100.0
}
