//! Numeric and text helpers that behave like the spreadsheet functions the
//! quote sheets were built with (ROUND, TRIM, SUBSTITUTE).

/// ROUND(value, decimals), half away from zero.
///
/// Non-finite inputs and results collapse to 0.
pub fn round(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let multiplier = 10f64.powi(decimals);
    let rounded = (value * multiplier).round() / multiplier;
    finite_or_zero(rounded)
}

/// Replace NaN/±∞ with 0 (and normalize -0.0).
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value + 0.0 } else { 0.0 }
}

/// Division that yields 0 instead of NaN/∞ when the divisor is 0.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        finite_or_zero(numerator / denominator)
    }
}

/// TRIM: collapse runs of whitespace to one space and strip both ends.
pub fn trim(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
