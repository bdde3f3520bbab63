//! Number formatting for text box lines.

/// Decimal places used for measurement text.
pub const DEFAULT_PRECISION: usize = 2;

/// Rounds `value` for display with a precision that adapts to its magnitude.
///
/// Values of magnitude 100 or more get `precision - 2` decimals, each order of
/// magnitude below gets one more, down to `precision + 4` below `0.001`.
/// Values closer to zero than `1e-4` are printed unrounded. Missing and
/// non-finite values format as the literal `"NaN"`.
///
/// # Examples
///
/// ```
/// # use caliper::format::round_number;
/// assert_eq!(round_number(Some(123.456), 2), "123");
/// assert_eq!(round_number(Some(5.0), 2), "5.00");
/// assert_eq!(round_number(Some(0.5), 2), "0.500");
/// assert_eq!(round_number(None, 2), "NaN");
/// ```
pub fn round_number(value: Option<f64>, precision: usize) -> String {
    let Some(value) = value.filter(|value| value.is_finite()) else {
        return "NaN".to_string();
    };
    let magnitude = value.abs();
    if magnitude < 1e-4 {
        return format!("{value}");
    }
    let decimals = if magnitude >= 100.0 {
        precision.saturating_sub(2)
    } else if magnitude >= 10.0 {
        precision.saturating_sub(1)
    } else if magnitude >= 1.0 {
        precision
    } else if magnitude >= 0.1 {
        precision + 1
    } else if magnitude >= 0.01 {
        precision + 2
    } else if magnitude >= 0.001 {
        precision + 3
    } else {
        precision + 4
    };
    format!("{value:.decimals$}")
}

/// Formats a value with [`DEFAULT_PRECISION`], `None` when the value is
/// missing so callers can omit the line.
pub fn round_or_omit(value: Option<f64>) -> Option<String> {
    value
        .filter(|value| value.is_finite())
        .map(|value| round_number(Some(value), DEFAULT_PRECISION))
}
