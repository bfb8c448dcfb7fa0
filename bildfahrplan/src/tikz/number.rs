//! Fixed-precision number formatting for coordinates.

/// Significant digits written for every coordinate.
const SIGNIFICANT_DIGITS: usize = 6;

/// Enough digits to write any `f64` exactly in scientific notation.
const EXACT_DIGITS: usize = 768;

/// Format a number with six significant digits.
///
/// Matches the usual `toPrecision(6)` shape: fixed notation with trailing
/// zeros kept, switching to exponent notation for very large or very small
/// magnitudes. Exact ties round away from zero. Stable output keeps
/// regenerated diagrams diff-friendly.
///
/// # Examples
///
/// ```
/// use bildfahrplan::tikz::format_number;
///
/// assert_eq!(format_number(9.5), "9.50000");
/// assert_eq!(format_number(-4.6), "-4.60000");
/// assert_eq!(format_number(19.0), "19.0000");
/// assert_eq!(format_number(0.0), "0.00000");
/// assert_eq!(format_number(12345.25), "12345.3");
/// ```
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", SIGNIFICANT_DIGITS - 1, 0.0);
    }
    let Some((digits, exponent)) = rounded_digits(value) else {
        return value.to_string();
    };

    let sign = if value < 0.0 { "-" } else { "" };

    if exponent < -6 || exponent >= SIGNIFICANT_DIGITS as i32 {
        let (head, tail) = digits.split_at(1);
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{sign}{head}.{tail}e{exponent_sign}{}", exponent.abs());
    }

    if exponent >= 0 {
        let (int_part, frac_part) = digits.split_at(exponent as usize + 1);
        if frac_part.is_empty() {
            format!("{sign}{int_part}")
        } else {
            format!("{sign}{int_part}.{frac_part}")
        }
    } else {
        let zeros = "0".repeat((-exponent - 1) as usize);
        format!("{sign}0.{zeros}{digits}")
    }
}

/// The six significant digits of `|value|` and its decimal exponent.
fn rounded_digits(value: f64) -> Option<(String, i32)> {
    // Rust rounds exact ties to even; only a seventh digit of 5 can be one
    let (seven, exponent) = scientific(value, SIGNIFICANT_DIGITS + 1)?;
    if seven.ends_with('5') {
        let (exact, _) = scientific(value, EXACT_DIGITS)?;
        if exact[SIGNIFICANT_DIGITS + 1..].bytes().all(|d| d == b'0') {
            return round_up(&seven[..SIGNIFICANT_DIGITS], exponent);
        }
    }
    scientific(value, SIGNIFICANT_DIGITS)
}

/// `|value|` rounded to `count` significant digits, without the decimal
/// point, plus its decimal exponent.
fn scientific(value: f64, count: usize) -> Option<(String, i32)> {
    let text = format!("{:.*e}", count - 1, value.abs());
    let (mantissa, exponent) = text.split_once('e')?;
    let digits = mantissa.chars().filter(char::is_ascii_digit).collect();
    Some((digits, exponent.parse().ok()?))
}

/// Add one unit in the last place, carrying into the exponent.
fn round_up(digits: &str, exponent: i32) -> Option<(String, i32)> {
    let next = digits.parse::<u64>().ok()? + 1;
    let next = next.to_string();
    if next.len() > digits.len() {
        Some((next[..digits.len()].to_string(), exponent + 1))
    } else {
        Some((next, exponent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_notation() {
        assert_eq!(format_number(1.0), "1.00000");
        assert_eq!(format_number(12.345678), "12.3457");
        assert_eq!(format_number(-27.65), "-27.6500");
        assert_eq!(format_number(123456.0), "123456");
        assert_eq!(format_number(99999.95), "99999.9");
    }

    #[test]
    fn small_magnitudes() {
        assert_eq!(format_number(0.05), "0.0500000");
        assert_eq!(format_number(-0.0012345), "-0.00123450");
        assert_eq!(format_number(0.000001), "0.00000100000");
    }

    #[test]
    fn exponent_notation() {
        assert_eq!(format_number(1234567.0), "1.23457e+6");
        assert_eq!(format_number(0.0000001), "1.00000e-7");
        assert_eq!(format_number(-2.5e10), "-2.50000e+10");
    }

    #[test]
    fn rounding_carries_into_exponent() {
        assert_eq!(format_number(9.999999), "10.0000");
        assert_eq!(format_number(999999.7), "1.00000e+6");
    }

    #[test]
    fn ties_round_away_from_zero() {
        assert_eq!(format_number(12345.25), "12345.3");
        assert_eq!(format_number(-12345.25), "-12345.3");
        assert_eq!(format_number(100000.5), "100001");
        assert_eq!(format_number(999999.5), "1.00000e+6");
        // Not a tie: rounds to nearest as usual
        assert_eq!(format_number(12345.24), "12345.2");
    }

    #[test]
    fn zero_and_negative_zero() {
        assert_eq!(format_number(0.0), "0.00000");
        assert_eq!(format_number(-0.0), "0.00000");
    }

    #[test]
    fn non_finite_passthrough() {
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Fixed-notation output parses back to within the precision
        #[test]
        fn parses_back_close(value in -10000.0f64..10000.0) {
            prop_assume!(value.abs() > 1e-3);
            let text = format_number(value);
            let back: f64 = text.parse().unwrap();
            prop_assert!((back - value).abs() <= value.abs() * 1e-5);
        }

        /// Always exactly six significant digits in fixed notation
        #[test]
        fn six_digits(value in 1.0f64..100000.0) {
            let text = format_number(value);
            let digits = text.chars().filter(|c| c.is_ascii_digit()).count();
            prop_assert_eq!(digits, 6);
        }
    }
}
