//! Loose integer parsing for SVG attribute values
//!
//! Attribute values go through `parse_int`, which reads the longest run of
//! leading decimal digits (after optional whitespace and sign) and ignores the
//! rest. Fractions truncate toward zero; values with no leading digits, and
//! missing attributes, become NaN and are passed on unguarded.

/// Parse the leading base-10 integer of `value`, or NaN if there is none.
pub fn parse_int(value: &str) -> f64 {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return f64::NAN;
    }

    // Digit runs are always valid f64 syntax; overlong runs round like JS numbers.
    let magnitude: f64 = rest[..digits_len].parse().unwrap_or(f64::NAN);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// `parse_int` over an attribute that may be absent.
pub fn parse_int_attr(value: Option<&str>) -> f64 {
    value.map_or(f64::NAN, parse_int)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_signed_integers() {
        assert_eq!(parse_int("42"), 42.0);
        assert_eq!(parse_int("-7"), -7.0);
        assert_eq!(parse_int("+3"), 3.0);
        assert_eq!(parse_int("  12"), 12.0);
    }

    #[test]
    fn trailing_garbage_is_ignored() {
        assert_eq!(parse_int("10px"), 10.0);
        assert_eq!(parse_int("12.9"), 12.0);
        assert_eq!(parse_int("-12.9"), -12.0);
        assert_eq!(parse_int("5e3"), 5.0);
    }

    #[test]
    fn no_digits_is_nan() {
        assert!(parse_int("").is_nan());
        assert!(parse_int("abc").is_nan());
        assert!(parse_int(".5").is_nan());
        assert!(parse_int("-").is_nan());
        assert!(parse_int_attr(None).is_nan());
    }
}
