//! String-based decimal formatting for on-chain quantities.
//!
//! Presale amounts arrive as big integers scaled by a token-decimals exponent.
//! Routing them through f64 would corrupt them, so rounding and grouping are
//! done digit-by-digit on the string representation.

/// Round and group a decimal string for display.
///
/// Accepts `[-]digits[.digits]`, with comma group separators tolerated on
/// input. Rounds half-up to `max_fraction_digits`, strips trailing fractional
/// zeros, and inserts thousands separators into the integer part. Malformed
/// input degrades to `"0"` rather than failing, and a zero result never
/// carries a sign or decimal point.
pub fn format_decimal(raw: &str, max_fraction_digits: usize) -> String {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();

    let (negative, magnitude) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };

    let (int_str, frac_str) = match magnitude.split_once('.') {
        Some((i, f)) => (i, f),
        None => (magnitude, ""),
    };

    if !int_str.bytes().all(|b| b.is_ascii_digit())
        || !frac_str.bytes().all(|b| b.is_ascii_digit())
    {
        return "0".to_string();
    }

    // "", ".", "-", "-." all normalize to zero here.
    let mut int_digits: Vec<u8> = int_str
        .bytes()
        .skip_while(|b| *b == b'0')
        .map(|b| b - b'0')
        .collect();
    if int_digits.is_empty() {
        int_digits.push(0);
    }

    let mut frac_digits: Vec<u8> = frac_str.bytes().map(|b| b - b'0').collect();

    if frac_digits.len() > max_fraction_digits {
        let round_up = frac_digits[max_fraction_digits] >= 5;
        frac_digits.truncate(max_fraction_digits);
        if round_up {
            let mut carry = true;
            for d in frac_digits.iter_mut().rev() {
                if *d == 9 {
                    *d = 0;
                } else {
                    *d += 1;
                    carry = false;
                    break;
                }
            }
            if carry {
                increment_integer(&mut int_digits);
            }
        }
    }

    while frac_digits.last() == Some(&0) {
        frac_digits.pop();
    }

    let is_zero = int_digits.iter().all(|d| *d == 0) && frac_digits.is_empty();
    if is_zero {
        return "0".to_string();
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(&int_digits));
    if !frac_digits.is_empty() {
        out.push('.');
        for d in frac_digits {
            out.push((d + b'0') as char);
        }
    }
    out
}

/// Scale a raw on-chain integer by `10^decimals` and format it.
///
/// The decimal point is inserted by string manipulation so quantities wider
/// than any machine integer's float range survive intact.
pub fn format_units(raw: u128, decimals: u32, max_fraction_digits: usize) -> String {
    let digits = raw.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return format_decimal(&digits, max_fraction_digits);
    }

    let scaled = if digits.len() <= decimals {
        format!("0.{}{}", "0".repeat(decimals - digits.len()), digits)
    } else {
        let split = digits.len() - decimals;
        format!("{}.{}", &digits[..split], &digits[split..])
    };
    format_decimal(&scaled, max_fraction_digits)
}

// Add one to a big-endian digit vector, growing it when the carry walks off
// the left edge ("999" -> "1000").
fn increment_integer(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, 1);
}

fn group_thousands(digits: &[u8]) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push((d + b'0') as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_always_bare() {
        for n in 0..6 {
            assert_eq!(format_decimal("0", n), "0");
            assert_eq!(format_decimal("0.000", n), "0");
        }
    }

    #[test]
    fn negative_zero_drops_sign() {
        assert_eq!(format_decimal("-0.00", 2), "0");
        assert_eq!(format_decimal("-0", 0), "0");
    }

    #[test]
    fn malformed_input_degrades_to_zero() {
        assert_eq!(format_decimal("", 2), "0");
        assert_eq!(format_decimal(".", 2), "0");
        assert_eq!(format_decimal("-", 2), "0");
        assert_eq!(format_decimal("-.", 2), "0");
        assert_eq!(format_decimal("12a.4", 2), "0");
        assert_eq!(format_decimal("1.2.3", 2), "0");
    }

    #[test]
    fn leading_zeros_stripped() {
        assert_eq!(format_decimal("000123.4500", 4), "123.45");
    }

    #[test]
    fn rounding_half_up_at_cutoff() {
        assert_eq!(format_decimal("1.005", 2), "1.01");
        assert_eq!(format_decimal("1.004", 2), "1");
        assert_eq!(format_decimal("-1.006", 2), "-1.01");
    }

    #[test]
    fn carry_through_fraction_into_integer() {
        // 9.996 rounds to 10.00, and the trailing zeros then drop.
        assert_eq!(format_decimal("9.996", 2), "10");
        assert_eq!(format_decimal("0.9999", 3), "1");
    }

    #[test]
    fn carry_chain_grows_integer() {
        assert_eq!(format_decimal("999.95", 0), "1,000");
        assert_eq!(format_decimal("999999.5", 0), "1,000,000");
    }

    #[test]
    fn rounding_to_zero_fraction_digits() {
        assert_eq!(format_decimal("7.49", 0), "7");
        assert_eq!(format_decimal("7.5", 0), "8");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_decimal("1234567.891", 2), "1,234,567.89");
        assert_eq!(format_decimal("1000", 0), "1,000");
        assert_eq!(format_decimal("-1234567", 0), "-1,234,567");
        assert_eq!(format_decimal("100", 0), "100");
    }

    #[test]
    fn negative_rounding_to_zero_drops_sign() {
        assert_eq!(format_decimal("-0.004", 2), "0");
    }

    #[test]
    fn shorter_fraction_left_alone() {
        assert_eq!(format_decimal("3.1", 4), "3.1");
    }

    #[test]
    fn idempotent_on_own_output() {
        for raw in ["1234567.891", "9.996", "-0.004", "999.95", "0.125"] {
            for n in [0usize, 2, 4] {
                let once = format_decimal(raw, n);
                assert_eq!(format_decimal(&once, n), once, "raw={raw} n={n}");
            }
        }
    }

    #[test]
    fn group_separators_tolerated_on_input() {
        assert_eq!(format_decimal("1,234,567.89", 2), "1,234,567.89");
    }

    #[test]
    fn arbitrary_width_survives() {
        // 40 digits, far past f64 and u128.
        let raw = "1234567890123456789012345678901234567890.987";
        assert_eq!(
            format_decimal(raw, 2),
            "1,234,567,890,123,456,789,012,345,678,901,234,567,890.99"
        );
    }

    #[test]
    fn units_scaling() {
        // USDC-style 6 decimals: 12_500_000 raw = 12.5
        assert_eq!(format_units(12_500_000, 6, 6), "12.5");
        // raw narrower than the exponent pads with zeros
        assert_eq!(format_units(42, 6, 6), "0.000042");
        assert_eq!(format_units(0, 18, 4), "0");
        assert_eq!(format_units(1_500_000_000_000_000_000, 18, 2), "1.5");
    }

    #[test]
    fn units_with_zero_decimals() {
        assert_eq!(format_units(1_234_567, 0, 2), "1,234,567");
    }
}
