//! Numeric parsing used when the pull parser dispatches `Integer`/`Double`
//! tokens to typed handlers. Kept separate from the lexer: the lexer only
//! recognises token boundaries, it never parses the value (spec §4.4 vs
//! §4.6 — lexing and value construction are deliberately distinct passes).

/// Parses an ASCII decimal digit run (no sign, no leading `+`) as a signed
/// 64-bit integer, given whether the source text carried a leading `-`.
///
/// Accumulates in the *negative* domain the whole way through, per spec §9:
/// "the integer accumulator in the negative domain... is a deliberate
/// choice to correctly represent `-2^63`. Do not reimplement naively using a
/// positive accumulator." A positive accumulator would overflow one step
/// before a naive negation of `i64::MIN` could ever be represented; working
/// in the negative domain sidesteps that entirely, since `i64::MIN`'s
/// magnitude has no positive `i64` counterpart.
pub fn parse_i64(digits: &[u8], negative: bool) -> Option<i64> {
    let mut acc: i64 = 0;
    for &b in digits {
        debug_assert!(b.is_ascii_digit());
        let d = i64::from(b - b'0');
        acc = acc.checked_mul(10)?.checked_sub(d)?;
    }
    if negative {
        Some(acc)
    } else {
        acc.checked_neg()
    }
}

/// Parses the raw bytes of a `Double` token (sign, integer part, optional
/// fraction, optional exponent — already lexically validated) as an IEEE
/// 754 binary64. Returns `None` on overflow to infinity.
pub fn parse_f64(raw: &[u8]) -> Option<f64> {
    let text = core::str::from_utf8(raw).expect("lexer guarantees ASCII number bytes");
    let value: f64 = text.parse().ok()?;
    if value.is_finite() {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_i64_round_trips() {
        assert_eq!(parse_i64(b"9223372036854775807", false), Some(i64::MAX));
    }

    #[test]
    fn min_i64_round_trips_without_naive_overflow() {
        assert_eq!(parse_i64(b"9223372036854775808", true), Some(i64::MIN));
    }

    #[test]
    fn one_past_max_overflows() {
        assert_eq!(parse_i64(b"9223372036854775808", false), None);
    }

    #[test]
    fn one_past_min_overflows() {
        assert_eq!(parse_i64(b"9223372036854775809", true), None);
    }

    #[test]
    fn float_overflow_to_infinity_is_rejected() {
        assert_eq!(parse_f64(b"1e400"), None);
    }

    #[test]
    fn ordinary_float_parses() {
        assert_eq!(parse_f64(b"3.14"), Some(3.14));
    }
}
