use core::cmp::Ordering;

use super::add::add_assign_carry;
use super::cmp_slice;
use super::shift::{shl_magnitude, shr_magnitude};
use crate::digit::{Digit, DoubleDigit, BITS};
use crate::{BigInteger, Error, Result};

/// Divide a two digit numerator by a one digit divisor, returns quotient and remainder:
///
/// Note: the caller must ensure that both the quotient and remainder will fit into a single digit.
/// This is _not_ true for an arbitrary numerator/denominator.
///
/// (This function also matches what the x86 divide instruction does).
///
/// REMARK: This is Knuth's operation c0), "memorizing the multiplication table in reverse."
#[inline]
pub(crate) fn div_digits(hi: Digit, lo: Digit, divisor: Digit) -> (Digit, Digit) {
    debug_assert!(hi < divisor);

    let x = ((hi as DoubleDigit) << BITS) + lo as DoubleDigit;
    let divisor = divisor as DoubleDigit;

    let q = x / divisor;
    let r = x % divisor;

    (q as Digit, r as Digit)
}

/// Divides digits in-place by `divisor`, returning the remaining digit.
///
/// The quotient is left untrimmed.
pub(crate) fn div_rem_assign_digit(digits: &mut [Digit], divisor: Digit) -> Digit {
    let mut remainder = 0;

    // run down the digits, dividing each by the divisor, while carrying along the remainder
    for digit in digits.iter_mut().rev() {
        let (quotient, r) = div_digits(remainder, *digit, divisor);
        *digit = quotient;
        remainder = r;
    }

    remainder
}

/// `a -= q * b`, where `a` has one more digit than `b`. Returns the final borrow.
fn sub_mul_digit(a: &mut [Digit], b: &[Digit], q: Digit) -> bool {
    debug_assert_eq!(a.len(), b.len() + 1);

    let mut carry: DoubleDigit = 0;
    let mut borrow = false;
    for (ai, &bi) in a.iter_mut().zip(b) {
        let product = (bi as DoubleDigit) * (q as DoubleDigit) + carry;
        carry = product >> BITS;
        let (difference, o1) = ai.overflowing_sub(product as Digit);
        let (difference, o2) = difference.overflowing_sub(borrow as Digit);
        *ai = difference;
        borrow = o1 || o2;
    }

    let top = &mut a[b.len()];
    let (difference, o1) = top.overflowing_sub(carry as Digit);
    let (difference, o2) = difference.overflowing_sub(borrow as Digit);
    *top = difference;
    o1 || o2
}

/// "Multi-precision division of u by v".
///
/// Meaning: return unique magnitudes `(q, r)` with `u = q*v + r`, and `0 <= r < v`,
/// both untrimmed. `v` must be trimmed and non-empty.
///
/// Knuth, TAOCP vol 2 section 4.3, algorithm D(ivision).
pub(crate) fn div_rem_magnitudes(u: &[Digit], v: &[Digit]) -> (Vec<Digit>, Vec<Digit>) {
    debug_assert!(v.last().map_or(false, |&d| d != 0));

    // Required or the quotient length calculation below can underflow:
    match cmp_slice(u, v) {
        Ordering::Less => return (Vec::new(), u.to_vec()),
        Ordering::Equal => return (vec![1], Vec::new()),
        Ordering::Greater => {}
    }

    if v.len() == 1 {
        let mut quotient = u.to_vec();
        let remainder = div_rem_assign_digit(&mut quotient, v[0]);
        return (quotient, vec![remainder]);
    }

    // This shift has no influence on `q`, and will be reverted for `r` at the end.
    let shift_bits = v[v.len() - 1].leading_zeros() as usize;
    let v = shl_magnitude(v, shift_bits);
    let dividend_len = u.len();
    let mut u = shl_magnitude(u, shift_bits);
    // one extra leading digit (possibly already spilled into by the shift),
    // so that every step sees n + 1 digits
    u.resize(dividend_len + 1, 0);

    let n = v.len();
    let m = u.len() - n - 1;
    let mut q = vec![0; m + 1];

    let (v1, v2) = (v[n - 1] as DoubleDigit, v[n - 2] as DoubleDigit);
    let base = (1 as DoubleDigit) << BITS;

    for j in (0..=m).rev() {
        let numerator = ((u[j + n] as DoubleDigit) << BITS) | u[j + n - 1] as DoubleDigit;
        let mut qhat = numerator / v1;
        let mut rhat = numerator % v1;

        // at most two corrections, Knuth's step D3
        while qhat >= base || qhat * v2 > ((rhat << BITS) | u[j + n - 2] as DoubleDigit) {
            qhat -= 1;
            rhat += v1;
            if rhat >= base {
                break;
            }
        }

        // D4, D5, D6: multiply and subtract, adding back on the rare overshoot
        if sub_mul_digit(&mut u[j..=j + n], &v, qhat as Digit) {
            qhat -= 1;
            add_assign_carry(&mut u[j..=j + n], &v);
        }
        q[j] = qhat as Digit;
    }

    let r = shr_magnitude(&u[..n], shift_bits);
    (q, r)
}

impl BigInteger {
    /// Truncating division: `(q, r)` with `self = q * divisor + r`, where `r`
    /// has the sign of `self` and `|r| < |divisor|`.
    pub fn divide_and_remainder(&self, divisor: &Self) -> Result<(Self, Self)> {
        if divisor.is_zero() {
            return Err(Error::Arithmetic("division by zero"));
        }
        let (q, r) = div_rem_magnitudes(&self.magnitude, &divisor.magnitude);
        Ok((
            Self::from_parts(self.negative != divisor.negative, q),
            Self::from_parts(self.negative, r),
        ))
    }

    pub fn divide(&self, divisor: &Self) -> Result<Self> {
        Ok(self.divide_and_remainder(divisor)?.0)
    }

    pub fn remainder(&self, divisor: &Self) -> Result<Self> {
        Ok(self.divide_and_remainder(divisor)?.1)
    }

    /// The least non-negative residue, in $[0, m)$.
    ///
    /// Fails for non-positive moduli.
    pub fn modulo(&self, modulus: &Self) -> Result<Self> {
        if modulus.signum() <= 0 {
            return Err(Error::Arithmetic("modulus not positive"));
        }
        let remainder = self.remainder(modulus)?;
        if remainder.negative {
            Ok(remainder.add(modulus))
        } else {
            Ok(remainder)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::*;

    pub const N1: Digit = -1i64 as Digit;
    pub const N2: Digit = -2i64 as Digit;
    pub const M: Digit = Digit::MAX;

    pub const DIV_REM_QUADRUPLES: &[(&[Digit], &[Digit], &[Digit], &[Digit])] = &[
        (&[1], &[2], &[], &[1]),
        (&[3], &[2], &[1], &[1]),
        (&[1, 1], &[2], &[M / 2 + 1], &[1]),
        (&[1, 1, 1], &[2], &[M / 2 + 1, M / 2 + 1], &[1]),
        (&[0, 1], &[N1], &[1], &[1]),
        (&[N1, N1], &[N2], &[2, 1], &[3]),
        (&[0, 0, 1], &[1, 1], &[N1], &[1]),
        (&[N1, N1, N1, N1], &[N1, N1], &[1, 0, 1], &[0]),
    ];

    #[test]
    fn quadruples() {
        for &(a, b, c, d) in DIV_REM_QUADRUPLES.iter() {
            let a = BigInteger::from_digits(a);
            let b = BigInteger::from_digits(b);
            let c = BigInteger::from_digits(c);
            let d = BigInteger::from_digits(d);
            crate::assert_op!(a / b == c);
            crate::assert_op!(a % b == d);
            assert_eq!(a.divide_and_remainder(&b).unwrap(), (c, d));
        }
    }

    #[test]
    fn truncating_signs() {
        let cases = [
            ("7", "2", "3", "1"),
            ("-7", "2", "-3", "-1"),
            ("7", "-2", "-3", "1"),
            ("-7", "-2", "3", "-1"),
            ("6", "-3", "-2", "0"),
            ("1", "5", "0", "1"),
            ("-1", "5", "0", "-1"),
        ];
        for (a, b, q, r) in cases.iter() {
            let (q_, r_) = int(a).divide_and_remainder(&int(b)).unwrap();
            assert_eq!((q_, r_), (int(q), int(r)), "{} / {}", a, b);
        }
    }

    #[test]
    fn division_identity() {
        let mut rng = seeded(5);
        for (a_bits, b_bits) in [(512, 256), (300, 299), (1024, 65), (200, 64), (64, 200)] {
            for negate in [false, true] {
                let a = BigInteger::random_bits(a_bits, &mut rng).unwrap();
                let a = if negate { a.negate() } else { a };
                let b = BigInteger::random_bits(b_bits, &mut rng).unwrap().add(&ONE);
                let (q, r) = a.divide_and_remainder(&b).unwrap();
                assert_eq!(&(&q * &b) + &r, a);
                assert!(r.abs() < b.abs());
                assert!(r.is_zero() || r.is_negative() == a.is_negative());
            }
        }
    }

    #[test]
    fn multi_digit_divisors() {
        let cases = [
            (
                "340282366920938463463374607431768211455",
                "18446744073709551617",
                "18446744073709551615",
                "0",
            ),
            (
                "115792089237316193816632940749697632311307892324477961517254590225120294350905",
                "170141183460469231750134047789593657343",
                "680564733841876917408229272829407790091",
                "170141183460469203120787245392369562692",
            ),
            (
                "6277101735386680763835789423207666416102355444464034512895",
                "340282366920938463444927863358058659843",
                "18446744073709551616",
                "340282366920938463408034375210639556607",
            ),
        ];
        for (a, b, q, r) in cases.iter() {
            assert_eq!(int(a).divide_and_remainder(&int(b)).unwrap(), (int(q), int(r)));
        }
    }

    #[test]
    fn exact_division() {
        let a = int(P256_DEC);
        let b = int("-340282366920938463463374607431768211507");
        assert_eq!(a.multiply(&b).divide(&b).unwrap(), a);
    }

    #[test]
    fn division_by_zero_fails() {
        assert_eq!(int("5").divide(&ZERO), Err(Error::Arithmetic("division by zero")));
        assert!(int("5").remainder(&ZERO).is_err());
        assert!(int("5").modulo(&ZERO).is_err());
    }

    #[test]
    #[should_panic]
    fn division_operator_panics_on_zero() {
        let _ = int("5") / ZERO.clone();
    }

    #[test]
    fn modulo_is_non_negative() {
        assert_eq!(int("-7").modulo(&int("5")).unwrap(), int("3"));
        assert_eq!(int("7").modulo(&int("5")).unwrap(), int("2"));
        assert_eq!(int("-10").modulo(&int("5")).unwrap(), ZERO);
        assert!(int("7").modulo(&int("-5")).is_err());
    }
}
