//! Arithmetic on [`BigInteger`].
//!
//! Each submodule has the digit-slice primitives for one operation (little-endian,
//! "from num-bigint" in spirit), followed by the signed operations built on them.
//!
//! Modular exponentiation uses Montgomery representation for odd moduli,
//! and Barrett reduction otherwise:
//!
//! - [Montgomery, Modular multiplication without trial division (1985)][montgomery]
//! - [Barrett, Implementing the RSA public key encryption algorithm on a standard DSP (1986)][barrett]
//!
//! [montgomery]: https://api.semanticscholar.org/CorpusID:122486012
//! [barrett]: https://api.semanticscholar.org/CorpusID:31279373

use core::cmp::Ordering;

use crate::Digit;

mod add;
mod barrett;
mod bitwise;
mod divide;
mod impls;
mod modular;
mod montgomery;
mod multiply;
mod shift;
mod subtract;

pub(crate) use divide::{div_digits, div_rem_assign_digit};
pub(crate) use montgomery::Montgomery;
pub(crate) use multiply::mul_digit_add_assign;

/// This is *little endian* ordering, as opposed to the default
/// ordering on slices! Both slices must be trimmed.
pub(crate) fn cmp_slice(a: &[Digit], b: &[Digit]) -> Ordering {
    match a.len().cmp(&b.len()) {
        Ordering::Equal => {}
        not_equal => return not_equal,
    }
    for (x, y) in a.iter().rev().zip(b.iter().rev()) {
        match x.cmp(y) {
            Ordering::Equal => (),
            not_equal => return not_equal,
        }
    }
    Ordering::Equal
}
