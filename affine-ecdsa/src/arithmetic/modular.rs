use crate::{Error, Result};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};

/// Reduces `number` into `[0, modulus)`, regardless of its sign.
pub fn reduce(number: &BigInt, modulus: &BigInt) -> BigInt {
    number.mod_floor(modulus)
}

/// Computes `a^{-1} mod modulus` with the iterative extended Euclidean
/// algorithm.
///
/// `a` may be negative, it is reduced into `[0, modulus)` first. A literal
/// zero maps to zero, which is not an inverse: callers must rule out zero
/// operands themselves whenever an actual inverse is needed.
///
/// Returns [`Error::NoInverseExists`] when `gcd(a, modulus) != 1` or when the
/// modulus is not greater than one.
pub fn inverse(a: &BigInt, modulus: &BigInt) -> Result<BigInt> {
    if modulus <= &BigInt::one() {
        return Err(Error::NoInverseExists);
    }
    if a.is_zero() {
        return Ok(BigInt::zero());
    }

    let mut low_coeff = BigInt::one();
    let mut high_coeff = BigInt::zero();
    let mut low = reduce(a, modulus);
    let mut high = modulus.clone();

    while low > BigInt::one() {
        // both operands are non-negative here, so truncation equals floor
        let ratio = &high / &low;
        let new_coeff = &high_coeff - &low_coeff * &ratio;
        let new_low = &high - &low * &ratio;
        high_coeff = std::mem::replace(&mut low_coeff, new_coeff);
        high = std::mem::replace(&mut low, new_low);
    }

    // the remainder sequence ends at the gcd, which must be one
    if low.is_one() {
        Ok(reduce(&low_coeff, modulus))
    } else {
        Err(Error::NoInverseExists)
    }
}
