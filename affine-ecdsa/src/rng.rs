use crate::{Error, Result};

use num_bigint::{BigInt, RandBigInt};
use num_traits::One;
use rand_core::{CryptoRng, RngCore};

/// Samples a scalar uniformly from `[1, order)`.
pub fn random_scalar<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
    order: &BigInt,
) -> Result<BigInt> {
    if order <= &BigInt::one() {
        return Err(Error::InvalidScalar);
    }
    Ok(rng.gen_bigint_range(&BigInt::one(), order))
}
