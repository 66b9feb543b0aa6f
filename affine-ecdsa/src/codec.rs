//! Big-endian integer <-> byte string conversion, as per X9.62.

use crate::{Error, Result};

use num_bigint::{BigInt, Sign};
use num_traits::Signed;

/// Accumulates `result = 256 * result + byte` over the input. Empty input
/// yields zero.
pub fn bytes_to_int(bytes: &[u8]) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, bytes)
}

/// Minimal-length big-endian encoding, zero encodes as a single zero byte.
pub fn int_to_bytes(number: &BigInt) -> Result<Vec<u8>> {
    if number.is_negative() {
        return Err(Error::NegativeInteger);
    }
    let (_, bytes) = number.to_bytes_be();
    Ok(bytes)
}

/// Left-pads the minimal encoding with zeros up to `len` bytes. Numbers that
/// need more than `len` bytes are returned unpadded.
pub fn int_to_padded_bytes(number: &BigInt, len: usize) -> Result<Vec<u8>> {
    let bytes = int_to_bytes(number)?;
    if bytes.len() >= len {
        return Ok(bytes);
    }
    let mut padded = vec![0u8; len - bytes.len()];
    padded.extend_from_slice(&bytes);
    Ok(padded)
}
