use crate::codec::bytes_to_int;
use crate::Curve;

use num_bigint::BigInt;
use sha2::Sha256;
use sha3::{Digest, Keccak256};

/// Hash functions used to turn messages into signable integers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MessageDigest {
    #[default]
    Sha256,
    /// Ethereum flavoured Keccak-256.
    Keccak256,
}

impl MessageDigest {
    pub fn digest(&self, msg: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(msg).to_vec(),
            Self::Keccak256 => Keccak256::digest(msg).to_vec(),
        }
    }

    /// The full digest read as a big-endian integer.
    pub fn hash_to_int(&self, msg: &[u8]) -> BigInt {
        bytes_to_int(&self.digest(msg))
    }

    /// The digest truncated to the bit length of the curve order.
    pub fn hash_to_scalar(&self, curve: &Curve, msg: &[u8]) -> BigInt {
        curve.message_to_scalar(&self.digest(msg))
    }
}
