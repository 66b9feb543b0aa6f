#![deny(clippy::dbg_macro)]
#![deny(clippy::all)]

pub mod arithmetic;
pub mod codec;
pub mod curve;
pub mod ecdsa;
pub mod hasher;
pub mod keypair;
pub mod parse;
mod rng;

pub use arithmetic::AffinePoint;
pub use curve::{Curve, NamedCurve, Secp256k1, Tom256k1};
pub use ecdsa::{RecoveredKey, Signature, SignatureComponent};
pub use keypair::Keypair;
pub use num_bigint::BigInt;
pub use rng::random_scalar;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("scalar is not in the range [1, n)")]
    InvalidScalar,
    #[error("cannot add points with equal x-coordinates")]
    UndefinedAddition,
    #[error("degenerate signature: {0} is zero, resample the nonce")]
    DegenerateSignature(SignatureComponent),
    #[error("operand is not invertible modulo the given modulus")]
    NoInverseExists,
    #[error("invalid domain parameters: {0}")]
    InvalidDomain(String),
    #[error("point is not on the curve")]
    PointNotOnCurve,
    #[error("signatures do not share a solvable nonce")]
    NonceNotReused,
    #[error("pubkey-privkey mismatch")]
    KeypairMismatch,
    #[error("cannot encode a negative integer")]
    NegativeInteger,
    #[error("parse error: {0}")]
    Parse(String),
}
