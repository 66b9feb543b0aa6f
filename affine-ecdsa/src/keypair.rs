use crate::arithmetic::AffinePoint;
use crate::ecdsa::{self, Signature};
use crate::hasher::MessageDigest;
use crate::rng::random_scalar;
use crate::{Curve, Error, Result};

use num_bigint::BigInt;
use rand_core::{CryptoRng, RngCore};

/// A private scalar `d` and its public point `Q = dG` on a given curve.
///
/// Messages are hashed with SHA-256 and truncated to the curve order
/// before signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keypair {
    privkey: BigInt,
    pubkey: AffinePoint,
}

impl Keypair {
    pub fn new(curve: &Curve, privkey: BigInt) -> Result<Self> {
        let pubkey = curve.multiply_generator(&privkey)?;
        Ok(Self { privkey, pubkey })
    }

    pub fn new_checked(curve: &Curve, privkey: BigInt, pubkey: AffinePoint) -> Result<Self> {
        let keypair = Self::new(curve, privkey)?;
        if keypair.pubkey != pubkey {
            Err(Error::KeypairMismatch)
        } else {
            Ok(keypair)
        }
    }

    pub fn random<R: RngCore + CryptoRng + ?Sized>(curve: &Curve, rng: &mut R) -> Result<Self> {
        Self::new(curve, random_scalar(rng, curve.order())?)
    }

    pub fn privkey(&self) -> &BigInt {
        &self.privkey
    }

    pub fn pubkey(&self) -> &AffinePoint {
        &self.pubkey
    }

    pub fn sign<R: RngCore + CryptoRng + ?Sized>(
        &self,
        curve: &Curve,
        msg: &[u8],
        rng: &mut R,
    ) -> Result<Signature> {
        let e = MessageDigest::Sha256.hash_to_scalar(curve, msg);
        ecdsa::sign_with_rng(curve, &self.privkey, &e, rng)
    }

    pub fn verify(&self, curve: &Curve, msg: &[u8], signature: &Signature) -> bool {
        let e = MessageDigest::Sha256.hash_to_scalar(curve, msg);
        ecdsa::verify(curve, &self.pubkey, &e, signature)
    }
}
