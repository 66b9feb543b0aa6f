use crate::arithmetic::{inverse, reduce, AffinePoint};
use crate::rng::random_scalar;
use crate::{Curve, Error, Result};

use num_bigint::BigInt;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use std::fmt;

/// The signature component that came out zero for a given nonce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureComponent {
    R,
    S,
}

impl fmt::Display for SignatureComponent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::R => write!(f, "r"),
            Self::S => write!(f, "s"),
        }
    }
}

/// Number of nonces [`sign_with_rng`] draws before giving up on a
/// degenerate signature.
pub const MAX_SIGNING_ATTEMPTS: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    r: BigInt,
    s: BigInt,
}

impl Signature {
    pub fn new(r: BigInt, s: BigInt) -> Self {
        Self { r, s }
    }

    pub fn r(&self) -> &BigInt {
        &self.r
    }

    pub fn s(&self) -> &BigInt {
        &self.s
    }

    /// Both components are in `[1, order)`.
    pub fn is_within(&self, order: &BigInt) -> bool {
        let in_range = |c: &BigInt| c > &BigInt::zero() && c < order;
        in_range(&self.r) && in_range(&self.s)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(r = 0x{:064x}, s = 0x{:064x})", self.r, self.s)
    }
}

/// Nonce and private key recovered from two signatures sharing `r`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoveredKey {
    pub nonce: BigInt,
    pub private_key: BigInt,
}

/// Signs the message integer `e` with private key `d` and nonce `k`:
/// `r = (kG).x mod n`, `s = k^{-1} (e + r d) mod n`.
///
/// A nonce producing `r = 0` or `s = 0` yields [`Error::DegenerateSignature`]
/// and must be replaced by a fresh one. Reusing a nonce for two different
/// messages leaks the private key, see [`recover_key_from_reused_nonce`].
pub fn sign(curve: &Curve, private_key: &BigInt, e: &BigInt, nonce: &BigInt) -> Result<Signature> {
    if !curve.is_valid_scalar(private_key) {
        return Err(Error::InvalidScalar);
    }
    let n = curve.order();
    let k = reduce(nonce, n);

    let r = match curve.multiply_generator(&k)? {
        AffinePoint::Affine { x, .. } => reduce(&x, n),
        AffinePoint::Identity => BigInt::zero(),
    };
    if r.is_zero() {
        return Err(Error::DegenerateSignature(SignatureComponent::R));
    }

    let s = reduce(&(inverse(&k, n)? * (e + &r * private_key)), n);
    if s.is_zero() {
        return Err(Error::DegenerateSignature(SignatureComponent::S));
    }

    Ok(Signature { r, s })
}

/// Signs with nonces drawn uniformly from `[1, n)`, resampling on degenerate
/// outcomes up to [`MAX_SIGNING_ATTEMPTS`] times.
pub fn sign_with_rng<R: RngCore + CryptoRng + ?Sized>(
    curve: &Curve,
    private_key: &BigInt,
    e: &BigInt,
    rng: &mut R,
) -> Result<Signature> {
    let mut last_error = Error::DegenerateSignature(SignatureComponent::R);
    for attempt in 0..MAX_SIGNING_ATTEMPTS {
        let nonce = random_scalar(rng, curve.order())?;
        log::trace!("signing attempt {}", attempt);
        match sign(curve, private_key, e, &nonce) {
            Err(err @ Error::DegenerateSignature(_)) => {
                log::debug!("{}, drawing a new nonce", err);
                last_error = err;
            }
            result => return result,
        }
    }
    Err(last_error)
}

/// Checks `(u1 G + u2 Q).x = r (mod n)` with `w = s^{-1}`, `u1 = e w` and
/// `u2 = r w`. Out of range signatures, invalid public keys and an identity
/// sum are all rejected.
pub fn verify(curve: &Curve, public_key: &AffinePoint, e: &BigInt, signature: &Signature) -> bool {
    let n = curve.order();
    if !signature.is_within(n) || public_key.is_identity() || !curve.is_on_curve(public_key) {
        return false;
    }

    match verification_point(curve, public_key, e, signature) {
        Ok(AffinePoint::Affine { x, .. }) => reduce(&x, n) == signature.r,
        _ => false,
    }
}

fn verification_point(
    curve: &Curve,
    public_key: &AffinePoint,
    e: &BigInt,
    signature: &Signature,
) -> Result<AffinePoint> {
    let n = curve.order();
    let w = inverse(&signature.s, n)?;
    let u1 = reduce(&(e * &w), n);
    let u2 = reduce(&(&signature.r * &w), n);
    let lhs = curve.multiply_reduced(curve.generator(), &u1)?;
    let rhs = curve.multiply_reduced(public_key, &u2)?;
    curve.add(&lhs, &rhs)
}

/// Recovers the nonce and private key from two signatures over different
/// messages made with the same nonce (hence the same `r`):
///
/// `k = (e1 - e2) (s1 - s2)^{-1} mod n` and `d = (s1 k - e1) r^{-1} mod n`.
pub fn recover_key_from_reused_nonce(
    curve: &Curve,
    (e1, sig1): (&BigInt, &Signature),
    (e2, sig2): (&BigInt, &Signature),
) -> Result<RecoveredKey> {
    let n = curve.order();
    if sig1.r != sig2.r {
        return Err(Error::NonceNotReused);
    }
    let s_diff = reduce(&(&sig1.s - &sig2.s), n);
    if s_diff.is_zero() {
        return Err(Error::NonceNotReused);
    }

    let nonce = reduce(&(reduce(&(e1 - e2), n) * inverse(&s_diff, n)?), n);
    if reduce(&sig1.r, n).is_zero() {
        return Err(Error::NoInverseExists);
    }
    let r_inv = inverse(&sig1.r, n)?;
    let private_key = reduce(&(reduce(&(&sig1.s * &nonce - e1), n) * r_inv), n);

    log::warn!("recovered a private key from a reused nonce");
    Ok(RecoveredKey { nonce, private_key })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::curve::test::{hex, toy_curve};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn int(n: i64) -> BigInt {
        BigInt::from(n)
    }

    fn sig(r: i64, s: i64) -> Signature {
        Signature::new(int(r), int(s))
    }

    #[test]
    fn toy_signatures() {
        let curve = toy_curve();
        let d = int(7);
        assert_eq!(sign(&curve, &d, &int(10), &int(3)), Ok(sig(10, 14)));
        assert_eq!(sign(&curve, &d, &int(4), &int(10)), Ok(sig(7, 11)));
        assert_eq!(sign(&curve, &d, &int(26), &int(2)), Ok(sig(6, 15)));
        // nonces are reduced modulo n before use
        assert_eq!(sign(&curve, &d, &int(10), &int(22)), Ok(sig(10, 14)));

        let public_key = curve.multiply_generator(&d).unwrap();
        assert_eq!(public_key, AffinePoint::new(int(0), int(6)));
        for (e, signature) in [(10, sig(10, 14)), (4, sig(7, 11)), (26, sig(6, 15))] {
            assert!(verify(&curve, &public_key, &int(e), &signature));
        }
        assert!(!verify(&curve, &public_key, &int(11), &sig(10, 14)));
        assert!(!verify(&curve, &public_key, &int(10), &sig(10, 13)));
    }

    #[test]
    fn degenerate_nonces() {
        let curve = toy_curve();
        let d = int(7);
        // 7G = (0, 6) so r = 0
        assert_eq!(
            sign(&curve, &d, &int(10), &int(7)),
            Err(Error::DegenerateSignature(SignatureComponent::R))
        );
        // a nonce reducing to zero is not a valid scalar at all
        assert_eq!(sign(&curve, &d, &int(10), &int(19)), Err(Error::InvalidScalar));
        // e = -r d (mod n) makes s vanish
        assert_eq!(
            sign(&curve, &d, &int(6), &int(3)),
            Err(Error::DegenerateSignature(SignatureComponent::S))
        );
    }

    #[test]
    fn invalid_private_keys() {
        let curve = toy_curve();
        assert_eq!(sign(&curve, &int(0), &int(1), &int(3)), Err(Error::InvalidScalar));
        assert_eq!(sign(&curve, &int(19), &int(1), &int(3)), Err(Error::InvalidScalar));
    }

    #[test]
    fn verify_rejects_out_of_range_and_bad_keys() {
        let curve = toy_curve();
        let public_key = curve.multiply_generator(&int(7)).unwrap();
        assert!(!verify(&curve, &public_key, &int(10), &sig(0, 14)));
        assert!(!verify(&curve, &public_key, &int(10), &sig(10, 0)));
        assert!(!verify(&curve, &public_key, &int(10), &sig(29, 14)));
        assert!(!verify(&curve, &public_key, &int(10), &sig(10, 33)));
        assert!(!verify(&curve, &AffinePoint::Identity, &int(10), &sig(10, 14)));
        assert!(!verify(&curve, &AffinePoint::new(int(0), int(5)), &int(10), &sig(10, 14)));
    }

    #[test]
    fn randomized_sign_verify() {
        let _ = env_logger::try_init();
        let mut rng = StdRng::seed_from_u64(5);

        let toy = toy_curve();
        for d in 1..19 {
            let d = int(d);
            let public_key = toy.multiply_generator(&d).unwrap();
            for e in [0, 1, 5, 18, 100] {
                let e = int(e);
                let signature = sign_with_rng(&toy, &d, &e, &mut rng).unwrap();
                assert!(verify(&toy, &public_key, &e, &signature));
            }
        }

        let curve = Curve::secp256k1();
        let d = hex("c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721");
        let public_key = curve.multiply_generator(&d).unwrap();
        let e = hex("af2bdbe1aa9b6ec1e2ade1d694f41fc71a831d0268e9891562113d8a62add1bf");
        let signature = sign_with_rng(&curve, &d, &e, &mut rng).unwrap();
        assert!(signature.is_within(curve.order()));
        assert!(verify(&curve, &public_key, &e, &signature));
        assert!(!verify(&curve, &public_key, &(&e + 1), &signature));
        let other_key = curve.multiply_generator(&(&d + 1)).unwrap();
        assert!(!verify(&curve, &other_key, &e, &signature));
    }

    /// Replays toy-curve nonces. num-bigint samples `[1, 19)` from the top
    /// five bits of one `u32`, so nonce `k` is encoded as `(k - 1) << 27`.
    /// The last nonce repeats once the script runs out.
    struct ScriptedNonces {
        nonces: Vec<u32>,
        draws: usize,
    }

    impl ScriptedNonces {
        fn new(nonces: &[u32]) -> Self {
            Self {
                nonces: nonces.to_vec(),
                draws: 0,
            }
        }
    }

    impl RngCore for ScriptedNonces {
        fn next_u32(&mut self) -> u32 {
            let nonce = self.nonces[self.draws.min(self.nonces.len() - 1)];
            self.draws += 1;
            (nonce - 1) << 27
        }

        fn next_u64(&mut self) -> u64 {
            u64::from(self.next_u32())
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(4) {
                let word = self.next_u32().to_le_bytes();
                chunk.copy_from_slice(&word[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for ScriptedNonces {}

    #[test]
    fn degenerate_nonce_is_resampled() {
        let curve = toy_curve();
        // k = 7 gives r = 0, k = 3 signs
        let mut rng = ScriptedNonces::new(&[7, 3]);
        assert_eq!(
            sign_with_rng(&curve, &int(7), &int(10), &mut rng),
            Ok(sig(10, 14))
        );
        assert_eq!(rng.draws, 2);

        // e = 6 with k = 3 gives s = 0, k = 10 signs
        let mut rng = ScriptedNonces::new(&[3, 10]);
        let signature = sign_with_rng(&curve, &int(7), &int(6), &mut rng).unwrap();
        assert_eq!(signature.r(), &int(7));
        assert_eq!(rng.draws, 2);
    }

    #[test]
    fn signing_gives_up_after_max_attempts() {
        let curve = toy_curve();
        let mut rng = ScriptedNonces::new(&[7]);
        assert_eq!(
            sign_with_rng(&curve, &int(7), &int(10), &mut rng),
            Err(Error::DegenerateSignature(SignatureComponent::R))
        );
        assert_eq!(rng.draws, MAX_SIGNING_ATTEMPTS);
    }

    #[test]
    fn toy_nonce_reuse() {
        let curve = toy_curve();
        let d = int(7);
        let sig1 = sign(&curve, &d, &int(10), &int(3)).unwrap();
        let sig2 = sign(&curve, &d, &int(4), &int(3)).unwrap();
        assert_eq!(sig2, sig(10, 12));

        let recovered =
            recover_key_from_reused_nonce(&curve, (&int(10), &sig1), (&int(4), &sig2)).unwrap();
        assert_eq!(
            recovered,
            RecoveredKey {
                nonce: int(3),
                private_key: d,
            }
        );
    }

    #[test]
    fn nonce_reuse_preconditions() {
        let curve = toy_curve();
        assert_eq!(
            recover_key_from_reused_nonce(&curve, (&int(10), &sig(10, 14)), (&int(4), &sig(7, 11))),
            Err(Error::NonceNotReused)
        );
        assert_eq!(
            recover_key_from_reused_nonce(&curve, (&int(10), &sig(10, 14)), (&int(4), &sig(10, 33))),
            Err(Error::NonceNotReused)
        );
        // a shared r = 0 (mod n) cannot be inverted
        assert_eq!(
            recover_key_from_reused_nonce(&curve, (&int(10), &sig(19, 5)), (&int(4), &sig(19, 7))),
            Err(Error::NoInverseExists)
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            sig(0x2f, 0x9c).to_string(),
            format!("(r = 0x{:0>64}, s = 0x{:0>64})", "2f", "9c")
        );
    }
}
