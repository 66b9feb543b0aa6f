use crate::arithmetic::{inverse, reduce, AffinePoint};
use crate::codec::bytes_to_int;
use crate::parse::DomainParameters;
use crate::{Error, Result};

use num_bigint::BigInt;
use num_traits::{Num, Signed, Zero};
use serde::{Deserialize, Serialize};

/// Compile-time description of a well-known curve, as big-endian hex strings.
pub trait NamedCurve {
    const NAME: &'static str;
    const PRIME_MODULUS: &'static str;
    const ORDER: &'static str;
    const GENERATOR_X: &'static str;
    const GENERATOR_Y: &'static str;
    const COEFF_A: &'static str;
    const COEFF_B: &'static str;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Secp256k1;

impl NamedCurve for Secp256k1 {
    const NAME: &'static str = "secp256k1";
    const PRIME_MODULUS: &'static str =
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f";
    const ORDER: &'static str = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
    const GENERATOR_X: &'static str =
        "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const GENERATOR_Y: &'static str =
        "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";
    const COEFF_A: &'static str = "0";
    const COEFF_B: &'static str = "7";
}

/// The curve whose base field is the scalar field of secp256k1 and vice versa.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tom256k1;

impl NamedCurve for Tom256k1 {
    const NAME: &'static str = "tom256k1";
    const PRIME_MODULUS: &'static str =
        "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
    const ORDER: &'static str = "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f";
    const GENERATOR_X: &'static str =
        "ac81a9587b8da43a9519bd50d96191fd8f2c4f66b8f1550e366e3c7f9ed18897";
    const GENERATOR_Y: &'static str =
        "6ad7d16db13c428e5dce61c8bfe2b3860a306d201f059826120e7ac684ee209f";
    const COEFF_A: &'static str = "0";
    const COEFF_B: &'static str = "7";
}

/// Domain parameters of a short Weierstrass curve `y^2 = x^3 + ax + b (mod p)`
/// together with a generator `G` of order `n`.
///
/// Immutable once constructed, every group operation borrows it.
///
/// Nothing here runs in constant time: scalar multiplication branches on
/// the bits of the scalar and must not be fed secrets in an environment
/// where timing can be observed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DomainParameters", into = "DomainParameters")]
pub struct Curve {
    prime_modulus: BigInt,
    coeff_a: BigInt,
    coeff_b: BigInt,
    generator: AffinePoint,
    order: BigInt,
}

impl Curve {
    /// Builds a curve context after basic domain checks: `p > 3`, a
    /// non-singular equation, a generator on the curve and `n >= 2`.
    /// Coefficients and generator coordinates must already lie in `[0, p)`. Neither the primality of `p` nor the true
    /// order of `G` is verified.
    pub fn new(
        prime_modulus: BigInt,
        coeff_a: BigInt,
        coeff_b: BigInt,
        generator_x: BigInt,
        generator_y: BigInt,
        order: BigInt,
    ) -> Result<Self> {
        if prime_modulus <= BigInt::from(3) {
            return Err(Error::InvalidDomain(
                "prime modulus must be greater than 3".to_owned(),
            ));
        }
        if order < BigInt::from(2) {
            return Err(Error::InvalidDomain(
                "generator order must be at least 2".to_owned(),
            ));
        }
        for coeff in [&coeff_a, &coeff_b] {
            if coeff.is_negative() || coeff >= &prime_modulus {
                return Err(Error::InvalidDomain(
                    "curve coefficient out of range".to_owned(),
                ));
            }
        }
        for coordinate in [&generator_x, &generator_y] {
            if coordinate.is_negative() || coordinate >= &prime_modulus {
                return Err(Error::InvalidDomain(
                    "generator coordinate out of range".to_owned(),
                ));
            }
        }

        let discriminant = BigInt::from(4) * coeff_a.pow(3) + BigInt::from(27) * coeff_b.pow(2);
        if reduce(&discriminant, &prime_modulus).is_zero() {
            return Err(Error::InvalidDomain("singular curve".to_owned()));
        }

        let curve = Self {
            prime_modulus,
            coeff_a,
            coeff_b,
            generator: AffinePoint::new(generator_x, generator_y),
            order,
        };
        if !curve.is_on_curve(&curve.generator) {
            return Err(Error::InvalidDomain(
                "generator is not on the curve".to_owned(),
            ));
        }

        log::debug!(
            "curve context over a {}-bit modulus with a {}-bit order",
            curve.prime_modulus.bits(),
            curve.order.bits()
        );
        Ok(curve)
    }

    pub fn named<C: NamedCurve>() -> Self {
        log::trace!("loading {} domain parameters", C::NAME);
        Self {
            prime_modulus: hex_constant(C::PRIME_MODULUS),
            coeff_a: hex_constant(C::COEFF_A),
            coeff_b: hex_constant(C::COEFF_B),
            generator: AffinePoint::new(
                hex_constant(C::GENERATOR_X),
                hex_constant(C::GENERATOR_Y),
            ),
            order: hex_constant(C::ORDER),
        }
    }

    pub fn secp256k1() -> Self {
        Self::named::<Secp256k1>()
    }

    pub fn prime_modulus(&self) -> &BigInt {
        &self.prime_modulus
    }

    pub fn coeff_a(&self) -> &BigInt {
        &self.coeff_a
    }

    pub fn coeff_b(&self) -> &BigInt {
        &self.coeff_b
    }

    pub fn generator(&self) -> &AffinePoint {
        &self.generator
    }

    pub fn order(&self) -> &BigInt {
        &self.order
    }

    /// Returns `true` if `scalar` is in `[1, n)`.
    pub fn is_valid_scalar(&self, scalar: &BigInt) -> bool {
        scalar.is_positive() && scalar < &self.order
    }

    pub fn is_on_curve(&self, point: &AffinePoint) -> bool {
        match point {
            AffinePoint::Identity => true,
            AffinePoint::Affine { x, y } => {
                let in_range = |c: &BigInt| !c.is_negative() && c < &self.prime_modulus;
                if !in_range(x) || !in_range(y) {
                    return false;
                }
                let rhs = x.pow(3) + &self.coeff_a * x + &self.coeff_b;
                reduce(&(y * y - rhs), &self.prime_modulus).is_zero()
            }
        }
    }

    /// Reduces the coordinates modulo `p` and checks curve membership.
    pub fn point(&self, x: BigInt, y: BigInt) -> Result<AffinePoint> {
        let point = AffinePoint::new(
            reduce(&x, &self.prime_modulus),
            reduce(&y, &self.prime_modulus),
        );
        if self.is_on_curve(&point) {
            Ok(point)
        } else {
            Err(Error::PointNotOnCurve)
        }
    }

    pub fn negate(&self, point: &AffinePoint) -> AffinePoint {
        match point {
            AffinePoint::Identity => AffinePoint::Identity,
            AffinePoint::Affine { x, y } => {
                AffinePoint::new(x.clone(), reduce(&-y, &self.prime_modulus))
            }
        }
    }

    /// Chord addition of two points with distinct x-coordinates.
    ///
    /// Fails with [`Error::UndefinedAddition`] when the x-coordinates are
    /// equal, since the sum is then either a doubling or the identity.
    pub fn add_distinct(&self, lhs: &AffinePoint, rhs: &AffinePoint) -> Result<AffinePoint> {
        match (lhs, rhs) {
            (AffinePoint::Identity, _) => Ok(rhs.clone()),
            (_, AffinePoint::Identity) => Ok(lhs.clone()),
            (AffinePoint::Affine { x: px, y: py }, AffinePoint::Affine { x: qx, y: qy }) => {
                let dx = reduce(&(qx - px), &self.prime_modulus);
                if dx.is_zero() {
                    return Err(Error::UndefinedAddition);
                }
                let slope = reduce(
                    &((qy - py) * inverse(&dx, &self.prime_modulus)?),
                    &self.prime_modulus,
                );
                Ok(self.third_point(&slope, px, py, qx))
            }
        }
    }

    /// Tangent doubling. Points with `y = 0` have order two, so they (and
    /// the identity) double to the identity.
    pub fn double(&self, point: &AffinePoint) -> Result<AffinePoint> {
        match point {
            AffinePoint::Identity => Ok(AffinePoint::Identity),
            AffinePoint::Affine { x, y } => {
                if reduce(y, &self.prime_modulus).is_zero() {
                    return Ok(AffinePoint::Identity);
                }
                let numerator = BigInt::from(3) * x * x + &self.coeff_a;
                let denominator = inverse(&(BigInt::from(2) * y), &self.prime_modulus)?;
                let slope = reduce(&(numerator * denominator), &self.prime_modulus);
                Ok(self.third_point(&slope, x, y, x))
            }
        }
    }

    /// Complete group law: dispatches to doubling when both operands are
    /// equal and yields the identity for `P + (-P)`.
    pub fn add(&self, lhs: &AffinePoint, rhs: &AffinePoint) -> Result<AffinePoint> {
        if let (AffinePoint::Affine { x: px, y: py }, AffinePoint::Affine { x: qx, y: qy }) =
            (lhs, rhs)
        {
            if reduce(&(qx - px), &self.prime_modulus).is_zero() {
                return if reduce(&(qy - py), &self.prime_modulus).is_zero() {
                    self.double(lhs)
                } else {
                    Ok(AffinePoint::Identity)
                };
            }
        }
        self.add_distinct(lhs, rhs)
    }

    /// Double-and-add over the bits of `scalar`, most significant first.
    ///
    /// The scalar must be in `[1, n)`, anything else is rejected with
    /// [`Error::InvalidScalar`] before touching the point.
    pub fn multiply(&self, point: &AffinePoint, scalar: &BigInt) -> Result<AffinePoint> {
        if !self.is_valid_scalar(scalar) {
            return Err(Error::InvalidScalar);
        }
        let bits = scalar.magnitude();
        // the leading one bit is consumed by starting from the point itself
        let mut acc = point.clone();
        for i in (0..bits.bits() - 1).rev() {
            acc = self.double(&acc)?;
            if bits.bit(i) {
                acc = self.add(&acc, point)?;
            }
        }
        Ok(acc)
    }

    pub fn multiply_generator(&self, scalar: &BigInt) -> Result<AffinePoint> {
        self.multiply(&self.generator, scalar)
    }

    /// Like [`Curve::multiply`], but reduces the scalar modulo `n` first and
    /// maps multiples of `n` to the identity.
    pub(crate) fn multiply_reduced(&self, point: &AffinePoint, scalar: &BigInt) -> Result<AffinePoint> {
        let scalar = reduce(scalar, &self.order);
        if scalar.is_zero() {
            Ok(AffinePoint::Identity)
        } else {
            self.multiply(point, &scalar)
        }
    }

    /// Turns a message digest into the integer that gets signed, keeping
    /// only the leftmost `bitlen(n)` bits of the digest.
    pub fn message_to_scalar(&self, digest: &[u8]) -> BigInt {
        let e = bytes_to_int(digest);
        let digest_bits = digest.len() as u64 * 8;
        let order_bits = self.order.bits();
        if digest_bits > order_bits {
            e >> (digest_bits - order_bits)
        } else {
            e
        }
    }

    // x3 = slope^2 - px - qx, y3 = slope * (px - x3) - py
    fn third_point(&self, slope: &BigInt, px: &BigInt, py: &BigInt, qx: &BigInt) -> AffinePoint {
        let x = reduce(&(slope * slope - px - qx), &self.prime_modulus);
        let y = reduce(&(slope * (px - &x) - py), &self.prime_modulus);
        AffinePoint::new(x, y)
    }
}

fn hex_constant(hex: &str) -> BigInt {
    // NOTE unwrap is fine because named curve constants are valid hex literals
    BigInt::from_str_radix(hex, 16).unwrap()
}
