use crate::arithmetic::AffinePoint;
use crate::{Curve, Error, Result, Signature};

use num_bigint::BigInt;
use num_traits::Num;
use serde::{Deserialize, Serialize};

/// Curve domain parameters as big-endian hex strings, with or without a
/// `0x` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainParameters {
    pub prime_modulus: String,
    pub coeff_a: String,
    pub coeff_b: String,
    pub generator_x: String,
    pub generator_y: String,
    pub order: String,
}

impl TryFrom<DomainParameters> for Curve {
    type Error = Error;
    fn try_from(params: DomainParameters) -> Result<Self> {
        Curve::new(
            parse_hex(&params.prime_modulus)?,
            parse_hex(&params.coeff_a)?,
            parse_hex(&params.coeff_b)?,
            parse_hex(&params.generator_x)?,
            parse_hex(&params.generator_y)?,
            parse_hex(&params.order)?,
        )
    }
}

impl From<Curve> for DomainParameters {
    fn from(curve: Curve) -> Self {
        // NOTE a constructed curve always has an affine generator
        let (gx, gy) = match curve.generator() {
            AffinePoint::Affine { x, y } => (x.clone(), y.clone()),
            AffinePoint::Identity => (BigInt::default(), BigInt::default()),
        };
        Self {
            prime_modulus: to_hex(curve.prime_modulus()),
            coeff_a: to_hex(curve.coeff_a()),
            coeff_b: to_hex(curve.coeff_b()),
            generator_x: to_hex(&gx),
            generator_y: to_hex(&gy),
            order: to_hex(curve.order()),
        }
    }
}

/// Parses an unsigned big-endian hex string with an optional single `0x`
/// prefix.
pub fn parse_hex(hex: &str) -> Result<BigInt> {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(Error::Parse("empty hex string".to_string()));
    }
    if !is_hex(digits) {
        return Err(Error::Parse(format!("invalid hex digits in {:?}", hex)));
    }
    BigInt::from_str_radix(digits, 16).map_err(|e| Error::Parse(e.to_string()))
}

/// Parses `r || s` given as 128 hex digits. Trailing recovery bytes are
/// ignored.
pub fn parse_signature(signature: &str) -> Result<Signature> {
    let trimmed = signature.strip_prefix("0x").unwrap_or(signature);
    if !is_hex(trimmed) || (trimmed.len() != 128 && trimmed.len() != 130) {
        return Err(Error::Parse("invalid signature".to_string()));
    }
    Ok(Signature::new(
        parse_hex(&trimmed[0..64])?,
        parse_hex(&trimmed[64..128])?,
    ))
}

/// Parses an uncompressed `04 || x || y` public key and checks that it
/// lies on `curve`.
pub fn parse_pubkey(curve: &Curve, pubkey: &str) -> Result<AffinePoint> {
    let trimmed = pubkey.strip_prefix("0x").unwrap_or(pubkey);
    if !is_hex(trimmed) || trimmed.len() != 130 || !trimmed.starts_with("04") {
        return Err(Error::Parse("invalid pubkey".to_string()));
    }
    let point = AffinePoint::new(parse_hex(&trimmed[2..66])?, parse_hex(&trimmed[66..])?);
    if curve.is_on_curve(&point) {
        Ok(point)
    } else {
        Err(Error::PointNotOnCurve)
    }
}

fn is_hex(digits: &str) -> bool {
    digits.chars().all(|c| c.is_ascii_hexdigit())
}

fn to_hex(number: &BigInt) -> String {
    format!("0x{:x}", number)
}
