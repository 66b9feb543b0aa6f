use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use std::fmt;

/// A point of a short Weierstrass curve in affine coordinates.
///
/// The point at infinity has no affine coordinates, so it gets its own
/// variant. Coordinates are only meaningful together with the [`Curve`]
/// they were produced by, and are kept reduced into `[0, p)` by every
/// curve operation.
///
/// [`Curve`]: crate::Curve
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AffinePoint {
    #[default]
    Identity,
    Affine {
        x: BigInt,
        y: BigInt,
    },
}

impl AffinePoint {
    /// Wraps raw coordinates without any curve membership check, use
    /// [`Curve::point`](crate::Curve::point) for untrusted input.
    pub fn new(x: BigInt, y: BigInt) -> Self {
        Self::Affine { x, y }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    pub fn x(&self) -> Option<&BigInt> {
        self.coordinates().map(|(x, _)| x)
    }

    pub fn y(&self) -> Option<&BigInt> {
        self.coordinates().map(|(_, y)| y)
    }

    pub fn coordinates(&self) -> Option<(&BigInt, &BigInt)> {
        match self {
            Self::Identity => None,
            Self::Affine { x, y } => Some((x, y)),
        }
    }
}

impl fmt::Display for AffinePoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "(identity)"),
            Self::Affine { x, y } => write!(f, "(x = 0x{:064x}, y = 0x{:064x})", x, y),
        }
    }
}
