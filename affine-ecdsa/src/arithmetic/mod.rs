mod modular;
mod point;

pub use modular::{inverse, reduce};
pub use point::AffinePoint;
