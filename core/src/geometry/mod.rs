//! Geometry

mod bounds2;
mod normal;
mod point2;

// Re-export
pub use bounds2::*;
pub use normal::*;
pub use point2::*;
