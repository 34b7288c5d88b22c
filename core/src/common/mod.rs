//! Common numeric types and helpers.

mod clamp;
mod math;

// Re-export
pub use clamp::*;
pub use math::*;
