//! Filters

#[macro_use]
extern crate log;

mod blackman_harris;
mod boxf; // box is reserved keyword
mod factory;
mod gaussian;
mod lanczos;
mod mitchell;
mod sinc;
mod triangle;

// Re-export.
pub use blackman_harris::*;
pub use boxf::*;
pub use factory::*;
pub use gaussian::*;
pub use lanczos::*;
pub use mitchell::*;
pub use sinc::*;
pub use triangle::*;
