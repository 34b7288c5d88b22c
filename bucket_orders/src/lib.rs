//! Bucket Orders

#[macro_use]
extern crate log;

mod column;
mod diagonal;
mod factory;
mod hilbert;
mod inverted;
mod random;
mod row;
mod spiral;

#[cfg(test)]
mod test_util;

// Re-export.
pub use column::*;
pub use diagonal::*;
pub use factory::*;
pub use hilbert::*;
pub use inverted::*;
pub use random::*;
pub use row::*;
pub use spiral::*;
