//! Core

#[macro_use]
extern crate log;

// Re-export.
pub mod bucket_order;
pub mod color;
pub mod common;
pub mod context;
pub mod display;
pub mod filter;
pub mod geometry;
pub mod image_io;
pub mod oracle;
pub mod qmc;
pub mod renderer;
pub mod rng;
pub mod sampler;
pub mod scheduler;
