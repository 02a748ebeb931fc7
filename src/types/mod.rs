//! Data types for the tablix layout engine.

mod dimension;
mod geometry;
mod realized;

pub use dimension::*;
pub use geometry::*;
pub use realized::*;
