//! Implements utility functions for post-processing

mod paraview;
mod summary;
pub use crate::util::paraview::*;
pub use crate::util::summary::*;
