//! Implements the base structures for a shell simulation

mod assemble;
mod config;
mod parameters;
mod sample_meshes;
pub use crate::base::assemble::*;
pub use crate::base::config::*;
pub use crate::base::parameters::*;
pub use crate::base::sample_meshes::*;
