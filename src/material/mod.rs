//! Implements surface metrics, material models, and integration-point state

mod mooney_rivlin;
mod neo_hookean;
mod point_history;
mod stress_strain;
mod surface;
pub use crate::material::mooney_rivlin::*;
pub use crate::material::neo_hookean::*;
pub use crate::material::point_history::*;
pub use crate::material::stress_strain::*;
pub use crate::material::surface::*;
