//! Implements the finite element machinery for Kirchhoff-Love shells

mod element_shell;
mod interp;
mod quadrature;
mod solver;
mod variation;
pub use crate::fem::element_shell::*;
pub use crate::fem::interp::*;
pub use crate::fem::quadrature::*;
pub use crate::fem::solver::*;
pub use crate::fem::variation::*;
