//! Klshell - Nonlinear Kirchhoff-Love thin-shell simulator
//!
//! This crate implements a quasi-static, incremental simulator for thin
//! hyperelastic shells following the Kirchhoff-Love kinematic hypothesis.
//! The shell mid-surface is discretized with quadrilateral cells (bilinear
//! or bicubic), the material response (neo-Hookean or Mooney-Rivlin with
//! an incompressibility closure) is integrated through the thickness at
//! each surface integration point, and the displacement loading is applied
//! by projecting a radial field onto the basis and accumulating it into
//! the material history, one increment at a time.
//!
//! The main components are:
//!
//! * [base] -- configuration, parameters, mesh presets, assembly helpers
//! * [material] -- surface metrics, constitutive laws, integration-point history
//! * [fem] -- interpolation, quadrature, strain variations, element, solver
//! * [util] -- ParaView (VTU) output and run summaries

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod fem;
pub mod material;
pub mod prelude;
pub mod util;
