//! Makes available common structures needed to run a simulation
//!
//! You may write `use klshell::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{Config, ParamShell, ParamStressStrain, SampleMeshes, SampleParams};
pub use crate::fem::{ElementShell, ShellSolver};
pub use crate::material::{new_stress_strain_law, PointHistory, ShellMaterial};
pub use crate::util::{write_shell_vtu, RunSummary, StepSummary};
pub use crate::StrError;
