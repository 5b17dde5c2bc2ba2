use serde::{Deserialize, Serialize};

/// Holds parameters for hyperelastic stress-strain laws
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum ParamStressStrain {
    /// Incompressible neo-Hookean model
    NeoHookean {
        /// Shear modulus μ
        mu: f64,
    },

    /// Incompressible Mooney-Rivlin model
    MooneyRivlin {
        /// First material constant c₁
        c1: f64,

        /// Second material constant c₂
        c2: f64,
    },
}

/// Holds parameters for a Kirchhoff-Love shell cell
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamShell {
    /// Shell thickness h
    pub thickness: f64,

    /// Constitutive law
    pub stress_strain: ParamStressStrain,
}

/// Holds sample parameters for testing
pub struct SampleParams;

impl SampleParams {
    /// Returns sample parameters for a neo-Hookean shell
    pub fn param_shell_neo_hookean() -> ParamShell {
        ParamShell {
            thickness: 0.1,
            stress_strain: ParamStressStrain::NeoHookean { mu: 4.225e5 },
        }
    }

    /// Returns sample parameters for a Mooney-Rivlin shell
    ///
    /// The constants split the same shear modulus used by the neo-Hookean
    /// sample as `μ = 2(c₁ + c₂)` with `c₂/c₁ = 1/7`.
    pub fn param_shell_mooney_rivlin() -> ParamShell {
        let mu = 4.225e5;
        ParamShell {
            thickness: 0.1,
            stress_strain: ParamStressStrain::MooneyRivlin {
                c1: 0.4375 * mu,
                c2: 0.0625 * mu,
            },
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
