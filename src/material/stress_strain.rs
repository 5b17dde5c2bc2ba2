use super::{
    metric_contravariant, metric_covariant, normal_derivatives, CovBasis, CovBasisDeriv, Tensor2,
    Tensor4, Vec3,
};
use super::{MooneyRivlin, NeoHookean};
use crate::base::{ParamShell, ParamStressStrain};
use crate::fem::gauss_legendre;
use crate::material::{cross, det2, norm};
use crate::StrError;

/// Defines the trait for (incompressible) hyperelastic stress-strain laws
///
/// The laws work on the through-thickness metric at a single thickness
/// station: given the incompressibility closure `C₃₃` and the reference and
/// deformed metrics, they return the contravariant Kirchhoff stress `τᵅᵝ`
/// and the elasticity tensor `ℂᵅᵝᵞᵟ`.
pub trait ConstitutiveLaw: Send {
    /// Returns the name of the law
    fn name(&self) -> &'static str;

    /// Returns the number of Gauss points for the through-thickness integration
    fn n_gauss_thickness(&self) -> usize;

    /// Computes the contravariant stress components `τᵅᵝ`
    fn stress(
        &self,
        c33: f64,
        gm_contra_ref: &Tensor2,
        gm_cov_def: &Tensor2,
        gm_contra_def: &Tensor2,
    ) -> Tensor2;

    /// Computes the elasticity tensor components `ℂᵅᵝᵞᵟ`
    fn elastic_moduli(
        &self,
        c33: f64,
        gm_contra_ref: &Tensor2,
        gm_cov_def: &Tensor2,
        gm_contra_def: &Tensor2,
    ) -> Tensor4;
}

/// Allocates a stress-strain law from the parameters
pub fn new_stress_strain_law(param: &ParamStressStrain) -> Result<Box<dyn ConstitutiveLaw>, StrError> {
    match *param {
        ParamStressStrain::NeoHookean { mu } => Ok(Box::new(NeoHookean::new(mu)?)),
        ParamStressStrain::MooneyRivlin { c1, c2 } => Ok(Box::new(MooneyRivlin::new(c1, c2)?)),
    }
}

/// Holds the stress resultants and elasticity tensors integrated through the thickness
pub struct IntegralTensors {
    /// Stress resultants: `[0]` membrane force, `[1]` bending moment
    pub resultants: [Tensor2; 2],

    /// Elasticity tensors: `[0]` membrane, `[1]` coupling, `[2]` bending
    pub dd: [Tensor4; 3],
}

/// Implements the material state at a surface integration point
///
/// The state stores the reference configuration (covariant basis, its
/// parametric derivatives, and the normal derivatives) captured at setup,
/// and accumulates displacement-gradient increments into the deformed
/// tangents. The Kirchhoff-Love assumption keeps the third basis vector
/// equal to the reference normal.
pub struct ShellMaterial {
    /// Stress-strain law
    law: Box<dyn ConstitutiveLaw>,

    /// Shell thickness
    thickness: f64,

    /// Reference covariant basis `āᵢ`
    a_cov_ref: CovBasis,

    /// Reference basis derivatives `āᵢ,ⱼ`
    da_cov_ref: CovBasisDeriv,

    /// Reference normal derivatives `ā₃,ᵢ`
    da3_ref: [Vec3; 2],

    /// Deformed covariant basis (row 2 keeps the reference normal)
    a_cov_def: CovBasis,

    /// Deformed basis derivatives
    da_cov_def: CovBasisDeriv,

    /// Accumulated displacement gradient `u,ᵅ`
    u_der: [Vec3; 2],

    /// Accumulated second displacement gradient `u,ᵅᵝ`
    u_der2: [[Vec3; 2]; 2],
}

impl ShellMaterial {
    /// Allocates a new instance capturing the reference geometry
    pub fn new(param: &ParamShell, a_cov: CovBasis, da_cov: CovBasisDeriv) -> Result<Self, StrError> {
        if param.thickness <= 0.0 {
            return Err("shell thickness must be positive");
        }
        let law = new_stress_strain_law(&param.stress_strain)?;
        let da3_ref = normal_derivatives(&a_cov, &da_cov)?;
        Ok(ShellMaterial {
            law,
            thickness: param.thickness,
            a_cov_ref: a_cov,
            da_cov_ref: da_cov,
            da3_ref,
            a_cov_def: a_cov,
            da_cov_def: da_cov,
            u_der: [[0.0; 3]; 2],
            u_der2: [[[0.0; 3]; 2]; 2],
        })
    }

    /// Returns the name of the stress-strain law
    pub fn name(&self) -> &'static str {
        self.law.name()
    }

    /// Accumulates a displacement-gradient increment into the deformed state
    pub fn update(&mut self, delta_u_der: &[Vec3; 2], delta_u_der2: &[[Vec3; 2]; 2]) {
        for ia in 0..2 {
            for i in 0..3 {
                self.u_der[ia][i] += delta_u_der[ia][i];
                self.a_cov_def[ia][i] += delta_u_der[ia][i];
            }
            for ib in 0..2 {
                for i in 0..3 {
                    self.u_der2[ia][ib][i] += delta_u_der2[ia][ib][i];
                    self.da_cov_def[ia][ib][i] += delta_u_der2[ia][ib][i];
                }
            }
        }
    }

    /// Returns the deformed covariant basis
    pub fn deformed_bases(&self) -> CovBasis {
        self.a_cov_def
    }

    /// Returns the deformed basis derivatives
    pub fn deformed_bases_deriv(&self) -> CovBasisDeriv {
        self.da_cov_def
    }

    /// Returns the mid-surface principal stretch `√(J_def/J_ref)`
    pub fn stretch(&self) -> f64 {
        let j_ref = norm(&cross(&self.a_cov_ref[0], &self.a_cov_ref[1]));
        let j_def = norm(&cross(&self.a_cov_def[0], &self.a_cov_def[1]));
        f64::sqrt(j_def / j_ref)
    }

    /// Integrates stress resultants and elasticity tensors through the thickness
    ///
    /// At each thickness station `ζ = h x/2` (Gauss abscissa x on [-1,1]),
    /// the shifted tangents are `gᵅ = aᵅ + ζ a₃,ᵅ` and the incompressibility
    /// closure is `C₃₃ = det(g_cov_ref)/det(g_cov_def)`.
    pub fn integral_tensors(&self) -> Result<IntegralTensors, StrError> {
        let (xt, wt) = gauss_legendre(self.law.n_gauss_thickness())?;
        let mut resultants = [[[0.0; 2]; 2]; 2];
        let mut dd = [[[[[0.0; 2]; 2]; 2]; 2]; 3];
        let jac_mid = norm(&cross(&self.a_cov_ref[0], &self.a_cov_ref[1]));
        for iq in 0..xt.len() {
            let zeta = 0.5 * self.thickness * xt[iq];
            // weight already includes dζ = (h/2) dx
            let weight = 0.5 * self.thickness * wt[iq];

            let mut g_cov_ref: CovBasis = [[0.0; 3]; 3];
            for ia in 0..2 {
                for i in 0..3 {
                    g_cov_ref[ia][i] = self.a_cov_ref[ia][i] + zeta * self.da3_ref[ia][i];
                }
            }
            g_cov_ref[2] = self.a_cov_ref[2]; // Kirchhoff-Love assumption
            let j_ratio = norm(&cross(&g_cov_ref[0], &g_cov_ref[1])) / jac_mid;

            let gm_cov_ref = metric_covariant(&g_cov_ref);
            let gm_contra_ref = metric_contravariant(&gm_cov_ref)?;

            let mut g_cov_def = g_cov_ref;
            for ia in 0..2 {
                for i in 0..3 {
                    g_cov_def[ia][i] += self.u_der[ia][i];
                }
            }
            let gm_cov_def = metric_covariant(&g_cov_def);
            let gm_contra_def = metric_contravariant(&gm_cov_def)?;

            // incompressibility closure
            let c33 = det2(&gm_cov_ref) / det2(&gm_cov_def);

            let tau = self
                .law
                .stress(c33, &gm_contra_ref, &gm_cov_def, &gm_contra_def);
            let cc = self
                .law
                .elastic_moduli(c33, &gm_contra_ref, &gm_cov_def, &gm_contra_def);

            for ia in 0..2 {
                for ib in 0..2 {
                    resultants[0][ia][ib] += tau[ia][ib] * j_ratio * weight;
                    resultants[1][ia][ib] += tau[ia][ib] * zeta * j_ratio * weight;
                    for ic in 0..2 {
                        for id in 0..2 {
                            let v = cc[ia][ib][ic][id] * j_ratio * weight;
                            dd[0][ia][ib][ic][id] += v;
                            dd[1][ia][ib][ic][id] += v * zeta;
                            dd[2][ia][ib][ic][id] += v * zeta * zeta;
                        }
                    }
                }
            }
        }
        Ok(IntegralTensors {
            resultants: [resultants[0], resultants[1]],
            dd: [dd[0], dd[1], dd[2]],
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::SampleParams;
    use russell_lab::approx_eq;

    fn flat_basis() -> (CovBasis, CovBasisDeriv) {
        (
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            [[[0.0; 3]; 2]; 2],
        )
    }

    #[test]
    fn new_captures_errors() {
        let (a_cov, da_cov) = flat_basis();
        let mut param = SampleParams::param_shell_neo_hookean();
        param.thickness = 0.0;
        assert_eq!(
            ShellMaterial::new(&param, a_cov, da_cov).err(),
            Some("shell thickness must be positive")
        );
    }

    #[test]
    fn reference_state_is_stress_free() {
        let (a_cov, da_cov) = flat_basis();
        for param in [
            SampleParams::param_shell_neo_hookean(),
            SampleParams::param_shell_mooney_rivlin(),
        ] {
            let material = ShellMaterial::new(&param, a_cov, da_cov).unwrap();
            let tensors = material.integral_tensors().unwrap();
            for ia in 0..2 {
                for ib in 0..2 {
                    approx_eq(tensors.resultants[0][ia][ib], 0.0, 1e-10);
                    approx_eq(tensors.resultants[1][ia][ib], 0.0, 1e-10);
                }
            }
            approx_eq(material.stretch(), 1.0, 1e-15);
        }
    }

    #[test]
    fn equibiaxial_membrane_stress_matches_closed_form() {
        // flat sheet stretched equally in both directions: u,₁ = (λ-1)e₁,
        // u,₂ = (λ-1)e₂ with λ = 1.2; the neo-Hookean membrane resultant is
        // n¹¹ = h μ (1 - λ⁻⁶) (C₃₃ = λ⁻⁴, ḡ_contra_def = λ⁻² I)
        let (a_cov, da_cov) = flat_basis();
        let param = SampleParams::param_shell_neo_hookean();
        let mu = 4.225e5;
        let lambda = 1.2;
        let mut material = ShellMaterial::new(&param, a_cov, da_cov).unwrap();
        let du = [[lambda - 1.0, 0.0, 0.0], [0.0, lambda - 1.0, 0.0]];
        material.update(&du, &[[[0.0; 3]; 2]; 2]);
        let tensors = material.integral_tensors().unwrap();
        let c33 = 1.0 / lambda.powi(4);
        let correct = param.thickness * mu * (1.0 - c33 / (lambda * lambda));
        approx_eq(tensors.resultants[0][0][0], correct, 1e-6 * correct.abs());
        approx_eq(tensors.resultants[0][1][1], correct, 1e-6 * correct.abs());
        approx_eq(tensors.resultants[0][0][1], 0.0, 1e-8);
        // flat reference: no bending moment develops from pure stretching
        approx_eq(tensors.resultants[1][0][0], 0.0, 1e-8);
        approx_eq(material.stretch(), lambda, 1e-14);
    }

    #[test]
    fn update_accumulates() {
        let (a_cov, da_cov) = flat_basis();
        let param = SampleParams::param_shell_neo_hookean();
        let mut material = ShellMaterial::new(&param, a_cov, da_cov).unwrap();
        let du = [[0.05, 0.0, 0.0], [0.0, 0.05, 0.0]];
        material.update(&du, &[[[0.0; 3]; 2]; 2]);
        material.update(&du, &[[[0.0; 3]; 2]; 2]);
        let bases = material.deformed_bases();
        approx_eq(bases[0][0], 1.1, 1e-15);
        approx_eq(bases[1][1], 1.1, 1e-15);
        // the normal slot keeps the reference normal
        assert_eq!(bases[2], [0.0, 0.0, 1.0]);
    }
}
