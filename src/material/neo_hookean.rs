use super::{ConstitutiveLaw, Tensor2, Tensor4};
use crate::StrError;

/// Implements the incompressible neo-Hookean law for thin shells
///
/// The strain energy is `ψ = μ/2 (I₁ - 3)` with the through-thickness
/// stretch eliminated by the incompressibility closure `C₃₃`, yielding
///
/// ```text
/// τᵅᵝ = μ (ḡᵅᵝ_ref − C₃₃ ḡᵅᵝ_def)
/// ℂᵅᵝᵞᵟ = μ C₃₃ (2 ḡᵅᵝ ḡᵞᵟ + ḡᵅᵞ ḡᵝᵟ + ḡᵅᵟ ḡᵝᵞ)_def
/// ```
pub struct NeoHookean {
    /// Shear modulus
    mu: f64,
}

impl NeoHookean {
    /// Allocates a new instance
    pub fn new(mu: f64) -> Result<Self, StrError> {
        if mu <= 0.0 {
            return Err("shear modulus mu must be positive");
        }
        Ok(NeoHookean { mu })
    }
}

impl ConstitutiveLaw for NeoHookean {
    fn name(&self) -> &'static str {
        "NeoHookean"
    }

    fn n_gauss_thickness(&self) -> usize {
        3
    }

    fn stress(
        &self,
        c33: f64,
        gm_contra_ref: &Tensor2,
        _gm_cov_def: &Tensor2,
        gm_contra_def: &Tensor2,
    ) -> Tensor2 {
        let mut tau = [[0.0; 2]; 2];
        for ia in 0..2 {
            for ib in 0..2 {
                tau[ia][ib] = self.mu * (gm_contra_ref[ia][ib] - c33 * gm_contra_def[ia][ib]);
            }
        }
        tau
    }

    fn elastic_moduli(
        &self,
        c33: f64,
        _gm_contra_ref: &Tensor2,
        _gm_cov_def: &Tensor2,
        gm_contra_def: &Tensor2,
    ) -> Tensor4 {
        let g = gm_contra_def;
        let mut cc = [[[[0.0; 2]; 2]; 2]; 2];
        for ia in 0..2 {
            for ib in 0..2 {
                for ic in 0..2 {
                    for id in 0..2 {
                        cc[ia][ib][ic][id] = self.mu
                            * c33
                            * (2.0 * g[ia][ib] * g[ic][id]
                                + g[ia][ic] * g[ib][id]
                                + g[ia][id] * g[ib][ic]);
                    }
                }
            }
        }
        cc
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
