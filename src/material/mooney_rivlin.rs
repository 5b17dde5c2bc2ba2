use super::{ConstitutiveLaw, Tensor2, Tensor4};
use crate::StrError;

/// Implements the incompressible Mooney-Rivlin law for thin shells
///
/// The strain energy is `ψ = c₁ (I₁ - 3) + c₂ (I₂ - 3)` with the
/// through-thickness stretch eliminated by the incompressibility
/// closure `C₃₃`. The second invariant couples the reference and
/// deformed metrics, so both enter the stress and the moduli.
pub struct MooneyRivlin {
    /// First material constant
    c1: f64,

    /// Second material constant
    c2: f64,
}

impl MooneyRivlin {
    /// Allocates a new instance
    pub fn new(c1: f64, c2: f64) -> Result<Self, StrError> {
        if c1 <= 0.0 || c2 < 0.0 {
            return Err("Mooney-Rivlin constants must satisfy c1 > 0 and c2 ≥ 0");
        }
        Ok(MooneyRivlin { c1, c2 })
    }
}

impl ConstitutiveLaw for MooneyRivlin {
    fn name(&self) -> &'static str {
        "MooneyRivlin"
    }

    fn n_gauss_thickness(&self) -> usize {
        2
    }

    fn stress(
        &self,
        c33: f64,
        gm_contra_ref: &Tensor2,
        gm_cov_def: &Tensor2,
        gm_contra_def: &Tensor2,
    ) -> Tensor2 {
        let (gr, gd, gc) = (gm_contra_ref, gm_cov_def, gm_contra_def);
        let mut tau = [[0.0; 2]; 2];
        for ia in 0..2 {
            for ib in 0..2 {
                tau[ia][ib] += 2.0 * self.c1 * gr[ia][ib] - 2.0 * self.c1 * c33 * gc[ia][ib];
                for ic in 0..2 {
                    for id in 0..2 {
                        tau[ia][ib] += 2.0
                            * self.c2
                            * (gd[ic][id] * gr[ic][id] * gr[ia][ib]
                                - gd[ic][id] * gr[ia][ic] * gr[id][ib])
                            - 2.0 * self.c2 * (gd[ic][id] * gr[ic][id]) * c33 * gc[ia][ib];
                    }
                }
            }
        }
        tau
    }

    fn elastic_moduli(
        &self,
        c33: f64,
        gm_contra_ref: &Tensor2,
        gm_cov_def: &Tensor2,
        gm_contra_def: &Tensor2,
    ) -> Tensor4 {
        let (gr, gd, gc) = (gm_contra_ref, gm_cov_def, gm_contra_def);

        // derivatives of ψ with respect to the invariants
        let mut d2psi = [[[[0.0; 2]; 2]; 2]; 2];
        let mut dpsi_d33dab = [[0.0; 2]; 2];
        let mut dpsi_d33 = self.c1;
        for ia in 0..2 {
            for ib in 0..2 {
                dpsi_d33dab[ia][ib] = self.c2 * gr[ia][ib];
                dpsi_d33 += self.c2 * gd[ia][ib] * gr[ia][ib];
                for ic in 0..2 {
                    for id in 0..2 {
                        d2psi[ia][ib][ic][id] = self.c2 * gr[ia][ib] * gr[ic][id]
                            - 0.5 * self.c2 * (gr[ia][ic] * gr[ib][id] + gr[ia][id] * gr[ib][ic]);
                    }
                }
            }
        }

        let mut cc = [[[[0.0; 2]; 2]; 2]; 2];
        for ia in 0..2 {
            for ib in 0..2 {
                for ic in 0..2 {
                    for id in 0..2 {
                        cc[ia][ib][ic][id] = 4.0 * d2psi[ia][ib][ic][id]
                            - 4.0 * dpsi_d33dab[ia][ib] * c33 * gc[ic][id]
                            - 4.0 * dpsi_d33dab[ic][id] * c33 * gc[ia][ib]
                            + 2.0
                                * dpsi_d33
                                * c33
                                * (2.0 * gc[ia][ib] * gc[ic][id]
                                    + gc[ia][ic] * gc[ib][id]
                                    + gc[ia][id] * gc[ib][ic]);
                    }
                }
            }
        }
        cc
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
