use crate::material::{cross, dot, norm, CovBasis, CovBasisDeriv, Tensor2, Vec3, TOL_DEGENERATE};
use crate::StrError;

/// Holds the scalar shape data of one local DOF at an integration point
#[derive(Clone, Copy, Debug)]
pub struct ShapeFn {
    /// Shape value `Nᵐ`
    pub value: f64,

    /// Parametric gradient `∂Nᵐ/∂ξᵅ`
    pub deriv: [f64; 2],

    /// Parametric Hessian `∂²Nᵐ/∂ξᵅ∂ξᵝ`
    pub deriv2: Tensor2,
}

/// Computes the variations of membrane and bending strains
///
/// Given two local DOFs `r` and `s` (each moving one spatial component of
/// one node), this evaluates at the current deformed configuration:
///
/// * the first variations of the unit normal, `a3_dr` and `a3_ds`, and the
///   mixed second variation `a3_drs` (quotient rule on `a₃ = ã₃/‖ã₃‖`)
/// * the first and mixed second variations of the membrane strain
///   `εαβ = (a_αβ − ā_αβ)/2` and of the bending strain
///   `καβ = ā_αβ·ā₃ − a_αβ·a₃`
///
/// Only the first variations enter the internal force; the `*_drs` terms
/// feed the consistent tangent.
pub struct StrainVariations {
    /// Variation of the unit normal along DOF r
    pub a3_dr: Vec3,

    /// Variation of the unit normal along DOF s
    pub a3_ds: Vec3,

    /// Mixed second variation of the unit normal
    pub a3_drs: Vec3,

    /// First variation of the membrane strain along DOF r
    pub membrane_strain_dr: Tensor2,

    /// First variation of the membrane strain along DOF s
    pub membrane_strain_ds: Tensor2,

    /// Mixed second variation of the membrane strain
    pub membrane_strain_drs: Tensor2,

    /// First variation of the bending strain along DOF r
    pub bending_strain_dr: Tensor2,

    /// First variation of the bending strain along DOF s
    pub bending_strain_ds: Tensor2,

    /// Mixed second variation of the bending strain
    pub bending_strain_drs: Tensor2,
}

impl StrainVariations {
    /// Computes the variations at an integration point
    ///
    /// # Input
    ///
    /// * `shape_r`, `shape_s` -- shape data of the nodes carrying DOFs r and s
    /// * `r`, `s` -- local DOF indices (component = index % 3)
    /// * `a_cov` -- deformed covariant basis at the point
    /// * `da_cov` -- deformed basis derivatives at the point
    pub fn new(
        shape_r: &ShapeFn,
        shape_s: &ShapeFn,
        r: usize,
        s: usize,
        a_cov: &CovBasis,
        da_cov: &CovBasisDeriv,
    ) -> Result<Self, StrError> {
        // basis variations: DOF r moves component r%3 of its node
        let mut a_cov_ar = [[0.0; 3]; 2]; // ∂aα/∂ur
        let mut a_cov_as = [[0.0; 3]; 2];
        let mut a_cov_abr = [[[0.0; 3]; 2]; 2]; // ∂aα,β/∂ur
        let mut a_cov_abs = [[[0.0; 3]; 2]; 2];
        for ia in 0..2 {
            a_cov_ar[ia][r % 3] = shape_r.deriv[ia];
            a_cov_as[ia][s % 3] = shape_s.deriv[ia];
            for ib in 0..2 {
                a_cov_abr[ia][ib][r % 3] = shape_r.deriv2[ia][ib];
                a_cov_abs[ia][ib][s % 3] = shape_s.deriv2[ia][ib];
            }
        }

        let a3_t = cross(&a_cov[0], &a_cov[1]);
        let a3_bar = norm(&a3_t);
        if a3_bar < TOL_DEGENERATE {
            return Err("surface tangent vectors are parallel or null");
        }

        // variations of ã₃ = a₁×a₂ and of its magnitude
        let t1 = cross(&a_cov_ar[0], &a_cov[1]);
        let t2 = cross(&a_cov[0], &a_cov_ar[1]);
        let a3_t_dr = [t1[0] + t2[0], t1[1] + t2[1], t1[2] + t2[2]];
        let t1 = cross(&a_cov_as[0], &a_cov[1]);
        let t2 = cross(&a_cov[0], &a_cov_as[1]);
        let a3_t_ds = [t1[0] + t2[0], t1[1] + t2[1], t1[2] + t2[2]];
        let t1 = cross(&a_cov_ar[0], &a_cov_as[1]);
        let t2 = cross(&a_cov_as[0], &a_cov_ar[1]);
        let a3_t_drs = [t1[0] + t2[0], t1[1] + t2[1], t1[2] + t2[2]];

        let a3_bar_dr = dot(&a3_t, &a3_t_dr) / a3_bar;
        let a3_bar_ds = dot(&a3_t, &a3_t_ds) / a3_bar;
        let a3_bar_drs = dot(&a3_t_ds, &a3_t_dr) / a3_bar + dot(&a3_t, &a3_t_drs) / a3_bar
            - (a3_bar_ds * a3_bar_dr) / a3_bar;

        // quotient rule on a₃ = ã₃/‖ã₃‖
        let b2 = a3_bar * a3_bar;
        let b3 = b2 * a3_bar;
        let mut a3_dr = [0.0; 3];
        let mut a3_ds = [0.0; 3];
        let mut a3_drs = [0.0; 3];
        for i in 0..3 {
            a3_dr[i] = a3_t_dr[i] / a3_bar - a3_bar_dr * a3_t[i] / b2;
            a3_ds[i] = a3_t_ds[i] / a3_bar - a3_bar_ds * a3_t[i] / b2;
            a3_drs[i] = a3_t_drs[i] / a3_bar - a3_bar_drs * a3_t[i] / b2
                - a3_bar_dr * a3_t_ds[i] / b2
                - a3_bar_ds * a3_t_dr[i] / b2
                + 2.0 * a3_bar_dr * a3_bar_ds * a3_t[i] / b3;
        }

        let mut membrane_strain_dr = [[0.0; 2]; 2];
        let mut membrane_strain_ds = [[0.0; 2]; 2];
        let mut membrane_strain_drs = [[0.0; 2]; 2];
        let mut bending_strain_dr = [[0.0; 2]; 2];
        let mut bending_strain_ds = [[0.0; 2]; 2];
        let mut bending_strain_drs = [[0.0; 2]; 2];
        for ia in 0..2 {
            for ib in 0..2 {
                membrane_strain_dr[ia][ib] =
                    0.5 * (dot(&a_cov_ar[ia], &a_cov[ib]) + dot(&a_cov_ar[ib], &a_cov[ia]));
                membrane_strain_ds[ia][ib] =
                    0.5 * (dot(&a_cov_as[ia], &a_cov[ib]) + dot(&a_cov_as[ib], &a_cov[ia]));
                membrane_strain_drs[ia][ib] =
                    0.5 * (dot(&a_cov_ar[ia], &a_cov_as[ib]) + dot(&a_cov_ar[ib], &a_cov_as[ia]));

                bending_strain_dr[ia][ib] =
                    -(dot(&a_cov_abr[ia][ib], &a_cov[2]) + dot(&da_cov[ia][ib], &a3_dr));
                bending_strain_ds[ia][ib] =
                    -(dot(&a_cov_abs[ia][ib], &a_cov[2]) + dot(&da_cov[ia][ib], &a3_ds));
                bending_strain_drs[ia][ib] = -(dot(&a_cov_abr[ia][ib], &a3_ds)
                    + dot(&a_cov_abs[ia][ib], &a3_dr)
                    + dot(&da_cov[ia][ib], &a3_drs));
            }
        }

        Ok(StrainVariations {
            a3_dr,
            a3_ds,
            a3_drs,
            membrane_strain_dr,
            membrane_strain_ds,
            membrane_strain_drs,
            bending_strain_dr,
            bending_strain_ds,
            bending_strain_drs,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{metric_covariant, unit_normal};
    use russell_lab::{approx_eq, vec_approx_eq, Vector};

    // curved test configuration: tangents not orthonormal, nonzero curvature
    fn curved_config() -> (CovBasis, CovBasisDeriv) {
        let a1 = [1.0, 0.1, 0.3];
        let a2 = [-0.2, 1.0, 0.15];
        let (a3, _) = unit_normal(&a1, &a2).unwrap();
        let da_cov = [
            [[0.02, 0.0, 0.4], [0.0, 0.01, 0.12]],
            [[0.0, 0.01, 0.12], [-0.03, 0.0, 0.25]],
        ];
        ([a1, a2, a3], da_cov)
    }

    fn sample_shape() -> (ShapeFn, ShapeFn) {
        let shape_r = ShapeFn {
            value: 0.4,
            deriv: [0.3, -0.2],
            deriv2: [[0.1, 0.05], [0.05, -0.07]],
        };
        let shape_s = ShapeFn {
            value: 0.25,
            deriv: [-0.15, 0.45],
            deriv2: [[-0.02, 0.08], [0.08, 0.03]],
        };
        (shape_r, shape_s)
    }

    // applies the perturbation of DOF r with magnitude h to the configuration
    fn perturb(
        a_cov: &CovBasis,
        da_cov: &CovBasisDeriv,
        shape: &ShapeFn,
        comp: usize,
        h: f64,
    ) -> (CovBasis, CovBasisDeriv) {
        let mut a = *a_cov;
        let mut da = *da_cov;
        for ia in 0..2 {
            a[ia][comp] += shape.deriv[ia] * h;
            for ib in 0..2 {
                da[ia][ib][comp] += shape.deriv2[ia][ib] * h;
            }
        }
        // refresh the unit normal after moving the tangents
        let (a3, _) = unit_normal(&a[0], &a[1]).unwrap();
        a[2] = a3;
        (a, da)
    }

    #[test]
    fn new_captures_degenerate_configuration() {
        let (shape_r, shape_s) = sample_shape();
        let a_cov = [[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let da_cov = [[[0.0; 3]; 2]; 2];
        assert_eq!(
            StrainVariations::new(&shape_r, &shape_s, 0, 1, &a_cov, &da_cov).err(),
            Some("surface tangent vectors are parallel or null")
        );
    }

    #[test]
    fn normal_variation_matches_finite_differences() {
        let (a_cov, da_cov) = curved_config();
        let (shape_r, shape_s) = sample_shape();
        let (r, s) = (2, 7); // components 2 and 1
        let vars = StrainVariations::new(&shape_r, &shape_s, r, s, &a_cov, &da_cov).unwrap();
        let h = 1e-6;
        let (ap, _) = perturb(&a_cov, &da_cov, &shape_r, r % 3, h);
        let (am, _) = perturb(&a_cov, &da_cov, &shape_r, r % 3, -h);
        let mut fd = [0.0; 3];
        for i in 0..3 {
            fd[i] = (ap[2][i] - am[2][i]) / (2.0 * h);
        }
        vec_approx_eq(&Vector::from(&fd), &vars.a3_dr, 1e-8);
    }

    #[test]
    fn membrane_variation_matches_finite_differences() {
        let (a_cov, da_cov) = curved_config();
        let (shape_r, shape_s) = sample_shape();
        let (r, s) = (3, 5);
        let vars = StrainVariations::new(&shape_r, &shape_s, r, s, &a_cov, &da_cov).unwrap();
        let h = 1e-6;
        // membrane strain is (a_αβ − ā_αβ)/2; the reference part drops out
        // of the difference
        let (ap, _) = perturb(&a_cov, &da_cov, &shape_r, r % 3, h);
        let (am, _) = perturb(&a_cov, &da_cov, &shape_r, r % 3, -h);
        let mp = metric_covariant(&ap);
        let mm = metric_covariant(&am);
        for ia in 0..2 {
            for ib in 0..2 {
                let fd = 0.5 * (mp[ia][ib] - mm[ia][ib]) / (2.0 * h);
                approx_eq(vars.membrane_strain_dr[ia][ib], fd, 1e-8);
            }
        }
    }

    #[test]
    fn bending_variation_matches_finite_differences() {
        let (a_cov, da_cov) = curved_config();
        let (shape_r, shape_s) = sample_shape();
        let (r, s) = (4, 8);
        let vars = StrainVariations::new(&shape_r, &shape_s, r, s, &a_cov, &da_cov).unwrap();
        let h = 1e-6;
        // bending strain difference: κ = ā·ā₃ − a_αβ·a₃; only the deformed
        // part varies
        let kappa = |a: &CovBasis, da: &CovBasisDeriv| -> Tensor2 {
            let mut k = [[0.0; 2]; 2];
            for ia in 0..2 {
                for ib in 0..2 {
                    k[ia][ib] = -dot(&da[ia][ib], &a[2]);
                }
            }
            k
        };
        let (ap, dap) = perturb(&a_cov, &da_cov, &shape_s, s % 3, h);
        let (am, dam) = perturb(&a_cov, &da_cov, &shape_s, s % 3, -h);
        let kp = kappa(&ap, &dap);
        let km = kappa(&am, &dam);
        for ia in 0..2 {
            for ib in 0..2 {
                let fd = (kp[ia][ib] - km[ia][ib]) / (2.0 * h);
                approx_eq(vars.bending_strain_ds[ia][ib], fd, 1e-7);
            }
        }
    }

    #[test]
    fn mixed_second_variations_are_symmetric_in_r_and_s() {
        let (a_cov, da_cov) = curved_config();
        let (shape_r, shape_s) = sample_shape();
        let (r, s) = (2, 7);
        let ab = StrainVariations::new(&shape_r, &shape_s, r, s, &a_cov, &da_cov).unwrap();
        let ba = StrainVariations::new(&shape_s, &shape_r, s, r, &a_cov, &da_cov).unwrap();
        vec_approx_eq(&Vector::from(&ab.a3_drs), &ba.a3_drs, 1e-14);
        for ia in 0..2 {
            for ib in 0..2 {
                approx_eq(
                    ab.membrane_strain_drs[ia][ib],
                    ba.membrane_strain_drs[ia][ib],
                    1e-14,
                );
                approx_eq(
                    ab.bending_strain_drs[ia][ib],
                    ba.bending_strain_drs[ia][ib],
                    1e-14,
                );
            }
        }
    }
}
