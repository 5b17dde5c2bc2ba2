use crate::StrError;

/// Spatial vector with three components
pub type Vec3 = [f64; 3];

/// Second-order tensor on the curvilinear surface basis (2×2 components)
pub type Tensor2 = [[f64; 2]; 2];

/// Fourth-order tensor on the curvilinear surface basis (2×2×2×2 components)
pub type Tensor4 = [[[[f64; 2]; 2]; 2]; 2];

/// Covariant basis of the mid-surface
///
/// Rows 0 and 1 hold the tangent vectors `a₁ = ∂x/∂ξ¹` and `a₂ = ∂x/∂ξ²`;
/// row 2 holds the unit normal `a₃ = a₁×a₂ / ‖a₁×a₂‖`.
pub type CovBasis = [Vec3; 3];

/// Parametric derivatives of the tangent vectors: `da_cov[α][β] = ∂aα/∂ξᵝ`
pub type CovBasisDeriv = [[Vec3; 2]; 2];

/// Tolerance below which the areal Jacobian flags a degenerate surface
pub const TOL_DEGENERATE: f64 = 1e-12;

/// Computes the cross product of two 3-vectors
#[inline]
pub fn cross(u: &Vec3, v: &Vec3) -> Vec3 {
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

/// Computes the dot product of two 3-vectors
#[inline]
pub fn dot(u: &Vec3, v: &Vec3) -> f64 {
    u[0] * v[0] + u[1] * v[1] + u[2] * v[2]
}

/// Computes the Euclidean norm of a 3-vector
#[inline]
pub fn norm(u: &Vec3) -> f64 {
    f64::sqrt(dot(u, u))
}

/// Computes the determinant of a 2×2 surface tensor
#[inline]
pub fn det2(t: &Tensor2) -> f64 {
    t[0][0] * t[1][1] - t[0][1] * t[1][0]
}

/// Computes the covariant metric `a_αβ = aα · aβ` from the tangent vectors
pub fn metric_covariant(a_cov: &CovBasis) -> Tensor2 {
    let mut am = [[0.0; 2]; 2];
    for ia in 0..2 {
        for ib in 0..2 {
            am[ia][ib] = dot(&a_cov[ia], &a_cov[ib]);
        }
    }
    am
}

/// Computes the contravariant metric as the inverse of the covariant metric
///
/// Returns an error if the covariant metric is singular (degenerate cell).
pub fn metric_contravariant(am_cov: &Tensor2) -> Result<Tensor2, StrError> {
    let det = det2(am_cov);
    if det.abs() < TOL_DEGENERATE * TOL_DEGENERATE {
        return Err("covariant metric tensor is singular");
    }
    Ok([
        [am_cov[1][1] / det, -am_cov[0][1] / det],
        [-am_cov[1][0] / det, am_cov[0][0] / det],
    ])
}

/// Computes the unit normal and the areal Jacobian `‖a₁×a₂‖`
pub fn unit_normal(a1: &Vec3, a2: &Vec3) -> Result<(Vec3, f64), StrError> {
    let a3_tilde = cross(a1, a2);
    let mag = norm(&a3_tilde);
    if mag < TOL_DEGENERATE {
        return Err("surface tangent vectors are parallel or null");
    }
    Ok(([a3_tilde[0] / mag, a3_tilde[1] / mag, a3_tilde[2] / mag], mag))
}

/// Computes the parametric derivatives of the unit normal
///
/// With `ã₃ = a₁×a₂` and `J = ‖ã₃‖`, the derivative along `ξᵅ` is
///
/// ```text
/// ∂a₃/∂ξᵅ = ∂ã₃/∂ξᵅ / J − (ã₃ · ∂ã₃/∂ξᵅ) / J³ · ã₃
/// ```
pub fn normal_derivatives(a_cov: &CovBasis, da_cov: &CovBasisDeriv) -> Result<[Vec3; 2], StrError> {
    let a3_tilde = cross(&a_cov[0], &a_cov[1]);
    let mag = norm(&a3_tilde);
    if mag < TOL_DEGENERATE {
        return Err("surface tangent vectors are parallel or null");
    }
    let mut da3 = [[0.0; 3]; 2];
    for ia in 0..2 {
        let t1 = cross(&da_cov[0][ia], &a_cov[1]);
        let t2 = cross(&a_cov[0], &da_cov[1][ia]);
        let dt = [t1[0] + t2[0], t1[1] + t2[1], t1[2] + t2[2]];
        let scale = dot(&a3_tilde, &dt) / (mag * mag * mag);
        for i in 0..3 {
            da3[ia][i] = dt[i] / mag - scale * a3_tilde[i];
        }
    }
    Ok(da3)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
