use crate::StrError;

// Gauss-Legendre abscissae and weights on [-1,1]

const GAUSS_1_X: [f64; 1] = [0.0];
const GAUSS_1_W: [f64; 1] = [2.0];

const GAUSS_2_X: [f64; 2] = [-0.5773502691896257, 0.5773502691896257];
const GAUSS_2_W: [f64; 2] = [1.0, 1.0];

const GAUSS_3_X: [f64; 3] = [-0.7745966692414834, 0.0, 0.7745966692414834];
const GAUSS_3_W: [f64; 3] = [
    0.5555555555555556,
    0.8888888888888888,
    0.5555555555555556,
];

const GAUSS_4_X: [f64; 4] = [
    -0.8611363115940526,
    -0.3399810435848563,
    0.3399810435848563,
    0.8611363115940526,
];
const GAUSS_4_W: [f64; 4] = [
    0.3478548451374538,
    0.6521451548625461,
    0.6521451548625461,
    0.3478548451374538,
];

/// Returns the 1D Gauss-Legendre rule with n points (1 ≤ n ≤ 4)
pub fn gauss_legendre(n: usize) -> Result<(&'static [f64], &'static [f64]), StrError> {
    match n {
        1 => Ok((&GAUSS_1_X, &GAUSS_1_W)),
        2 => Ok((&GAUSS_2_X, &GAUSS_2_W)),
        3 => Ok((&GAUSS_3_X, &GAUSS_3_W)),
        4 => Ok((&GAUSS_4_X, &GAUSS_4_W)),
        _ => Err("number of Gauss points must be in 1..=4"),
    }
}

/// Holds a tensor-product Gauss rule on the reference square [-1,1]²
pub struct GaussQua {
    /// Parametric coordinates of the integration points
    pub coords: Vec<[f64; 2]>,

    /// Integration weights (product of the 1D weights)
    pub weights: Vec<f64>,
}

impl GaussQua {
    /// Allocates a rule with n points per direction (n² points in total)
    pub fn new(n_per_dir: usize) -> Result<Self, StrError> {
        let (x, w) = gauss_legendre(n_per_dir)?;
        let mut coords = Vec::with_capacity(n_per_dir * n_per_dir);
        let mut weights = Vec::with_capacity(n_per_dir * n_per_dir);
        for j in 0..n_per_dir {
            for i in 0..n_per_dir {
                coords.push([x[i], x[j]]);
                weights.push(w[i] * w[j]);
            }
        }
        Ok(GaussQua { coords, weights })
    }

    /// Returns the total number of integration points
    pub fn npoint(&self) -> usize {
        self.coords.len()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use russell_lab::approx_eq;

    #[test]
    fn gauss_legendre_integrates_polynomials() {
        // an n-point rule is exact up to degree 2n-1
        for n in 1..=4 {
            let (x, w) = gauss_legendre(n).unwrap();
            let mut sum = 0.0;
            for p in 0..n {
                sum += w[p];
            }
            approx_eq(sum, 2.0, 1e-14);
            if n >= 2 {
                // ∫ x² dx on [-1,1] = 2/3
                let mut sum = 0.0;
                for p in 0..n {
                    sum += w[p] * x[p] * x[p];
                }
                approx_eq(sum, 2.0 / 3.0, 1e-14);
            }
        }
        assert_eq!(
            gauss_legendre(5).err(),
            Some("number of Gauss points must be in 1..=4")
        );
    }

    #[test]
    fn gauss_qua_works() {
        let gauss = GaussQua::new(3).unwrap();
        assert_eq!(gauss.npoint(), 9);
        // ∫∫ ξ²η⁴ over [-1,1]² = (2/3)(2/5)
        let mut sum = 0.0;
        for p in 0..gauss.npoint() {
            let [ksi, eta] = gauss.coords[p];
            sum += gauss.weights[p] * ksi * ksi * eta.powi(4);
        }
        approx_eq(sum, 4.0 / 15.0, 1e-14);
    }
}
