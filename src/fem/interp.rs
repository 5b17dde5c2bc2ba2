use crate::StrError;
use gemlab::shapes::GeoKind;
use russell_lab::{Matrix, Vector};

// 1D linear Lagrange basis at nodes {-1, 1}
fn lin2(s: f64) -> ([f64; 2], [f64; 2], [f64; 2]) {
    (
        [(1.0 - s) / 2.0, (1.0 + s) / 2.0],
        [-0.5, 0.5],
        [0.0, 0.0],
    )
}

// 1D cubic Lagrange basis at nodes {-1, -1/3, 1/3, 1}
fn lag4(s: f64) -> ([f64; 4], [f64; 4], [f64; 4]) {
    let nn = [
        -9.0 / 16.0 * (s * s * s - s * s - s / 9.0 + 1.0 / 9.0),
        27.0 / 16.0 * (s * s * s - s * s / 3.0 - s + 1.0 / 3.0),
        -27.0 / 16.0 * (s * s * s + s * s / 3.0 - s - 1.0 / 3.0),
        9.0 / 16.0 * (s * s * s + s * s - s / 9.0 - 1.0 / 9.0),
    ];
    let d1 = [
        -9.0 / 16.0 * (3.0 * s * s - 2.0 * s - 1.0 / 9.0),
        27.0 / 16.0 * (3.0 * s * s - 2.0 * s / 3.0 - 1.0),
        -27.0 / 16.0 * (3.0 * s * s + 2.0 * s / 3.0 - 1.0),
        9.0 / 16.0 * (3.0 * s * s + 2.0 * s - 1.0 / 9.0),
    ];
    let d2 = [
        -9.0 / 16.0 * (6.0 * s - 2.0),
        27.0 / 16.0 * (6.0 * s - 2.0 / 3.0),
        -27.0 / 16.0 * (6.0 * s + 2.0 / 3.0),
        9.0 / 16.0 * (6.0 * s + 2.0),
    ];
    (nn, d1, d2)
}

/// Implements shape interpolation with first and second parametric derivatives
///
/// Supported kinds:
///
/// * `Qua4` -- bilinear, with the counter-clockwise corner ordering
///   `(-1,-1), (1,-1), (1,1), (-1,1)`
/// * `Qua16` -- bicubic Lagrange on the 4×4 lattice with nodes at
///   `{-1, -1/3, 1/3, 1}` in each direction, ordered lexicographically
///   (`m = 4 j + i`, `i` along ξ, `j` along η)
pub struct Interp {
    kind: GeoKind,
    nnode: usize,
}

impl Interp {
    /// Allocates a new instance
    pub fn new(kind: GeoKind) -> Result<Self, StrError> {
        let nnode = match kind {
            GeoKind::Qua4 => 4,
            GeoKind::Qua16 => 16,
            _ => return Err("shell cells must be Qua4 or Qua16"),
        };
        Ok(Interp { kind, nnode })
    }

    /// Returns the number of nodes
    pub fn nnode(&self) -> usize {
        self.nnode
    }

    /// Evaluates values, gradients, and Hessians at a parametric point
    ///
    /// * `nn` -- (nnode) shape values
    /// * `deriv` -- (nnode, 2) first derivatives `∂Nᵐ/∂ξᵅ`
    /// * `deriv2` -- (nnode) Hessians `∂²Nᵐ/∂ξᵅ∂ξᵝ`
    pub fn calc(
        &self,
        nn: &mut Vector,
        deriv: &mut Matrix,
        deriv2: &mut Vec<[[f64; 2]; 2]>,
        ksi: &[f64; 2],
    ) -> Result<(), StrError> {
        if nn.dim() != self.nnode || deriv.dims() != (self.nnode, 2) || deriv2.len() != self.nnode {
            return Err("arrays are incompatible with the number of nodes");
        }
        match self.kind {
            GeoKind::Qua4 => {
                let (fx, gx, hx) = lin2(ksi[0]);
                let (fy, gy, hy) = lin2(ksi[1]);
                // corner m ↔ 1D indices (i,j)
                const IJ: [(usize, usize); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];
                for m in 0..4 {
                    let (i, j) = IJ[m];
                    nn[m] = fx[i] * fy[j];
                    deriv.set(m, 0, gx[i] * fy[j]);
                    deriv.set(m, 1, fx[i] * gy[j]);
                    deriv2[m] = [
                        [hx[i] * fy[j], gx[i] * gy[j]],
                        [gx[i] * gy[j], fx[i] * hy[j]],
                    ];
                }
            }
            GeoKind::Qua16 => {
                let (fx, gx, hx) = lag4(ksi[0]);
                let (fy, gy, hy) = lag4(ksi[1]);
                for j in 0..4 {
                    for i in 0..4 {
                        let m = 4 * j + i;
                        nn[m] = fx[i] * fy[j];
                        deriv.set(m, 0, gx[i] * fy[j]);
                        deriv.set(m, 1, fx[i] * gy[j]);
                        deriv2[m] = [
                            [hx[i] * fy[j], gx[i] * gy[j]],
                            [gx[i] * gy[j], fx[i] * hy[j]],
                        ];
                    }
                }
            }
            _ => unreachable!(),
        }
        Ok(())
    }
}

/// Returns the parametric point on an edge of the reference square
///
/// `t` runs on [-1,1] along the edge; also returns the parametric
/// direction (0 = ξ, 1 = η) that varies along the edge.
///
/// ```text
///        edge 2
///      3-------2
///      |       |
/// edge 3       edge 1
///      |       |
///      0-------1
///        edge 0
/// ```
pub fn edge_point(edge: usize, t: f64) -> Result<([f64; 2], usize), StrError> {
    match edge {
        0 => Ok(([t, -1.0], 0)),
        1 => Ok(([1.0, t], 1)),
        2 => Ok(([t, 1.0], 0)),
        3 => Ok(([-1.0, t], 1)),
        _ => Err("edge index must be in 0..=3"),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
