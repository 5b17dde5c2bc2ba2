use crate::StrError;
use russell_lab::{Matrix, Vector};
use russell_sparse::CooMatrix;

/// Assembles a local vector into the global vector
pub fn assemble_vector(ff: &mut Vector, fe: &Vector, local_to_global: &[usize]) -> Result<(), StrError> {
    let ndof = fe.dim();
    if local_to_global.len() != ndof {
        return Err("local-to-global map is incompatible with the local vector");
    }
    for i in 0..ndof {
        if local_to_global[i] >= ff.dim() {
            return Err("global equation number is out of bounds");
        }
        ff[local_to_global[i]] += fe[i];
    }
    Ok(())
}

/// Assembles a local matrix, scaled by alpha, into the global sparse matrix
///
/// Zero local entries are skipped to keep the number of stored values low.
pub fn assemble_matrix(
    kk: &mut CooMatrix,
    kke: &Matrix,
    local_to_global: &[usize],
    alpha: f64,
) -> Result<(), StrError> {
    let (nrow, ncol) = kke.dims();
    if local_to_global.len() != nrow || nrow != ncol {
        return Err("local-to-global map is incompatible with the local matrix");
    }
    for i in 0..nrow {
        for j in 0..ncol {
            let value = kke.get(i, j);
            if value != 0.0 {
                kk.put(local_to_global[i], local_to_global[j], alpha * value)?;
            }
        }
    }
    Ok(())
}

/// Accumulates the diagonal of a local matrix, scaled by alpha, into a global vector
///
/// The result feeds the Jacobi preconditioner of the iterative solver.
pub fn assemble_diagonal(
    diag: &mut Vector,
    kke: &Matrix,
    local_to_global: &[usize],
    alpha: f64,
) -> Result<(), StrError> {
    let (nrow, ncol) = kke.dims();
    if local_to_global.len() != nrow || nrow != ncol {
        return Err("local-to-global map is incompatible with the local matrix");
    }
    for i in 0..nrow {
        if local_to_global[i] >= diag.dim() {
            return Err("global equation number is out of bounds");
        }
        diag[local_to_global[i]] += alpha * kke.get(i, i);
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
