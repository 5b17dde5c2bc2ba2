use super::{CovBasis, CovBasisDeriv, IntegralTensors, ShellMaterial, Vec3};
use crate::StrError;

/// Holds the material state of all surface integration points
///
/// The states are stored in a flat arena addressed by `(cell_id, p)` where
/// `p` is the index of the integration point within the cell. Each slot must
/// be set up exactly once (on the first assembly pass) and may be updated
/// many times afterwards.
pub struct PointHistory {
    /// Maps cell_id to the first slot of the cell (length = ncell + 1)
    offsets: Vec<usize>,

    /// Flat storage of material states
    all: Vec<Option<ShellMaterial>>,
}

impl PointHistory {
    /// Allocates empty slots given the number of integration points per cell
    pub fn new(n_points_per_cell: &[usize]) -> Self {
        let mut offsets = Vec::with_capacity(n_points_per_cell.len() + 1);
        let mut total = 0;
        offsets.push(0);
        for n in n_points_per_cell {
            total += n;
            offsets.push(total);
        }
        PointHistory {
            offsets,
            all: (0..total).map(|_| None).collect(),
        }
    }

    /// Returns the total number of slots
    pub fn n_points(&self) -> usize {
        self.all.len()
    }

    fn index(&self, cell_id: usize, p: usize) -> Result<usize, StrError> {
        if cell_id + 1 >= self.offsets.len() {
            return Err("cell_id is out of bounds");
        }
        let start = self.offsets[cell_id];
        if start + p >= self.offsets[cell_id + 1] {
            return Err("integration point index is out of bounds");
        }
        Ok(start + p)
    }

    /// Stores the material state of an integration point (setup pass)
    ///
    /// Returns an error if the slot has been set up already.
    pub fn setup(&mut self, cell_id: usize, p: usize, material: ShellMaterial) -> Result<(), StrError> {
        let index = self.index(cell_id, p)?;
        if self.all[index].is_some() {
            return Err("integration point has been set up already");
        }
        self.all[index] = Some(material);
        Ok(())
    }

    /// Accumulates a displacement-gradient increment at an integration point
    pub fn update(
        &mut self,
        cell_id: usize,
        p: usize,
        delta_u_der: &[Vec3; 2],
        delta_u_der2: &[[Vec3; 2]; 2],
    ) -> Result<(), StrError> {
        let index = self.index(cell_id, p)?;
        match &mut self.all[index] {
            Some(material) => {
                material.update(delta_u_der, delta_u_der2);
                Ok(())
            }
            None => Err("integration point has not been set up"),
        }
    }

    fn get(&self, cell_id: usize, p: usize) -> Result<&ShellMaterial, StrError> {
        let index = self.index(cell_id, p)?;
        match &self.all[index] {
            Some(material) => Ok(material),
            None => Err("integration point has not been set up"),
        }
    }

    /// Computes the integrated stress resultants and elasticity tensors
    pub fn integral_tensors(&self, cell_id: usize, p: usize) -> Result<IntegralTensors, StrError> {
        self.get(cell_id, p)?.integral_tensors()
    }

    /// Returns the deformed covariant basis at an integration point
    pub fn deformed_bases(&self, cell_id: usize, p: usize) -> Result<CovBasis, StrError> {
        Ok(self.get(cell_id, p)?.deformed_bases())
    }

    /// Returns the deformed basis derivatives at an integration point
    pub fn deformed_bases_deriv(&self, cell_id: usize, p: usize) -> Result<CovBasisDeriv, StrError> {
        Ok(self.get(cell_id, p)?.deformed_bases_deriv())
    }

    /// Returns the mid-surface principal stretch at an integration point
    pub fn stretch(&self, cell_id: usize, p: usize) -> Result<f64, StrError> {
        Ok(self.get(cell_id, p)?.stretch())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
