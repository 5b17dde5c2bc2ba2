use super::{edge_point, gauss_legendre, GaussQua, Interp, ShapeFn, StrainVariations};
use crate::base::{Config, ParamShell};
use crate::material::{
    norm, unit_normal, CovBasis, CovBasisDeriv, PointHistory, ShellMaterial, Vec3,
};
use crate::StrError;
use gemlab::mesh::{Cell, Mesh};
use gemlab::shapes::GeoKind;
use russell_lab::{Matrix, Vector};

/// Implements the per-cell assembly worker for Kirchhoff-Love shells
///
/// The element owns the local arrays of one cell: the mass-like system
/// matrix, the internal force vector, the boundary penalty mass, and the
/// projection mass/load pair. The solver scatters them into the global
/// system with the local-to-global map (three interleaved DOFs per node).
pub struct ElementShell<'a> {
    /// The cell
    pub cell: &'a Cell,

    /// Local-to-global DOF map (global equation = 3 point_id + component)
    pub local_to_global: Vec<usize>,

    /// Mass-like system matrix (matching components only)
    pub kk: Matrix,

    /// Internal force vector
    pub ff_int: Vector,

    /// Boundary penalty mass matrix
    pub kk_bry: Matrix,

    /// Projection mass matrix
    pub mm: Matrix,

    /// Load projection right-hand side
    pub ff_load: Vector,

    param: ParamShell,
    interp: Interp,
    gauss: GaussQua,
    edge_gauss: (&'static [f64], &'static [f64]),
    bc_tolerance: f64,
    ndof: usize,

    /// Reference coordinates of the nodes (nnode × 3)
    xx: Matrix,
}

impl<'a> ElementShell<'a> {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, config: &Config, cell: &'a Cell, param: ParamShell) -> Result<Self, StrError> {
        if mesh.ndim != 3 {
            return Err("shell meshes must be embedded in 3D space");
        }
        let interp = Interp::new(cell.kind)?;
        let nnode = interp.nnode();
        if cell.points.len() != nnode {
            return Err("cell connectivity is incompatible with the cell kind");
        }
        let n_integ_1d = match config.n_integ_point_1d {
            Some(n) => n,
            None => match cell.kind {
                GeoKind::Qua4 => 2,
                _ => 4,
            },
        };
        let gauss = GaussQua::new(n_integ_1d)?;
        let edge_gauss = gauss_legendre(n_integ_1d)?;
        let ndof = 3 * nnode;
        let mut local_to_global = Vec::with_capacity(ndof);
        let mut xx = Matrix::new(nnode, 3);
        for m in 0..nnode {
            let point_id = cell.points[m];
            if point_id >= mesh.points.len() {
                return Err("cell connectivity points to a non-existent point");
            }
            for i in 0..3 {
                local_to_global.push(3 * point_id + i);
                xx.set(m, i, mesh.points[point_id].coords[i]);
            }
        }
        Ok(ElementShell {
            cell,
            local_to_global,
            kk: Matrix::new(ndof, ndof),
            ff_int: Vector::new(ndof),
            kk_bry: Matrix::new(ndof, ndof),
            mm: Matrix::new(ndof, ndof),
            ff_load: Vector::new(ndof),
            param,
            interp,
            gauss,
            edge_gauss,
            bc_tolerance: config.bc_tolerance,
            ndof,
            xx,
        })
    }

    /// Returns the number of surface integration points
    pub fn n_integ_points(&self) -> usize {
        self.gauss.npoint()
    }

    /// Returns the number of local DOFs (3 nnode)
    pub fn n_local_dof(&self) -> usize {
        self.ndof
    }

    // evaluates the reference covariant basis and its derivatives at a parametric point
    fn reference_geometry(
        &self,
        deriv: &Matrix,
        deriv2: &[[[f64; 2]; 2]],
    ) -> Result<(CovBasis, CovBasisDeriv, f64), StrError> {
        let nnode = self.interp.nnode();
        let mut a_cov: CovBasis = [[0.0; 3]; 3];
        let mut da_cov: CovBasisDeriv = [[[0.0; 3]; 2]; 2];
        for m in 0..nnode {
            for i in 0..3 {
                let x = self.xx.get(m, i);
                for ia in 0..2 {
                    a_cov[ia][i] += deriv.get(m, ia) * x;
                    for ib in 0..2 {
                        da_cov[ia][ib][i] += deriv2[m][ia][ib] * x;
                    }
                }
            }
        }
        let (a3, detj) = unit_normal(&a_cov[0], &a_cov[1])?;
        a_cov[2] = a3;
        Ok((a_cov, da_cov, detj))
    }

    // extracts the shape data of one local DOF
    fn shape_fn(nn: &Vector, deriv: &Matrix, deriv2: &[[[f64; 2]; 2]], r: usize) -> ShapeFn {
        let m = r / 3;
        ShapeFn {
            value: nn[m],
            deriv: [deriv.get(m, 0), deriv.get(m, 1)],
            deriv2: deriv2[m],
        }
    }

    /// Assembles the mass-like system matrix and the internal force vector
    ///
    /// On the first pass (`initial = true`) the reference geometry is
    /// captured into the material history; every pass accumulates the
    /// displacement-gradient increment interpolated from `uu` into the
    /// history before integrating the stress resultants.
    pub fn assemble(&mut self, initial: bool, uu: &Vector, history: &mut PointHistory) -> Result<(), StrError> {
        self.kk.fill(0.0); // << important
        self.ff_int.fill(0.0);
        let nnode = self.interp.nnode();
        let mut nn = Vector::new(nnode);
        let mut deriv = Matrix::new(nnode, 2);
        let mut deriv2 = vec![[[0.0; 2]; 2]; nnode];
        for p in 0..self.gauss.npoint() {
            let ksi = self.gauss.coords[p];
            self.interp.calc(&mut nn, &mut deriv, &mut deriv2, &ksi)?;
            let (a_cov_ref, da_cov_ref, detj) = self.reference_geometry(&deriv, &deriv2)?;
            if initial {
                let material = ShellMaterial::new(&self.param, a_cov_ref, da_cov_ref)?;
                history.setup(self.cell.id, p, material)?;
            }

            // interpolate the displacement-gradient increment
            let mut du_der: [Vec3; 2] = [[0.0; 3]; 2];
            let mut du_der2: [[Vec3; 2]; 2] = [[[0.0; 3]; 2]; 2];
            for r in 0..self.ndof {
                let m = r / 3;
                let coeff = uu[self.local_to_global[r]];
                for ia in 0..2 {
                    du_der[ia][r % 3] += deriv.get(m, ia) * coeff;
                    for ib in 0..2 {
                        du_der2[ia][ib][r % 3] += deriv2[m][ia][ib] * coeff;
                    }
                }
            }
            history.update(self.cell.id, p, &du_der, &du_der2)?;

            let tensors = history.integral_tensors(self.cell.id, p)?;
            let a_cov_def = history.deformed_bases(self.cell.id, p)?;
            let da_cov_def = history.deformed_bases_deriv(self.cell.id, p)?;

            let jxw = detj * self.gauss.weights[p];
            for r in 0..self.ndof {
                let shape_r = Self::shape_fn(&nn, &deriv, &deriv2, r);
                let vars = StrainVariations::new(&shape_r, &shape_r, r, r, &a_cov_def, &da_cov_def)?;
                for ia in 0..2 {
                    for ib in 0..2 {
                        self.ff_int[r] += (vars.membrane_strain_dr[ia][ib]
                            * tensors.resultants[0][ia][ib]
                            + vars.bending_strain_dr[ia][ib] * tensors.resultants[1][ia][ib])
                            * jxw;
                    }
                }
                for s in 0..self.ndof {
                    if r % 3 == s % 3 {
                        let value = self.kk.get(r, s) + shape_r.value * nn[s / 3] * jxw;
                        self.kk.set(r, s, value);
                    }
                }
            }
        }
        Ok(())
    }

    /// Computes the consistent tangent stiffness of the cell
    ///
    /// Contracts the strain variations with the integrated elasticity
    /// tensors and adds the geometric part carried by the mixed second
    /// variations. Nothing consumes this matrix in the incremental scheme
    /// yet; it is the entry point for a full Newton iteration.
    pub fn calc_local_stiffness(&self, history: &PointHistory, kke: &mut Matrix) -> Result<(), StrError> {
        if kke.dims() != (self.ndof, self.ndof) {
            return Err("local stiffness matrix has incompatible dimensions");
        }
        kke.fill(0.0);
        let nnode = self.interp.nnode();
        let mut nn = Vector::new(nnode);
        let mut deriv = Matrix::new(nnode, 2);
        let mut deriv2 = vec![[[0.0; 2]; 2]; nnode];
        for p in 0..self.gauss.npoint() {
            let ksi = self.gauss.coords[p];
            self.interp.calc(&mut nn, &mut deriv, &mut deriv2, &ksi)?;
            let (_, _, detj) = self.reference_geometry(&deriv, &deriv2)?;
            let tensors = history.integral_tensors(self.cell.id, p)?;
            let a_cov_def = history.deformed_bases(self.cell.id, p)?;
            let da_cov_def = history.deformed_bases_deriv(self.cell.id, p)?;
            let jxw = detj * self.gauss.weights[p];
            for r in 0..self.ndof {
                let shape_r = Self::shape_fn(&nn, &deriv, &deriv2, r);
                for s in 0..self.ndof {
                    let shape_s = Self::shape_fn(&nn, &deriv, &deriv2, s);
                    let vars =
                        StrainVariations::new(&shape_r, &shape_s, r, s, &a_cov_def, &da_cov_def)?;
                    let mut sum = 0.0;
                    for ia in 0..2 {
                        for ib in 0..2 {
                            // material part
                            for ic in 0..2 {
                                for id in 0..2 {
                                    sum += vars.membrane_strain_dr[ia][ib]
                                        * (tensors.dd[0][ia][ib][ic][id]
                                            * vars.membrane_strain_ds[ic][id]
                                            + tensors.dd[1][ia][ib][ic][id]
                                                * vars.bending_strain_ds[ic][id])
                                        + vars.bending_strain_dr[ia][ib]
                                            * (tensors.dd[1][ia][ib][ic][id]
                                                * vars.membrane_strain_ds[ic][id]
                                                + tensors.dd[2][ia][ib][ic][id]
                                                    * vars.bending_strain_ds[ic][id]);
                                }
                            }
                            // geometric part
                            sum += tensors.resultants[0][ia][ib] * vars.membrane_strain_drs[ia][ib]
                                + tensors.resultants[1][ia][ib] * vars.bending_strain_drs[ia][ib];
                        }
                    }
                    kke.set(r, s, kke.get(r, s) + sum * jxw);
                }
            }
        }
        Ok(())
    }

    /// Assembles the boundary penalty mass matrix and records constrained DOFs
    ///
    /// Walks the four edges of the cell with a 1D Gauss rule; wherever an
    /// edge point lies on a coordinate plane, the matching displacement
    /// component is penalized (symmetry condition) and every DOF whose
    /// shape value is active at that point is recorded in `constrained`.
    pub fn assemble_boundary(&mut self, constrained: &mut Vec<usize>) -> Result<(), StrError> {
        self.kk_bry.fill(0.0);
        let tol = self.bc_tolerance;
        let nnode = self.interp.nnode();
        let mut nn = Vector::new(nnode);
        let mut deriv = Matrix::new(nnode, 2);
        let mut deriv2 = vec![[[0.0; 2]; 2]; nnode];
        let (xg, wg) = self.edge_gauss;
        for edge in 0..4 {
            for iq in 0..xg.len() {
                let (ksi, dir) = edge_point(edge, xg[iq])?;
                self.interp.calc(&mut nn, &mut deriv, &mut deriv2, &ksi)?;

                // position and edge tangent
                let mut x = [0.0; 3];
                let mut tangent = [0.0; 3];
                for m in 0..nnode {
                    for i in 0..3 {
                        x[i] += nn[m] * self.xx.get(m, i);
                        tangent[i] += deriv.get(m, dir) * self.xx.get(m, i);
                    }
                }
                let jxw = norm(&tangent) * wg[iq];

                let on_plane = [x[0].abs() < tol, x[1].abs() < tol, x[2].abs() < tol];
                if !on_plane.iter().any(|flag| *flag) {
                    continue;
                }
                for r in 0..self.ndof {
                    let nr = nn[r / 3];
                    if nr > tol {
                        constrained.push(self.local_to_global[r]);
                        let comp = r % 3;
                        if on_plane[comp] {
                            for s in 0..self.ndof {
                                let ns = nn[s / 3];
                                if s % 3 == comp && ns > tol {
                                    let value = self.kk_bry.get(r, s) + nr * ns * jxw;
                                    self.kk_bry.set(r, s, value);
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Assembles the projection mass matrix and the radial-load projection RHS
    ///
    /// The load is the radial displacement field `δR n` evaluated at the
    /// reference normal; solving `M u = f` afterwards yields its L2
    /// projection onto the basis.
    pub fn assemble_mass_and_load(&mut self, delta_radius: f64) -> Result<(), StrError> {
        self.mm.fill(0.0);
        self.ff_load.fill(0.0);
        let nnode = self.interp.nnode();
        let mut nn = Vector::new(nnode);
        let mut deriv = Matrix::new(nnode, 2);
        let mut deriv2 = vec![[[0.0; 2]; 2]; nnode];
        for p in 0..self.gauss.npoint() {
            let ksi = self.gauss.coords[p];
            self.interp.calc(&mut nn, &mut deriv, &mut deriv2, &ksi)?;
            let (a_cov_ref, _, detj) = self.reference_geometry(&deriv, &deriv2)?;
            let jxw = detj * self.gauss.weights[p];
            for r in 0..self.ndof {
                let nr = nn[r / 3];
                self.ff_load[r] += delta_radius * a_cov_ref[2][r % 3] * nr * jxw;
                for s in 0..self.ndof {
                    if r % 3 == s % 3 {
                        let value = self.mm.get(r, s) + nr * nn[s / 3] * jxw;
                        self.mm.set(r, s, value);
                    }
                }
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{SampleMeshes, SampleParams};
    use russell_lab::{approx_eq, mat_approx_eq};

    fn unit_flat_setup() -> (Mesh, Config) {
        let mesh = SampleMeshes::flat_shell(GeoKind::Qua4, 1, 1, 1.0, 1.0).unwrap();
        let config = Config::new();
        (mesh, config)
    }

    #[test]
    fn new_captures_errors() {
        let (mesh, config) = unit_flat_setup();
        let param = SampleParams::param_shell_neo_hookean();
        let mut mesh_2d = SampleMeshes::flat_shell(GeoKind::Qua4, 1, 1, 1.0, 1.0).unwrap();
        mesh_2d.ndim = 2;
        assert_eq!(
            ElementShell::new(&mesh_2d, &config, &mesh_2d.cells[0], param).err(),
            Some("shell meshes must be embedded in 3D space")
        );
        let element = ElementShell::new(&mesh, &config, &mesh.cells[0], param).unwrap();
        assert_eq!(element.n_local_dof(), 12);
        assert_eq!(element.n_integ_points(), 4);
        assert_eq!(element.local_to_global[0..6], [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn zero_displacement_gives_zero_internal_force() {
        let (mesh, config) = unit_flat_setup();
        let param = SampleParams::param_shell_neo_hookean();
        let mut element = ElementShell::new(&mesh, &config, &mesh.cells[0], param).unwrap();
        let mut history = PointHistory::new(&[element.n_integ_points()]);
        let uu = Vector::new(3 * mesh.points.len());
        element.assemble(true, &uu, &mut history).unwrap();
        for r in 0..element.n_local_dof() {
            approx_eq(element.ff_int[r], 0.0, 1e-10);
        }
        // mass-like matrix: positive diagonal, total "mass" = 3 × area
        let mut total = 0.0;
        for r in 0..element.n_local_dof() {
            assert!(element.kk.get(r, r) > 0.0);
            for s in 0..element.n_local_dof() {
                total += element.kk.get(r, s);
            }
        }
        approx_eq(total, 3.0, 1e-14);
    }

    #[test]
    fn uniform_stretch_gives_balanced_internal_force() {
        // equibiaxial stretch of the unit flat patch: internal forces at the
        // four corners must be in self-equilibrium and symmetric
        let (mesh, config) = unit_flat_setup();
        let param = SampleParams::param_shell_neo_hookean();
        let mut element = ElementShell::new(&mesh, &config, &mesh.cells[0], param).unwrap();
        let mut history = PointHistory::new(&[element.n_integ_points()]);
        let mut uu = Vector::new(3 * mesh.points.len());
        let eps = 0.01;
        for (point_id, point) in mesh.points.iter().enumerate() {
            uu[3 * point_id] = eps * point.coords[0];
            uu[3 * point_id + 1] = eps * point.coords[1];
        }
        element.assemble(true, &uu, &mut history).unwrap();
        let mut sum = [0.0; 3];
        for r in 0..element.n_local_dof() {
            sum[r % 3] += element.ff_int[r];
        }
        for i in 0..3 {
            approx_eq(sum[i], 0.0, 1e-6);
        }
        // x-forces mirror the corner layout: nodes 1,2 pull +x, nodes 0,3 pull -x
        assert!(element.ff_int[3] > 0.0);
        approx_eq(element.ff_int[0], -element.ff_int[3], 1e-8);
        approx_eq(element.ff_int[9], -element.ff_int[6], 1e-8);
    }

    #[test]
    fn local_stiffness_is_symmetric_at_reference() {
        let (mesh, config) = unit_flat_setup();
        let param = SampleParams::param_shell_neo_hookean();
        let mut element = ElementShell::new(&mesh, &config, &mesh.cells[0], param).unwrap();
        let mut history = PointHistory::new(&[element.n_integ_points()]);
        let uu = Vector::new(3 * mesh.points.len());
        element.assemble(true, &uu, &mut history).unwrap();
        let ndof = element.n_local_dof();
        let mut kke = Matrix::new(ndof, ndof);
        element.calc_local_stiffness(&history, &mut kke).unwrap();
        let mut kke_t = Matrix::new(ndof, ndof);
        for r in 0..ndof {
            for s in 0..ndof {
                kke_t.set(s, r, kke.get(r, s));
            }
        }
        mat_approx_eq(&kke, &kke_t, 1e-8);
        // membrane stiffness of a flat patch has positive diagonal entries
        // for the in-plane DOFs
        assert!(kke.get(0, 0) > 0.0);
        assert!(kke.get(1, 1) > 0.0);
    }

    #[test]
    fn boundary_detection_finds_coordinate_plane_edges() {
        // the flat patch lies on z = 0, hence all edges are detected and
        // all z-DOFs are penalized; the x = 0 and y = 0 edges add their
        // in-plane components
        let (mesh, config) = unit_flat_setup();
        let param = SampleParams::param_shell_neo_hookean();
        let mut element = ElementShell::new(&mesh, &config, &mesh.cells[0], param).unwrap();
        let mut constrained = Vec::new();
        element.assemble_boundary(&mut constrained).unwrap();
        assert!(!constrained.is_empty());
        // z-component of node 0 (on all three planes) is penalized
        assert!(element.kk_bry.get(2, 2) > 0.0);
        // x-component of node 0 lies on the x = 0 edge
        assert!(element.kk_bry.get(0, 0) > 0.0);
        // x-component of node 1 (x = 1): not on the x = 0 plane
        assert_eq!(element.kk_bry.get(3, 3), 0.0);
    }

    #[test]
    fn mass_and_load_projection_work() {
        let (mesh, config) = unit_flat_setup();
        let param = SampleParams::param_shell_neo_hookean();
        let mut element = ElementShell::new(&mesh, &config, &mesh.cells[0], param).unwrap();
        let delta_radius = 0.4;
        element.assemble_mass_and_load(delta_radius).unwrap();
        // flat patch normal is +z: load goes to z-DOFs only and sums to
        // δR × area
        let mut sum = [0.0; 3];
        for r in 0..element.n_local_dof() {
            sum[r % 3] += element.ff_load[r];
        }
        approx_eq(sum[0], 0.0, 1e-14);
        approx_eq(sum[1], 0.0, 1e-14);
        approx_eq(sum[2], delta_radius, 1e-14);
        // mass matrix row sums recover the area per component
        let mut total = 0.0;
        for r in 0..element.n_local_dof() {
            for s in 0..element.n_local_dof() {
                total += element.mm.get(r, s);
            }
        }
        approx_eq(total, 3.0, 1e-14);
    }
}
