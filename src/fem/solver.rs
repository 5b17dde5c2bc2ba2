use super::ElementShell;
use crate::base::{assemble_diagonal, assemble_matrix, assemble_vector, Config, ParamShell};
use crate::material::PointHistory;
use crate::util::{write_shell_vtu, RunSummary, StepSummary};
use crate::StrError;
use gemlab::mesh::Mesh;
use russell_lab::{vec_add, vec_inner, Vector};
use russell_sparse::{CooMatrix, Sym};

/// Implements the incremental solver for Kirchhoff-Love shells
///
/// The scheme is displacement-driven: the radial field `δR n` is projected
/// onto the basis once (mass solve), and every increment accumulates the
/// projected coefficients into the material history, re-assembles the
/// mass-like system matrix and the internal force, applies the penalty
/// constraints, and solves for the pressure-like coefficient field with a
/// Jacobi-preconditioned conjugate-gradient method. There is no residual
/// convergence loop; [ElementShell::calc_local_stiffness] is the entry
/// point for upgrading the scheme to full Newton iterations.
pub struct ShellSolver<'a> {
    /// Configuration
    pub config: &'a Config,

    /// The mesh
    pub mesh: &'a Mesh,

    /// All cell workers
    pub elements: Vec<ElementShell<'a>>,

    /// Material state of all integration points
    pub history: PointHistory,

    /// Total number of equations (3 × npoint)
    pub neq: usize,

    /// Global mass-like system matrix (with penalty terms)
    pub kk: CooMatrix,

    /// Diagonal of the system matrix (Jacobi preconditioner data)
    pub kk_diag: Vector,

    /// Global internal force vector
    pub ff_int: Vector,

    /// Global projection mass matrix
    pub mm: CooMatrix,

    /// Diagonal of the projection mass matrix
    pub mm_diag: Vector,

    /// Global load projection right-hand side
    pub ff_load: Vector,

    /// Projected displacement coefficients (one increment worth)
    pub vec_disp_coeff: Vector,

    /// Pressure-like coefficients (solution of the system solve)
    pub vec_pressure_coeff: Vector,

    /// Sorted and deduplicated penalized DOF numbers
    pub constrained_dof_indices: Vec<usize>,

    initialized: bool,
}

// solves a x = b with a Jacobi-preconditioned conjugate-gradient method
fn solve_conjugate_gradient(
    a: &CooMatrix,
    diag: &Vector,
    b: &Vector,
    x: &mut Vector,
    tol: f64,
    n_max_iterations: usize,
) -> Result<usize, StrError> {
    let neq = b.dim();
    x.fill(0.0);
    let norm_b = f64::sqrt(vec_inner(b, b));
    if norm_b < 1e-25 {
        return Ok(0);
    }
    let mut r = b.clone();
    let precondition = |z: &mut Vector, r: &Vector| {
        for i in 0..neq {
            let d = diag[i];
            z[i] = if d.abs() > 1e-300 { r[i] / d } else { r[i] };
        }
    };
    let mut z = Vector::new(neq);
    precondition(&mut z, &r);
    let mut p = z.clone();
    let mut q = Vector::new(neq);
    let mut rz = vec_inner(&r, &z);
    for iteration in 0..n_max_iterations {
        q.fill(0.0);
        a.mat_vec_mul(&mut q, 1.0, &p)?;
        let pq = vec_inner(&p, &q);
        if pq <= 0.0 {
            return Err("conjugate-gradient method requires a positive-definite matrix");
        }
        let alpha = rz / pq;
        for i in 0..neq {
            x[i] += alpha * p[i];
            r[i] -= alpha * q[i];
        }
        if f64::sqrt(vec_inner(&r, &r)) <= tol * norm_b {
            return Ok(iteration + 1);
        }
        precondition(&mut z, &r);
        let rz_new = vec_inner(&r, &z);
        let beta = rz_new / rz;
        for i in 0..neq {
            p[i] = z[i] + beta * p[i];
        }
        rz = rz_new;
    }
    Err("conjugate-gradient method exhausted the maximum number of iterations")
}

impl<'a> ShellSolver<'a> {
    /// Allocates a new instance
    pub fn new(mesh: &'a Mesh, config: &'a Config, param: ParamShell) -> Result<Self, StrError> {
        if mesh.cells.is_empty() {
            return Err("mesh must contain at least one cell");
        }
        let mut elements = Vec::with_capacity(mesh.cells.len());
        let mut n_points_per_cell = Vec::with_capacity(mesh.cells.len());
        let mut nnz_sup = 0;
        for cell in &mesh.cells {
            let element = ElementShell::new(mesh, config, cell, param)?;
            n_points_per_cell.push(element.n_integ_points());
            // system entries plus penalty entries
            nnz_sup += 2 * element.n_local_dof() * element.n_local_dof();
            elements.push(element);
        }
        let history = PointHistory::new(&n_points_per_cell);
        let neq = 3 * mesh.points.len();
        Ok(ShellSolver {
            config,
            mesh,
            elements,
            history,
            neq,
            kk: CooMatrix::new(neq, neq, nnz_sup, Sym::No)?,
            kk_diag: Vector::new(neq),
            ff_int: Vector::new(neq),
            mm: CooMatrix::new(neq, neq, nnz_sup, Sym::No)?,
            mm_diag: Vector::new(neq),
            ff_load: Vector::new(neq),
            vec_disp_coeff: Vector::new(neq),
            vec_pressure_coeff: Vector::new(neq),
            constrained_dof_indices: Vec::new(),
            initialized: false,
        })
    }

    /// Assembles the global projection mass matrix and load RHS
    pub fn assemble_mass_matrix_and_rhs(&mut self) -> Result<(), StrError> {
        self.mm.reset(); // << important
        self.mm_diag.fill(0.0);
        self.ff_load.fill(0.0);
        for element in &mut self.elements {
            element.assemble_mass_and_load(self.config.delta_radius)?;
            assemble_matrix(&mut self.mm, &element.mm, &element.local_to_global, 1.0)?;
            assemble_diagonal(&mut self.mm_diag, &element.mm, &element.local_to_global, 1.0)?;
            assemble_vector(&mut self.ff_load, &element.ff_load, &element.local_to_global)?;
        }
        Ok(())
    }

    /// Projects the radial displacement field onto the basis (mass solve)
    ///
    /// Returns the number of conjugate-gradient iterations.
    pub fn solve_disp_coeff(&mut self) -> Result<usize, StrError> {
        solve_conjugate_gradient(
            &self.mm,
            &self.mm_diag,
            &self.ff_load,
            &mut self.vec_disp_coeff,
            self.config.tol_cg,
            self.config.n_max_cg_iterations,
        )
    }

    /// Assembles the global system matrix and internal force vector
    ///
    /// The first call captures the reference geometry into the material
    /// history; every call accumulates `vec_disp_coeff` into the history
    /// (one increment of loading).
    pub fn assemble_system(&mut self) -> Result<(), StrError> {
        self.kk.reset(); // << important
        self.kk_diag.fill(0.0);
        self.ff_int.fill(0.0);
        let initial = !self.initialized;
        for element in &mut self.elements {
            element.assemble(initial, &self.vec_disp_coeff, &mut self.history)?;
            assemble_matrix(&mut self.kk, &element.kk, &element.local_to_global, 1.0)?;
            assemble_diagonal(&mut self.kk_diag, &element.kk, &element.local_to_global, 1.0)?;
            assemble_vector(&mut self.ff_int, &element.ff_int, &element.local_to_global)?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Adds the penalty terms enforcing the symmetry boundary conditions
    ///
    /// Must be called after [ShellSolver::assemble_system] because the
    /// system matrix storage is reset there. Also refreshes the sorted
    /// and deduplicated list of constrained DOF numbers (idempotent).
    pub fn make_constrains(&mut self) -> Result<(), StrError> {
        self.constrained_dof_indices.clear();
        let alpha = self.config.penalty_factor;
        for element in &mut self.elements {
            element.assemble_boundary(&mut self.constrained_dof_indices)?;
            assemble_matrix(&mut self.kk, &element.kk_bry, &element.local_to_global, alpha)?;
            assemble_diagonal(&mut self.kk_diag, &element.kk_bry, &element.local_to_global, alpha)?;
        }
        self.constrained_dof_indices.sort_unstable();
        self.constrained_dof_indices.dedup();
        Ok(())
    }

    /// Solves the penalized system for the pressure-like coefficients
    ///
    /// Returns the number of conjugate-gradient iterations.
    pub fn solve(&mut self) -> Result<usize, StrError> {
        solve_conjugate_gradient(
            &self.kk,
            &self.kk_diag,
            &self.ff_int,
            &mut self.vec_pressure_coeff,
            self.config.tol_cg,
            self.config.n_max_cg_iterations,
        )
    }

    /// Returns the (min, max) mid-surface principal stretch over all points
    pub fn stretch_range(&self) -> Result<(f64, f64), StrError> {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for element in &self.elements {
            for p in 0..element.n_integ_points() {
                let stretch = self.history.stretch(element.cell.id, p)?;
                min = f64::min(min, stretch);
                max = f64::max(max, stretch);
            }
        }
        Ok((min, max))
    }

    /// Runs the incremental simulation
    pub fn run(&mut self) -> Result<RunSummary, StrError> {
        self.assemble_mass_matrix_and_rhs()?;
        let projection_iterations = self.solve_disp_coeff()?;
        if self.config.verbose {
            println!("displacement projection: {} CG iterations", projection_iterations);
        }
        if self.config.write_vtu {
            std::fs::create_dir_all(&self.config.out_dir).map_err(|_| "cannot create output directory")?;
        }
        let mut summary = RunSummary::new();
        let mut uu_total = Vector::new(self.neq);
        for istep in 1..=self.config.n_increments {
            self.assemble_system()?;
            self.make_constrains()?;
            let cg_iterations = self.solve()?;
            let norm_ff_int = f64::sqrt(vec_inner(&self.ff_int, &self.ff_int));
            let (stretch_min, stretch_max) = self.stretch_range()?;
            if self.config.verbose {
                println!(
                    "istep = {:>4}, |f_int| = {:>13.6e}, cg_its = {:>5}, stretch = [{:.4}, {:.4}]",
                    istep, norm_ff_int, cg_iterations, stretch_min, stretch_max
                );
            }
            summary.push(StepSummary {
                istep,
                norm_ff_int,
                cg_iterations,
                stretch_min,
                stretch_max,
            });
            if self.config.write_vtu {
                // total displacement after istep increments
                vec_add(&mut uu_total, istep as f64, &self.vec_disp_coeff, 0.0, &self.vec_disp_coeff)?;
                let path = format!("{}/shell_{:0>4}.vtu", self.config.out_dir, istep);
                write_shell_vtu(
                    &path,
                    self.mesh,
                    &uu_total,
                    &self.vec_pressure_coeff,
                    self.config.n_vtu_grid,
                )?;
            }
        }
        if self.config.write_vtu {
            let path = format!("{}/summary.json", self.config.out_dir);
            summary.save_json(&path)?;
        }
        Ok(summary)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
