use crate::StrError;
use std::fmt;

/// Default output directory
pub const DEFAULT_OUT_DIR: &str = "/tmp/klshell/results";

/// Holds configuration data for the incremental shell simulation
pub struct Config {
    /// Number of load increments
    pub n_increments: usize,

    /// Radial displacement increment applied per step
    pub delta_radius: f64,

    /// Relative tolerance of the conjugate-gradient solver
    pub tol_cg: f64,

    /// Maximum number of conjugate-gradient iterations
    pub n_max_cg_iterations: usize,

    /// Penalty factor enforcing the symmetry boundary conditions
    pub penalty_factor: f64,

    /// Distance tolerance detecting points on the coordinate planes
    pub bc_tolerance: f64,

    /// Number of integration points per direction (None = kind-dependent default)
    pub n_integ_point_1d: Option<usize>,

    /// Lattice resolution for the sampled VTU output
    pub n_vtu_grid: usize,

    /// Output directory
    pub out_dir: String,

    /// Writes VTU files during the run
    pub write_vtu: bool,

    /// Prints progress messages during the run
    pub verbose: bool,
}

impl Config {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        Config {
            n_increments: 200,
            delta_radius: 0.4,
            tol_cg: 1e-9,
            n_max_cg_iterations: 20000,
            penalty_factor: 1e30,
            bc_tolerance: 1e-9,
            n_integ_point_1d: None,
            n_vtu_grid: 10,
            out_dir: DEFAULT_OUT_DIR.to_string(),
            write_vtu: false,
            verbose: false,
        }
    }

    /// Sets the number of load increments
    pub fn set_n_increments(&mut self, value: usize) -> Result<&mut Self, StrError> {
        if value < 1 {
            return Err("n_increments must be ≥ 1");
        }
        self.n_increments = value;
        Ok(self)
    }

    /// Sets the radial displacement increment per step
    pub fn set_delta_radius(&mut self, value: f64) -> Result<&mut Self, StrError> {
        self.delta_radius = value;
        Ok(self)
    }

    /// Sets the relative tolerance of the conjugate-gradient solver
    pub fn set_tol_cg(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value <= 0.0 {
            return Err("tol_cg must be > 0.0");
        }
        self.tol_cg = value;
        Ok(self)
    }

    /// Sets the maximum number of conjugate-gradient iterations
    pub fn set_n_max_cg_iterations(&mut self, value: usize) -> Result<&mut Self, StrError> {
        if value < 1 {
            return Err("n_max_cg_iterations must be ≥ 1");
        }
        self.n_max_cg_iterations = value;
        Ok(self)
    }

    /// Sets the penalty factor enforcing the boundary conditions
    pub fn set_penalty_factor(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value < 1.0 {
            return Err("penalty_factor must be ≥ 1.0");
        }
        self.penalty_factor = value;
        Ok(self)
    }

    /// Sets the distance tolerance detecting points on the coordinate planes
    pub fn set_bc_tolerance(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value <= 0.0 {
            return Err("bc_tolerance must be > 0.0");
        }
        self.bc_tolerance = value;
        Ok(self)
    }

    /// Sets the number of integration points per direction (1 to 4)
    pub fn set_n_integ_point_1d(&mut self, value: usize) -> Result<&mut Self, StrError> {
        if !(1..=4).contains(&value) {
            return Err("n_integ_point_1d must be in 1..=4");
        }
        self.n_integ_point_1d = Some(value);
        Ok(self)
    }

    /// Sets the lattice resolution for the sampled VTU output
    pub fn set_n_vtu_grid(&mut self, value: usize) -> Result<&mut Self, StrError> {
        if value < 2 {
            return Err("n_vtu_grid must be ≥ 2");
        }
        self.n_vtu_grid = value;
        Ok(self)
    }

    /// Sets the output directory
    pub fn set_out_dir(&mut self, value: &str) -> Result<&mut Self, StrError> {
        if value.is_empty() {
            return Err("out_dir must not be empty");
        }
        self.out_dir = value.to_string();
        Ok(self)
    }

    /// Enables or disables the VTU output
    pub fn set_write_vtu(&mut self, flag: bool) -> Result<&mut Self, StrError> {
        self.write_vtu = flag;
        Ok(self)
    }

    /// Enables or disables progress messages
    pub fn set_verbose(&mut self, flag: bool) -> Result<&mut Self, StrError> {
        self.verbose = flag;
        Ok(self)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Configuration data\n\
             ==================\n\
             n_increments = {}\n\
             delta_radius = {:?}\n\
             tol_cg = {:?}\n\
             n_max_cg_iterations = {}\n\
             penalty_factor = {:?}\n\
             bc_tolerance = {:?}\n\
             n_integ_point_1d = {:?}\n\
             write_vtu = {}\n",
            self.n_increments,
            self.delta_radius,
            self.tol_cg,
            self.n_max_cg_iterations,
            self.penalty_factor,
            self.bc_tolerance,
            self.n_integ_point_1d,
            self.write_vtu,
        )
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
