use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Holds the results of one load increment
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct StepSummary {
    /// Increment number (1-based)
    pub istep: usize,

    /// Euclidean norm of the internal force vector
    pub norm_ff_int: f64,

    /// Number of conjugate-gradient iterations of the system solve
    pub cg_iterations: usize,

    /// Minimum mid-surface principal stretch over all integration points
    pub stretch_min: f64,

    /// Maximum mid-surface principal stretch over all integration points
    pub stretch_max: f64,
}

/// Holds the results of an incremental simulation
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RunSummary {
    /// Results of all completed increments
    pub steps: Vec<StepSummary>,
}

impl RunSummary {
    /// Allocates a new empty instance
    pub fn new() -> Self {
        RunSummary { steps: Vec::new() }
    }

    /// Appends the results of one increment
    pub fn push(&mut self, step: StepSummary) {
        self.steps.push(step);
    }

    /// Reads a JSON file containing the summary
    pub fn read_json(full_path: &str) -> Result<Self, StrError> {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path).map_err(|_| "cannot open summary file")?;
        let buffered = BufReader::new(input);
        let summary = serde_json::from_reader(buffered).map_err(|_| "cannot parse summary file")?;
        Ok(summary)
    }

    /// Writes a JSON file with the summary
    pub fn save_json(&self, full_path: &str) -> Result<(), StrError> {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            std::fs::create_dir_all(p).map_err(|_| "cannot create directory for summary file")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create summary file")?;
        serde_json::to_writer_pretty(&mut file, &self).map_err(|_| "cannot write summary file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
