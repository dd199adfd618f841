//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DrError, DrResult};
use crate::solver::integrator::Steps;

/// Options controlling one `dr(...)` solve.
///
/// Plain data (`Clone + Debug + Serialize + Deserialize`), following the
/// teacher crate's `AnalysisOptions` convention: the callback is a separate
/// function argument to `dr(...)` because closures are not serializable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrOptions {
    /// Maximum number of iterations.
    pub kmax: usize,
    /// Fictitious time step.
    pub dt: f64,
    /// Residual-force norm convergence threshold.
    pub tol1: f64,
    /// Displacement norm convergence threshold.
    pub tol2: f64,
    /// Viscous damping parameter.
    pub c: f64,
    /// Number of Runge-Kutta sub-steps (1, 2, or 4).
    pub steps: Steps,
}

impl Default for DrOptions {
    fn default() -> Self {
        Self {
            kmax: 10_000,
            dt: 1.0,
            tol1: 1e-3,
            tol2: 1e-6,
            c: 0.1,
            steps: Steps::Four,
        }
    }
}

impl DrOptions {
    /// Validate the option set, returning the first violated constraint
    /// (spec §7 "bad options").
    pub fn validate(&self) -> DrResult<()> {
        if self.kmax < 1 {
            return Err(DrError::BadOptions("kmax must be >= 1".to_string()));
        }
        if !(self.dt > 0.0) {
            return Err(DrError::BadOptions("dt must be > 0".to_string()));
        }
        if !(self.tol1 > 0.0) {
            return Err(DrError::BadOptions("tol1 must be > 0".to_string()));
        }
        if !(self.tol2 > 0.0) {
            return Err(DrError::BadOptions("tol2 must be > 0".to_string()));
        }
        if self.c < 0.0 {
            return Err(DrError::BadOptions("c must be >= 0".to_string()));
        }
        Ok(())
    }

    /// Set the fictitious time step.
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Set the maximum iteration count.
    pub fn with_kmax(mut self, kmax: usize) -> Self {
        self.kmax = kmax;
        self
    }

    /// Set the viscous damping coefficient.
    pub fn with_damping(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Set the Runge-Kutta sub-step count.
    pub fn with_steps(mut self, steps: Steps) -> Self {
        self.steps = steps;
        self
    }
}
