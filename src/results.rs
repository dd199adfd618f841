//! The solver's output (spec §6 return value).

use crate::math::{Points, Scalars};

/// Everything a Dynamic Relaxation solve produces, named instead of returned
/// as a bare tuple so call sites read `outcome.positions` rather than `.0`.
#[derive(Debug, Clone)]
pub struct DrOutcome {
    /// Final vertex positions, fixed rows unchanged from the input.
    pub positions: Points,
    /// Final per-edge force densities (`q_pre + q_fpre + q_lpre + q_EA`).
    pub q: Scalars,
    /// Final per-edge axial forces, `f = q ⊙ l`.
    pub f: Scalars,
    /// Final per-edge lengths.
    pub l: Scalars,
    /// Final per-vertex residual forces (zero at fixed rows by construction).
    pub r: Points,
    /// Number of iterations actually run (`<= kmax`).
    pub iterations: usize,
    /// Whether either convergence criterion was met before `kmax`.
    pub converged: bool,
    /// Final residual-norm criterion (spec §4.4 `crit1`).
    pub crit1: f64,
    /// Final displacement-norm criterion (spec §4.4 `crit2`).
    pub crit2: f64,
}
