//! Viscous damping coefficients and the explicit Runge-Kutta velocity
//! integrator (spec §4.5, §4.6).

use serde::{Deserialize, Serialize};

use crate::error::{DrError, DrResult};
use crate::math::{Connectivity, Points, Scalars};

/// Number of Runge-Kutta sub-steps used to advance one DR iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steps {
    One,
    Two,
    Four,
}

impl Steps {
    /// Resolve a raw sub-step count, rejecting anything but 1, 2, or 4
    /// (spec §4.5: "any other value of `s` is a configuration error").
    pub fn try_from_count(n: u32) -> DrResult<Self> {
        match n {
            1 => Ok(Steps::One),
            2 => Ok(Steps::Two),
            4 => Ok(Steps::Four),
            other => Err(DrError::BadOptions(format!(
                "steps must be 1, 2, or 4, got {other}"
            ))),
        }
    }
}

/// Viscous-damping-derived constants, time-step independent by construction
/// (spec §4.6).
#[derive(Debug, Clone, Copy)]
pub struct Damping {
    /// Multiplicative velocity decay applied before each RK step.
    pub ca: f64,
    /// Half-sum coefficient applied to the residual inside the acceleration.
    pub cb: f64,
}

impl Damping {
    pub fn new(c: f64) -> DrResult<Self> {
        if c < 0.0 {
            return Err(DrError::BadOptions("c must be >= 0".to_string()));
        }
        let ca = (1.0 - c * 0.5) / (1.0 + c * 0.5);
        let cb = 0.5 * (1.0 + ca);
        Ok(Self { ca, cb })
    }
}

/// Scratch buffers reused across RK stages and across iterations, following
/// spec §5's "all allocations should be made once at solver start."
pub struct RkScratch {
    x: Points,
    r: Points,
}

impl RkScratch {
    pub fn new(num_vertices: usize) -> Self {
        Self {
            x: Points::zeros(num_vertices, 3),
            r: Points::zeros(num_vertices, 3),
        }
    }
}

/// Advance one full time step of size `dt`, returning `Δv` (spec §4.5).
///
/// `x0` is the position snapshot at the start of the step, `v0` the damped
/// initial velocity (`ca · v`), `p` the nodal loads, `q` the current edge
/// force densities, `mass` the lumped fictitious mass, and `free` the free
/// vertex indices. `scratch` provides the `x`/`r` buffers the internal
/// acceleration function writes to as documented scratch (spec §4.5 "Side
/// effect"); the caller must treat both as overwritten garbage afterward.
#[allow(clippy::too_many_arguments)]
pub fn integrate(
    steps: Steps,
    dt: f64,
    cb: f64,
    x0: &Points,
    v0: &Points,
    p: &Points,
    q: &Scalars,
    mass: &Scalars,
    free: &[usize],
    connectivity: &Connectivity,
    scratch: &mut RkScratch,
) -> Points {
    let num_vertices = x0.nrows();

    let mut a = |tau: f64, v: &Points| -> Points {
        for &i in free {
            for c in 0..3 {
                scratch.x[(i, c)] = x0[(i, c)] + v[(i, c)] * tau;
            }
        }
        let u = connectivity.edge_vectors(&scratch.x);
        let internal = connectivity.transpose_weighted(q, &u);
        for &i in free {
            for c in 0..3 {
                scratch.r[(i, c)] = p[(i, c)] - internal[(i, c)];
            }
        }

        let mut out = Points::zeros(num_vertices, 3);
        for &i in free {
            let m = mass[i];
            for c in 0..3 {
                out[(i, c)] = cb * scratch.r[(i, c)] / m;
            }
        }
        out
    };

    match steps {
        Steps::One => dt_scale(&a(0.0, v0), dt),
        Steps::Two => {
            // Butcher row B = [0, 1]: Δv = 0·K0 + 1·K1 = K1. Preserved as
            // specified, not "fixed" to a symmetric trapezoidal rule.
            let k0 = dt_scale(&a(0.0, v0), dt);
            dt_scale(&a(dt, &(v0 + &k0)), dt)
        }
        Steps::Four => {
            let k0 = dt_scale(&a(0.0, v0), dt);
            let k1 = dt_scale(&a(0.5 * dt, &(v0 + &(&k0 * 0.5))), dt);
            let k2 = dt_scale(&a(0.5 * dt, &(v0 + &(&k1 * 0.5))), dt);
            let k3 = dt_scale(&a(dt, &(v0 + &k2)), dt);
            weighted_sum_4(&k0, &k1, &k2, &k3)
        }
    }
}

fn dt_scale(a_value: &Points, dt: f64) -> Points {
    a_value * dt
}

/// `(1/6)K0 + (1/3)K1 + (1/3)K2 + (1/6)K3`.
fn weighted_sum_4(k0: &Points, k1: &Points, k2: &Points, k3: &Points) -> Points {
    k0 * (1.0 / 6.0) + k1 * (1.0 / 3.0) + k2 * (1.0 / 3.0) + k3 * (1.0 / 6.0)
}
