//! The Dynamic Relaxation iteration loop (spec §4.7).

use log::{debug, trace, warn};

use crate::error::DrResult;
use crate::math::{row_norms, zero_points, Points, Scalars};
use crate::network::Network;
use crate::options::DrOptions;
use crate::results::DrOutcome;
use crate::solver::edge_law;
use crate::solver::integrator::{integrate, Damping, RkScratch};
use crate::solver::mass;

/// Observer invoked once per iteration with `(k, x, [crit1, crit2])`
/// (spec §6 `callback`). Borrowed mutably for the duration of the solve;
/// it must not retain references to `x` beyond the call (spec §5, §9).
pub type Callback<'a> = dyn FnMut(usize, &Points, [f64; 2]) + 'a;

/// Run the Dynamic Relaxation solver to equilibrium (or `kmax` iterations).
///
/// Mirrors spec §6's call surface: `dr(vertices, edges, fixed, loads, qpre,
/// fpre, lpre, linit, E_mod, radius, options)` — here `network` bundles the
/// first ten arguments (already validated by `Network::new`) and `options`
/// the solver configuration. The callback is a separate parameter since it
/// is not serializable and does not belong in `DrOptions`.
pub fn dr(
    network: &Network,
    options: &DrOptions,
    mut callback: Option<&mut Callback<'_>>,
) -> DrResult<DrOutcome> {
    options.validate()?;
    let damping = Damping::new(options.c)?;

    let num_vertices = network.num_vertices();
    let free = network.free();

    let mut x = network.vertices.clone();
    let mut v = zero_points(num_vertices);
    let mut r = zero_points(num_vertices);

    // f is seeded to zero; q_lpre's first use of f (spec §4.2 Observation)
    // therefore contributes zero on iteration 0, exactly as the closure lag
    // implies for a cold start.
    let mut f = Scalars::zeros(network.num_edges());
    let mut l = row_norms(&network.connectivity().edge_vectors(&x));
    let mut q = network.qpre.clone();

    let mut scratch = RkScratch::new(num_vertices);
    let mut converged = false;
    let mut crit1 = f64::INFINITY;
    let mut crit2 = f64::INFINITY;
    let mut iterations_run = 0;

    for k in 0..options.kmax {
        let terms = edge_law::assemble(network, &l, &f);
        q = terms.sum();

        let mut lumped_mass = mass::estimate(network, &terms, options.dt);

        // Pre-step residual at the current geometry, used only to tell a
        // genuinely-undefined zero-mass/nonzero-force vertex apart from a
        // vertex that simply carries no force this iteration.
        let u_pre = network.connectivity().edge_vectors(&x);
        let internal_pre = network.connectivity().transpose_weighted(&q, &u_pre);
        let mut r_pre = Points::zeros(num_vertices, 3);
        for &i in free {
            for c in 0..3 {
                r_pre[(i, c)] = network.loads[(i, c)] - internal_pre[(i, c)];
            }
        }
        mass::guard_degenerate(network, &mut lumped_mass, &r_pre, k)?;

        let x0 = x.clone();
        let v0 = &v * damping.ca;

        let dv = integrate(
            options.steps,
            options.dt,
            damping.cb,
            &x0,
            &v0,
            &network.loads,
            &q,
            &lumped_mass,
            free,
            network.connectivity(),
            &mut scratch,
        );

        for &i in free {
            for c in 0..3 {
                v[(i, c)] = v0[(i, c)] + dv[(i, c)];
            }
        }

        let mut dx = Points::zeros(num_vertices, 3);
        for &i in free {
            for c in 0..3 {
                let delta = v[(i, c)] * options.dt;
                dx[(i, c)] = delta;
                x[(i, c)] = x0[(i, c)] + delta;
            }
        }

        let u = network.connectivity().edge_vectors(&x);
        l = row_norms(&u);
        f = q.component_mul(&l);

        let internal = network.connectivity().transpose_weighted(&q, &u);
        for &i in free {
            for c in 0..3 {
                r[(i, c)] = network.loads[(i, c)] - internal[(i, c)];
            }
        }

        crit1 = free_row_norm(&r, free);
        crit2 = free_row_norm(&dx, free);
        iterations_run = k + 1;

        trace!("iteration {k}: crit1={crit1:e} crit2={crit2:e}");
        if let Some(cb) = callback.as_deref_mut() {
            cb(k, &x, [crit1, crit2]);
        }

        if crit1 < options.tol1 || crit2 < options.tol2 {
            converged = true;
            debug!("converged after {iterations_run} iterations (crit1={crit1:e}, crit2={crit2:e})");
            break;
        }
    }

    if !converged {
        warn!(
            "reached kmax={} iterations without meeting either tolerance (crit1={crit1:e}, crit2={crit2:e})",
            options.kmax
        );
    }

    Ok(DrOutcome {
        positions: x,
        q,
        f,
        l,
        r,
        iterations: iterations_run,
        converged,
        crit1,
        crit2,
    })
}

fn free_row_norm(rows: &Points, free: &[usize]) -> f64 {
    let mut sum_sq = 0.0;
    for &i in free {
        for c in 0..3 {
            let v = rows[(i, c)];
            sum_sq += v * v;
        }
    }
    sum_sq.sqrt()
}
