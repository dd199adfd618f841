//! Dynamic Relaxation Example - Ridge-and-Valley Cable Net

use dr_solver::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Dynamic Relaxation Example: Single Bar ===\n");
    single_bar()?;

    println!("\n=== Dynamic Relaxation Example: Chain of 10 Under Gravity ===\n");
    chain_under_gravity()?;

    Ok(())
}

/// A single bar from the origin to (1, 0, 0), fixed at the origin, pulled
/// sideways by a unit force density until the residual vanishes.
fn single_bar() -> anyhow::Result<()> {
    let vertices = Points::from_row_slice(2, 3, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    let mut loads = Points::zeros(2, 3);
    loads[(1, 0)] = 1.0;

    let network = Network::new(
        vertices,
        vec![(0, 1)],
        vec![0],
        loads,
        Scalars::from_vec(vec![1.0]),
        Scalars::from_vec(vec![0.0]),
        Scalars::from_vec(vec![0.0]),
        Scalars::from_vec(vec![0.0]),
        Scalars::from_vec(vec![0.0]),
        Scalars::from_vec(vec![0.0]),
    )?;

    let outcome = dr(&network, &DrOptions::default(), None)?;
    println!(
        "converged={} in {} iterations (crit1={:.3e}, crit2={:.3e})",
        outcome.converged, outcome.iterations, outcome.crit1, outcome.crit2
    );
    println!("final position of vertex 1: {:?}", outcome.positions.row(1));

    Ok(())
}

/// A chain of 10 bars hanging between two fixed endpoints, each interior
/// vertex loaded with a unit downward force (spec §8 scenario).
fn chain_under_gravity() -> anyhow::Result<()> {
    let n = 11;
    let span = 10.0;

    let mut vertices = Points::zeros(n, 3);
    for i in 0..n {
        vertices[(i, 0)] = span * i as f64 / (n - 1) as f64;
    }

    let mut loads = Points::zeros(n, 3);
    for i in 1..n - 1 {
        loads[(i, 1)] = -1.0;
    }

    let edges: Vec<(usize, usize)> = (0..n - 1).map(|i| (i, i + 1)).collect();
    let num_edges = edges.len();

    let network = Network::new(
        vertices,
        edges,
        vec![0, n - 1],
        loads,
        Scalars::from_element(num_edges, 5.0),
        Scalars::zeros(num_edges),
        Scalars::zeros(num_edges),
        Scalars::zeros(num_edges),
        Scalars::zeros(num_edges),
        Scalars::zeros(num_edges),
    )?;

    let mut last_crit1 = f64::INFINITY;
    let mut callback = |k: usize, _x: &Points, crits: [f64; 2]| {
        last_crit1 = crits[0];
        if k % 200 == 0 {
            println!("  iteration {k}: crit1={:.3e}", crits[0]);
        }
    };

    let outcome = dr(&network, &DrOptions::default(), Some(&mut callback))?;
    println!(
        "converged={} in {} iterations (final crit1={:.3e})",
        outcome.converged, outcome.iterations, last_crit1
    );
    let mid = n / 2;
    println!("sag at midpoint: {:.4}", -outcome.positions[(mid, 1)]);

    Ok(())
}
