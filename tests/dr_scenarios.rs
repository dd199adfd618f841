use approx::assert_relative_eq;
use dr_solver::prelude::*;

fn bar(v1_loads: [f64; 3], qpre: f64, linit: f64) -> Network {
    let vertices = Points::from_row_slice(2, 3, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    let mut loads = Points::zeros(2, 3);
    loads[(1, 0)] = v1_loads[0];
    loads[(1, 1)] = v1_loads[1];
    loads[(1, 2)] = v1_loads[2];

    Network::new(
        vertices,
        vec![(0, 1)],
        vec![0],
        loads,
        Scalars::from_vec(vec![qpre]),
        Scalars::zeros(1),
        Scalars::zeros(1),
        Scalars::from_vec(vec![linit]),
        Scalars::zeros(1),
        Scalars::zeros(1),
    )
    .unwrap()
}

#[test]
fn single_bar_under_load_reaches_equilibrium() {
    let net = bar([1.0, 0.0, 0.0], 1.0, 0.0);
    let options = DrOptions::default().with_kmax(2_000);
    let outcome = dr(&net, &options, None).unwrap();
    assert!(outcome.crit1 < options.tol1, "crit1 = {}", outcome.crit1);
}

#[test]
fn degenerate_linit_autofills_from_current_length() {
    let net = bar([1.0, 0.0, 0.0], 1.0, 0.0);
    assert_relative_eq!(net.linit()[0], 1.0, epsilon = 1e-12);
}

#[test]
fn triangle_apex_load_is_symmetric_under_reflection() {
    // Equilateral triangle, base on the x-axis, apex above the midpoint.
    let h = 3.0_f64.sqrt() / 2.0;
    let mut vertices = Points::zeros(3, 3);
    vertices[(0, 0)] = 0.0;
    vertices[(1, 0)] = 1.0;
    vertices[(2, 0)] = 0.5;
    vertices[(2, 1)] = h;

    let mut loads = Points::zeros(3, 3);
    loads[(2, 1)] = -1.0;

    let net = Network::new(
        vertices,
        vec![(0, 1), (0, 2), (1, 2)],
        vec![0, 1],
        loads,
        Scalars::from_vec(vec![1.0, 1.0, 1.0]),
        Scalars::zeros(3),
        Scalars::zeros(3),
        Scalars::zeros(3),
        Scalars::zeros(3),
        Scalars::zeros(3),
    )
    .unwrap();

    let options = DrOptions::default().with_kmax(5_000);
    let outcome = dr(&net, &options, None).unwrap();

    assert!(outcome.crit1 < options.tol1);
    // The apex stays on the axis of symmetry (x = 0.5) under a vertical load.
    assert_relative_eq!(outcome.positions[(2, 0)], 0.5, epsilon = 1e-6);
}

#[test]
fn chain_of_ten_sags_symmetrically_under_gravity() {
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

    let net = Network::new(
        vertices,
        edges,
        vec![0, n - 1],
        loads,
        Scalars::from_element(num_edges, 1.0),
        Scalars::zeros(num_edges),
        Scalars::zeros(num_edges),
        Scalars::zeros(num_edges),
        Scalars::zeros(num_edges),
        Scalars::zeros(num_edges),
    )
    .unwrap();

    let options = DrOptions::default().with_kmax(20_000);
    let outcome = dr(&net, &options, None).unwrap();

    assert!(outcome.crit1 < options.tol1, "crit1 = {}", outcome.crit1);

    // Symmetric sag: vertex i and vertex (n-1-i) sit at the same depth.
    for i in 1..n / 2 {
        assert_relative_eq!(
            outcome.positions[(i, 1)],
            outcome.positions[(n - 1 - i, 1)],
            epsilon = 1e-4
        );
    }
    // Every interior vertex sags below the fixed endpoints.
    for i in 1..n - 1 {
        assert!(outcome.positions[(i, 1)] < 0.0);
    }
}

#[test]
fn callback_observes_monotone_residual_after_transient() {
    let net = bar([1.0, 0.0, 0.0], 1.0, 0.0);
    let options = DrOptions::default().with_kmax(2_000);

    let mut crit1_history = Vec::new();
    {
        let mut callback = |_k: usize, _x: &Points, crits: [f64; 2]| {
            crit1_history.push(crits[0]);
        };
        dr(&net, &options, Some(&mut callback)).unwrap();
    }

    assert!(!crit1_history.is_empty());
    assert!(*crit1_history.last().unwrap() < options.tol1);

    // Discard the first few iterations (the RK transient) and check the
    // remaining tail is non-increasing within a small tolerance band.
    let tail = &crit1_history[crit1_history.len() / 4..];
    let mut violations = 0;
    for w in tail.windows(2) {
        if w[1] > w[0] * 1.05 {
            violations += 1;
        }
    }
    assert!(
        (violations as f64) < (tail.len() as f64) * 0.05,
        "too many residual increases in the convergence tail: {violations}/{}",
        tail.len()
    );
}

#[test]
fn fully_free_network_runs_to_kmax_without_converging() {
    // Both vertices pushed the same direction: the net external force on
    // the unconstrained network is non-zero, so there is no rigid-body
    // position where the residual vanishes (translating together never
    // changes the edge vector, so the internal force can never balance a
    // net applied force).
    let vertices = Points::from_row_slice(2, 3, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    let mut loads = Points::zeros(2, 3);
    loads[(0, 0)] = 1.0;
    loads[(1, 0)] = 1.0;

    let net = Network::new(
        vertices,
        vec![(0, 1)],
        vec![], // no fixed vertices: rigid-body translation is unconstrained
        loads,
        Scalars::from_vec(vec![1.0]),
        Scalars::zeros(1),
        Scalars::zeros(1),
        Scalars::zeros(1),
        Scalars::zeros(1),
        Scalars::zeros(1),
    )
    .unwrap();

    let options = DrOptions::default().with_kmax(500);
    let outcome = dr(&net, &options, None).unwrap();

    assert_eq!(outcome.iterations, 500);
    assert!(!outcome.converged);
}

#[test]
fn fixed_rows_are_bitwise_unchanged() {
    let net = bar([1.0, 0.0, 0.0], 1.0, 0.0);
    let options = DrOptions::default().with_kmax(300);
    let outcome = dr(&net, &options, None).unwrap();
    assert_eq!(outcome.positions[(0, 0)].to_bits(), 0.0_f64.to_bits());
    assert_eq!(outcome.positions[(0, 1)].to_bits(), 0.0_f64.to_bits());
    assert_eq!(outcome.positions[(0, 2)].to_bits(), 0.0_f64.to_bits());
}

#[test]
fn zero_load_and_prestress_network_never_moves() {
    let net = bar([0.0, 0.0, 0.0], 0.0, 1.0);
    let options = DrOptions::default().with_kmax(200);
    let outcome = dr(&net, &options, None).unwrap();
    assert_relative_eq!(outcome.positions[(1, 0)], 1.0, epsilon = 1e-12);
    assert_relative_eq!(outcome.positions[(1, 1)], 0.0, epsilon = 1e-12);
}
