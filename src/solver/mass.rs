//! Per-vertex fictitious mass estimation (spec §4.3).

use crate::error::{DrError, DrResult};
use crate::math::{Points, Scalars};
use crate::network::Network;
use crate::solver::edge_law::EdgeLawTerms;

/// `mass = 0.5 · dt² · Cᵗ² · (q_pre + q_fpre + q_lpre + EA/linit)`.
///
/// `EA/linit` is sanitized to zero wherever `linit == 0`, matching the other
/// per-edge laws' zero-on-degenerate-input contract.
pub fn estimate(network: &Network, terms: &EdgeLawTerms, dt: f64) -> Scalars {
    let ea_over_linit = (&network.ea).component_div(&network.linit);
    let ea_over_linit = ea_over_linit.map(|v| if v.is_finite() { v } else { 0.0 });

    let lumped_weight = &terms.q_pre + &terms.q_fpre + &terms.q_lpre + &ea_over_linit;
    let lumped = network.connectivity().lump_to_vertices(&lumped_weight);

    lumped * (0.5 * dt * dt)
}

/// Guard against division by a zero or negative lumped mass (spec §9 Open
/// Question, resolved in favor of erroring — but only where it matters).
///
/// A vertex with zero mass *and* zero residual carries no force to
/// distribute: its acceleration is `0/mass`, which is well-defined as zero
/// regardless of what `mass` is, so such a vertex is given a nominal
/// placeholder mass instead of being flagged. This is what keeps the
/// all-zero network (no load, no prestress, no stiffness) motionless
/// forever rather than erroring on iteration zero, while a vertex that
/// carries a real residual over zero mass — genuinely undefined — is still
/// rejected.
pub fn guard_degenerate(
    network: &Network,
    mass: &mut Scalars,
    residual: &Points,
    iteration: usize,
) -> DrResult<()> {
    for &v in network.free() {
        if mass[v] > 0.0 {
            continue;
        }
        let has_force = (0..3).any(|c| residual[(v, c)] != 0.0);
        if has_force {
            return Err(DrError::DegenerateMass {
                vertex: v,
                iteration,
            });
        }
        mass[v] = 1.0;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{set_row, zero_points};
    use crate::solver::edge_law;

    fn bar_network() -> Network {
        let mut vertices = zero_points(2);
        set_row(&mut vertices, 1, [2.0, 0.0, 0.0]);
        let loads = zero_points(2);
        Network::new(
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
        )
        .unwrap()
    }

    #[test]
    fn positive_qpre_gives_positive_mass_on_free_vertex() {
        let net = bar_network();
        let l = Scalars::from_vec(vec![2.0]);
        let f = Scalars::from_vec(vec![2.0]);
        let terms = edge_law::assemble(&net, &l, &f);
        let mut mass = estimate(&net, &terms, 1.0);
        assert!(mass[1] > 0.0);
        guard_degenerate(&net, &mut mass, &zero_points(2), 0).unwrap();
    }

    #[test]
    fn zero_mass_with_nonzero_residual_is_an_error() {
        let mut vertices = zero_points(2);
        set_row(&mut vertices, 1, [2.0, 0.0, 0.0]);
        let loads = zero_points(2);
        let net = Network::new(
            vertices,
            vec![(0, 1)],
            vec![0],
            loads,
            Scalars::from_vec(vec![0.0]),
            Scalars::from_vec(vec![0.0]),
            Scalars::from_vec(vec![0.0]),
            Scalars::from_vec(vec![0.0]),
            Scalars::from_vec(vec![0.0]),
            Scalars::from_vec(vec![0.0]),
        )
        .unwrap();
        let l = Scalars::from_vec(vec![2.0]);
        let f = Scalars::from_vec(vec![0.0]);
        let terms = edge_law::assemble(&net, &l, &f);
        let mut mass = estimate(&net, &terms, 1.0);
        let mut residual = zero_points(2);
        set_row(&mut residual, 1, [3.0, 0.0, 0.0]);
        let err = guard_degenerate(&net, &mut mass, &residual, 3).unwrap_err();
        assert!(matches!(
            err,
            DrError::DegenerateMass {
                vertex: 1,
                iteration: 3
            }
        ));
    }

    #[test]
    fn zero_mass_with_zero_residual_falls_through_to_zero_acceleration() {
        let mut vertices = zero_points(2);
        set_row(&mut vertices, 1, [2.0, 0.0, 0.0]);
        let loads = zero_points(2);
        let net = Network::new(
            vertices,
            vec![(0, 1)],
            vec![0],
            loads,
            Scalars::from_vec(vec![0.0]),
            Scalars::from_vec(vec![0.0]),
            Scalars::from_vec(vec![0.0]),
            Scalars::from_vec(vec![0.0]),
            Scalars::from_vec(vec![0.0]),
            Scalars::from_vec(vec![0.0]),
        )
        .unwrap();
        let l = Scalars::from_vec(vec![2.0]);
        let f = Scalars::from_vec(vec![0.0]);
        let terms = edge_law::assemble(&net, &l, &f);
        let mut mass = estimate(&net, &terms, 1.0);
        guard_degenerate(&net, &mut mass, &zero_points(2), 0).unwrap();
        assert_eq!(mass[1], 1.0);
    }
}
