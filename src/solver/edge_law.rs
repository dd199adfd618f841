//! Per-edge force density assembly: four superposed laws, each sanitized to
//! zero when it would otherwise produce a non-finite value (spec §4.2).

use crate::math::Scalars;
use crate::network::Network;

/// Replace non-finite (`NaN`/`±Inf`) entries with zero, row by row.
fn sanitize(values: Scalars) -> Scalars {
    values.map(|v| if v.is_finite() { v } else { 0.0 })
}

/// The four per-edge contributions to the force density, computed
/// independently so the mass estimator (spec §4.3) can reuse three of them
/// without re-deriving `q`.
pub struct EdgeLawTerms {
    pub q_pre: Scalars,
    pub q_fpre: Scalars,
    pub q_lpre: Scalars,
    pub q_ea: Scalars,
}

impl EdgeLawTerms {
    /// `q = q_pre + q_fpre + q_lpre + q_ea`.
    pub fn sum(&self) -> Scalars {
        &self.q_pre + &self.q_fpre + &self.q_lpre + &self.q_ea
    }
}

/// Assemble the four edge-law terms from the network's prescribed values and
/// the current edge lengths `l` and previous-iteration edge forces `f`.
///
/// `q_lpre` intentionally uses `f` from the *previous* iteration (spec §4.2
/// Observation) — this is the fixed-point scheme's one-step closure lag, not
/// a bug.
pub fn assemble(network: &Network, l: &Scalars, f: &Scalars) -> EdgeLawTerms {
    let q_pre = network.qpre.clone();

    // fpre / l, zeroed where l == 0
    let q_fpre = sanitize(network.fpre.component_div(l));

    // f / lpre, zeroed where lpre == 0 (no prescribed length)
    let q_lpre = sanitize(f.component_div(&network.lpre));

    // EA * (l - linit) / (linit * l), zeroed where linit == 0 or l == 0
    let strain_num = l - &network.linit;
    let denom = network.linit.component_mul(l);
    let q_ea = sanitize(network.ea.component_mul(&strain_num).component_div(&denom));

    EdgeLawTerms {
        q_pre,
        q_fpre,
        q_lpre,
        q_ea,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{set_row, zero_points};

    fn bar_network(lpre: f64, linit: f64) -> Network {
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
            Scalars::from_vec(vec![lpre]),
            Scalars::from_vec(vec![linit]),
            Scalars::from_vec(vec![0.0]),
            Scalars::from_vec(vec![0.0]),
        )
        .unwrap()
    }

    #[test]
    fn zero_lpre_zeroes_that_term_not_the_whole_row() {
        let net = bar_network(0.0, 0.0);
        let l = Scalars::from_vec(vec![2.0]);
        let f = Scalars::from_vec(vec![5.0]);
        let terms = assemble(&net, &l, &f);
        assert_eq!(terms.q_lpre[0], 0.0);
        assert_eq!(terms.q_pre[0], 1.0);
        let q = terms.sum();
        assert_eq!(q[0], 1.0);
    }

    #[test]
    fn zero_edge_length_zeroes_fpre_term() {
        let net = bar_network(0.0, 0.0);
        let l = Scalars::from_vec(vec![0.0]);
        let f = Scalars::from_vec(vec![0.0]);
        let terms = assemble(&net, &l, &f);
        assert_eq!(terms.q_fpre[0], 0.0);
        assert!(terms.sum()[0].is_finite());
    }

    #[test]
    fn ea_law_contributes_when_strained() {
        let mut vertices = zero_points(2);
        set_row(&mut vertices, 1, [1.0, 0.0, 0.0]);
        let loads = zero_points(2);
        let net = Network::new(
            vertices,
            vec![(0, 1)],
            vec![0],
            loads,
            Scalars::from_vec(vec![0.0]),
            Scalars::from_vec(vec![0.0]),
            Scalars::from_vec(vec![0.0]),
            Scalars::from_vec(vec![1.0]),
            Scalars::from_vec(vec![100.0]),
            Scalars::from_vec(vec![1.0]),
        )
        .unwrap();
        let l = Scalars::from_vec(vec![2.0]);
        let f = Scalars::from_vec(vec![0.0]);
        let terms = assemble(&net, &l, &f);
        // EA * (l - linit) / (linit * l) = EA * pi * (2-1)/(1*2)
        let ea = 100.0 * std::f64::consts::PI;
        assert!((terms.q_ea[0] - ea * 0.5).abs() < 1e-9);
    }
}
