//! Immutable, validated Dynamic Relaxation inputs.

use crate::error::{DrError, DrResult};
use crate::math::{row_norms, Connectivity, Points, Scalars};

/// The inputs of a Dynamic Relaxation solve: vertex positions, edge
/// connectivity, loads, and the four per-edge laws (prescribed force
/// density, prescribed force, prescribed length, axial stiffness).
///
/// Constructed once by `Network::new`, which performs all eager validation
/// (shape mismatch, bad edges) described by spec §7, and is never mutated
/// after construction — the driver copies what it needs into its own
/// working state.
pub struct Network {
    pub(crate) vertices: Points,
    pub(crate) edges: Vec<(usize, usize)>,
    pub(crate) fixed: Vec<usize>,
    pub(crate) free: Vec<usize>,
    pub(crate) loads: Points,
    pub(crate) qpre: Scalars,
    pub(crate) fpre: Scalars,
    pub(crate) lpre: Scalars,
    pub(crate) linit: Scalars,
    pub(crate) ea: Scalars,
    pub(crate) connectivity: Connectivity,
}

impl Network {
    /// Construct and validate a network. `linit` is autofilled from the
    /// current edge lengths if every entry is zero on entry (spec §3).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        vertices: Points,
        edges: Vec<(usize, usize)>,
        fixed: Vec<usize>,
        loads: Points,
        qpre: Scalars,
        fpre: Scalars,
        lpre: Scalars,
        mut linit: Scalars,
        e_mod: Scalars,
        radius: Scalars,
    ) -> DrResult<Self> {
        let num_vertices = vertices.nrows();
        let num_edges = edges.len();

        check_rows("vertices", &vertices, num_vertices)?;
        check_rows("loads", &loads, num_vertices)?;
        check_len("qpre", &qpre, num_edges)?;
        check_len("fpre", &fpre, num_edges)?;
        check_len("lpre", &lpre, num_edges)?;
        check_len("linit", &linit, num_edges)?;
        check_len("e_mod", &e_mod, num_edges)?;
        check_len("radius", &radius, num_edges)?;

        for &v in &fixed {
            if v >= num_vertices {
                return Err(DrError::BadEdge {
                    edge: v,
                    detail: format!("fixed vertex index out of range [0, {num_vertices})"),
                });
            }
        }

        let connectivity = Connectivity::new(num_vertices, &edges)?;

        if linit.iter().all(|&l| l == 0.0) {
            let lengths = row_norms(&connectivity.edge_vectors(&vertices));
            linit = lengths;
        }

        let area: Scalars = radius.map(|r| std::f64::consts::PI * r * r);
        let ea = e_mod.component_mul(&area);

        let mut is_fixed = vec![false; num_vertices];
        for &v in &fixed {
            is_fixed[v] = true;
        }
        let free: Vec<usize> = (0..num_vertices).filter(|&v| !is_fixed[v]).collect();

        Ok(Self {
            vertices,
            edges,
            fixed,
            free,
            loads,
            qpre,
            fpre,
            lpre,
            linit,
            ea,
            connectivity,
        })
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.nrows()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn free(&self) -> &[usize] {
        &self.free
    }

    pub fn fixed(&self) -> &[usize] {
        &self.fixed
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn linit(&self) -> &Scalars {
        &self.linit
    }
}

fn check_rows(field: &'static str, arr: &Points, expected: usize) -> DrResult<()> {
    if arr.nrows() != expected || arr.ncols() != 3 {
        return Err(DrError::ShapeMismatch {
            field,
            expected,
            actual: arr.nrows(),
        });
    }
    Ok(())
}

fn check_len(field: &'static str, arr: &Scalars, expected: usize) -> DrResult<()> {
    if arr.len() != expected {
        return Err(DrError::ShapeMismatch {
            field,
            expected,
            actual: arr.len(),
        });
    }
    Ok(())
}
