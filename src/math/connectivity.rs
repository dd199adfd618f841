//! Signed incidence operator `C` for a pin-jointed network, and the sparse
//! products built on top of it (edge vectors, internal forces, mass lumping).

use nalgebra_sparse::{CooMatrix, CsrMatrix};

use crate::error::{DrError, DrResult};
use crate::math::{Points, Scalars};

/// Cached sparse connectivity for one network: the signed incidence operator
/// `C` (E×V), its transpose `Cᵀ` (V×E), and the unsigned transpose `Cᵗ²`
/// (V×E, all entries `1`) used for mass lumping.
///
/// Built once per solve and reused across iterations.
pub struct Connectivity {
    num_vertices: usize,
    num_edges: usize,
    c: CsrMatrix<f64>,
    ct: CsrMatrix<f64>,
    ct_sq: CsrMatrix<f64>,
}

impl Connectivity {
    /// Build the connectivity operator from an edge list, validating that
    /// every edge references two distinct, in-range vertices.
    pub fn new(num_vertices: usize, edges: &[(usize, usize)]) -> DrResult<Self> {
        let num_edges = edges.len();

        let mut c_coo = CooMatrix::new(num_edges, num_vertices);
        let mut ct_coo = CooMatrix::new(num_vertices, num_edges);
        let mut ct_sq_coo = CooMatrix::new(num_vertices, num_edges);

        for (e, &(i, j)) in edges.iter().enumerate() {
            if i >= num_vertices || j >= num_vertices {
                return Err(DrError::BadEdge {
                    edge: e,
                    detail: format!("vertex index out of range [0, {num_vertices})"),
                });
            }
            if i == j {
                return Err(DrError::BadEdge {
                    edge: e,
                    detail: "edge endpoints coincide".to_string(),
                });
            }

            c_coo.push(e, i, -1.0);
            c_coo.push(e, j, 1.0);

            ct_coo.push(i, e, -1.0);
            ct_coo.push(j, e, 1.0);

            ct_sq_coo.push(i, e, 1.0);
            ct_sq_coo.push(j, e, 1.0);
        }

        Ok(Self {
            num_vertices,
            num_edges,
            c: CsrMatrix::from(&c_coo),
            ct: CsrMatrix::from(&ct_coo),
            ct_sq: CsrMatrix::from(&ct_sq_coo),
        })
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// `u = C · x`: per-edge vectors `x[j] − x[i]`, shape E×3.
    pub fn edge_vectors(&self, x: &Points) -> Points {
        csr_matmul3(&self.c, x)
    }

    /// `Cᵀ · diag(q) · u`, shape V×3. With `u = C · x` this is the internal
    /// force operator `Cᵀ · Q · C · x` of spec §4.4; fixed rows are computed
    /// but the driver never writes them back.
    pub fn transpose_weighted(&self, q: &Scalars, u: &Points) -> Points {
        let weighted = scale_rows(u, q);
        csr_matmul3(&self.ct, &weighted)
    }

    /// `Cᵗ² · weights`, shape V: scatter-sum of a per-edge scalar onto its
    /// two incident vertices. Used for mass lumping (spec §4.3).
    pub fn lump_to_vertices(&self, weights: &Scalars) -> Scalars {
        csr_matvec(&self.ct_sq, weights)
    }
}

/// `y = A · x` for a CSR matrix `A` and dense vector `x`, via an explicit
/// row-offset/col-index/value loop.
fn csr_matvec(a: &CsrMatrix<f64>, x: &Scalars) -> Scalars {
    let n = a.nrows();
    let row_offsets = a.row_offsets();
    let col_indices = a.col_indices();
    let values = a.values();

    let mut y = Scalars::zeros(n);
    for row in 0..n {
        let start = row_offsets[row];
        let end = row_offsets[row + 1];
        let mut sum = 0.0;
        for idx in start..end {
            sum += values[idx] * x[col_indices[idx]];
        }
        y[row] = sum;
    }
    y
}

/// `Y = A · X` for a CSR matrix `A` (R×K) and dense K×3 array `X`, producing
/// an R×3 array. Generalizes `csr_matvec` to the 3-wide position/load/
/// residual blocks the driver works with.
fn csr_matmul3(a: &CsrMatrix<f64>, x: &Points) -> Points {
    let n = a.nrows();
    let row_offsets = a.row_offsets();
    let col_indices = a.col_indices();
    let values = a.values();

    let mut y = Points::zeros(n, 3);
    for row in 0..n {
        let start = row_offsets[row];
        let end = row_offsets[row + 1];
        let (mut sx, mut sy, mut sz) = (0.0, 0.0, 0.0);
        for idx in start..end {
            let v = values[idx];
            let col = col_indices[idx];
            sx += v * x[(col, 0)];
            sy += v * x[(col, 1)];
            sz += v * x[(col, 2)];
        }
        y[(row, 0)] = sx;
        y[(row, 1)] = sy;
        y[(row, 2)] = sz;
    }
    y
}

/// Scale each row `i` of `rows` by `weights[i]`.
fn scale_rows(rows: &Points, weights: &Scalars) -> Points {
    let mut out = rows.clone();
    for i in 0..out.nrows() {
        let w = weights[i];
        out[(i, 0)] *= w;
        out[(i, 1)] *= w;
        out[(i, 2)] *= w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{set_row, zero_points};

    #[test]
    fn rejects_out_of_range_edge() {
        let err = Connectivity::new(2, &[(0, 5)]).unwrap_err();
        assert!(matches!(err, DrError::BadEdge { edge: 0, .. }));
    }

    #[test]
    fn rejects_coincident_edge() {
        let err = Connectivity::new(2, &[(0, 0)]).unwrap_err();
        assert!(matches!(err, DrError::BadEdge { edge: 0, .. }));
    }

    #[test]
    fn edge_vectors_match_manual_difference() {
        let conn = Connectivity::new(2, &[(0, 1)]).unwrap();
        let mut x = zero_points(2);
        set_row(&mut x, 0, [0.0, 0.0, 0.0]);
        set_row(&mut x, 1, [2.0, 0.0, 0.0]);
        let u = conn.edge_vectors(&x);
        assert_eq!(u.nrows(), 1);
        assert!((u[(0, 0)] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn lump_to_vertices_splits_across_endpoints() {
        let conn = Connectivity::new(3, &[(0, 1), (1, 2)]).unwrap();
        let weights = Scalars::from_vec(vec![1.0, 2.0]);
        let mass = conn.lump_to_vertices(&weights);
        assert_eq!(mass.len(), 3);
        assert!((mass[0] - 1.0).abs() < 1e-12);
        assert!((mass[1] - 3.0).abs() < 1e-12);
        assert!((mass[2] - 2.0).abs() < 1e-12);
    }
}
