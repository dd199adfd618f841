//! Mathematical primitives for the Dynamic Relaxation solver

pub mod connectivity;

use nalgebra::{DMatrix, DVector};

pub use connectivity::Connectivity;

/// Dense V×3 (or E×3) array of row vectors: positions, loads, velocities, residuals.
pub type Points = DMatrix<f64>;
/// Dense E-length (or V-length) column of scalars: force densities, lengths, masses.
pub type Scalars = DVector<f64>;

/// L2 norm of each row of an N×3 array, returned as an N-length column.
///
/// Rows with all-zero components (coincident edge endpoints) yield `0.0`,
/// never `NaN`.
pub fn row_norms(rows: &Points) -> Scalars {
    let n = rows.nrows();
    Scalars::from_iterator(
        n,
        (0..n).map(|i| {
            let x = rows[(i, 0)];
            let y = rows[(i, 1)];
            let z = rows[(i, 2)];
            (x * x + y * y + z * z).sqrt()
        }),
    )
}

/// Allocate an N×3 array of zeros.
pub fn zero_points(n: usize) -> Points {
    Points::zeros(n, 3)
}

/// Replace a row of `rows` with the given 3-vector.
pub fn set_row(rows: &mut Points, i: usize, v: [f64; 3]) {
    rows[(i, 0)] = v[0];
    rows[(i, 1)] = v[1];
    rows[(i, 2)] = v[2];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_norms_handles_coincident_rows() {
        let mut rows = zero_points(2);
        set_row(&mut rows, 0, [3.0, 4.0, 0.0]);
        set_row(&mut rows, 1, [0.0, 0.0, 0.0]);
        let norms = row_norms(&rows);
        assert!((norms[0] - 5.0).abs() < 1e-12);
        assert_eq!(norms[1], 0.0);
    }
}
