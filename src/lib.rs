//! Dynamic Relaxation - a native Rust solver for pin-jointed axial-force
//! networks
//!
//! This library provides an explicit, mass-free-method equilibrium solver
//! for networks of vertices connected by axial-force-only edges (cable nets,
//! trusses, tensile membranes), supporting:
//! - Combined prestress, prescribed-force, prescribed-length, and linear
//!   axial stiffness edge laws
//! - Fixed/free vertex boundary conditions
//! - 1st/2nd/4th-order explicit Runge-Kutta time integration with viscous
//!   damping
//! - Two independent convergence criteria (residual norm, displacement norm)
//!
//! ## Example
//! ```rust
//! use dr_solver::prelude::*;
//!
//! // A single bar from the origin to (1, 0, 0), fixed at the origin,
//! // pulled sideways by a unit force density.
//! let vertices = Points::from_row_slice(2, 3, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
//! let mut loads = Points::zeros(2, 3);
//! loads[(1, 0)] = 1.0;
//!
//! let network = Network::new(
//!     vertices,
//!     vec![(0, 1)],
//!     vec![0],
//!     loads,
//!     Scalars::from_vec(vec![1.0]),
//!     Scalars::from_vec(vec![0.0]),
//!     Scalars::from_vec(vec![0.0]),
//!     Scalars::from_vec(vec![0.0]),
//!     Scalars::from_vec(vec![0.0]),
//!     Scalars::from_vec(vec![0.0]),
//! ).unwrap();
//!
//! let outcome = dr(&network, &DrOptions::default(), None).unwrap();
//! assert!(outcome.converged);
//! ```

pub mod error;
pub mod math;
pub mod network;
pub mod options;
pub mod results;
pub mod smoothing;
pub mod solver;

pub mod prelude {
    pub use crate::error::{DrError, DrResult};
    pub use crate::math::{Points, Scalars};
    pub use crate::network::Network;
    pub use crate::options::DrOptions;
    pub use crate::results::DrOutcome;
    pub use crate::smoothing::{smooth_area_weighted, smooth_center_of_mass, smooth_centroid};
    pub use crate::solver::dr;
    pub use crate::solver::integrator::Steps;
}

#[cfg(feature = "wasm")]
pub mod wasm;
