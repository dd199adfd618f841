//! The Dynamic Relaxation kernel: edge-law assembly, mass estimation, the
//! Runge-Kutta integrator, and the iteration driver.

pub mod driver;
pub mod edge_law;
pub mod integrator;
pub mod mass;

pub use driver::dr;
