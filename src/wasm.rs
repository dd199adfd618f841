//! WASM bindings for the Dynamic Relaxation solver
//!
//! Provides a single JSON-in, JSON-out entry point so the solver can run
//! directly in the browser, eliminating HTTP round-trips.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::prelude::*;

#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize the panic hook for readable error messages in the browser
/// console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[derive(Debug, Deserialize)]
pub struct SolveRequest {
    pub vertices: Vec<[f64; 3]>,
    pub edges: Vec<[usize; 2]>,
    pub fixed: Vec<usize>,
    pub loads: Vec<[f64; 3]>,
    pub qpre: Vec<f64>,
    #[serde(default)]
    pub fpre: Vec<f64>,
    #[serde(default)]
    pub lpre: Vec<f64>,
    #[serde(default)]
    pub linit: Vec<f64>,
    #[serde(default)]
    pub e_mod: Vec<f64>,
    #[serde(default)]
    pub radius: Vec<f64>,
    #[serde(default)]
    pub options: Option<DrOptions>,
}

#[derive(Debug, Serialize)]
pub struct SolveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SolveResultData>,
    pub ms_elapsed: u64,
}

#[derive(Debug, Serialize)]
pub struct SolveResultData {
    pub positions: Vec<[f64; 3]>,
    pub forces: Vec<f64>,
    pub lengths: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
    pub crit1: f64,
    pub crit2: f64,
}

/// Solve a Dynamic Relaxation network given as a JSON string, returning a
/// JSON string with the final geometry and convergence state.
///
/// Designed to be called from a Web Worker; a single call runs to
/// completion (`kmax` is bounded by `request.options`), so there is no
/// per-iteration callback across the WASM boundary.
#[wasm_bindgen]
pub fn solve(request_json: &str) -> String {
    let start = js_sys::Date::now();

    let response = match serde_json::from_str::<SolveRequest>(request_json) {
        Ok(request) => run_solve(request, start),
        Err(e) => SolveResponse {
            success: false,
            error: Some(format!("failed to parse request: {e}")),
            result: None,
            ms_elapsed: elapsed_ms(start),
        },
    };

    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(r#"{{"success":false,"error":"serialization failed: {e}"}}"#)
    })
}

fn elapsed_ms(start: f64) -> u64 {
    (js_sys::Date::now() - start) as u64
}

fn run_solve(request: SolveRequest, start: f64) -> SolveResponse {
    match run_solve_inner(request) {
        Ok(result) => SolveResponse {
            success: true,
            error: None,
            result: Some(result),
            ms_elapsed: elapsed_ms(start),
        },
        Err(e) => SolveResponse {
            success: false,
            error: Some(e.to_string()),
            result: None,
            ms_elapsed: elapsed_ms(start),
        },
    }
}

fn run_solve_inner(request: SolveRequest) -> DrResult<SolveResultData> {
    let num_vertices = request.vertices.len();
    let num_edges = request.edges.len();

    let mut vertices = Points::zeros(num_vertices, 3);
    for (i, v) in request.vertices.iter().enumerate() {
        vertices[(i, 0)] = v[0];
        vertices[(i, 1)] = v[1];
        vertices[(i, 2)] = v[2];
    }

    let mut loads = Points::zeros(num_vertices, 3);
    for (i, l) in request.loads.iter().enumerate() {
        loads[(i, 0)] = l[0];
        loads[(i, 1)] = l[1];
        loads[(i, 2)] = l[2];
    }

    let edges: Vec<(usize, usize)> = request.edges.iter().map(|e| (e[0], e[1])).collect();

    let zeros_or = |v: Vec<f64>| {
        if v.is_empty() {
            Scalars::zeros(num_edges)
        } else {
            Scalars::from_vec(v)
        }
    };

    let network = Network::new(
        vertices,
        edges,
        request.fixed,
        loads,
        Scalars::from_vec(request.qpre),
        zeros_or(request.fpre),
        zeros_or(request.lpre),
        zeros_or(request.linit),
        zeros_or(request.e_mod),
        zeros_or(request.radius),
    )?;

    let options = request.options.unwrap_or_default();
    let outcome = dr(&network, &options, None)?;

    let positions = (0..outcome.positions.nrows())
        .map(|i| [outcome.positions[(i, 0)], outcome.positions[(i, 1)], outcome.positions[(i, 2)]])
        .collect();

    Ok(SolveResultData {
        positions,
        forces: outcome.f.iter().copied().collect(),
        lengths: outcome.l.iter().copied().collect(),
        iterations: outcome.iterations,
        converged: outcome.converged,
        crit1: outcome.crit1,
        crit2: outcome.crit2,
    })
}

/// Get the crate version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
