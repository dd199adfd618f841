//! Dynamic Relaxation HTTP Server

use axum::{
    extract::Json,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

use dr_solver::prelude::*;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct SolveRequest {
    vertices: Vec<[f64; 3]>,
    edges: Vec<[usize; 2]>,
    fixed: Vec<usize>,
    loads: Vec<[f64; 3]>,
    qpre: Vec<f64>,
    #[serde(default)]
    fpre: Vec<f64>,
    #[serde(default)]
    lpre: Vec<f64>,
    #[serde(default)]
    linit: Vec<f64>,
    #[serde(default)]
    e_mod: Vec<f64>,
    #[serde(default)]
    radius: Vec<f64>,
    #[serde(default)]
    options: Option<DrOptions>,
}

#[derive(Debug, Serialize)]
struct SolveResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<SolveResultData>,
}

#[derive(Debug, Serialize)]
struct SolveResultData {
    positions: Vec<[f64; 3]>,
    forces: Vec<f64>,
    lengths: Vec<f64>,
    iterations: usize,
    converged: bool,
    crit1: f64,
    crit2: f64,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn solve(Json(request): Json<SolveRequest>) -> impl IntoResponse {
    match run_solve(request) {
        Ok(result) => (
            StatusCode::OK,
            Json(SolveResponse {
                success: true,
                error: None,
                result: Some(result),
            }),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(SolveResponse {
                success: false,
                error: Some(e.to_string()),
                result: None,
            }),
        ),
    }
}

fn run_solve(request: SolveRequest) -> DrResult<SolveResultData> {
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

#[tokio::main]
async fn main() {
    env_logger::init();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/v1/solve", post(solve))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8087));
    println!("Dynamic Relaxation Server listening on http://{}", addr);
    println!("  Health check: GET  /health");
    println!("  Solve:        POST /api/v1/solve");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
