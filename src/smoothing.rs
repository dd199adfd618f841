//! Laplacian-style mesh relaxation: centroid, center-of-mass, and
//! area-weighted variants (spec §4.8). A reference collaborator, not part of
//! the Dynamic Relaxation core — this module does not depend on `solver::*`.

use std::collections::HashMap;

use nalgebra::Vector3;

/// Adjacency of a vertex graph: for each vertex, the ordered list of
/// neighbouring vertex keys.
pub type Adjacency = HashMap<usize, Vec<usize>>;

/// A face as an ordered list of vertex keys, for the area-weighted variant.
pub type Faces = HashMap<usize, Vec<usize>>;

/// Observer invoked once per smoothing pass with `(vertices, k)`.
pub type SmoothCallback<'a> = dyn FnMut(&HashMap<usize, Vector3<f64>>, usize) + 'a;

fn centroid(points: &[Vector3<f64>]) -> Vector3<f64> {
    if points.is_empty() {
        return Vector3::zeros();
    }
    let sum: Vector3<f64> = points.iter().fold(Vector3::zeros(), |acc, p| acc + p);
    sum / points.len() as f64
}

/// Signed area and centroid of a (possibly non-planar, assumed near-planar)
/// polygon via the fan-triangulation shoelace sum around its own centroid.
fn polygon_centroid_and_area(points: &[Vector3<f64>]) -> (Vector3<f64>, f64) {
    if points.len() < 3 {
        return (centroid(points), 0.0);
    }
    let o = centroid(points);
    let mut area = 0.0;
    let mut weighted = Vector3::zeros();
    for i in 0..points.len() {
        let a = points[i] - o;
        let b = points[(i + 1) % points.len()] - o;
        let cross = a.cross(&b);
        let tri_area = 0.5 * cross.norm();
        let tri_centroid = o + (a + b) / 3.0;
        area += tri_area;
        weighted += tri_centroid * tri_area;
    }
    if area > 0.0 {
        (weighted / area, area)
    } else {
        (o, 0.0)
    }
}

/// Move each non-fixed vertex toward the centroid of its neighbours, `kmax`
/// times, under damping `d` (spec §4.8 `smooth_centroid`).
///
/// Each pass snapshots the vertex positions before writing (Jacobi, not
/// Gauss-Seidel) so that every vertex relaxes against the same prior state.
pub fn smooth_centroid(
    vertices: &mut HashMap<usize, Vector3<f64>>,
    adjacency: &Adjacency,
    fixed: &[usize],
    kmax: usize,
    damping: f64,
    mut callback: Option<&mut SmoothCallback<'_>>,
) {
    let fixed: std::collections::HashSet<usize> = fixed.iter().copied().collect();

    for k in 0..kmax {
        let snapshot = vertices.clone();

        for (&key, point) in snapshot.iter() {
            if fixed.contains(&key) {
                continue;
            }
            let Some(nbrs) = adjacency.get(&key) else {
                continue;
            };
            let neighbour_points: Vec<Vector3<f64>> =
                nbrs.iter().filter_map(|n| snapshot.get(n)).copied().collect();
            let target = centroid(&neighbour_points);
            let updated = point + damping * (target - point);
            vertices.insert(key, updated);
        }

        if let Some(cb) = callback.as_deref_mut() {
            cb(vertices, k);
        }
    }
}

/// Move each non-fixed vertex toward the center-of-mass of the polygon
/// formed by its (ordered) neighbours (spec §4.8 `smooth_centerofmass`).
///
/// The caller must supply neighbours in ring order for the polygon to be
/// well-formed; this is documented, not enforced.
pub fn smooth_center_of_mass(
    vertices: &mut HashMap<usize, Vector3<f64>>,
    adjacency: &Adjacency,
    fixed: &[usize],
    kmax: usize,
    damping: f64,
    mut callback: Option<&mut SmoothCallback<'_>>,
) {
    let fixed: std::collections::HashSet<usize> = fixed.iter().copied().collect();

    for k in 0..kmax {
        let snapshot = vertices.clone();

        for (&key, point) in snapshot.iter() {
            if fixed.contains(&key) {
                continue;
            }
            let Some(nbrs) = adjacency.get(&key) else {
                continue;
            };
            let ring: Vec<Vector3<f64>> =
                nbrs.iter().filter_map(|n| snapshot.get(n)).copied().collect();
            let (target, _) = polygon_centroid_and_area(&ring);
            let updated = point + damping * (target - point);
            vertices.insert(key, updated);
        }

        if let Some(cb) = callback.as_deref_mut() {
            cb(vertices, k);
        }
    }
}

/// Move each non-fixed vertex toward the area-weighted centroid of its
/// incident faces (spec §4.8 `smooth_area`).
pub fn smooth_area_weighted(
    vertices: &mut HashMap<usize, Vector3<f64>>,
    faces: &Faces,
    adjacency: &Adjacency,
    fixed: &[usize],
    kmax: usize,
    damping: f64,
    mut callback: Option<&mut SmoothCallback<'_>>,
) {
    let fixed: std::collections::HashSet<usize> = fixed.iter().copied().collect();

    for k in 0..kmax {
        let snapshot = vertices.clone();

        let mut face_centroid = HashMap::with_capacity(faces.len());
        let mut face_area = HashMap::with_capacity(faces.len());
        for (&fkey, keys) in faces.iter() {
            let pts: Vec<Vector3<f64>> = keys.iter().filter_map(|k| snapshot.get(k)).copied().collect();
            let (c, a) = polygon_centroid_and_area(&pts);
            face_centroid.insert(fkey, c);
            face_area.insert(fkey, a);
        }

        for (&key, point) in snapshot.iter() {
            if fixed.contains(&key) {
                continue;
            }
            let Some(incident) = adjacency.get(&key) else {
                continue;
            };

            let mut total_area = 0.0;
            let mut weighted = Vector3::zeros();
            for fkey in incident {
                if let (Some(&a), Some(&c)) = (face_area.get(fkey), face_centroid.get(fkey)) {
                    weighted += c * a;
                    total_area += a;
                }
            }

            let target = if total_area > 0.0 {
                weighted / total_area
            } else {
                *point
            };
            let updated = point + damping * (target - point);
            vertices.insert(key, updated);
        }

        if let Some(cb) = callback.as_deref_mut() {
            cb(vertices, k);
        }
    }
}
