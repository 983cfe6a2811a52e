//! Shading-normal estimation for half-edge meshes.
//!
//! This module provides three normal estimators covering the common shading
//! models, plus batch drivers that fill the mesh's per-element normal storage:
//!
//! - [`vertex_normal`]: angle-weighted average of the incident face normals,
//!   for smooth shading
//! - [`face_normal`]: polygon normal via Newell's method, with a triangle
//!   fast path, for flat shading
//! - [`corner_normal`]: crease-aware blend between the two, producing hard
//!   shading seams across edges sharper than a dihedral-angle threshold
//! - [`compute_vertex_normals`] / [`compute_face_normals`]: evaluate every
//!   element and write the results into mesh-owned storage
//!
//! All estimators are total over valid handles: degenerate geometry (isolated
//! vertices, zero-length edges, collinear corners, zero-area faces) yields
//! zero-weight contributions or the zero vector, never an error or a NaN.
//! Every returned normal is either exactly zero or unit length.
//!
//! # Example
//!
//! ```
//! use crease::prelude::*;
//! use crease::algo::normals::{face_normal, vertex_normal};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let n = face_normal(&mesh, FaceId::new(0));
//! assert!((n.z - 1.0).abs() < 1e-12);
//!
//! let n = vertex_normal(&mesh, VertexId::new(0));
//! assert!((n.z - 1.0).abs() < 1e-12);
//! ```
//!
//! # References
//!
//! - Thürmer, G., Wüthrich, C. A. (1998). "Computing Vertex Normals from
//!   Polygonal Facets." Journal of Graphics Tools 3(1).
//! - Tampieri, F. (1992). "Newell's Method for Computing the Plane Equation
//!   of a Polygon." Graphics Gems III.

use nalgebra::Vector3;
use rayon::prelude::*;

use crate::mesh::{FaceId, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

/// Degeneracy threshold for edge-length products and normal lengths.
const EPS: f64 = f64::MIN_POSITIVE;

/// Normalize a vector, mapping near-zero input to the zero vector.
#[inline]
fn normalize_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    let len = v.norm();
    if len > EPS {
        v / len
    } else {
        Vector3::zeros()
    }
}

/// Interior angle between two corner edge vectors.
///
/// Returns `None` if either edge is too short to give a reliable angle.
/// The cosine is clamped to [-1, 1] before `acos` so floating-point rounding
/// cannot produce a domain error.
#[inline]
fn corner_angle(p1: &Vector3<f64>, p2: &Vector3<f64>) -> Option<f64> {
    let denom = (p1.norm_squared() * p2.norm_squared()).sqrt();
    if denom <= EPS {
        return None;
    }
    let cosine = (p1.dot(p2) / denom).clamp(-1.0, 1.0);
    Some(cosine.acos())
}

/// Compute the angle-weighted normal at a vertex.
///
/// Rotates once around `v` and, for every non-boundary corner, accumulates the
/// corner's unit face normal scaled by the interior angle it subtends at `v`.
/// Angle weighting is invariant to how the neighborhood is triangulated and
/// more robust to irregular tessellation than area weighting.
///
/// Returns the zero vector for isolated vertices and for vertices whose every
/// corner is degenerate.
pub fn vertex_normal<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> Vector3<f64> {
    let start = mesh.vertex(v).halfedge;
    if !start.is_valid() {
        // Isolated vertex
        return Vector3::zeros();
    }

    let p0 = *mesh.position(v);
    let mut nn = Vector3::zeros();

    let mut h = start;
    loop {
        if !mesh.is_boundary_halfedge(h) {
            let p1 = mesh.position(mesh.dest(h)) - p0;
            let p2 = mesh.position(mesh.origin(mesh.prev(h))) - p0;

            if let Some(angle) = corner_angle(&p1, &p2) {
                let n = p1.cross(&p2);
                let len = n.norm();
                if len > EPS {
                    nn += n * (angle / len);
                }
            }
        }

        h = mesh.cw_rotated_halfedge(h);
        if h == start {
            break;
        }
    }

    normalize_or_zero(nn)
}

/// Compute the normal of a face.
///
/// Triangles take a direct cross-product fast path. General polygons use
/// Newell's method: the cross products of all consecutive corner windows are
/// accumulated around the boundary, which approximates the best-fit plane
/// normal and stays robust for non-planar and non-convex faces.
///
/// Returns the zero vector if the face has (numerically) zero area.
pub fn face_normal<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, f: FaceId<I>) -> Vector3<f64> {
    let hend = mesh.face(f).halfedge;
    let mut h = hend;

    let mut p0 = *mesh.position(mesh.dest(h));
    h = mesh.next(h);
    let mut p1 = *mesh.position(mesh.dest(h));
    h = mesh.next(h);
    let mut p2 = *mesh.position(mesh.dest(h));

    if mesh.next(h) == hend {
        // Face is a triangle
        normalize_or_zero((p2 - p1).cross(&(p0 - p1)))
    } else {
        // Face is a general polygon
        let mut n = Vector3::zeros();

        let hend = h;
        loop {
            n += (p2 - p1).cross(&(p0 - p1));
            h = mesh.next(h);
            p0 = p1;
            p1 = p2;
            p2 = *mesh.position(mesh.dest(h));
            if h == hend {
                break;
            }
        }

        normalize_or_zero(n)
    }
}

/// Compute the shading normal at a corner, blending smooth and faceted
/// shading across a crease-angle threshold.
///
/// The corner is identified by the half-edge `h`; its face is the seed face
/// the crease cone is measured against. `crease_angle` is in **degrees**:
/// incident faces whose normal deviates from the seed face's normal by more
/// than `crease_angle` are excluded from the average, which produces a hard
/// shading seam across sharp edges. Included faces contribute angle-weighted,
/// exactly as in [`vertex_normal`].
///
/// Two trivial cases skip the blend entirely: below 0.01 degrees the result
/// is the seed face's [`face_normal`] (fully faceted), above 179 degrees it
/// is the [`vertex_normal`] of `h`'s origin (fully smooth). Boundary
/// half-edges have no seed face and yield the zero vector.
///
/// # Example
///
/// ```
/// use crease::prelude::*;
/// use crease::algo::normals::{corner_normal, face_normal};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
///
/// let h = HalfEdgeId::new(0);
/// assert_eq!(corner_normal(&mesh, h, 0.0), face_normal(&mesh, FaceId::new(0)));
/// ```
pub fn corner_normal<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    h: HalfEdgeId<I>,
    crease_angle: f64,
) -> Vector3<f64> {
    // Catch the two trivial cases
    if crease_angle < 0.01 {
        if mesh.is_boundary_halfedge(h) {
            return Vector3::zeros();
        }
        return face_normal(mesh, mesh.face_of(h));
    }
    if crease_angle > 179.0 {
        return vertex_normal(mesh, mesh.origin(h));
    }

    // Avoid numerical problems
    let crease_angle = crease_angle.max(0.001);
    let cos_crease = crease_angle.to_radians().cos();

    if mesh.is_boundary_halfedge(h) {
        return Vector3::zeros();
    }

    let v0 = mesh.dest(h);
    let p0 = *mesh.position(v0);

    // Normal of h's own face, the reference the crease cone is measured against
    let p1 = mesh.position(mesh.dest(mesh.next(h))) - p0;
    let p2 = mesh.position(mesh.origin(h)) - p0;
    let nf = normalize_or_zero(p1.cross(&p2));

    let mut nn = Vector3::zeros();

    // Average over all incident corners within the crease cone
    let start = h;
    let mut h = h;
    loop {
        if !mesh.is_boundary_halfedge(h) {
            let p1 = mesh.position(mesh.dest(mesh.next(h))) - p0;
            let p2 = mesh.position(mesh.origin(h)) - p0;

            let n = p1.cross(&p2);
            let len = n.norm();
            if len > EPS {
                let n = n / len;
                if n.dot(&nf) >= cos_crease {
                    if let Some(angle) = corner_angle(&p1, &p2) {
                        nn += n * angle;
                    }
                }
            }
        }

        h = mesh.rotated_incoming_halfedge(h);
        if h == start {
            break;
        }
    }

    normalize_or_zero(nn)
}

/// Compute angle-weighted normals for all vertices and store them in the
/// mesh's per-vertex normal storage (created on first use, overwritten on
/// recomputation).
///
/// Isolated vertices store the zero vector. This function uses parallel
/// computation by default; use [`compute_vertex_normals_sequential`] for
/// single-threaded execution.
///
/// # Example
///
/// ```
/// use crease::prelude::*;
/// use crease::algo::normals::compute_vertex_normals;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
/// let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
///
/// compute_vertex_normals(&mut mesh);
/// let normals = mesh.vertex_normals().unwrap();
/// assert_eq!(normals.len(), 3);
/// ```
pub fn compute_vertex_normals<I: MeshIndex + Sync>(mesh: &mut HalfEdgeMesh<I>) {
    compute_vertex_normals_impl(mesh, true);
}

/// Compute angle-weighted normals for all vertices (sequential version).
///
/// Uses single-threaded execution. Useful for benchmarking.
pub fn compute_vertex_normals_sequential<I: MeshIndex + Sync>(mesh: &mut HalfEdgeMesh<I>) {
    compute_vertex_normals_impl(mesh, false);
}

fn compute_vertex_normals_impl<I: MeshIndex + Sync>(mesh: &mut HalfEdgeMesh<I>, parallel: bool) {
    let view: &HalfEdgeMesh<I> = mesh;
    let vertex_indices: Vec<usize> = (0..view.num_vertices()).collect();

    let compute = |idx: usize| -> Vector3<f64> { vertex_normal(view, VertexId::new(idx)) };

    let normals: Vec<Vector3<f64>> = if parallel {
        vertex_indices.par_iter().map(|&idx| compute(idx)).collect()
    } else {
        vertex_indices.iter().map(|&idx| compute(idx)).collect()
    };

    mesh.get_or_create_vertex_normals().copy_from_slice(&normals);
}

/// Compute normals for all faces and store them in the mesh's per-face
/// normal storage (created on first use, overwritten on recomputation).
///
/// Zero-area faces store the zero vector. This function uses parallel
/// computation by default; use [`compute_face_normals_sequential`] for
/// single-threaded execution.
pub fn compute_face_normals<I: MeshIndex + Sync>(mesh: &mut HalfEdgeMesh<I>) {
    compute_face_normals_impl(mesh, true);
}

/// Compute normals for all faces (sequential version).
///
/// Uses single-threaded execution. Useful for benchmarking.
pub fn compute_face_normals_sequential<I: MeshIndex + Sync>(mesh: &mut HalfEdgeMesh<I>) {
    compute_face_normals_impl(mesh, false);
}

fn compute_face_normals_impl<I: MeshIndex + Sync>(mesh: &mut HalfEdgeMesh<I>, parallel: bool) {
    let view: &HalfEdgeMesh<I> = mesh;
    let face_indices: Vec<usize> = (0..view.num_faces()).collect();

    let compute = |idx: usize| -> Vector3<f64> { face_normal(view, FaceId::new(idx)) };

    let normals: Vec<Vector3<f64>> = if parallel {
        face_indices.par_iter().map(|&idx| compute(idx)).collect()
    } else {
        face_indices.iter().map(|&idx| compute(idx)).collect()
    };

    mesh.get_or_create_face_normals().copy_from_slice(&normals);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_faces, build_from_quads, build_from_triangles, HalfEdgeMesh};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    /// Unit cube: 8 vertices, 6 quad faces wound counter-clockwise from outside.
    fn unit_cube() -> HalfEdgeMesh<u32> {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let faces = vec![
            [0, 3, 2, 1], // bottom, -z
            [4, 5, 6, 7], // top, +z
            [0, 1, 5, 4], // front, -y
            [2, 3, 7, 6], // back, +y
            [0, 4, 7, 3], // left, -x
            [1, 2, 6, 5], // right, +x
        ];
        build_from_quads(&vertices, &faces).unwrap()
    }

    /// Flat mixed-valence fan around an interior center vertex, z = 0 plane.
    fn flat_fan() -> HalfEdgeMesh<u32> {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(-0.5, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-0.5, -1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        let faces = vec![
            vec![0, 1, 2],
            vec![0, 2, 3],
            vec![0, 3, 4, 5],
            vec![0, 5, 6, 1],
        ];
        build_from_faces(&vertices, &faces).unwrap()
    }

    /// Two triangles sharing the edge (0, 1), folded 90 degrees: face 0 has
    /// normal +z, face 1 has normal +y.
    fn folded_pair() -> HalfEdgeMesh<u32> {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_face_normal_triangle_fast_path() {
        let a = Point3::new(0.2, -0.3, 1.0);
        let b = Point3::new(1.5, 0.1, 0.4);
        let c = Point3::new(0.7, 2.0, -0.5);
        let mesh: HalfEdgeMesh<u32> =
            build_from_triangles(&[a, b, c], &[[0, 1, 2]]).unwrap();

        let n = face_normal(&mesh, FaceId::new(0));
        let expected = (c - b).cross(&(a - b)).normalize();
        assert_relative_eq!(n, expected, epsilon = 1e-14);
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_face_normal_planar_quad() {
        // Quad in the tilted plane z = x, normal (-1, 0, 1) / sqrt(2)
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh: HalfEdgeMesh<u32> = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();

        let n = face_normal(&mesh, FaceId::new(0));
        let expected = Vector3::new(-1.0, 0.0, 1.0) / 2.0_f64.sqrt();
        assert_relative_eq!(n, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_face_normal_polygon_rotation_invariance() {
        // Planar pentagon in the plane z = x, two different starting vertices
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.5, 1.0, 1.5),
            Point3::new(0.5, 2.0, 0.5),
            Point3::new(-0.5, 1.0, -0.5),
        ];

        let mesh_a: HalfEdgeMesh<u32> =
            build_from_faces(&points, &[vec![0, 1, 2, 3, 4]]).unwrap();
        let mesh_b: HalfEdgeMesh<u32> =
            build_from_faces(&points, &[vec![2, 3, 4, 0, 1]]).unwrap();

        let na = face_normal(&mesh_a, FaceId::new(0));
        let nb = face_normal(&mesh_b, FaceId::new(0));
        assert_relative_eq!(na, nb, epsilon = 1e-12);

        // Perpendicular to every edge
        for i in 0..points.len() {
            let edge = points[(i + 1) % points.len()] - points[i];
            assert!(na.dot(&edge).abs() < 1e-12);
        }
    }

    #[test]
    fn test_vertex_normal_isolated_vertex() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(9.0, 9.0, 9.0), // isolated
        ];
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();

        assert_eq!(vertex_normal(&mesh, VertexId::new(3)), Vector3::zeros());
    }

    #[test]
    fn test_vertex_normal_flat_fan_is_plane_normal() {
        // Mixed triangle/quad fan in the z = 0 plane: the angle-weighted
        // normal must be the plane normal regardless of face valence.
        let mesh = flat_fan();
        let n = vertex_normal(&mesh, VertexId::new(0));
        assert_relative_eq!(n, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_vertex_normal_boundary_vertex() {
        // A rim vertex of the flat fan only sees part of the plane; the
        // rotation crosses the boundary and skips boundary half-edges.
        let mesh = flat_fan();
        let n = vertex_normal(&mesh, VertexId::new(1));
        assert_relative_eq!(n, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_corner_normal_trivial_faceted() {
        let mesh = folded_pair();
        for h in mesh.halfedge_ids() {
            if mesh.is_boundary_halfedge(h) {
                assert_eq!(corner_normal(&mesh, h, 0.0), Vector3::zeros());
            } else {
                let f = mesh.face_of(h);
                assert_eq!(corner_normal(&mesh, h, 0.0), face_normal(&mesh, f));
            }
        }
    }

    #[test]
    fn test_corner_normal_trivial_smooth() {
        let mesh = folded_pair();
        for h in mesh.halfedge_ids() {
            let v = mesh.origin(h);
            assert_eq!(corner_normal(&mesh, h, 180.0), vertex_normal(&mesh, v));
        }
    }

    #[test]
    fn test_corner_normal_crease_gating() {
        let mesh = folded_pair();

        // The half-edge 0 -> 1 inside face 0 (its dest corner is at vertex 1)
        let h = mesh
            .halfedge_ids()
            .find(|&h| {
                !mesh.is_boundary_halfedge(h)
                    && mesh.origin(h) == VertexId::new(0)
                    && mesh.dest(h) == VertexId::new(1)
            })
            .unwrap();

        // Well below the 90-degree fold: only the seed face contributes
        let n = corner_normal(&mesh, h, 60.0);
        assert_relative_eq!(n, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);

        // Well above: both faces blend; both corners subtend the same angle,
        // so the result is the bisector of +z and +y
        let n = corner_normal(&mesh, h, 120.0);
        let expected = Vector3::new(0.0, 1.0, 1.0) / 2.0_f64.sqrt();
        assert_relative_eq!(n, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_corner_normal_threshold_boundary() {
        // The fold is exactly 90 degrees; tightening the threshold just below
        // it excludes the neighbor, producing a measurably more faceted result.
        let mesh = folded_pair();
        let h = mesh
            .halfedge_ids()
            .find(|&h| !mesh.is_boundary_halfedge(h) && mesh.origin(h) == VertexId::new(0))
            .unwrap();

        let below = corner_normal(&mesh, h, 89.0);
        let above = corner_normal(&mesh, h, 91.0);

        assert_relative_eq!(below, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        assert!((above - below).norm() > 0.1);
    }

    #[test]
    fn test_corner_normal_boundary_halfedge() {
        let mesh = folded_pair();
        let h = mesh
            .halfedge_ids()
            .find(|&h| mesh.is_boundary_halfedge(h))
            .unwrap();

        assert_eq!(corner_normal(&mesh, h, 45.0), Vector3::zeros());
    }

    #[test]
    fn test_degenerate_zero_length_edge() {
        // Quad with two coincident vertex positions: the zero-length edge
        // contributes nothing, and nothing propagates NaN/Inf.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mut mesh: HalfEdgeMesh<u32> =
            build_from_faces(&vertices, &[vec![0, 1, 2, 3]]).unwrap();

        let n = face_normal(&mesh, FaceId::new(0));
        assert_relative_eq!(n, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);

        // Vertex 1's only corner is degenerate: zero vector, not NaN
        assert_eq!(vertex_normal(&mesh, VertexId::new(1)), Vector3::zeros());

        compute_vertex_normals(&mut mesh);
        compute_face_normals(&mut mesh);
        for n in mesh.vertex_normals().unwrap() {
            assert!(n.iter().all(|c| c.is_finite()));
        }
        for n in mesh.face_normals().unwrap() {
            assert!(n.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn test_unit_cube_face_normals() {
        let mut mesh = unit_cube();
        compute_face_normals(&mut mesh);
        let normals = mesh.face_normals().unwrap();

        let expected = [
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        ];
        for (n, e) in normals.iter().zip(expected.iter()) {
            assert_relative_eq!(*n, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_unit_cube_vertex_normals() {
        let mut mesh = unit_cube();
        compute_vertex_normals(&mut mesh);
        let normals = mesh.vertex_normals().unwrap();

        // Every corner vertex sees three mutually perpendicular faces with
        // equal corner angles: the normal points into the corner's octant.
        let center = Point3::new(0.5, 0.5, 0.5);
        for v in mesh.vertex_ids() {
            let expected = (mesh.position(v) - center).normalize();
            assert_relative_eq!(normals[v.index()], expected, epsilon = 1e-12);

            let c = 1.0 / 3.0_f64.sqrt();
            for coord in normals[v.index()].iter() {
                assert_relative_eq!(coord.abs(), c, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_batch_idempotent() {
        let mut mesh = unit_cube();

        compute_vertex_normals(&mut mesh);
        let first: Vec<Vector3<f64>> = mesh.vertex_normals().unwrap().to_vec();

        compute_vertex_normals(&mut mesh);
        assert_eq!(mesh.vertex_normals().unwrap(), first.as_slice());

        // Sequential execution produces bit-identical results
        compute_vertex_normals_sequential(&mut mesh);
        assert_eq!(mesh.vertex_normals().unwrap(), first.as_slice());
    }

    #[test]
    fn test_batch_overwrites_after_edit() {
        let mut mesh = flat_fan();
        compute_vertex_normals(&mut mesh);
        let before = mesh.vertex_normals().unwrap()[1];

        // Lift the center vertex out of the plane and recompute
        mesh.set_position(VertexId::new(0), Point3::new(0.0, 0.0, 0.5));
        compute_vertex_normals(&mut mesh);
        let after = mesh.vertex_normals().unwrap()[1];

        assert!((after - before).norm() > 1e-3);
    }

    #[test]
    fn test_batch_face_normals_sequential_matches() {
        let mut mesh = unit_cube();
        compute_face_normals(&mut mesh);
        let parallel: Vec<Vector3<f64>> = mesh.face_normals().unwrap().to_vec();

        compute_face_normals_sequential(&mut mesh);
        assert_eq!(mesh.face_normals().unwrap(), parallel.as_slice());
    }

    #[test]
    fn test_batch_handles_isolated_vertices() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(9.0, 9.0, 9.0), // isolated
        ];
        let mut mesh: HalfEdgeMesh<u32> =
            build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();

        compute_vertex_normals(&mut mesh);
        let normals = mesh.vertex_normals().unwrap();
        assert_eq!(normals[3], Vector3::zeros());
        assert_relative_eq!(normals[0], Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }
}
