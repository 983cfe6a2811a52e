//! # Crease
//!
//! Estimation of smooth, flat, and crease-aware shading normals for
//! polygonal half-edge meshes.
//!
//! Crease provides a half-edge mesh data structure and three normal
//! estimators built on top of it, designed to stay numerically robust on
//! degenerate input: zero-area faces, collinear edges, non-planar or
//! non-convex polygons, and boundary elements all yield well-defined results
//! (the zero vector in the fully degenerate cases) rather than errors or NaN.
//!
//! ## Features
//!
//! - **Half-edge data structure**: O(1) adjacency queries with type-safe
//!   indices, faces of arbitrary valence
//! - **Vertex normals**: angle-weighted averaging, invariant to how a
//!   neighborhood is triangulated
//! - **Face normals**: Newell's method for general polygons, with a
//!   triangle fast path
//! - **Corner normals**: crease-angle-gated blend between smooth and
//!   faceted shading
//! - **Batch drivers**: parallel per-element passes writing into mesh-owned
//!   normal storage
//!
//! ## Quick Start
//!
//! ```
//! use crease::prelude::*;
//! use crease::algo::normals::{compute_face_normals, compute_vertex_normals};
//! use nalgebra::Point3;
//!
//! // Build a tetrahedron
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![
//!     [0, 2, 1], // bottom
//!     [0, 1, 3], // front
//!     [1, 2, 3], // right
//!     [2, 0, 3], // left
//! ];
//! let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! // Fill the mesh's normal storage
//! compute_vertex_normals(&mut mesh);
//! compute_face_normals(&mut mesh);
//!
//! let normals = mesh.vertex_normals().unwrap();
//! assert_eq!(normals.len(), mesh.num_vertices());
//! ```
//!
//! ## Per-Element Queries
//!
//! Individual normals can be evaluated without touching stored normals:
//!
//! ```
//! use crease::prelude::*;
//! use crease::algo::normals::{corner_normal, face_normal, vertex_normal};
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let faces = vec![[0, 1, 2]];
//! # let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! let nf = face_normal(&mesh, FaceId::new(0));
//! let nv = vertex_normal(&mesh, VertexId::new(0));
//!
//! // Corner normals blend the two based on a crease angle in degrees
//! let nc = corner_normal(&mesh, HalfEdgeId::new(0), 30.0);
//! assert_eq!(nc, nf);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use crease::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_faces, build_from_quads, build_from_triangles, to_face_vertex, Face, FaceId,
        HalfEdge, HalfEdgeId, HalfEdgeMesh, MeshIndex, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
