//! Normal estimation algorithms.
//!
//! This module contains the shading-normal estimators:
//!
//! - **Vertex normals**: angle-weighted smooth shading normals
//! - **Face normals**: Newell's-method flat shading normals
//! - **Corner normals**: crease-angle-gated hybrid shading normals
//!
//! Per-element functions return a single normal; the `compute_*` batch
//! drivers fill the mesh's per-element normal storage.

pub mod normals;
