// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyframe Reduce
//!
//! Lossless triangle-count reduction for OBJ meshes. Faces are grouped into
//! coplanar patches, each patch outline is re-triangulated with fewer
//! triangles, and adjacent triangles whose union is itself a triangle are
//! merged. Texture and normal references survive the rewrite.

pub mod batch;
pub mod cli;
pub mod config;
pub mod geometry;
pub mod io;
pub mod optimizer;
pub mod simplify;
pub mod utils;

pub use config::OptimizerConfig;
pub use geometry::{Mesh, Triangle3, Vec3};
pub use io::{export_obj, import_obj_file, parse_obj, write_obj, ObjError};
pub use optimizer::{optimize_file, optimize_obj, OptimizationReport, OptimizedMesh, Optimizer};
pub use simplify::{simplify_patch, PatchResult, PatchStatus, Tolerances};
