// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Coplanar patch simplification
//!
//! A patch is flattened into its own plane, its outline is recovered, the
//! outline is re-triangulated with as few triangles as the greedy filler
//! finds, and finally adjacent triangles whose union is a triangle are fused.

pub mod boundary;
pub mod filler;
pub mod localizer;
pub mod merger;
pub mod patch;
pub mod pipeline;

pub use boundary::{extract_boundary, Boundary};
pub use filler::fill;
pub use localizer::Localizer;
pub use merger::{merge_coplanar, MergeOutcome};
pub use patch::{split_into_patches, Patch};
pub use pipeline::{simplify_patch, PatchResult, PatchSimplifier, PatchStatus};

use crate::utils::math::{AREA_TOLERANCE, COLLINEAR_EPSILON, COPLANAR_EPSILON, DEFAULT_EPSILON};
use serde::{Deserialize, Serialize};

/// Distance and ratio thresholds used while simplifying
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Distance under which two 3D points are treated as one
    pub position: f64,
    /// Plane distance and normal difference for grouping faces
    pub coplanar: f64,
    /// Detour slack when testing a point against a 3D segment
    pub collinear: f64,
    /// Relative area change allowed for a re-triangulated patch
    pub area: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            position: DEFAULT_EPSILON,
            coplanar: COPLANAR_EPSILON,
            collinear: COLLINEAR_EPSILON,
            area: AREA_TOLERANCE,
        }
    }
}
