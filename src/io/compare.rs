// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh comparison utilities for checking an optimization result

use crate::geometry::{analyze, Mesh};
use crate::utils::relative_eq;
use serde::{Deserialize, Serialize};

/// Result of mesh comparison
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshComparison {
    pub triangles_before: usize,
    pub triangles_after: usize,
    pub triangle_count_diff: i64,
    /// Fraction of triangles removed, 0 when nothing was removed
    pub reduction_ratio: f64,
    pub area_before: f64,
    pub area_after: f64,
    pub area_match: bool,
    pub bbox_match: bool,
    pub tolerance: f64,
    pub passed: bool,
}

impl MeshComparison {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Compare a mesh with its optimized version.
///
/// `tolerance` is the relative surface area difference allowed; the bounding
/// boxes must agree within the same fraction of the larger extent.
pub fn compare_meshes(before: &Mesh, after: &Mesh, tolerance: f64) -> MeshComparison {
    let stats_before = analyze(before);
    let stats_after = analyze(after);

    let mut comparison = MeshComparison::new();
    comparison.tolerance = tolerance;

    comparison.triangles_before = stats_before.triangle_count;
    comparison.triangles_after = stats_after.triangle_count;
    comparison.triangle_count_diff =
        stats_before.triangle_count as i64 - stats_after.triangle_count as i64;
    if stats_before.triangle_count > 0 {
        comparison.reduction_ratio =
            comparison.triangle_count_diff as f64 / stats_before.triangle_count as f64;
    }

    comparison.area_before = stats_before.surface_area;
    comparison.area_after = stats_after.surface_area;
    comparison.area_match =
        relative_eq(stats_before.surface_area, stats_after.surface_area, tolerance);

    let extent = stats_before.bbox.size().amax().max(stats_after.bbox.size().amax());
    comparison.bbox_match = stats_before.bbox.is_empty() == stats_after.bbox.is_empty()
        && (stats_before.bbox.is_empty()
            || stats_before
                .bbox
                .approx_eq(&stats_after.bbox, tolerance * extent.max(1.0)));

    // Overall pass if nothing grew and the surface is preserved
    comparison.passed = comparison.triangle_count_diff >= 0
        && comparison.area_match
        && comparison.bbox_match;

    comparison
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_obj;

    const SPLIT_SQUARE: &str = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 3 4\n";

    #[test]
    fn test_compare_identical_meshes() {
        let mesh = parse_obj(SPLIT_SQUARE).unwrap();
        let comparison = compare_meshes(&mesh, &mesh, 1e-6);
        assert!(comparison.passed);
        assert_eq!(comparison.triangle_count_diff, 0);
        assert_eq!(comparison.reduction_ratio, 0.0);
    }

    #[test]
    fn test_compare_reduced_mesh() {
        let before = parse_obj(
            "v 0 0 0\nv 1 0 0\nv 2 0 0\nv 0 1 0\nf 1 2 4\nf 2 3 4\n",
        )
        .unwrap();
        let after = parse_obj("v 0 0 0\nv 2 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let comparison = compare_meshes(&before, &after, 1e-6);
        assert!(comparison.passed);
        assert_eq!(comparison.reduction_ratio, 0.5);
    }

    #[test]
    fn test_lost_area_fails() {
        let before = parse_obj(SPLIT_SQUARE).unwrap();
        let after = parse_obj("v 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\n").unwrap();
        let comparison = compare_meshes(&before, &after, 1e-6);
        assert!(!comparison.area_match);
        assert!(!comparison.passed);
    }
}
