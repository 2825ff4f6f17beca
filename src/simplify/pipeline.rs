// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-patch simplification: project, outline, fill, unproject, merge

use super::boundary::extract_boundary;
use super::filler::fill;
use super::localizer::Localizer;
use super::merger::merge_coplanar;
use super::Tolerances;
use crate::geometry::{total_area, Triangle3};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What happened to a patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchStatus {
    /// Fewer triangles than the input
    Reduced,
    /// Same triangle count as the input
    Unchanged,
    /// The re-triangulation changed the area or the count and was discarded
    Rejected,
    /// The outline did not form closed loops
    Malformed,
}

/// Output of [`simplify_patch`]
#[derive(Debug, Clone, PartialEq)]
pub struct PatchResult {
    pub triangles: Vec<Triangle3>,
    pub status: PatchStatus,
    /// Triangles handed in, degenerate ones included
    pub input_count: usize,
    /// Pairs fused by the merger
    pub merges: usize,
}

impl PatchResult {
    fn untouched(triangles: Vec<Triangle3>, input_count: usize, status: PatchStatus) -> Self {
        Self {
            triangles,
            status,
            input_count,
            merges: 0,
        }
    }
}

/// Configured patch simplifier
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchSimplifier {
    tolerances: Tolerances,
    merge_until_stable: bool,
}

impl PatchSimplifier {
    pub fn new(tolerances: Tolerances) -> Self {
        Self {
            tolerances,
            merge_until_stable: false,
        }
    }

    /// Repeat merge passes until one of them fuses nothing
    pub fn with_merge_until_stable(mut self, enabled: bool) -> Self {
        self.merge_until_stable = enabled;
        self
    }

    /// Simplify one coplanar patch
    pub fn simplify(&self, triangles: &[Triangle3]) -> PatchResult {
        let input_count = triangles.len();
        let cleaned: Vec<Triangle3> = triangles
            .iter()
            .filter(|triangle| !triangle.is_degenerate())
            .copied()
            .collect();

        let Some(reference) = cleaned.first() else {
            return PatchResult::untouched(Vec::new(), input_count, PatchStatus::Unchanged);
        };
        let (Some(normal), Some(mut localizer)) = (
            reference.normal(),
            Localizer::new(reference, self.tolerances.position),
        ) else {
            return PatchResult::untouched(cleaned, input_count, PatchStatus::Unchanged);
        };

        let flat = localizer.project_triangles(&cleaned);
        let boundary = extract_boundary(&flat);
        if !boundary.is_closed() {
            debug!(
                triangles = cleaned.len(),
                loops = boundary.shapes.len(),
                "patch outline is not closed"
            );
            return PatchResult::untouched(cleaned, input_count, PatchStatus::Malformed);
        }

        let rebuilt: Vec<Triangle3> = localizer
            .unproject_triangles(&fill(&boundary.shapes))
            .into_iter()
            .map(|triangle| triangle.oriented_to(&normal))
            .filter(|triangle| !triangle.is_degenerate())
            .collect();

        let input_area = total_area(&cleaned);
        let rebuilt_area = total_area(&rebuilt);
        let area_drift = (rebuilt_area - input_area).abs();
        let accepted = !rebuilt.is_empty()
            && rebuilt.len() <= cleaned.len()
            && area_drift <= self.tolerances.area * input_area.max(rebuilt_area);

        if !accepted {
            debug!(
                input = cleaned.len(),
                filled = rebuilt.len(),
                input_area,
                rebuilt_area,
                "discarded re-triangulation"
            );
        }
        let base = if accepted { rebuilt } else { cleaned };

        let outcome = merge_coplanar(&base, self.tolerances.collinear, self.merge_until_stable);
        let status = if !accepted {
            PatchStatus::Rejected
        } else if outcome.triangles.len() < input_count {
            PatchStatus::Reduced
        } else {
            PatchStatus::Unchanged
        };

        PatchResult {
            triangles: outcome.triangles,
            status,
            input_count,
            merges: outcome.merges,
        }
    }
}

/// Simplify one coplanar patch with a single merge pass
pub fn simplify_patch(triangles: &[Triangle3], tolerances: &Tolerances) -> PatchResult {
    PatchSimplifier::new(*tolerances).simplify(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Vec3 {
        Vec3::new(x, y, 0.0)
    }

    fn grid(n: usize) -> Vec<Triangle3> {
        let mut triangles = Vec::new();
        for i in 0..n {
            for j in 0..n {
                let (x, y) = (i as f64, j as f64);
                triangles.push(Triangle3::new(p(x, y), p(x + 1.0, y), p(x + 1.0, y + 1.0)));
                triangles.push(Triangle3::new(p(x, y), p(x + 1.0, y + 1.0), p(x, y + 1.0)));
            }
        }
        triangles
    }

    #[test]
    fn test_split_square_stays_two_triangles() {
        let result = simplify_patch(&grid(1), &Tolerances::default());
        assert_eq!(result.triangles.len(), 2);
        assert_eq!(result.status, PatchStatus::Unchanged);
        assert_relative_eq!(total_area(&result.triangles), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_grid_loses_interior_vertex() {
        let input = grid(2);
        let result = simplify_patch(&input, &Tolerances::default());

        assert_eq!(result.status, PatchStatus::Reduced);
        assert!(result.triangles.len() < 8);
        assert_relative_eq!(total_area(&result.triangles), 4.0, epsilon = 1e-9);

        let centre = p(1.0, 1.0);
        assert!(!result.triangles.iter().any(|t| t.contains_vertex(&centre)));
    }

    #[test]
    fn test_output_follows_patch_normal() {
        let input = grid(3);
        let normal = input[0].raw_normal();
        let result = simplify_patch(&input, &Tolerances::default());
        for triangle in &result.triangles {
            assert!(triangle.raw_normal().dot(&normal) > 0.0);
        }
    }

    /// 10x10 square around a triangular hole of area 0.004
    fn square_with_small_hole() -> Vec<Triangle3> {
        let (a, b, c, d) = (p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0));
        let (h0, h1, h2) = (p(5.2, 4.6), p(5.3, 4.6), p(5.25, 4.68));
        vec![
            Triangle3::new(a, b, h1),
            Triangle3::new(a, h1, h0),
            Triangle3::new(b, c, h1),
            Triangle3::new(h1, c, h2),
            Triangle3::new(c, d, h2),
            Triangle3::new(d, h0, h2),
            Triangle3::new(d, a, h0),
        ]
    }

    #[test]
    fn test_small_triangular_hole_stays_open() {
        let input = square_with_small_hole();
        assert_relative_eq!(total_area(&input), 99.996, epsilon = 1e-9);

        let result = simplify_patch(&input, &Tolerances::default());
        assert!(matches!(
            result.status,
            PatchStatus::Unchanged | PatchStatus::Reduced
        ));
        assert!(result.triangles.len() <= input.len());
        assert_relative_eq!(total_area(&result.triangles), 99.996, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_and_empty_input() {
        let sliver = Triangle3::new(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0));
        let result = simplify_patch(&[sliver], &Tolerances::default());
        assert!(result.triangles.is_empty());
        assert_eq!(result.input_count, 1);

        let empty = simplify_patch(&[], &Tolerances::default());
        assert!(empty.triangles.is_empty());
        assert_eq!(empty.status, PatchStatus::Unchanged);
    }

    #[test]
    fn test_duplicated_face_is_rejected() {
        // the outline is one triangle, half the summed input area
        let face = Triangle3::new(p(0.0, 0.0), p(2.0, 0.0), p(0.0, 2.0));
        let result = simplify_patch(&[face, face], &Tolerances::default());
        assert_eq!(result.status, PatchStatus::Rejected);
        assert_eq!(result.triangles.len(), 2);
    }

    #[test]
    fn test_crossing_outline_is_malformed() {
        let first = Triangle3::new(p(0.0, 0.0), p(2.0, 0.0), p(0.0, 2.0));
        let second = Triangle3::new(p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0));
        let result = simplify_patch(&[first, second], &Tolerances::default());
        assert_eq!(result.status, PatchStatus::Malformed);
        assert_eq!(result.triangles, vec![first, second]);
    }

    #[test]
    fn test_simplifying_twice_is_stable() {
        let once = simplify_patch(&grid(3), &Tolerances::default());
        let twice = simplify_patch(&once.triangles, &Tolerances::default());
        assert_eq!(once.triangles.len(), twice.triangles.len());
        assert_relative_eq!(
            total_area(&once.triangles),
            total_area(&twice.triangles),
            epsilon = 1e-9
        );
    }
}
