// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Greedy fusion of edge-adjacent coplanar triangles
//!
//! Two triangles `(A, B, C)` and `(A, B, D)` sharing the edge `A-B` form a
//! single triangle exactly when one of the shared corners lies on the segment
//! joining the two apexes. With `A` on `C-D` the union is `(C, D, B)`.

use crate::geometry::{Line3, Triangle3, Vec3};
use tracing::trace;

/// Result of a merge run
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub triangles: Vec<Triangle3>,
    /// Number of pairs fused into one triangle
    pub merges: usize,
}

/// The two corners of `a` also found in `b`, plus the remaining apexes
fn shared_edge(a: &Triangle3, b: &Triangle3) -> Option<([Vec3; 2], Vec3, Vec3)> {
    let shared: Vec<Vec3> = a
        .points
        .iter()
        .filter(|point| b.contains_vertex(point))
        .copied()
        .collect();
    if shared.len() != 2 {
        return None;
    }

    let apex_a = *a.points.iter().find(|point| !shared.contains(point))?;
    let apex_b = *b.points.iter().find(|point| !shared.contains(point))?;
    Some(([shared[0], shared[1]], apex_a, apex_b))
}

/// Single triangle covering both `a` and `b`, if their union is one
pub fn merge_pair(a: &Triangle3, b: &Triangle3, epsilon: f64) -> Option<Triangle3> {
    let ([first, second], apex_a, apex_b) = shared_edge(a, b)?;
    let apexes = Line3::new(apex_a, apex_b);

    let merged = if apexes.contains_point(&first, epsilon) {
        Triangle3::new(apex_a, apex_b, second)
    } else if apexes.contains_point(&second, epsilon) {
        Triangle3::new(apex_a, apex_b, first)
    } else {
        return None;
    };

    let reference = a.raw_normal();
    Some(merged.oriented_to(&reference))
}

/// One pass over all pairs. Each triangle takes part in at most one fusion
/// per partner scan; the survivor keeps the position of the lower index.
pub fn merge_pass(triangles: &[Triangle3], epsilon: f64) -> MergeOutcome {
    let mut current: Vec<Triangle3> = triangles.to_vec();
    let mut removed = vec![false; current.len()];
    let mut merges = 0;

    for i in 0..current.len() {
        if removed[i] {
            continue;
        }
        for j in (i + 1)..current.len() {
            if removed[j] || removed[i] {
                continue;
            }
            let Some(merged) = merge_pair(&current[i], &current[j], epsilon) else {
                continue;
            };

            trace!(survivor = i, removed = j, "merged coplanar pair");
            merges += 1;
            removed[j] = true;
            if merged.is_degenerate() {
                removed[i] = true;
            } else {
                current[i] = merged;
            }
        }
    }

    let triangles = current
        .into_iter()
        .zip(removed)
        .filter(|(triangle, gone)| !gone && !triangle.is_degenerate())
        .map(|(triangle, _)| triangle)
        .collect();

    MergeOutcome { triangles, merges }
}

/// Merge a patch's triangles, repeating passes while `until_stable` holds
/// and the previous pass fused anything
pub fn merge_coplanar(triangles: &[Triangle3], epsilon: f64, until_stable: bool) -> MergeOutcome {
    let mut outcome = merge_pass(triangles, epsilon);
    if !until_stable {
        return outcome;
    }

    loop {
        let next = merge_pass(&outcome.triangles, epsilon);
        if next.merges == 0 {
            return outcome;
        }
        outcome = MergeOutcome {
            triangles: next.triangles,
            merges: outcome.merges + next.merges,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::total_area;
    use crate::utils::math::COLLINEAR_EPSILON;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Vec3 {
        Vec3::new(x, y, 0.0)
    }

    #[test]
    fn test_collinear_apexes_merge() {
        // apexes (0,1) and (0,-1) sit on a line through the shared corner (0,0)
        let upper = Triangle3::new(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0));
        let lower = Triangle3::new(p(1.0, 0.0), p(0.0, 0.0), p(0.0, -1.0));
        let outcome = merge_coplanar(&[upper, lower], COLLINEAR_EPSILON, false);

        assert_eq!(outcome.merges, 1);
        assert_eq!(outcome.triangles.len(), 1);
        let merged = outcome.triangles[0];
        assert_eq!(merged, Triangle3::new(p(0.0, 1.0), p(0.0, -1.0), p(1.0, 0.0)));
        assert!(merged.raw_normal().dot(&upper.raw_normal()) > 0.0);
        assert_relative_eq!(merged.area(), upper.area() + lower.area());
    }

    #[test]
    fn test_overlapping_pair_is_left_alone() {
        let first = Triangle3::new(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0));
        let second = Triangle3::new(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0));
        let outcome = merge_coplanar(&[first, second], COLLINEAR_EPSILON, false);
        assert_eq!(outcome.merges, 0);
        assert_eq!(outcome.triangles.len(), 2);
    }

    #[test]
    fn test_square_halves_do_not_merge() {
        let first = Triangle3::new(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0));
        let second = Triangle3::new(p(0.0, 0.0), p(1.0, 1.0), p(0.0, 1.0));
        assert!(merge_pair(&first, &second, COLLINEAR_EPSILON).is_none());
    }

    #[test]
    fn test_fan_merges_until_stable() {
        // fan of four slivers around (0,0) spanning a straight base line
        let base: Vec<Vec3> = (0..=4).map(|k| p(k as f64, 1.0)).collect();
        let fan: Vec<Triangle3> = base
            .windows(2)
            .map(|pair| Triangle3::new(p(0.0, 0.0), pair[0], pair[1]))
            .collect();

        let single = merge_coplanar(&fan, COLLINEAR_EPSILON, false);
        let stable = merge_coplanar(&fan, COLLINEAR_EPSILON, true);

        assert_eq!(stable.triangles.len(), 1);
        assert_eq!(stable.merges, 3);
        assert!(single.triangles.len() >= stable.triangles.len());
        assert_relative_eq!(total_area(&stable.triangles), total_area(&fan));
        assert_relative_eq!(total_area(&single.triangles), total_area(&fan));
    }

    #[test]
    fn test_disjoint_triangles_untouched() {
        let first = Triangle3::new(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0));
        let second = Triangle3::new(p(5.0, 0.0), p(6.0, 0.0), p(5.0, 1.0));
        let outcome = merge_pass(&[first, second], COLLINEAR_EPSILON);
        assert_eq!(outcome.merges, 0);
        assert_eq!(outcome.triangles, vec![first, second]);
    }
}
