// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Closed boundary loops and point containment

use super::line::Line;
use super::vector::{PointKey2, Vec2};
use ahash::AHashMap;

/// Even-odd containment test against an arbitrary set of segments.
///
/// Casts a horizontal ray towards negative x and counts the segments it
/// crosses. A segment counts when exactly one endpoint lies above the ray,
/// so a ray passing through a shared vertex is counted once.
pub fn point_in_polygon(lines: &[Line], point: &Vec2) -> bool {
    let mut inside = false;

    for line in lines {
        let (a, b) = (line.start, line.end);
        if (a.y > point.y) != (b.y > point.y) {
            let ratio = (point.y - a.y) / (b.y - a.y);
            let crossing_x = a.x + (b.x - a.x) * ratio;
            if crossing_x < point.x {
                inside = !inside;
            }
        }
    }

    inside
}

/// One walk of connected lines; line `i` ends where line `i + 1` starts
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    lines: Vec<Line>,
}

impl Shape {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Walk order of the loop's vertices (each listed once)
    pub fn vertices(&self) -> Vec<Vec2> {
        self.lines.iter().map(|line| line.start).collect()
    }

    /// Whether the walk returns to its start and every vertex has degree two
    pub fn is_closed(&self) -> bool {
        let (Some(first), Some(last)) = (self.lines.first(), self.lines.last()) else {
            return false;
        };
        if self.lines.len() < 3 || last.end != first.start {
            return false;
        }

        let mut degree: AHashMap<PointKey2, usize> = AHashMap::new();
        for line in &self.lines {
            *degree.entry(PointKey2::new(&line.start)).or_insert(0) += 1;
            *degree.entry(PointKey2::new(&line.end)).or_insert(0) += 1;
        }
        degree.values().all(|&count| count == 2)
    }

    pub fn contains_point(&self, point: &Vec2) -> bool {
        point_in_polygon(&self.lines, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loop_of(points: &[(f64, f64)]) -> Shape {
        let points: Vec<Vec2> = points.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
        let lines = (0..points.len())
            .map(|i| Line::new(points[i], points[(i + 1) % points.len()]))
            .collect();
        Shape::new(lines)
    }

    #[test]
    fn test_square_contains_center() {
        let square = loop_of(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        assert!(square.is_closed());
        assert!(square.contains_point(&Vec2::new(1.0, 1.0)));
        assert!(!square.contains_point(&Vec2::new(3.0, 1.0)));
        assert!(!square.contains_point(&Vec2::new(-1.0, 1.0)));
    }

    #[test]
    fn test_ray_through_vertex_counts_once() {
        // the ray at y = 1 passes exactly through the vertex (0, 1)
        let diamond = loop_of(&[(0.0, 1.0), (1.0, 0.0), (2.0, 1.0), (1.0, 2.0)]);
        assert!(diamond.contains_point(&Vec2::new(1.0, 1.0)));
        assert!(!diamond.contains_point(&Vec2::new(2.5, 1.0)));
    }

    #[test]
    fn test_concave_notch_is_outside() {
        let notched = loop_of(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 4.0),
            (2.0, 1.0),
            (0.0, 4.0),
        ]);
        assert!(notched.contains_point(&Vec2::new(1.0, 1.0)));
        assert!(!notched.contains_point(&Vec2::new(2.0, 3.0)));
    }

    #[test]
    fn test_hole_is_outside() {
        let mut lines = loop_of(&[(0.0, 0.0), (6.0, 0.0), (6.0, 6.0), (0.0, 6.0)])
            .lines()
            .to_vec();
        lines.extend_from_slice(loop_of(&[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0)]).lines());
        assert!(point_in_polygon(&lines, &Vec2::new(1.0, 3.0)));
        assert!(!point_in_polygon(&lines, &Vec2::new(3.0, 3.0)));
    }

    #[test]
    fn test_open_walk_is_not_closed() {
        let open = Shape::new(vec![
            Line::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)),
            Line::new(Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)),
        ]);
        assert!(!open.is_closed());
        assert_eq!(open.vertices().len(), 2);
    }
}
