// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangle value types for the local 2D frame and for 3D space

use super::line::{Line, Line3};
use super::vector::{cross2, Vec2, Vec3};
use crate::utils::math::DEGENERATE_AREA;

/// Order-independent comparison of two point triples
fn same_point_set<T: PartialEq>(a: &[T; 3], b: &[T; 3]) -> bool {
    let contains_all = |x: &[T; 3], y: &[T; 3]| x.iter().all(|p| y.contains(p));
    contains_all(a, b) && contains_all(b, a)
}

/// Triangle in a patch's local 2D frame
#[derive(Debug, Clone, Copy)]
pub struct Triangle2 {
    pub points: [Vec2; 3],
}

impl Triangle2 {
    pub fn new(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self { points: [a, b, c] }
    }

    /// Twice the signed area; positive for counter-clockwise order
    pub fn signed_double_area(&self) -> f64 {
        let [a, b, c] = &self.points;
        cross2(&(b - a), &(c - a))
    }

    pub fn area(&self) -> f64 {
        self.signed_double_area().abs() / 2.0
    }

    pub fn is_degenerate(&self) -> bool {
        self.area() <= DEGENERATE_AREA
    }

    pub fn edges(&self) -> [Line; 3] {
        let [a, b, c] = self.points;
        [Line::new(a, b), Line::new(b, c), Line::new(c, a)]
    }

    pub fn centroid(&self) -> Vec2 {
        let [a, b, c] = &self.points;
        (a + b + c) / 3.0
    }

    /// Whether `point` lies strictly inside the triangle
    pub fn strictly_contains(&self, point: &Vec2) -> bool {
        let [a, b, c] = &self.points;
        let d1 = cross2(&(b - a), &(point - a));
        let d2 = cross2(&(c - b), &(point - b));
        let d3 = cross2(&(a - c), &(point - c));

        (d1 > 0.0 && d2 > 0.0 && d3 > 0.0) || (d1 < 0.0 && d2 < 0.0 && d3 < 0.0)
    }
}

impl PartialEq for Triangle2 {
    fn eq(&self, other: &Self) -> bool {
        same_point_set(&self.points, &other.points)
    }
}

/// Triangle in 3D space
#[derive(Debug, Clone, Copy)]
pub struct Triangle3 {
    pub points: [Vec3; 3],
}

impl Triangle3 {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { points: [a, b, c] }
    }

    /// Cross product of the two edges leaving the first point.
    /// Its length is twice the area, its direction follows the winding.
    pub fn raw_normal(&self) -> Vec3 {
        let [a, b, c] = &self.points;
        (b - a).cross(&(c - a))
    }

    /// Unit normal, `None` for degenerate triangles
    pub fn normal(&self) -> Option<Vec3> {
        self.raw_normal().try_normalize(DEGENERATE_AREA)
    }

    pub fn area(&self) -> f64 {
        self.raw_normal().norm() / 2.0
    }

    pub fn is_degenerate(&self) -> bool {
        self.area() <= DEGENERATE_AREA
    }

    pub fn edges(&self) -> [Line3; 3] {
        let [a, b, c] = self.points;
        [Line3::new(a, b), Line3::new(b, c), Line3::new(c, a)]
    }

    pub fn contains_vertex(&self, point: &Vec3) -> bool {
        self.points.contains(point)
    }

    /// Same triangle with the last two points swapped
    pub fn flipped(&self) -> Self {
        let [a, b, c] = self.points;
        Self::new(a, c, b)
    }

    /// Rebuild with a winding whose normal points along `reference`
    pub fn oriented_to(&self, reference: &Vec3) -> Self {
        if self.raw_normal().dot(reference) < 0.0 {
            self.flipped()
        } else {
            *self
        }
    }
}

impl PartialEq for Triangle3 {
    fn eq(&self, other: &Self) -> bool {
        same_point_set(&self.points, &other.points)
    }
}

/// Total area of a triangle list
pub fn total_area(triangles: &[Triangle3]) -> f64 {
    triangles.iter().map(Triangle3::area).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_area_3d() {
        let tri = Triangle3::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
        );
        assert_relative_eq!(tri.area(), 6.0);
        assert!(!tri.is_degenerate());
    }

    #[test]
    fn test_collinear_triangle_is_degenerate() {
        let tri = Triangle3::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(2.0, 2.0, 2.0),
        );
        assert!(tri.is_degenerate());
        assert!(tri.normal().is_none());

        let flat = Triangle2::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0));
        assert!(flat.is_degenerate());
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        let c = Vec2::new(0.0, 1.0);
        assert_eq!(Triangle2::new(a, b, c), Triangle2::new(c, a, b));
        assert_eq!(Triangle2::new(a, b, c), Triangle2::new(b, a, c));
        assert_ne!(Triangle2::new(a, b, c), Triangle2::new(a, b, Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_oriented_to_flips_against_reference() {
        let tri = Triangle3::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        );
        let up = Vec3::new(0.0, 0.0, 1.0);
        assert!(tri.raw_normal().dot(&up) < 0.0);

        let oriented = tri.oriented_to(&up);
        assert!(oriented.raw_normal().dot(&up) > 0.0);
        assert_eq!(oriented, tri);
        assert_eq!(tri.oriented_to(&-up).points, tri.points);
    }

    #[test]
    fn test_strictly_contains() {
        let tri = Triangle2::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0));
        assert!(tri.strictly_contains(&Vec2::new(1.0, 1.0)));
        assert!(!tri.strictly_contains(&Vec2::new(2.0, 0.0)));
        assert!(!tri.strictly_contains(&Vec2::new(3.0, 3.0)));
    }
}
