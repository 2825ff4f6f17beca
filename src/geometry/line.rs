// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Undirected line segments in 2D and 3D

use super::vector::{cross2, midpoint2, Vec2, Vec3};
use crate::utils::math::{PARALLEL_EPSILON, SLOPE_EPSILON};
use std::fmt;

/// Undirected 2D segment. `Line::new(a, b) == Line::new(b, a)`.
#[derive(Debug, Clone, Copy)]
pub struct Line {
    pub start: Vec2,
    pub end: Vec2,
}

impl Line {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Slope used for collinearity checks, `f64::INFINITY` when near vertical
    pub fn slope(&self) -> f64 {
        let delta_x = self.end.x - self.start.x;
        let delta_y = self.end.y - self.start.y;

        if delta_x.abs() < SLOPE_EPSILON {
            f64::INFINITY
        } else {
            delta_y / delta_x
        }
    }

    pub fn midpoint(&self) -> Vec2 {
        midpoint2(&self.start, &self.end)
    }

    pub fn is_zero_length(&self) -> bool {
        self.start == self.end
    }

    /// Same segment traversed from `end` to `start`
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    pub fn has_endpoint(&self, point: &Vec2) -> bool {
        self.start == *point || self.end == *point
    }

    /// The endpoint that is not `point`, if `point` is an endpoint
    pub fn other_endpoint(&self, point: &Vec2) -> Option<Vec2> {
        if self.start == *point {
            Some(self.end)
        } else if self.end == *point {
            Some(self.start)
        } else {
            None
        }
    }

    /// Signed parametric position of a collinear point.
    ///
    /// `0` is `start`, `1` is `end`; negative values lie beyond `start` and
    /// values above one lie beyond `end`.
    pub fn position_on_line(&self, point: &Vec2) -> f64 {
        let direction = self.end - self.start;
        let length_squared = direction.norm_squared();
        if length_squared == 0.0 {
            return 0.0;
        }
        (point - self.start).dot(&direction) / length_squared
    }

    /// Whether the two segments share an endpoint
    pub fn can_connect(&self, other: &Line) -> bool {
        self.start == other.start
            || self.end == other.end
            || self.start == other.end
            || self.end == other.start
    }

    /// Whether the two segments share an endpoint and run along the same slope
    pub fn can_merge(&self, other: &Line) -> bool {
        self.can_connect(other) && slopes_match(self.slope(), other.slope())
    }

    /// Union of the spans of two collinear segments
    pub fn merged_with(&self, other: &Line) -> Line {
        let candidates = [self.start, self.end, other.start, other.end];
        let mut lowest = (self.position_on_line(&candidates[0]), candidates[0]);
        let mut highest = lowest;

        for point in &candidates[1..] {
            let position = self.position_on_line(point);
            if position < lowest.0 {
                lowest = (position, *point);
            }
            if position > highest.0 {
                highest = (position, *point);
            }
        }

        Line::new(lowest.1, highest.1)
    }

    /// Intersection point of the two segments, `None` when parallel or apart.
    /// Touching at an endpoint counts as an intersection.
    pub fn intersection_point(&self, other: &Line) -> Option<Vec2> {
        let direction = self.end - self.start;
        let other_direction = other.end - other.start;

        let denominator = cross2(&direction, &other_direction);
        if denominator.abs() < PARALLEL_EPSILON {
            return None;
        }

        let offset = other.start - self.start;
        let t = cross2(&offset, &other_direction) / denominator;
        let u = cross2(&offset, &direction) / denominator;

        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some(self.start.lerp(&self.end, t))
        } else {
            None
        }
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) <-> ({}, {})",
            self.start.x, self.start.y, self.end.x, self.end.y
        )
    }
}

/// Slope comparison tolerant of vertical lines
pub fn slopes_match(a: f64, b: f64) -> bool {
    if a.is_infinite() || b.is_infinite() {
        return a.is_infinite() && b.is_infinite();
    }
    (a - b).abs() < SLOPE_EPSILON
}

/// Undirected 3D segment
#[derive(Debug, Clone, Copy)]
pub struct Line3 {
    pub start: Vec3,
    pub end: Vec3,
}

impl Line3 {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Whether `point` lies on the segment, endpoints included.
    /// Compares the detour through `point` against the segment length.
    pub fn contains_point(&self, point: &Vec3, epsilon: f64) -> bool {
        if *point == self.start || *point == self.end {
            return true;
        }
        let detour = (point - self.start).norm() + (self.end - point).norm();
        (detour - self.length()).abs() < epsilon
    }
}

impl PartialEq for Line3 {
    fn eq(&self, other: &Self) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }
}
