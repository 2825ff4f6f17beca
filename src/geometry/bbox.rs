// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Bounding box utilities

use super::vector::Vec3;
use crate::utils::math;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f64::INFINITY),
            max: Vec3::repeat(f64::NEG_INFINITY),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut bbox = Self::empty();
        for point in points {
            bbox.expand_to_include(point);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn expand_to_include(&mut self, point: &Vec3) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::zeros();
        }
        self.max - self.min
    }

    /// Check if two bounding boxes are approximately equal within tolerance
    pub fn approx_eq(&self, other: &BoundingBox, tolerance: f64) -> bool {
        let corners = self.min.iter().zip(other.min.iter());
        corners
            .chain(self.max.iter().zip(other.max.iter()))
            .all(|(a, b)| math::approx_eq(*a, *b, tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let points = [Vec3::new(1.0, -2.0, 0.5), Vec3::new(-1.0, 3.0, 0.0)];
        let bbox = BoundingBox::from_points(&points);
        assert_eq!(bbox.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bbox.max, Vec3::new(1.0, 3.0, 0.5));
        assert_eq!(bbox.size(), Vec3::new(2.0, 5.0, 0.5));
        assert!(bbox.approx_eq(&bbox, 1e-9));
    }

    #[test]
    fn test_empty_box_has_zero_size() {
        let points: [Vec3; 0] = [];
        let bbox = BoundingBox::from_points(&points);
        assert!(bbox.is_empty());
        assert_eq!(bbox.size(), Vec3::zeros());
    }
}
