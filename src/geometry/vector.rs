// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vector kernel: point aliases, fuzzy equality and exact hash keys
//!
//! Points are plain nalgebra vectors. nalgebra already provides the
//! arithmetic (`+`, `-`, scalar `*`/`/`), `norm`, `dot`, `cross`, `perp`,
//! `lerp` and `normalize`; this module adds what the simplifier needs on top.

use crate::utils::math::{normalize_angle, DEFAULT_EPSILON};
use nalgebra::{Vector2, Vector3};

/// 2D point in a patch's local frame
pub type Vec2 = Vector2<f64>;

/// 3D point or direction
pub type Vec3 = Vector3<f64>;

/// Fuzzy comparison shared by 2D and 3D points
pub trait IsClose {
    /// True when the distance to `other` is below `epsilon`
    fn is_close(&self, other: &Self, epsilon: f64) -> bool;

    /// [`IsClose::is_close`] with [`DEFAULT_EPSILON`]
    fn is_close_default(&self, other: &Self) -> bool {
        self.is_close(other, DEFAULT_EPSILON)
    }
}

impl IsClose for Vec2 {
    fn is_close(&self, other: &Self, epsilon: f64) -> bool {
        (self - other).norm() < epsilon
    }
}

impl IsClose for Vec3 {
    fn is_close(&self, other: &Self, epsilon: f64) -> bool {
        (self - other).norm() < epsilon
    }
}

/// 2D cross product (z component of the 3D cross product)
#[inline]
pub fn cross2(a: &Vec2, b: &Vec2) -> f64 {
    a.perp(b)
}

/// Angle from `from` to `to`, normalised into `[0, 2π)`
#[inline]
pub fn angle_between(from: &Vec2, to: &Vec2) -> f64 {
    normalize_angle((to.y - from.y).atan2(to.x - from.x))
}

/// Midpoint of two points
#[inline]
pub fn midpoint2(a: &Vec2, b: &Vec2) -> Vec2 {
    (a + b) / 2.0
}

#[inline]
fn key_bits(value: f64) -> u64 {
    // -0.0 == 0.0, so both must hash the same
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

/// Exact, hashable identity of a 2D point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey2([u64; 2]);

impl PointKey2 {
    pub fn new(point: &Vec2) -> Self {
        Self([key_bits(point.x), key_bits(point.y)])
    }
}

/// Exact, hashable identity of a 3D point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey3([u64; 3]);

impl PointKey3 {
    pub fn new(point: &Vec3) -> Self {
        Self([key_bits(point.x), key_bits(point.y), key_bits(point.z)])
    }
}
