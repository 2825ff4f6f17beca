// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities and the fixed tolerances used by the simplifier

use std::f64::consts::TAU;

/// Default fuzzy-equality distance for points
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Slope difference under which two lines are considered collinear.
/// Also the |dx| under which a line is treated as vertical.
pub const SLOPE_EPSILON: f64 = 0.001;

/// Tolerance when matching recorded angles around a vertex
pub const ANGLE_EPSILON: f64 = 1e-9;

/// Cross product magnitude under which two directions are parallel
pub const PARALLEL_EPSILON: f64 = 1e-12;

/// Triangles with an area at or below this are degenerate
pub const DEGENERATE_AREA: f64 = 1e-12;

/// Signed plane distance used when grouping triangles into patches
pub const COPLANAR_EPSILON: f64 = 1e-4;

/// Distance slack for "point lies on a 3D segment"
pub const COLLINEAR_EPSILON: f64 = 1e-7;

/// Relative area drift allowed between a patch and its re-triangulation
pub const AREA_TOLERANCE: f64 = 1e-4;

/// Check if two floats are approximately equal
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Check if two values agree within a tolerance relative to their magnitude
pub fn relative_eq(a: f64, b: f64, tolerance: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= tolerance * scale
}

/// Wrap an angle into `[0, 2π)`
pub fn normalize_angle(angle: f64) -> f64 {
    let mut wrapped = angle % TAU;
    if wrapped < 0.0 {
        wrapped += TAU;
    }
    // a tiny negative input can round up to exactly TAU
    if wrapped >= TAU {
        wrapped -= TAU;
    }
    if wrapped == 0.0 {
        // drop the sign of -0.0
        0.0
    } else {
        wrapped
    }
}

/// Distance between two angles measured around the circle
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % TAU;
    diff.min(TAU - diff)
}
