// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - value primitives and mesh representation

pub mod analytics;
mod bbox;
pub mod line;
mod mesh;
pub mod shape;
pub mod triangle;
pub mod vector;

pub use analytics::{analyze, MeshStats};
pub use bbox::BoundingBox;
pub use line::{Line, Line3};
pub use mesh::{Face, FaceVertex, Group, Mesh, Position, TexCoord, DEFAULT_GROUP};
pub use shape::{point_in_polygon, Shape};
pub use triangle::{total_area, Triangle2, Triangle3};
pub use vector::{IsClose, PointKey2, PointKey3, Vec2, Vec3};
