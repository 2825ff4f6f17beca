// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Local 2D frame of a planar patch
//!
//! Every patch is flattened into the plane of its first triangle before the
//! boundary is extracted. Projected points are cached so that unprojecting a
//! point produced by the projection returns the exact original 3D position.

use crate::geometry::{IsClose, PointKey2, PointKey3, Triangle2, Triangle3, Vec2, Vec3};
use crate::utils::math::PARALLEL_EPSILON;
use ahash::AHashMap;

/// Orthonormal frame in the plane of a reference triangle
#[derive(Debug, Clone)]
pub struct Localizer {
    origin: Vec3,
    right: Vec3,
    up: Vec3,
    normal: Vec3,
    epsilon: f64,
    projected: AHashMap<PointKey3, Vec2>,
    scanned: Vec<(Vec3, Vec2)>,
    unprojected: AHashMap<PointKey2, Vec3>,
}

impl Localizer {
    /// Build the frame of `reference`, `None` if its points are collinear.
    ///
    /// `epsilon` is the distance under which a new 3D point snaps onto an
    /// already projected one.
    pub fn new(reference: &Triangle3, epsilon: f64) -> Option<Self> {
        let [p1, p2, p3] = reference.points;

        let right = (p1 - p2).try_normalize(PARALLEL_EPSILON)?;
        let towards_third = (p3 - p2).try_normalize(PARALLEL_EPSILON)?;
        let normal = right.cross(&towards_third).try_normalize(PARALLEL_EPSILON)?;
        let up = normal.cross(&right).normalize();

        Some(Self {
            origin: p1,
            right,
            up,
            normal,
            epsilon,
            projected: AHashMap::new(),
            scanned: Vec::new(),
            unprojected: AHashMap::new(),
        })
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Unit normal of the frame (right × up)
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Local coordinates of `point`
    pub fn project(&mut self, point: &Vec3) -> Vec2 {
        let key = PointKey3::new(point);
        if let Some(local) = self.projected.get(&key) {
            return *local;
        }

        // noisy duplicates share the 2D point of the first one seen
        if let Some((_, local)) = self
            .scanned
            .iter()
            .find(|(seen, _)| seen.is_close(point, self.epsilon))
        {
            let local = *local;
            self.projected.insert(key, local);
            return local;
        }

        let offset = point - self.origin;
        let local = Vec2::new(offset.dot(&self.right), offset.dot(&self.up));
        self.projected.insert(key, local);
        self.scanned.push((*point, local));
        self.unprojected.entry(PointKey2::new(&local)).or_insert(*point);
        local
    }

    /// 3D position of a local point. Points that came out of [`Self::project`]
    /// map back to their original position exactly.
    pub fn unproject(&self, local: &Vec2) -> Vec3 {
        match self.unprojected.get(&PointKey2::new(local)) {
            Some(point) => *point,
            None => self.origin + self.right * local.x + self.up * local.y,
        }
    }

    pub fn project_triangle(&mut self, triangle: &Triangle3) -> Triangle2 {
        let [a, b, c] = triangle.points;
        Triangle2::new(self.project(&a), self.project(&b), self.project(&c))
    }

    pub fn unproject_triangle(&self, triangle: &Triangle2) -> Triangle3 {
        let [a, b, c] = triangle.points;
        Triangle3::new(self.unproject(&a), self.unproject(&b), self.unproject(&c))
    }

    pub fn project_triangles(&mut self, triangles: &[Triangle3]) -> Vec<Triangle2> {
        triangles
            .iter()
            .map(|triangle| self.project_triangle(triangle))
            .collect()
    }

    pub fn unproject_triangles(&self, triangles: &[Triangle2]) -> Vec<Triangle3> {
        triangles
            .iter()
            .map(|triangle| self.unproject_triangle(triangle))
            .collect()
    }
}
