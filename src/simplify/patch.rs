// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Grouping of mesh faces into coplanar patches

use super::Tolerances;
use crate::geometry::{Face, IsClose, Mesh, Triangle3, Vec3};
use crate::utils::math::PARALLEL_EPSILON;

/// Faces of one group that share a plane and a facing direction
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// Index into `Mesh::groups`
    pub group: usize,
    pub normal: Vec3,
    /// Point on the plane of the patch
    pub anchor: Vec3,
    pub faces: Vec<Face>,
}

impl Patch {
    /// Whether a face with `normal` and `points` belongs to this patch
    fn accepts(&self, normal: &Vec3, points: &[Vec3; 3], epsilon: f64) -> bool {
        normal.is_close(&self.normal, epsilon)
            && points
                .iter()
                .all(|point| (point - self.anchor).dot(&self.normal).abs() < epsilon)
    }

    /// Geometric triangles of the patch faces
    pub fn triangles(&self, mesh: &Mesh) -> Vec<Triangle3> {
        self.faces.iter().map(|face| mesh.face_triangle(face)).collect()
    }
}

/// Facing direction of a face.
///
/// A vertex normal used by at least two corners wins, then the first vertex
/// normal present, then the geometric normal.
pub fn representative_normal(mesh: &Mesh, face: &Face) -> Option<Vec3> {
    let normals: Vec<Vec3> = face
        .vertices
        .iter()
        .filter_map(|corner| mesh.corner_normal(corner))
        .filter_map(|normal| normal.try_normalize(PARALLEL_EPSILON))
        .collect();

    let shared = normals.iter().enumerate().find_map(|(i, normal)| {
        normals[i + 1..]
            .iter()
            .any(|other| other.is_close_default(normal))
            .then_some(*normal)
    });

    shared
        .or_else(|| normals.first().copied())
        .or_else(|| mesh.face_triangle(face).normal())
}

/// Split the faces of `mesh.groups[group]` into coplanar patches.
///
/// Degenerate faces are dropped. Patches keep the order in which their first
/// face appears, faces keep their order within a patch.
pub fn split_into_patches(mesh: &Mesh, group: usize, tolerances: &Tolerances) -> Vec<Patch> {
    let Some(source) = mesh.groups.get(group) else {
        return Vec::new();
    };

    let mut patches: Vec<Patch> = Vec::new();
    for face in &source.faces {
        let triangle = mesh.face_triangle(face);
        if triangle.is_degenerate() {
            continue;
        }
        let Some(normal) = representative_normal(mesh, face) else {
            continue;
        };

        match patches
            .iter_mut()
            .find(|patch| patch.accepts(&normal, &triangle.points, tolerances.coplanar))
        {
            Some(patch) => patch.faces.push(*face),
            None => patches.push(Patch {
                group,
                normal,
                anchor: triangle.points[0],
                faces: vec![*face],
            }),
        }
    }

    patches
}
