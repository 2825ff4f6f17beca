// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation mirroring the Wavefront OBJ data model

use super::triangle::Triangle3;
use super::vector::Vec3;
use serde::{Deserialize, Serialize};

/// Name used for faces declared before any `g` statement
pub const DEFAULT_GROUP: &str = "__UNSPECIFIED";

/// Vertex position with the optional OBJ `w` component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub point: Vec3,
    pub w: Option<f64>,
}

impl Position {
    pub fn new(point: Vec3) -> Self {
        Self { point, w: None }
    }
}

/// Texture coordinate with the optional third component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TexCoord {
    pub u: f64,
    pub v: f64,
    pub w: Option<f64>,
}

/// One face corner. Indices are 0-based into the mesh attribute lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceVertex {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

impl FaceVertex {
    pub fn new(position: usize) -> Self {
        Self {
            position,
            texcoord: None,
            normal: None,
        }
    }
}

/// Triangular face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub vertices: [FaceVertex; 3],
}

impl Face {
    pub fn new(vertices: [FaceVertex; 3]) -> Self {
        Self { vertices }
    }
}

/// Named group of faces sharing an optional material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub material: Option<String>,
    pub faces: Vec<Face>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material: None,
            faces: Vec::new(),
        }
    }
}

/// Triangle mesh with OBJ attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub material_libraries: Vec<String>,
    pub positions: Vec<Position>,
    pub texcoords: Vec<TexCoord>,
    pub normals: Vec<Vec3>,
    pub groups: Vec<Group>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex position and return its index
    pub fn add_position(&mut self, point: Vec3) -> usize {
        let index = self.positions.len();
        self.positions.push(Position::new(point));
        index
    }

    /// Add a vertex normal and return its index
    pub fn add_normal(&mut self, normal: Vec3) -> usize {
        let index = self.normals.len();
        self.normals.push(normal);
        index
    }

    /// Return the index of the named group, creating it if needed
    pub fn group_index_or_insert(&mut self, name: &str) -> usize {
        if let Some(index) = self.groups.iter().position(|group| group.name == name) {
            return index;
        }
        self.groups.push(Group::new(name));
        self.groups.len() - 1
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Add a face to the named group
    pub fn add_face(&mut self, group: &str, face: Face) {
        let index = self.group_index_or_insert(group);
        self.groups[index].faces.push(face);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(|group| group.faces.len()).sum()
    }

    pub fn faces(&self) -> impl Iterator<Item = &Face> {
        self.groups.iter().flat_map(|group| group.faces.iter())
    }

    pub fn position(&self, corner: &FaceVertex) -> Vec3 {
        self.positions[corner.position].point
    }

    pub fn corner_normal(&self, corner: &FaceVertex) -> Option<Vec3> {
        corner.normal.map(|index| self.normals[index])
    }

    pub fn face_positions(&self, face: &Face) -> [Vec3; 3] {
        face.vertices.map(|corner| self.position(&corner))
    }

    /// Geometric triangle of a face
    pub fn face_triangle(&self, face: &Face) -> Triangle3 {
        let [a, b, c] = face.vertices;
        Triangle3::new(self.position(&a), self.position(&b), self.position(&c))
    }

    /// Whether every index of every face points into the attribute lists
    pub fn indices_valid(&self) -> bool {
        self.faces().all(|face| {
            face.vertices.iter().all(|corner| {
                corner.position < self.positions.len()
                    && corner.texcoord.map_or(true, |i| i < self.texcoords.len())
                    && corner.normal.map_or(true, |i| i < self.normals.len())
            })
        })
    }
}
