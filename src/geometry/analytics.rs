// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh analytics and statistics

use super::bbox::BoundingBox;
use super::Mesh;
use serde::{Deserialize, Serialize};

/// Mesh statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshStats {
    /// Total surface area in square units
    pub surface_area: f64,
    pub bbox: BoundingBox,
    /// Number of vertex positions
    pub vertex_count: usize,
    /// Number of triangles
    pub triangle_count: usize,
    pub group_count: usize,
    /// Faces whose area is at or below the degeneracy threshold
    pub degenerate_count: usize,
}

impl MeshStats {
    /// Create empty stats
    pub fn empty() -> Self {
        Self {
            surface_area: 0.0,
            bbox: BoundingBox::empty(),
            vertex_count: 0,
            triangle_count: 0,
            group_count: 0,
            degenerate_count: 0,
        }
    }

    /// Pretty print statistics
    pub fn print(&self) {
        let size = self.bbox.size();
        println!("╔══════════════════════════════════════════════════════════╗");
        println!("║                  MESH ANALYTICS                          ║");
        println!("╠══════════════════════════════════════════════════════════╣");
        println!(
            "║ Surface Area:    {:>10.4}                              ║",
            self.surface_area
        );
        println!(
            "║ Size:            {:>7.2} × {:>7.2} × {:>7.2}            ║",
            size.x, size.y, size.z
        );
        println!("║                                                          ║");
        println!(
            "║ Vertices:        {:>10}                              ║",
            self.vertex_count
        );
        println!(
            "║ Triangles:       {:>10}                              ║",
            self.triangle_count
        );
        println!(
            "║ Groups:          {:>10}                              ║",
            self.group_count
        );
        println!(
            "║ Degenerate:      {:>10}                              ║",
            self.degenerate_count
        );
        println!("╚══════════════════════════════════════════════════════════╝");
    }
}

/// Analyze a mesh and compute statistics
pub fn analyze(mesh: &Mesh) -> MeshStats {
    let triangle_count = mesh.triangle_count();
    if mesh.vertex_count() == 0 || triangle_count == 0 {
        return MeshStats {
            vertex_count: mesh.vertex_count(),
            group_count: mesh.groups.len(),
            ..MeshStats::empty()
        };
    }

    let mut surface_area = 0.0;
    let mut degenerate_count = 0;
    for face in mesh.faces() {
        let triangle = mesh.face_triangle(face);
        if triangle.is_degenerate() {
            degenerate_count += 1;
        }
        surface_area += triangle.area();
    }

    MeshStats {
        surface_area,
        bbox: BoundingBox::from_points(mesh.positions.iter().map(|position| &position.point)),
        vertex_count: mesh.vertex_count(),
        triangle_count,
        group_count: mesh.groups.len(),
        degenerate_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Face, FaceVertex, Vec3};
    use approx::assert_relative_eq;

    #[test]
    fn test_analyze_square() {
        let mut mesh = Mesh::new();
        for (x, y) in [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (4.0, 4.0)] {
            mesh.add_position(Vec3::new(x, y, 0.0));
        }
        let face = |a, b, c| Face::new([FaceVertex::new(a), FaceVertex::new(b), FaceVertex::new(c)]);
        mesh.add_face("square", face(0, 1, 2));
        mesh.add_face("square", face(0, 2, 3));
        mesh.add_face("square", face(0, 2, 4));

        let stats = analyze(&mesh);
        assert_relative_eq!(stats.surface_area, 4.0);
        assert_eq!(stats.triangle_count, 3);
        assert_eq!(stats.vertex_count, 5);
        assert_eq!(stats.group_count, 1);
        assert_eq!(stats.degenerate_count, 1);
        assert_eq!(stats.bbox.max, Vec3::new(4.0, 4.0, 0.0));
    }

    #[test]
    fn test_analyze_empty() {
        let stats = analyze(&Mesh::new());
        assert_eq!(stats.triangle_count, 0);
        assert_eq!(stats.surface_area, 0.0);
    }
}
