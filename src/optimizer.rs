// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh optimizer: patch grouping, parallel simplification and
//! reattachment of texture and normal references

use crate::config::OptimizerConfig;
use crate::geometry::{Face, FaceVertex, Group, Mesh, PointKey3, Triangle3};
use crate::io::{import_obj_file, parse_obj, ObjWriter};
use crate::simplify::{split_into_patches, Patch, PatchResult, PatchSimplifier, PatchStatus};
use ahash::AHashMap;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while mapping simplified triangles back onto mesh data
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("no source corner at ({x}, {y}, {z}) in group '{group}'")]
    MissingAttributes {
        group: String,
        x: f64,
        y: f64,
        z: f64,
    },
    #[error("face references a vertex attribute that does not exist")]
    InvalidIndices,
}

/// Summary of one optimization run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub groups: usize,
    pub patches: usize,
    pub reduced: usize,
    pub unchanged: usize,
    pub rejected: usize,
    pub malformed: usize,
    /// Patches kept as they were because reattachment failed
    pub fallbacks: usize,
    pub triangles_before: usize,
    pub triangles_after: usize,
    pub merges: usize,
}

impl OptimizationReport {
    fn record(&mut self, status: PatchStatus) {
        self.patches += 1;
        match status {
            PatchStatus::Reduced => self.reduced += 1,
            PatchStatus::Unchanged => self.unchanged += 1,
            PatchStatus::Rejected => self.rejected += 1,
            PatchStatus::Malformed => self.malformed += 1,
        }
    }

    /// Fraction of triangles removed
    pub fn reduction(&self) -> f64 {
        if self.triangles_before == 0 {
            return 0.0;
        }
        1.0 - self.triangles_after as f64 / self.triangles_before as f64
    }
}

/// Optimized mesh together with its report
#[derive(Debug, Clone)]
pub struct OptimizedMesh {
    pub mesh: Mesh,
    pub report: OptimizationReport,
}

/// Triangle count optimizer for OBJ meshes
#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    /// Create a new optimizer
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    fn simplifier(&self) -> PatchSimplifier {
        PatchSimplifier::new(self.config.tolerances)
            .with_merge_until_stable(self.config.merge_until_stable)
    }

    /// Optimize every group of `mesh`
    pub fn optimize(&self, mesh: &Mesh) -> Result<OptimizedMesh> {
        if !mesh.indices_valid() {
            return Err(OptimizeError::InvalidIndices.into());
        }
        let patches: Vec<Patch> = (0..mesh.groups.len())
            .flat_map(|group| split_into_patches(mesh, group, &self.config.tolerances))
            .collect();

        let simplifier = self.simplifier();
        let simplify_all = || -> Vec<PatchResult> {
            patches
                .par_iter()
                .map(|patch| simplifier.simplify(&patch.triangles(mesh)))
                .collect()
        };

        let results = match self.config.parallelism {
            Some(workers) => rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .context("Failed to build worker pool")?
                .install(simplify_all),
            None => simplify_all(),
        };

        let mut optimized = Mesh {
            material_libraries: mesh.material_libraries.clone(),
            positions: mesh.positions.clone(),
            texcoords: mesh.texcoords.clone(),
            normals: mesh.normals.clone(),
            groups: mesh
                .groups
                .iter()
                .map(|group| Group {
                    name: group.name.clone(),
                    material: group.material.clone(),
                    faces: Vec::new(),
                })
                .collect(),
        };

        let mut report = OptimizationReport {
            groups: mesh.groups.len(),
            triangles_before: mesh.triangle_count(),
            ..OptimizationReport::default()
        };

        for (patch, result) in patches.iter().zip(results) {
            report.record(result.status);
            report.merges += result.merges;
            let group_name = &mesh.groups[patch.group].name;

            if result.status == PatchStatus::Malformed {
                warn!(
                    group = %group_name,
                    triangles = patch.faces.len(),
                    "patch outline is not closed, keeping its faces"
                );
            }

            let faces = match reattach(mesh, patch, &result.triangles) {
                Ok(faces) => faces,
                Err(err) => {
                    warn!(error = %err, "falling back to the original patch faces");
                    report.fallbacks += 1;
                    patch.faces.clone()
                }
            };
            debug!(
                group = %group_name,
                before = patch.faces.len(),
                after = faces.len(),
                status = ?result.status,
                "simplified patch"
            );
            optimized.groups[patch.group].faces.extend(faces);
        }

        report.triangles_after = optimized.triangle_count();
        Ok(OptimizedMesh {
            mesh: optimized,
            report,
        })
    }

    /// Optimize OBJ source text, returning the new OBJ text with a
    /// triangle count header
    pub fn optimize_obj(&self, source: &str) -> Result<(String, OptimizationReport)> {
        let mesh = parse_obj(source).context("Failed to parse OBJ source")?;
        let optimized = self.optimize(&mesh)?;
        let text = ObjWriter::new()
            .with_triangle_header(optimized.report.triangles_before)
            .write(&optimized.mesh);
        Ok((text, optimized.report))
    }

    /// Optimize the OBJ file at `input` and write the result to `output`
    pub fn optimize_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<OptimizationReport> {
        let input = input.as_ref();
        let output = output.as_ref();

        let mesh = import_obj_file(input)
            .with_context(|| format!("Failed to read OBJ file: {}", input.display()))?;
        let optimized = self.optimize(&mesh)?;

        ObjWriter::new()
            .with_triangle_header(optimized.report.triangles_before)
            .export(&optimized.mesh, output)
            .with_context(|| format!("Failed to write OBJ file: {}", output.display()))?;

        Ok(optimized.report)
    }
}

/// Map simplified triangles back onto the face corners of the patch.
///
/// Every output point is an exact copy of an input position, so corners are
/// looked up by position; the first corner seen at a position wins.
pub fn reattach(mesh: &Mesh, patch: &Patch, triangles: &[Triangle3]) -> Result<Vec<Face>, OptimizeError> {
    let mut corners: AHashMap<PointKey3, FaceVertex> = AHashMap::new();
    for corner in patch.faces.iter().flat_map(|face| face.vertices.iter()) {
        corners
            .entry(PointKey3::new(&mesh.position(corner)))
            .or_insert(*corner);
    }

    triangles
        .iter()
        .map(|triangle| {
            let mut vertices = [FaceVertex::new(0); 3];
            for (slot, point) in vertices.iter_mut().zip(triangle.points.iter()) {
                *slot = *corners.get(&PointKey3::new(point)).ok_or_else(|| {
                    OptimizeError::MissingAttributes {
                        group: mesh.groups[patch.group].name.clone(),
                        x: point.x,
                        y: point.y,
                        z: point.z,
                    }
                })?;
            }
            Ok(Face::new(vertices))
        })
        .collect()
}

/// Optimize OBJ source text with the default configuration
pub fn optimize_obj(source: &str) -> Result<String> {
    Optimizer::default()
        .optimize_obj(source)
        .map(|(text, _)| text)
}

/// Optimize an OBJ file with the default configuration
pub fn optimize_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<OptimizationReport> {
    Optimizer::default().optimize_file(input, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{total_area, Vec3};

    const GRID: &str = "\
vt 0 0
vn 0 0 1
v 0 0 0
v 1 0 0
v 2 0 0
v 0 1 0
v 1 1 0
v 2 1 0
v 0 2 0
v 1 2 0
v 2 2 0
g Plate
usemtl Steel
f 1/1/1 2/1/1 5/1/1
f 1/1/1 5/1/1 4/1/1
f 2/1/1 3/1/1 6/1/1
f 2/1/1 6/1/1 5/1/1
f 4/1/1 5/1/1 8/1/1
f 4/1/1 8/1/1 7/1/1
f 5/1/1 6/1/1 9/1/1
f 5/1/1 9/1/1 8/1/1
";

    fn area(mesh: &Mesh) -> f64 {
        let triangles: Vec<Triangle3> = mesh.faces().map(|face| mesh.face_triangle(face)).collect();
        total_area(&triangles)
    }

    #[test]
    fn test_optimize_grid_keeps_attributes() -> Result<()> {
        let mesh = parse_obj(GRID)?;
        let optimized = Optimizer::default().optimize(&mesh)?;

        assert_eq!(optimized.report.triangles_before, 8);
        assert!(optimized.report.triangles_after < 8);
        assert_eq!(optimized.report.reduced, 1);
        assert!((area(&optimized.mesh) - 4.0).abs() < 1e-9);

        let plate = optimized.mesh.group("Plate").unwrap();
        assert_eq!(plate.material.as_deref(), Some("Steel"));
        for face in &plate.faces {
            for corner in &face.vertices {
                assert_eq!(corner.texcoord, Some(0));
                assert_eq!(corner.normal, Some(0));
            }
        }
        Ok(())
    }

    #[test]
    fn test_optimize_obj_writes_header() -> Result<()> {
        let text = optimize_obj(GRID)?;
        assert!(text.starts_with("# New triangle count: 2\n# Old triangle count: 8\n"));
        assert!(text.contains("usemtl Steel"));
        Ok(())
    }

    #[test]
    fn test_bounded_parallelism_matches_default() -> Result<()> {
        let mesh = parse_obj(GRID)?;
        let config = OptimizerConfig {
            parallelism: Some(2),
            ..OptimizerConfig::default()
        };
        let bounded = Optimizer::new(config).optimize(&mesh)?;
        let default = Optimizer::default().optimize(&mesh)?;
        assert_eq!(bounded.mesh, default.mesh);
        Ok(())
    }

    #[test]
    fn test_reattach_rejects_unknown_points() -> Result<()> {
        let mesh = parse_obj(GRID)?;
        let patch = split_into_patches(&mesh, 0, &Default::default()).remove(0);
        let stray = Triangle3::new(
            Vec3::new(5.0, 5.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        );
        assert!(matches!(
            reattach(&mesh, &patch, &[stray]),
            Err(OptimizeError::MissingAttributes { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_dangling_index_is_an_error() -> Result<()> {
        let mut mesh = Mesh::new();
        let a = mesh.add_position(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_position(Vec3::new(1.0, 0.0, 0.0));
        mesh.add_face(
            "Plate",
            Face::new([FaceVertex::new(a), FaceVertex::new(b), FaceVertex::new(7)]),
        );

        let error = Optimizer::default().optimize(&mesh).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<OptimizeError>(),
            Some(OptimizeError::InvalidIndices)
        ));
        Ok(())
    }

    #[test]
    fn test_empty_mesh() -> Result<()> {
        let optimized = Optimizer::default().optimize(&Mesh::new())?;
        assert_eq!(optimized.report.patches, 0);
        assert_eq!(optimized.report.reduction(), 0.0);
        Ok(())
    }
}
