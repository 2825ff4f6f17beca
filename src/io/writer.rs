// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Wavefront OBJ writer

use super::parser::ObjError;
use crate::geometry::{FaceVertex, Mesh, DEFAULT_GROUP};
use std::fmt;
use std::fs;
use std::path::Path;

/// Old index to new index, assigned in order of first use
#[derive(Debug)]
struct Renumbering {
    mapping: Vec<Option<usize>>,
    order: Vec<usize>,
}

impl Renumbering {
    fn new(len: usize) -> Self {
        Self {
            mapping: vec![None; len],
            order: Vec::new(),
        }
    }

    fn touch(&mut self, index: usize) {
        if self.mapping[index].is_none() {
            self.mapping[index] = Some(self.order.len());
            self.order.push(index);
        }
    }

    /// 1-based index for the file
    fn written(&self, index: usize) -> usize {
        self.mapping[index].map_or(0, |new| new + 1)
    }
}

/// Serializes meshes to OBJ text
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjWriter {
    original_triangles: Option<usize>,
}

impl ObjWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix the output with the new and original triangle counts
    pub fn with_triangle_header(mut self, original_triangles: usize) -> Self {
        self.original_triangles = Some(original_triangles);
        self
    }

    pub fn write(&self, mesh: &Mesh) -> String {
        ObjText { writer: self, mesh }.to_string()
    }

    /// Write the OBJ text to `path`
    pub fn export(&self, mesh: &Mesh, path: impl AsRef<Path>) -> Result<(), ObjError> {
        fs::write(path, self.write(mesh))?;
        Ok(())
    }
}

/// A mesh rendered by a configured writer
struct ObjText<'a> {
    writer: &'a ObjWriter,
    mesh: &'a Mesh,
}

impl fmt::Display for ObjText<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mesh = self.mesh;

        if let Some(original) = self.writer.original_triangles {
            writeln!(out, "# New triangle count: {}", mesh.triangle_count())?;
            writeln!(out, "# Old triangle count: {}", original)?;
            writeln!(out)?;
        }

        for library in &mesh.material_libraries {
            writeln!(out, "mtllib {}", library)?;
        }
        if !mesh.material_libraries.is_empty() {
            writeln!(out)?;
        }

        let mut positions = Renumbering::new(mesh.positions.len());
        let mut texcoords = Renumbering::new(mesh.texcoords.len());
        let mut normals = Renumbering::new(mesh.normals.len());
        for corner in mesh.faces().flat_map(|face| face.vertices.iter()) {
            positions.touch(corner.position);
            if let Some(texcoord) = corner.texcoord {
                texcoords.touch(texcoord);
            }
            if let Some(normal) = corner.normal {
                normals.touch(normal);
            }
        }

        for &index in &positions.order {
            let position = &mesh.positions[index];
            let point = position.point;
            write!(out, "v {} {} {}", point.x, point.y, point.z)?;
            write_w(out, position.w)?;
        }
        for &index in &texcoords.order {
            let texcoord = &mesh.texcoords[index];
            write!(out, "vt {} {}", texcoord.u, texcoord.v)?;
            write_w(out, texcoord.w)?;
        }
        for &index in &normals.order {
            let normal = &mesh.normals[index];
            writeln!(out, "vn {} {} {}", normal.x, normal.y, normal.z)?;
        }

        for group in mesh.groups.iter().filter(|group| !group.faces.is_empty()) {
            writeln!(out)?;
            if group.name != DEFAULT_GROUP {
                writeln!(out, "g {}", group.name)?;
            }
            if let Some(material) = &group.material {
                writeln!(out, "usemtl {}", material)?;
            }
            for face in &group.faces {
                write!(out, "f")?;
                for corner in &face.vertices {
                    write!(out, " ")?;
                    write_corner(out, corner, &positions, &texcoords, &normals)?;
                }
                writeln!(out)?;
            }
        }

        Ok(())
    }
}

/// Trailing `w` component, omitted when it is the default
fn write_w(out: &mut fmt::Formatter<'_>, w: Option<f64>) -> fmt::Result {
    match w {
        Some(w) if w != 1.0 => writeln!(out, " {}", w),
        _ => writeln!(out),
    }
}

/// Corner in its shortest form: `v`, `v/vt`, `v//vn` or `v/vt/vn`
fn write_corner(
    out: &mut fmt::Formatter<'_>,
    corner: &FaceVertex,
    positions: &Renumbering,
    texcoords: &Renumbering,
    normals: &Renumbering,
) -> fmt::Result {
    let position = positions.written(corner.position);
    match (corner.texcoord, corner.normal) {
        (None, None) => write!(out, "{}", position),
        (Some(t), None) => write!(out, "{}/{}", position, texcoords.written(t)),
        (None, Some(n)) => write!(out, "{}//{}", position, normals.written(n)),
        (Some(t), Some(n)) => write!(
            out,
            "{}/{}/{}",
            position,
            texcoords.written(t),
            normals.written(n)
        ),
    }
}

/// Serialize a mesh to OBJ text without a header
pub fn write_obj(mesh: &Mesh) -> String {
    ObjWriter::new().write(mesh)
}

/// Write a mesh to an OBJ file
pub fn export_obj(mesh: &Mesh, path: impl AsRef<Path>) -> Result<(), ObjError> {
    ObjWriter::new().export(mesh, path)
}
