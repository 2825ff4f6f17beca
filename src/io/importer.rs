// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! OBJ file importer

use super::parser::{parse_obj, ObjError};
use crate::geometry::Mesh;
use std::fs;
use std::path::Path;

/// Import a .obj file and parse it into a mesh
pub fn import_obj_file(path: impl AsRef<Path>) -> Result<Mesh, ObjError> {
    let source = fs::read_to_string(path)?;
    parse_obj(&source)
}
