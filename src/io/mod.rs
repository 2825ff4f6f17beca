// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - parsing, importing, exporting and comparing OBJ meshes

mod compare;
mod importer;
mod parser;
mod writer;

pub use compare::{compare_meshes, MeshComparison};
pub use importer::import_obj_file;
pub use parser::{parse_obj, ObjError};
pub use writer::{export_obj, write_obj, ObjWriter};
