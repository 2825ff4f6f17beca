// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Directory batch processing

pub mod discovery;
pub mod runner;

pub use discovery::{discover_obj_files, output_path_for, prepare_root};
pub use runner::{run_batch, BatchReport, FileResult};
