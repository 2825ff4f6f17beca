// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh file discovery

use crate::config::OptimizerConfig;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Make sure `root` is a directory, creating it when missing
pub fn prepare_root(root: &Path) -> Result<()> {
    if !root.exists() {
        std::fs::create_dir_all(root)
            .with_context(|| format!("Failed to create directory: {}", root.display()))?;
    } else if !root.is_dir() {
        bail!("Not a directory: {}", root.display());
    }
    Ok(())
}

/// Discover every mesh file under `root` that has not been optimized yet
pub fn discover_obj_files(root: &Path, config: &OptimizerConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry =
            entry.with_context(|| format!("Failed to scan directory: {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if config.matches_extension(path) && !config.is_output(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Sibling path receiving the optimized version of `path`
pub fn output_path_for(path: &Path, config: &OptimizerConfig) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = if name.to_lowercase().ends_with(&config.extension.to_lowercase()) {
        &name[..name.len() - config.extension.len()]
    } else {
        name.as_str()
    };

    path.with_file_name(format!("{}{}", stem, config.output_suffix))
}
