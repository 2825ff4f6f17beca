// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Batch optimization of a directory tree

use super::discovery::{discover_obj_files, output_path_for, prepare_root};
use crate::config::OptimizerConfig;
use crate::optimizer::Optimizer;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Outcome for a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    pub path: PathBuf,
    pub output: Option<PathBuf>,
    pub triangles_before: usize,
    pub triangles_after: usize,
    pub elapsed_ms: u64,
    pub error: Option<String>,
}

impl FileResult {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Batch run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub root: PathBuf,
    pub files: Vec<FileResult>,
}

impl BatchReport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            root: root.into(),
            files: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|file| file.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.succeeded()
    }

    pub fn triangles_before(&self) -> usize {
        self.files
            .iter()
            .filter(|file| file.succeeded())
            .map(|file| file.triangles_before)
            .sum()
    }

    pub fn triangles_after(&self) -> usize {
        self.files
            .iter()
            .filter(|file| file.succeeded())
            .map(|file| file.triangles_after)
            .sum()
    }

    /// Save report as JSON
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write report: {:?}", path.as_ref()))?;
        Ok(())
    }
}

/// Optimize every mesh file under `root`, writing each result next to its
/// source. Per-file failures are recorded in the report and do not stop the
/// run.
pub fn run_batch(
    root: &Path,
    config: &OptimizerConfig,
    progress: Option<&ProgressBar>,
) -> Result<BatchReport> {
    prepare_root(root)?;
    let files = discover_obj_files(root, config)?;
    info!(root = %root.display(), files = files.len(), "starting batch");

    if let Some(bar) = progress {
        bar.set_length(files.len() as u64);
    }

    let optimizer = Optimizer::new(config.clone());
    let mut report = BatchReport::new(root);

    for path in files {
        if let Some(bar) = progress {
            bar.set_message(path.display().to_string());
        }

        let output = output_path_for(&path, config);
        let start = Instant::now();
        let result = optimizer.optimize_file(&path, &output);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let file = match result {
            Ok(summary) => {
                info!(
                    file = %path.display(),
                    before = summary.triangles_before,
                    after = summary.triangles_after,
                    elapsed_ms,
                    "optimized"
                );
                FileResult {
                    path,
                    output: Some(output),
                    triangles_before: summary.triangles_before,
                    triangles_after: summary.triangles_after,
                    elapsed_ms,
                    error: None,
                }
            }
            Err(err) => {
                warn!(file = %path.display(), error = %format!("{:#}", err), "failed to optimize");
                FileResult {
                    path,
                    output: None,
                    triangles_before: 0,
                    triangles_after: 0,
                    elapsed_ms,
                    error: Some(format!("{:#}", err)),
                }
            }
        };
        report.files.push(file);

        if let Some(bar) = progress {
            bar.inc(1);
        }
    }

    Ok(report)
}
