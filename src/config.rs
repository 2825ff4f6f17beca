// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Optimizer configuration system

use crate::simplify::Tolerances;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory by [`OptimizerConfig::load`]
pub const CONFIG_FILE: &str = "polyreduce.toml";

/// Optimizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Geometric thresholds
    pub tolerances: Tolerances,
    /// Repeat merge passes until nothing fuses
    pub merge_until_stable: bool,
    /// Maximum parallel workers, `None` to use every core
    pub parallelism: Option<usize>,
    /// Extension of the files picked up by batch runs
    pub extension: String,
    /// Suffix replacing the extension of optimized files
    pub output_suffix: String,
    /// Verbose output
    pub verbose: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            merge_until_stable: false,
            parallelism: None, // Auto-detect
            extension: ".obj".to_string(),
            output_suffix: "_optimized.obj".to_string(),
            verbose: false,
        }
    }
}

impl OptimizerConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: OptimizerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load `path`, or `polyreduce.toml` when present, then apply the
    /// `POLYREDUCE_*` environment variables
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if PathBuf::from(CONFIG_FILE).exists() => Self::from_file(CONFIG_FILE)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a variable lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(parallelism) = lookup("POLYREDUCE_PARALLELISM") {
            self.parallelism = parallelism.parse().ok().filter(|&workers: &usize| workers > 0);
        }

        if let Some(stable) = lookup("POLYREDUCE_MERGE_UNTIL_STABLE") {
            self.merge_until_stable = stable.parse().unwrap_or(false);
        }

        if let Some(suffix) = lookup("POLYREDUCE_OUTPUT_SUFFIX") {
            self.output_suffix = suffix;
        }

        if let Some(verbose) = lookup("POLYREDUCE_VERBOSE") {
            self.verbose = verbose.parse().unwrap_or(false);
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Check if a file path has the configured extension (case-insensitive)
    pub fn matches_extension(&self, path: &Path) -> bool {
        let name = path.to_string_lossy().to_lowercase();
        name.ends_with(&self.extension.to_lowercase())
    }

    /// Check if a file path is already an optimizer output
    pub fn is_output(&self, path: &Path) -> bool {
        let name = path.to_string_lossy().to_lowercase();
        name.ends_with(&self.output_suffix.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = OptimizerConfig::default();
        assert_eq!(config.extension, ".obj");
        assert_eq!(config.output_suffix, "_optimized.obj");
        assert!(!config.merge_until_stable);
        assert_eq!(config.tolerances, Tolerances::default());
    }

    #[test]
    fn test_save_and_reload() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(CONFIG_FILE);

        let mut config = OptimizerConfig::default();
        config.merge_until_stable = true;
        config.parallelism = Some(3);
        config.tolerances.area = 1e-3;
        config.save(&path)?;

        assert_eq!(OptimizerConfig::from_file(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "merge_until_stable = true\n[tolerances]\ncoplanar = 0.01\n")?;

        let config = OptimizerConfig::from_file(&path)?;
        assert!(config.merge_until_stable);
        assert_eq!(config.tolerances.coplanar, 0.01);
        assert_eq!(config.tolerances.area, Tolerances::default().area);
        assert_eq!(config.extension, ".obj");
        Ok(())
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("POLYREDUCE_PARALLELISM", "4"),
            ("POLYREDUCE_MERGE_UNTIL_STABLE", "true"),
            ("POLYREDUCE_OUTPUT_SUFFIX", "_small.obj"),
        ]
        .into_iter()
        .collect();

        let mut config = OptimizerConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|value| value.to_string()));

        assert_eq!(config.parallelism, Some(4));
        assert!(config.merge_until_stable);
        assert_eq!(config.output_suffix, "_small.obj");
        assert!(!config.verbose);
    }

    #[test]
    fn test_extension_matching() {
        let config = OptimizerConfig::default();
        assert!(config.matches_extension(Path::new("Meshes/Part.OBJ")));
        assert!(!config.matches_extension(Path::new("Meshes/Part.stl")));
        assert!(config.is_output(Path::new("Meshes/Part_optimized.obj")));
        assert!(!config.is_output(Path::new("Meshes/Part.obj")));
    }
}
