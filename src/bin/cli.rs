// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyframe Reduce CLI

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use polyframe_reduce::batch::{output_path_for, run_batch};
use polyframe_reduce::cli::{init_tracing, Reporter};
use polyframe_reduce::geometry::analyze;
use polyframe_reduce::io::import_obj_file;
use polyframe_reduce::{OptimizerConfig, Optimizer};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "polyreduce")]
#[command(about = "Polyframe Reduce - coplanar triangle reduction for OBJ meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input OBJ file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Configuration file (defaults to ./polyreduce.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Repeat merge passes until nothing fuses
    #[arg(long, global = true)]
    stable: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize a single OBJ file
    Optimize {
        /// Input OBJ file
        input: PathBuf,

        /// Output file (defaults to <name>_optimized.obj next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Optimize every OBJ file under a directory
    Batch {
        /// Directory to scan, created when missing
        #[arg(default_value = "Meshes")]
        dir: PathBuf,

        /// Write a JSON report of the run
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Print mesh statistics
    Stats {
        /// Input OBJ file
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = OptimizerConfig::load_from(cli.config.as_deref())?;
    config.merge_until_stable |= cli.stable;
    config.verbose |= cli.verbose;
    init_tracing(config.verbose);

    let result = match &cli.command {
        Some(Commands::Optimize { input, output }) => {
            optimize_command(input, output.as_deref(), &config)
        }
        Some(Commands::Batch { dir, report }) => batch_command(dir, report.as_deref(), &config),
        Some(Commands::Stats { input }) => stats_command(input),
        Some(Commands::Version) => {
            println!("Polyframe Reduce v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => match &cli.input {
            Some(input) => optimize_command(input, cli.output.as_deref(), &config),
            None => {
                eprintln!("Error: Input file required");
                eprintln!("Usage: polyreduce <INPUT> [--output <OUTPUT>]");
                std::process::exit(1);
            }
        },
    };

    if let Err(err) = &result {
        Reporter::report_error(&format!("{:#}", err));
        std::process::exit(1);
    }

    Ok(())
}

fn optimize_command(input: &Path, output: Option<&Path>, config: &OptimizerConfig) -> Result<()> {
    if !input.exists() {
        bail!("Input file not found: {}", input.display());
    }

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| output_path_for(input, config));

    if config.verbose {
        Reporter::progress(&format!("Optimizing {}", input.display()));
    }

    let start = Instant::now();
    let report = Optimizer::new(config.clone()).optimize_file(input, &output)?;
    let duration = start.elapsed();

    Reporter::report_optimization(&input.display().to_string(), &report, duration);
    if report.malformed > 0 {
        Reporter::report_warning(&format!(
            "{} patch(es) had an open outline and were kept as-is",
            report.malformed
        ));
    }
    Reporter::success(&format!("Wrote {}", output.display()));
    Ok(())
}

fn batch_command(dir: &Path, report_path: Option<&Path>, config: &OptimizerConfig) -> Result<()> {
    let bar = Reporter::progress_bar(0);

    let start = Instant::now();
    let report = run_batch(dir, config, Some(&bar))?;
    let duration = start.elapsed();
    bar.finish_and_clear();

    if report.files.is_empty() {
        Reporter::report_info(&format!("No OBJ files found in {}", dir.display()));
        return Ok(());
    }

    Reporter::report_batch(&report, duration);

    if let Some(path) = report_path {
        report.save_json(path)?;
        Reporter::success(&format!("Report saved to {}", path.display()));
    }

    if report.failed() > 0 {
        bail!("{} file(s) failed", report.failed());
    }
    Ok(())
}

fn stats_command(input: &Path) -> Result<()> {
    let mesh = import_obj_file(input)?;
    Reporter::report_stats(&input.display().to_string(), &analyze(&mesh));
    Ok(())
}
