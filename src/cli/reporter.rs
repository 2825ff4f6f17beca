// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::batch::BatchReport;
use crate::geometry::MeshStats;
use crate::optimizer::OptimizationReport;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report the outcome of optimizing one file
    pub fn report_optimization(file: &str, report: &OptimizationReport, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "File:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());

        println!(
            "  {} {} → {}",
            "Triangles:".bright_black(),
            report.triangles_before.to_string().yellow(),
            report.triangles_after.to_string().cyan()
        );
        Self::print_metric("Reduction", report.reduction());

        println!("\n{}", "Patches:".bold());
        println!(
            "  {} {}  {} {}  {} {}  {} {}",
            "reduced".bright_black(),
            report.reduced.to_string().green(),
            "unchanged".bright_black(),
            report.unchanged,
            "rejected".bright_black(),
            report.rejected.to_string().yellow(),
            "malformed".bright_black(),
            report.malformed.to_string().red()
        );
        if report.fallbacks > 0 {
            println!(
                "  {} {}",
                "Fallbacks:".bright_black(),
                report.fallbacks.to_string().yellow()
            );
        }

        println!(
            "\n  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report a batch run summary
    pub fn report_batch(report: &BatchReport, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Batch:".bold(), report.root.display().to_string().cyan());
        println!("{}", "━".repeat(80).bright_black());

        for file in &report.files {
            match &file.error {
                None => println!(
                    "  {} {} {} → {} ({}ms)",
                    "✅".green(),
                    file.path.display(),
                    file.triangles_before,
                    file.triangles_after.to_string().cyan(),
                    file.elapsed_ms
                ),
                Some(error) => println!(
                    "  {} {} {}",
                    "❌".red(),
                    file.path.display(),
                    error.red()
                ),
            }
        }

        println!(
            "\n  {} {}  {} {}",
            "Succeeded:".bright_black(),
            report.succeeded().to_string().green(),
            "Failed:".bright_black(),
            report.failed().to_string().red()
        );
        println!(
            "  {} {} → {}",
            "Triangles:".bright_black(),
            report.triangles_before().to_string().yellow(),
            report.triangles_after().to_string().cyan()
        );
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report mesh statistics
    pub fn report_stats(file: &str, stats: &MeshStats) {
        println!("\n{} {}", "Mesh:".bold(), file.cyan());
        stats.print();
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Print a reduction ratio, greener the more was removed
    fn print_metric(name: &str, ratio: f64) {
        let value = format!("{:.1}%", ratio * 100.0);
        let formatted = if ratio >= 0.25 {
            value.green()
        } else if ratio > 0.0 {
            value.yellow()
        } else {
            value.bright_black()
        };

        println!("  {} {}", format!("{}:", name).bright_black(), formatted);
    }

    /// Format duration for display
    pub fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }

    /// Progress bar for file-level batch progress
    pub fn progress_bar(len: u64) -> ProgressBar {
        let bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar
    }

    /// Print progress message
    pub fn progress(message: &str) {
        println!("{} {}...", "⏳".bright_blue(), message.bright_black());
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }
}
