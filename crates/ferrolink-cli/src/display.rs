//! Display utilities for FerroLink CLI

use console::style;
use ferrolink_types::RunSummary;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Display the outcome of a sync run
pub fn display_summary(summary: &RunSummary) {
    let stats = &summary.stats;

    println!();
    println!("{}", style("Sync Statistics:").bold().underlined());
    if summary.dry_run {
        println!("  Files to link: {}", style(stats.planned).green());
    } else {
        println!("  Files linked: {}", style(stats.linked).green());
    }
    println!("  Files skipped: {}", style(stats.skipped).yellow());
    println!(
        "  Failures: {}",
        if stats.failed > 0 {
            style(stats.failed).red()
        } else {
            style(stats.failed).green()
        }
    );
    if stats.walk_errors > 0 {
        println!("  Unreadable entries: {}", style(stats.walk_errors).red());
    }
    if !summary.pair_failures.is_empty() {
        println!(
            "  Failed pairs: {}",
            style(summary.pair_failures.len()).red()
        );
    }
    if summary.skipped_pairs > 0 {
        println!(
            "  Incomplete pairs skipped: {}",
            style(summary.skipped_pairs).yellow()
        );
    }
    if !summary.dry_run {
        println!(
            "  History entries added: {}",
            style(summary.history_appended).cyan()
        );
    }
    println!(
        "  Duration: {}",
        style(format_duration(summary.duration)).blue()
    );

    if !summary.failures.is_empty() {
        println!();
        println!("{}", style("Link Failures:").bold().underlined());
        for failure in &summary.failures {
            println!("  {} {}", style("✗").red(), failure);
        }
    }

    if !summary.pair_failures.is_empty() {
        println!();
        println!("{}", style("Pair Failures:").bold().underlined());
        for failure in &summary.pair_failures {
            println!(
                "  {} {} -> {}: {}",
                style("✗").red(),
                failure.pair.source_directory.display(),
                failure.pair.destination_directory.display(),
                failure.message
            );
        }
    }
}

/// Format duration in human-readable format
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{:.2}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

/// Display a warning message with proper formatting
pub fn display_warning(message: &str) {
    println!("{} {}", style("⚠").yellow().bold(), style(message).yellow());
}

/// Display an error message with proper formatting
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), style(message).red());
}

/// Display a success message with proper formatting
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), style(message).green());
}

/// Display an info message with proper formatting
pub fn display_info(message: &str) {
    println!("{} {}", style("ℹ").blue().bold(), style(message).blue());
}

/// Create a spinner counting processed files
pub fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg} ({pos} files)")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(spinner_style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
