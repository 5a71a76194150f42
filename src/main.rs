//! binsweep - find and reclaim duplicate and long-unused files.
//!
//! Usage:
//!   binsweep scan [PATH]                 Scan summary
//!   binsweep duplicates [PATH]           List duplicate groups
//!   binsweep duplicates [PATH] --delete  Delete all but one copy per group
//!   binsweep obsolete [PATH]             List files unused > 365 days
//!   binsweep obsolete --older-than 2y    Custom age threshold
//!   binsweep --help                      Show help

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use tokio_util::sync::CancellationToken;

use binsweep_analyze::{
    DuplicateFinder, DuplicateReport, ObsoleteClassifier, ObsoleteConfig, ObsoleteReport,
    format_age,
};
use binsweep_core::Inventory;
use binsweep_ops::{DeleteReport, DeleteResult, start_delete};
use binsweep_scan::{ScanConfig, Scanner};

#[derive(Parser)]
#[command(
    name = "binsweep",
    version,
    about = "Find and reclaim duplicate and long-unused files",
    long_about = "binsweep inventories a directory tree and identifies reclaimable \
                  files: exact-content duplicates and files unused beyond an age \
                  threshold. Deletion always keeps one copy per duplicate group."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a directory and show a summary
    Scan {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Find groups of files with identical content
    Duplicates {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Delete every duplicate except the first-discovered copy
        #[arg(long)]
        delete: bool,

        /// Skip the confirmation prompt when deleting
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Find files not accessed within an age threshold
    Obsolete {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Age threshold (e.g., "365d", "1y", "6m", "12h")
        #[arg(short, long, default_value = "1y")]
        older_than: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Delete every flagged file
        #[arg(long)]
        delete: bool,

        /// Skip the confirmation prompt when deleting
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    match cli.command {
        Command::Scan { path } => run_scan(&path),
        Command::Duplicates {
            path,
            format,
            delete,
            yes,
        } => run_duplicates(&path, format, delete, yes),
        Command::Obsolete {
            path,
            older_than,
            format,
            delete,
            yes,
        } => run_obsolete(&path, &older_than, format, delete, yes),
    }
}

/// Scan the tree and build an inventory, with a status line up front.
fn scan(path: &Path) -> Result<Inventory> {
    eprintln!("Scanning {}...", path.display());
    let config = ScanConfig::new(path);
    Scanner::new().scan(&config).context("Scan failed")
}

fn run_scan(path: &Path) -> Result<()> {
    let inventory = scan(path)?;

    println!();
    println!("{}", "─".repeat(60));
    println!(
        " {} - {}",
        inventory.root.display(),
        format_size(inventory.total_size())
    );
    println!(
        " {} files, {} directories, {} symlinks",
        inventory.stats.total_files, inventory.stats.total_dirs, inventory.stats.total_symlinks
    );
    if let Some((path, size)) = &inventory.stats.largest_file {
        println!(" Largest file: {} ({})", path.display(), format_size(*size));
    }
    println!(" Scanned in {:.2}s", inventory.scan_duration.as_secs_f64());
    println!("{}", "─".repeat(60));

    print_warnings(&inventory);

    Ok(())
}

fn run_duplicates(path: &Path, format: OutputFormat, delete: bool, yes: bool) -> Result<()> {
    let inventory = scan(path)?;

    eprintln!("Hashing {} files...", inventory.len());
    let report = DuplicateFinder::new().find_duplicates(&inventory);

    match format {
        OutputFormat::Text => print_duplicates(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if delete && report.has_duplicates() {
        let candidates = report.deletion_candidates();
        if confirm_delete(candidates.len(), yes)? {
            let delete_report = run_delete(candidates)?;
            print_delete_report(&delete_report);
        }
    }

    Ok(())
}

fn run_obsolete(
    path: &Path,
    older_than: &str,
    format: OutputFormat,
    delete: bool,
    yes: bool,
) -> Result<()> {
    let threshold = parse_duration(older_than)?;
    let inventory = scan(path)?;

    let config = ObsoleteConfig::builder()
        .threshold(threshold)
        .build()
        .map_err(|e| eyre!("Invalid threshold config: {e}"))?;
    let report = ObsoleteClassifier::with_config(config).classify(&inventory);

    match format {
        OutputFormat::Text => print_obsolete(&report, older_than),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if delete && report.has_candidates() {
        let candidates = report.candidate_paths();
        if confirm_delete(candidates.len(), yes)? {
            let delete_report = run_delete(candidates)?;
            print_delete_report(&delete_report);
        }
    }

    Ok(())
}

/// Run a deletion batch on a runtime, printing progress to stderr.
fn run_delete(paths: Vec<PathBuf>) -> Result<DeleteReport> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;

    runtime.block_on(async {
        let mut rx = start_delete(paths, CancellationToken::new());

        while let Some(result) = rx.recv().await {
            match result {
                DeleteResult::Progress(progress) => {
                    if let Some(current) = &progress.current_file {
                        eprintln!(
                            "[{:>3.0}%] Deleting {}",
                            progress.percentage(),
                            current.display()
                        );
                    }
                }
                DeleteResult::Complete(report) => return Ok(report),
            }
        }

        Err(eyre!("Deletion task ended without a report"))
    })
}

fn print_duplicates(report: &DuplicateReport) {
    println!();
    println!("{}", "─".repeat(70));
    println!(" Duplicate File Report");
    println!("{}", "─".repeat(70));
    println!();

    if !report.has_duplicates() {
        println!(" No duplicate files found.");
    } else {
        println!(
            " Found {} duplicate groups ({} files)",
            report.group_count(),
            report.duplicate_file_count()
        );
        println!(
            " Reclaimable space: {}",
            format_size(report.total_wasted_bytes())
        );
        println!();

        for (i, group) in report.groups.iter().enumerate() {
            println!(
                " Group {} ({} files, {} each, {} reclaimable)",
                i + 1,
                group.count(),
                format_size(group.size),
                format_size(group.wasted_bytes())
            );
            println!("   {}  [kept]", group.retained().path.display());
            for entry in group.deletion_candidates() {
                println!("   {}", entry.path.display());
            }
            println!();
        }
    }

    print_file_errors(&report.errors);
}

fn print_obsolete(report: &ObsoleteReport, threshold: &str) {
    println!();
    println!("{}", "─".repeat(70));
    println!(" Obsolete File Report (not accessed in {threshold})");
    println!("{}", "─".repeat(70));
    println!();

    if !report.has_candidates() {
        println!(" No obsolete files found.");
    } else {
        println!(
            " Found {} obsolete files ({} reclaimable)",
            report.candidates.len(),
            format_size(report.reclaimable_bytes())
        );
        println!();

        for candidate in &report.candidates {
            println!(
                "   {} ({}, last accessed {} ago)",
                candidate.entry.path.display(),
                format_size(candidate.entry.size),
                format_age(candidate.age)
            );
        }
        println!();
    }

    print_file_errors(&report.errors);
}

fn print_delete_report(report: &DeleteReport) {
    println!();
    println!(
        " {} ({} reclaimed)",
        report.summary(),
        format_size(report.bytes_reclaimed)
    );

    for outcome in report.outcomes.iter().filter(|o| !o.succeeded()) {
        println!(
            "   Failed: {} ({})",
            outcome.path.display(),
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
}

fn print_file_errors(errors: &[binsweep_core::FileError]) {
    if errors.is_empty() {
        return;
    }
    println!(" {} file(s) could not be read:", errors.len());
    for error in errors {
        println!("   {}: {}", error.path.display(), error.message);
    }
}

fn print_warnings(inventory: &Inventory) {
    if inventory.has_warnings() {
        println!();
        println!(" {} warning(s) during scan", inventory.warnings.len());
        for warning in &inventory.warnings {
            println!("   {}", warning.message);
        }
    }
}

/// Ask for confirmation before deleting, unless `--yes` was given.
fn confirm_delete(count: usize, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    print!("Delete {count} files? [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let confirmed = matches!(answer.trim(), "y" | "Y" | "yes");

    if !confirmed {
        println!("Aborted.");
    }
    Ok(confirmed)
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Parse a duration string (e.g., "1y", "6m", "30d", "12h").
fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();

    let (num, multiplier) = if let Some(n) = s.strip_suffix('y') {
        (n.parse::<f64>()?, 365.0 * 24.0 * 60.0 * 60.0)
    } else if let Some(n) = s.strip_suffix('m') {
        (n.parse::<f64>()?, 30.0 * 24.0 * 60.0 * 60.0)
    } else if let Some(n) = s.strip_suffix('w') {
        (n.parse::<f64>()?, 7.0 * 24.0 * 60.0 * 60.0)
    } else if let Some(n) = s.strip_suffix('d') {
        (n.parse::<f64>()?, 24.0 * 60.0 * 60.0)
    } else if let Some(n) = s.strip_suffix('h') {
        (n.parse::<f64>()?, 60.0 * 60.0)
    } else {
        // Bare numbers are days.
        (s.parse::<f64>()?, 24.0 * 60.0 * 60.0)
    };

    if num < 0.0 {
        return Err(eyre!("Age threshold cannot be negative: {s}"));
    }

    Ok(Duration::from_secs_f64(num * multiplier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(
            parse_duration("1y").unwrap(),
            Duration::from_secs(365 * 24 * 60 * 60)
        );
        assert_eq!(
            parse_duration("30d").unwrap(),
            Duration::from_secs(30 * 24 * 60 * 60)
        );
        assert_eq!(
            parse_duration("12h").unwrap(),
            Duration::from_secs(12 * 60 * 60)
        );
        assert_eq!(
            parse_duration("400").unwrap(),
            Duration::from_secs(400 * 24 * 60 * 60)
        );
        assert!(parse_duration("soon").is_err());
    }
}
