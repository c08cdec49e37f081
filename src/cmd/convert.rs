//! Convert command: scan the tree, confirm, rewrite files, summarize.

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use attrex::batch::{self, BatchReport};
use attrex::convert::{self, FileOutcome, FileStatus};
use attrex::ui;

/// Execute the convert command
#[allow(clippy::too_many_arguments)]
pub fn cmd_convert(
    root: &str,
    attr: &str,
    ext: &str,
    dry_run: bool,
    yes: bool,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let root = crate::cmd::resolve_root(root)?;
    let quiet = ui::is_quiet() || json;

    let files = batch::scan(&root, ext)?;
    if files.is_empty() {
        if json {
            let mut report = BatchReport::new(&root, dry_run);
            report.finish();
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else if !quiet {
            println!("No .{} files found under {}", ext, root.display());
        }
        return Ok(());
    }

    if !quiet {
        println!(
            "Found {} under {}",
            ui::format::count(files.len(), format!(".{} file", ext).as_str())
                .yellow(),
            format!("{}", root.display()).cyan()
        );
    }

    // Confirm before mutating files unless --yes or --dry-run
    if !dry_run && !yes {
        if atty::is(atty::Stream::Stdin) {
            let proceed = dialoguer::Confirm::new()
                .with_prompt(format!(
                    "Rewrite up to {} in place?",
                    ui::format::count(files.len(), "file")
                ))
                .default(true)
                .interact()?;
            if !proceed {
                println!("{}", "Cancelled.".dimmed());
                return Ok(());
            }
        } else {
            anyhow::bail!(
                "Refusing to rewrite files without confirmation. \
                 Pass --yes (or --dry-run) in non-interactive runs."
            );
        }
    }

    let show_bar = !quiet && !verbose && files.len() > 1;
    let bar = if show_bar {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut report = BatchReport::new(&root, dry_run);
    for path in &files {
        if let Some(pb) = &bar {
            if let Some(name) = path.file_name() {
                pb.set_message(name.to_string_lossy().into_owned());
            }
        }

        let outcome = convert::convert_file(path, attr, dry_run);

        if !quiet {
            for line in outcome_lines(&outcome, verbose) {
                match &bar {
                    Some(pb) => pb.println(line),
                    None => println!("{}", line),
                }
            }
        }
        if let Some(pb) = &bar {
            pb.inc(1);
        }

        report.record(&outcome);
    }
    if let Some(pb) = &bar {
        pb.finish_and_clear();
    }
    report.finish();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    if !quiet {
        print_summary(&report);
    }
    Ok(())
}

/// Per-file detail lines. Unchanged files only show up in verbose mode;
/// misses and failures always do.
fn outcome_lines(outcome: &FileOutcome, verbose: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let icon = ui::status_icon(&outcome.status);
    match &outcome.status {
        FileStatus::Converted => lines.push(format!(
            "  {} {} ({})",
            icon,
            outcome.path.display(),
            ui::format::count(outcome.elements_converted, "element")
        )),
        FileStatus::Unchanged => {
            if verbose && outcome.misses.is_empty() {
                lines.push(format!("  {} {}", icon, outcome.path.display()));
            }
        }
        FileStatus::Failed(reason) => {
            lines.push(format!("  {} {}: {}", icon, outcome.path.display(), reason))
        }
    }
    for miss in &outcome.misses {
        lines.push(format!(
            "  {} {} <{}>: {}",
            "⚠".yellow(),
            outcome.path.display(),
            miss.element,
            miss.reason
        ));
    }
    lines
}

fn print_summary(report: &BatchReport) {
    println!();
    println!(
        "{} {} ({}, {}), {} unchanged",
        if report.dry_run {
            "Would convert".yellow()
        } else {
            "Converted".green()
        },
        ui::format::count(report.files_converted, "file"),
        ui::format::count(report.elements_converted, "element"),
        ui::format::count(report.entries_translated, "attribute"),
        report.files_unchanged
    );
    if !report.misses.is_empty() {
        println!(
            "{} could not be translated and were left as-is",
            ui::format::count(report.misses.len(), "attribute").yellow()
        );
    }
    if !report.errors.is_empty() {
        println!("{}", "Errors:".red());
        for error in &report.errors {
            println!("  {} {}: {}", "✗".red(), error.path, error.reason);
        }
    }
    if report.dry_run {
        println!("{}", "(dry-run - no changes made)".dimmed());
    }
}
