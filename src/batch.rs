//! Batch conversion over a directory tree, with an aggregate report.
//!
//! The run is best-effort by design: a file that fails to read, parse, or
//! write is recorded and the walk moves on. Nothing here is fatal.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::convert::{self, FileOutcome, FileStatus};
use crate::utc_now_iso;

/// Parameters for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub root: PathBuf,
    pub legacy_attr: String,
    pub ext: String,
    pub dry_run: bool,
}

/// A file-scoped failure (unreadable, malformed, unwritable).
#[derive(Debug, Clone, Serialize)]
pub struct BatchError {
    pub path: String,
    pub reason: String,
}

/// An attribute the translator could not convert.
#[derive(Debug, Clone, Serialize)]
pub struct MissRecord {
    pub path: String,
    pub element: String,
    pub reason: String,
}

/// Aggregate result of a batch run.
///
/// This is the whole diagnostic state of a run; there are no process-wide
/// counters behind it.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub root: String,
    pub dry_run: bool,
    pub files_scanned: usize,
    pub files_converted: usize,
    pub files_unchanged: usize,
    pub elements_converted: usize,
    pub entries_translated: usize,
    pub misses: Vec<MissRecord>,
    pub errors: Vec<BatchError>,
    pub completed_at: String,
}

impl BatchReport {
    pub fn new(root: &Path, dry_run: bool) -> BatchReport {
        BatchReport {
            root: root.display().to_string(),
            dry_run,
            files_scanned: 0,
            files_converted: 0,
            files_unchanged: 0,
            elements_converted: 0,
            entries_translated: 0,
            misses: Vec::new(),
            errors: Vec::new(),
            completed_at: String::new(),
        }
    }

    /// Fold one file outcome into the totals.
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.files_scanned += 1;
        self.elements_converted += outcome.elements_converted;
        self.entries_translated += outcome.entries_translated;
        for miss in &outcome.misses {
            self.misses.push(MissRecord {
                path: outcome.path.display().to_string(),
                element: miss.element.clone(),
                reason: miss.reason.clone(),
            });
        }
        match &outcome.status {
            FileStatus::Converted => self.files_converted += 1,
            FileStatus::Unchanged => self.files_unchanged += 1,
            FileStatus::Failed(reason) => self.errors.push(BatchError {
                path: outcome.path.display().to_string(),
                reason: reason.clone(),
            }),
        }
    }

    pub fn finish(&mut self) {
        self.completed_at = utc_now_iso();
    }
}

/// Enumerate every file with the given extension under `root`, recursively.
///
/// Sorted for stable output; processing order carries no meaning.
pub fn scan(root: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/**/*.{}", root.display(), ext);
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("invalid scan pattern: {}", pattern))?
        .flatten()
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Run a whole batch: scan, convert each file, report.
pub fn run(opts: &BatchOptions) -> Result<BatchReport> {
    let files = scan(&opts.root, &opts.ext)?;
    let mut report = BatchReport::new(&opts.root, opts.dry_run);
    for path in &files {
        let outcome = convert::convert_file(path, &opts.legacy_attr, opts.dry_run);
        report.record(&outcome);
    }
    report.finish();
    Ok(report)
}
