//! Console formatting helpers for batch output.

use colored::{ColoredString, Colorize};

use crate::convert::FileStatus;

/// Check if quiet mode is enabled via environment variable
pub fn is_quiet() -> bool {
    std::env::var("ATTREX_QUIET")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Returns a colored icon for a per-file outcome line.
///
/// Icons:
/// - Converted: ✓ (green)
/// - Unchanged: • (dimmed)
/// - Failed: ✗ (red)
pub fn status_icon(status: &FileStatus) -> ColoredString {
    match status {
        FileStatus::Converted => "✓".green(),
        FileStatus::Unchanged => "•".dimmed(),
        FileStatus::Failed(_) => "✗".red(),
    }
}

/// Common text formatting patterns
pub mod format {
    /// Format a count with a pluralized noun ("1 file", "3 files")
    pub fn count(n: usize, noun: &str) -> String {
        format!("{} {}{}", n, noun, if n == 1 { "" } else { "s" })
    }
}
