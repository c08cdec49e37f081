//! CLI entry point and command dispatch for attrex.

mod cmd;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

#[derive(Parser)]
#[command(name = "attrex")]
#[command(version)]
#[command(about = "Convert legacy attrs conditions in Odoo view XML", long_about = None)]
#[command(
    after_help = "GETTING STARTED:\n    attrex convert addons/ --dry-run    Preview what would change\n    attrex convert addons/              Rewrite view files in place\n\n    Conversion is best-effort: malformed files are reported and skipped."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert legacy attrs attributes under a directory tree
    ///
    /// Every matching file is parsed, elements carrying a non-empty legacy
    /// attribute are rewritten with discrete per-purpose attributes, and the
    /// file is written back in place (UTF-8, with an XML declaration).
    Convert {
        /// Root directory to scan for view files
        root: String,
        /// Legacy attribute name to convert
        #[arg(long, default_value = attrex::defaults::LEGACY_ATTR)]
        attr: String,
        /// File extension to match
        #[arg(long, default_value = attrex::defaults::VIEW_EXT)]
        ext: String,
        /// Scan and translate without writing any file
        #[arg(long)]
        dry_run: bool,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
        /// Print a JSON report instead of text output
        #[arg(long)]
        json: bool,
        /// Print a line for every scanned file, including unchanged ones
        #[arg(short, long)]
        verbose: bool,
    },
    /// Generate shell completion script
    Completion {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Show version information
    Version {
        /// Show additional build information
        #[arg(long, short)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            root,
            attr,
            ext,
            dry_run,
            yes,
            json,
            verbose,
        } => cmd::convert::cmd_convert(&root, &attr, &ext, dry_run, yes, json, verbose),
        Commands::Completion { shell } => cmd_completion(shell),
        Commands::Version { verbose } => cmd_version(verbose),
    }
}

/// Generate shell completion script
fn cmd_completion(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "attrex", &mut io::stdout());
    Ok(())
}

fn cmd_version(verbose: bool) -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    println!("attrex {}", VERSION);

    if verbose {
        const GIT_SHA: &str = env!("GIT_SHA");
        const BUILD_DATE: &str = env!("BUILD_DATE");
        println!("commit: {}", GIT_SHA);
        println!("built: {}", BUILD_DATE);
    }

    Ok(())
}
