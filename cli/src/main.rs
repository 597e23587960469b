//! PickCopy - Command-line interface for the selective copy engine.
//!
//! This is a simple CLI for testing and manual use of the copy engine.
//! Conflicts are resolved by a fixed policy instead of a dialog.

use clap::Parser;
use std::path::{Path, PathBuf};
use engine::{
    batch::copy_selected,
    decision::{DecisionProvider, Notice},
    listing::list_files,
    model::{BatchSummary, ConflictChoice},
};

/// PickCopy - copy selected files between folders
#[derive(Parser, Debug)]
#[command(name = "pickcopy")]
#[command(version = "0.1.0")]
#[command(about = "Copy files from one folder to another with conflict handling")]
struct Args {
    /// Source directory
    #[arg(long, value_name = "PATH")]
    src: PathBuf,

    /// Destination directory
    #[arg(long, value_name = "PATH")]
    dst: PathBuf,

    /// File name to copy (repeatable); defaults to every file in the source
    #[arg(long = "file", value_name = "NAME")]
    files: Vec<String>,

    /// Conflict handling: skip, overwrite, or rename
    #[arg(long, value_name = "CHOICE", default_value = "skip")]
    on_conflict: String,

    /// List the files in the source directory and exit
    #[arg(long)]
    list: bool,

    /// Print the batch summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,
}

/// DecisionProvider that applies one fixed choice to every conflict and
/// prints notices to stderr.
struct PolicyDecisions {
    choice: ConflictChoice,
    verbose: bool,
}

impl PolicyDecisions {
    fn format_bytes(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_idx = 0;

        while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
            size /= 1024.0;
            unit_idx += 1;
        }

        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

impl DecisionProvider for PolicyDecisions {
    fn resolve_conflict(&mut self, file_name: &str, _destination: &Path) -> ConflictChoice {
        if self.verbose {
            eprintln!("Conflict: {} already exists -> {}", file_name, self.choice);
        }
        self.choice
    }

    fn notify(&mut self, notice: Notice) {
        match notice {
            Notice::FileFailed {
                file_name,
                failure,
                detail,
            } => {
                eprintln!("Failed ({}): {}: {}", failure, file_name, detail);
            }
            Notice::BatchFinished(summary) => {
                eprintln!();
                eprintln!("Copy complete!");
                eprintln!(
                    "Summary: {} done, {} skipped, {} failed, {} cancelled",
                    summary.done, summary.skipped, summary.failed, summary.cancelled
                );
                eprintln!("Bytes copied: {}", Self::format_bytes(summary.bytes_copied));
            }
        }
    }
}

/// Parse and validate command-line arguments, then run the batch
fn main() {
    let args = Args::parse();

    let exit_code = match run_cli(&args) {
        Ok(Some(summary)) if summary.failed > 0 => 1,
        Ok(_) => 0,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            2
        }
    };

    std::process::exit(exit_code);
}

/// Main CLI logic - separated for testability
fn run_cli(args: &Args) -> Result<Option<BatchSummary>, String> {
    // Validate source directory exists
    if !args.src.exists() {
        return Err(format!(
            "Source directory does not exist: {}",
            args.src.display()
        ));
    }
    if !args.src.is_dir() {
        return Err(format!("Source is not a directory: {}", args.src.display()));
    }

    if args.list {
        for name in list_files(&args.src) {
            println!("{}", name);
        }
        return Ok(None);
    }

    // Validate destination directory exists
    if !args.dst.is_dir() {
        return Err(format!(
            "Destination is not a directory: {}",
            args.dst.display()
        ));
    }

    let choice = parse_conflict_choice(&args.on_conflict)?;

    // Explicit selection, or everything the lister sees
    let selection = if args.files.is_empty() {
        list_files(&args.src)
    } else {
        args.files.clone()
    };
    if args.verbose {
        eprintln!(
            "Copying {} file(s) from {} to {}",
            selection.len(),
            args.src.display(),
            args.dst.display()
        );
    }

    let mut provider = PolicyDecisions {
        choice,
        verbose: args.verbose,
    };
    let summary = copy_selected(&args.src, &args.dst, &selection, &mut provider)
        .map_err(|e| e.to_string())?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
        println!("{}", rendered);
    }

    Ok(Some(summary))
}

fn parse_conflict_choice(raw: &str) -> Result<ConflictChoice, String> {
    match raw.to_lowercase().as_str() {
        "skip" => Ok(ConflictChoice::Skip),
        "overwrite" => Ok(ConflictChoice::Overwrite),
        "rename" => Ok(ConflictChoice::Rename),
        "cancel" => Err(
            "Choice 'cancel' only makes sense interactively. \
             Use 'skip', 'overwrite', or 'rename'"
                .to_string(),
        ),
        _ => Err(format!(
            "Invalid conflict choice '{}'. Must be 'skip', 'overwrite', or 'rename'",
            raw
        )),
    }
}
