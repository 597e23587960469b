//! Core data model for copy batches.
//!
//! This module defines the main data structures for representing a copy
//! operation:
//! - TransferItem: a single selected file within a batch
//! - BatchSummary: per-batch outcome counters
//! - FileState, ConflictChoice, FailureKind: enums controlling behavior

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use serde::Serialize;
use uuid::Uuid;

/// A single selected file within a copy batch.
///
/// Created from a file name when the batch is built; the destination path
/// starts as `target_dir/file_name` and is rewritten in place when a
/// conflict is resolved with [`ConflictChoice::Rename`].
#[derive(Debug, Clone, Serialize)]
pub struct TransferItem {
    /// Unique identifier for this item within the batch
    pub id: Uuid,

    /// File name as selected from the source listing
    pub file_name: String,

    /// Full source path
    pub source_path: PathBuf,

    /// Full destination path (updated on Rename)
    pub destination_path: PathBuf,

    /// Current state of this item
    pub state: FileState,

    /// Bytes written for this item
    pub bytes_copied: u64,

    /// Which stage failed, if state is Failed
    pub failure: Option<FailureKind>,

    /// Human-readable error message
    pub error_message: Option<String>,

    /// Conflict decision applied to this item, if any
    pub decision: Option<ConflictChoice>,
}

impl TransferItem {
    pub(crate) fn new(source_dir: &Path, target_dir: &Path, file_name: String) -> Self {
        TransferItem {
            id: Uuid::new_v4(),
            source_path: source_dir.join(&file_name),
            destination_path: target_dir.join(&file_name),
            file_name,
            state: FileState::Pending,
            bytes_copied: 0,
            failure: None,
            error_message: None,
            decision: None,
        }
    }
}

/// The state of an individual file within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileState {
    /// Not yet processed
    Pending,
    /// Currently transferring
    Copying,
    /// Successfully copied
    Done,
    /// Not copied due to a Skip decision
    Skipped,
    /// Error occurred; file not (fully) copied
    Failed,
    /// Not processed because the batch was cancelled
    Cancelled,
}

impl FileState {
    /// Returns true if this state is terminal (no further changes expected).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FileState::Done | FileState::Skipped | FileState::Failed | FileState::Cancelled
        )
    }
}

/// Decision for a destination path that already exists.
///
/// The choice is made per conflict by the decision provider (the UI or a
/// fixed CLI policy), never batch-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConflictChoice {
    /// Remove the existing destination entry, then copy
    Overwrite,
    /// Leave the destination untouched; move on to the next file
    Skip,
    /// Copy to a fresh `name (N).ext` destination instead
    Rename,
    /// Stop here; this file and every unprocessed file is cancelled
    CancelRemaining,
}

impl std::fmt::Display for ConflictChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictChoice::Overwrite => write!(f, "Overwrite"),
            ConflictChoice::Skip => write!(f, "Skip"),
            ConflictChoice::Rename => write!(f, "Rename"),
            ConflictChoice::CancelRemaining => write!(f, "Cancel remaining"),
        }
    }
}

/// Which stage of a per-file copy failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// Source unreadable or destination uncreatable
    Open,
    /// A chunk was not written in full
    Write,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Open => write!(f, "open failure"),
            FailureKind::Write => write!(f, "write failure"),
        }
    }
}

/// Outcome counters for a finished batch.
///
/// Individual failures are recorded on the items as the batch runs; the
/// summary only aggregates, so a batch with failed files still finishes.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Number of items in the batch
    pub total: usize,
    /// Items copied successfully
    pub done: usize,
    /// Items skipped by decision
    pub skipped: usize,
    /// Items that failed to copy
    pub failed: usize,
    /// Items cancelled before processing
    pub cancelled: usize,
    /// Total bytes written across all items
    pub bytes_copied: u64,
    /// When the batch started processing
    #[serde(skip)]
    pub started_at: SystemTime,
    /// When the batch finished
    #[serde(skip)]
    pub finished_at: SystemTime,
}
