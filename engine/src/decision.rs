//! Decision-provider trait.
//!
//! This module defines the DecisionProvider trait, the seam between the
//! copy engine and whatever answers conflict prompts (GUI dialog, CLI
//! policy, test double). It also carries the advisory notices the engine
//! raises while a batch runs.
//!
//! All methods are called synchronously during batch execution.

use std::path::Path;

use crate::model::{BatchSummary, ConflictChoice, FailureKind};

/// Advisory notices raised while a batch runs.
///
/// Notices inform the user; the engine never consumes a response to one.
#[derive(Debug, Clone)]
pub enum Notice {
    /// A file could not be copied; the batch continues
    FileFailed {
        file_name: String,
        failure: FailureKind,
        detail: String,
    },

    /// All items have been processed (some may have failed)
    BatchFinished(BatchSummary),
}

/// Trait for resolving conflicts and receiving notices from a copy batch.
///
/// Implement this trait to drive [`crate::batch::copy_selected`]. The CLI
/// provides a fixed-policy implementation; the GUI talks to the batch state
/// machine directly instead and never blocks inside this trait.
pub trait DecisionProvider {
    /// Called when `destination` already exists, before anything is written.
    ///
    /// Returns exactly one decision for this file.
    fn resolve_conflict(&mut self, file_name: &str, destination: &Path) -> ConflictChoice;

    /// Called with advisory notices: per-file failures as they happen and
    /// batch completion.
    fn notify(&mut self, notice: Notice);
}
